//! Strand orientation for genomic features.

use serde::{Deserialize, Serialize};

/// Strand orientation of a genomic feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Parse from GTF column 7. "-" is reverse; everything else is forward.
    #[must_use]
    pub fn from_gtf(s: &str) -> Self {
        if s == "-" {
            Self::Reverse
        } else {
            Self::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_gtf() {
        assert_eq!(Strand::from_gtf("+"), Strand::Forward);
        assert_eq!(Strand::from_gtf("-"), Strand::Reverse);
        assert_eq!(Strand::from_gtf("."), Strand::Forward);
    }

    #[test]
    fn serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Strand::Reverse).unwrap(), "\"-\"");
        let back: Strand = serde_json::from_str("\"+\"").unwrap();
        assert_eq!(back, Strand::Forward);
    }
}
