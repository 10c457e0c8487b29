//! GTF data structures: raw feature rows and their classified forms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::strand::Strand;

/// Exon-like sub-feature type.
///
/// The derived ordering (CDS, UTR, exon) is the tie-break used when
/// intervals of different types share a start coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExonType {
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "UTR")]
    Utr,
    #[serde(rename = "exon")]
    Exon,
}

impl ExonType {
    /// CDS and UTR rows mark their transcript as coding.
    #[must_use]
    pub fn is_coding(self) -> bool {
        matches!(self, Self::Cds | Self::Utr)
    }
}

impl fmt::Display for ExonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cds => write!(f, "CDS"),
            Self::Utr => write!(f, "UTR"),
            Self::Exon => write!(f, "exon"),
        }
    }
}

/// Kind of an annotation row retained from the GTF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Gene,
    Transcript,
    ExonLike(ExonType),
}

impl FeatureKind {
    /// Maps GTF column 3. Returns `None` for feature types the model does not use
    /// (start_codon, stop_codon, Selenocysteine, ...).
    #[must_use]
    pub fn from_column(s: &str) -> Option<Self> {
        match s {
            "gene" => Some(Self::Gene),
            "transcript" => Some(Self::Transcript),
            "exon" => Some(Self::ExonLike(ExonType::Exon)),
            "CDS" => Some(Self::ExonLike(ExonType::Cds)),
            "UTR" | "five_prime_utr" | "three_prime_utr" => Some(Self::ExonLike(ExonType::Utr)),
            _ => None,
        }
    }
}

/// One retained GTF line. Identifiers are still versioned (`ACCESSION.VERSION`).
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub kind: FeatureKind,
    /// Sequence name with any `chr` prefix removed.
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
    pub gene_id: String,
    pub transcript_id: Option<String>,
    pub gene_name: Option<String>,
}

/// A gene row with its identifier split into accession and version.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneFeature {
    pub gene_id: String,
    pub gene_version: Option<String>,
    pub gene_symbol: Option<String>,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFeature {
    pub transcript_id: String,
    pub transcript_version: Option<String>,
    pub gene_id: String,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
}

/// An exon, CDS or UTR row attached to a transcript and gene.
#[derive(Debug, Clone, PartialEq)]
pub struct ExonFeature {
    pub feature_type: ExonType,
    pub transcript_id: String,
    pub gene_id: String,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
}

/// Feature rows of one annotation release, split by kind.
#[derive(Debug, Default)]
pub struct ClassifiedFeatures {
    pub genes: Vec<GeneFeature>,
    pub transcripts: Vec<TranscriptFeature>,
    pub exons: Vec<ExonFeature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_columns() {
        assert_eq!(FeatureKind::from_column("gene"), Some(FeatureKind::Gene));
        assert_eq!(
            FeatureKind::from_column("five_prime_utr"),
            Some(FeatureKind::ExonLike(ExonType::Utr))
        );
        assert_eq!(FeatureKind::from_column("start_codon"), None);
        assert_eq!(FeatureKind::from_column("Selenocysteine"), None);
    }

    #[test]
    fn exon_type_order_and_names() {
        assert!(ExonType::Cds < ExonType::Utr && ExonType::Utr < ExonType::Exon);
        assert_eq!(serde_json::to_string(&ExonType::Cds).unwrap(), "\"CDS\"");
        assert_eq!(ExonType::Exon.to_string(), "exon");
        assert!(ExonType::Utr.is_coding());
        assert!(!ExonType::Exon.is_coding());
    }
}
