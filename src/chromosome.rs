//! Chromosome ordinals and global (cross-chromosome) coordinates.

use crate::error::Error;

/// Multiplier separating chromosomes in the global coordinate space.
/// Assumes no chromosome is longer than one billion bases.
pub const CHROMOSOME_STRIDE: i64 = 1_000_000_000;

/// Returns the fixed ordinal of a chromosome label (without `chr` prefix).
///
/// X → 23, Y → 24, anything starting with `M` → 25, otherwise the numeric label.
pub fn ordinal(chrom: &str) -> Result<u32, Error> {
    match chrom {
        "X" => Ok(23),
        "Y" => Ok(24),
        c if c.starts_with('M') => Ok(25),
        c => c
            .parse::<u32>()
            .map_err(|_| Error::InvalidChromosome(c.to_string())),
    }
}

/// Encodes (chromosome, 1-based position) as a single monotonically increasing integer.
pub fn global_position(chrom: &str, position: u32) -> Result<i64, Error> {
    let ordinal = ordinal(chrom)?;
    let position = i64::from(position);
    if position >= CHROMOSOME_STRIDE {
        return Err(Error::Validation(format!(
            "position {position} on chromosome {chrom} exceeds the global coordinate stride"
        )));
    }
    Ok(i64::from(ordinal) * CHROMOSOME_STRIDE + position)
}

/// Removes a leading `chr` from UCSC-style sequence names.
#[must_use]
pub fn strip_chr_prefix(name: &str) -> &str {
    name.strip_prefix("chr").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_labels() -> Vec<String> {
        let mut labels: Vec<String> = (1..=22).map(|n| n.to_string()).collect();
        labels.extend(["X", "Y", "M"].map(String::from));
        labels
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal("1").unwrap(), 1);
        assert_eq!(ordinal("22").unwrap(), 22);
        assert_eq!(ordinal("X").unwrap(), 23);
        assert_eq!(ordinal("Y").unwrap(), 24);
        assert_eq!(ordinal("M").unwrap(), 25);
        assert_eq!(ordinal("MT").unwrap(), 25);
    }

    #[test]
    fn global_position_encoding() {
        assert_eq!(global_position("1", 12345).unwrap(), 1_000_012_345);
        assert_eq!(global_position("X", 1).unwrap(), 23_000_000_001);
        assert_eq!(global_position("MT", 16569).unwrap(), 25_000_016_569);
    }

    #[test]
    fn strictly_increasing_across_chromosomes() {
        let positions = [1, 2, 500_000, 248_956_422, 999_999_999];
        let mut previous: Option<i64> = None;
        for label in all_labels() {
            for &pos in &positions {
                let x = global_position(&label, pos).unwrap();
                if let Some(prev) = previous {
                    assert!(x > prev, "{label}:{pos} not after previous");
                }
                previous = Some(x);
            }
        }
    }

    #[test]
    fn invalid_chromosome_is_error() {
        let err = global_position("GL000009.2", 10).unwrap_err();
        assert!(matches!(err, Error::InvalidChromosome(ref c) if c == "GL000009.2"));
        assert!(matches!(ordinal(""), Err(Error::InvalidChromosome(_))));
    }

    #[test]
    fn position_beyond_stride_rejected() {
        assert!(matches!(
            global_position("1", 1_000_000_000),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn chr_prefix() {
        assert_eq!(strip_chr_prefix("chr1"), "1");
        assert_eq!(strip_chr_prefix("chrM"), "M");
        assert_eq!(strip_chr_prefix("X"), "X");
    }
}
