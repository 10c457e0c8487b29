//! Gene → transcript → exon model for a single annotation release.

pub mod assembly;
pub mod exons;
pub mod types;
