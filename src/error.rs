//! Error types for the genemodels library.

use thiserror::Error;

/// Errors that can occur while building or exporting gene models.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error occurred.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// A file format error was detected.
    #[error("{0}")]
    Format(String),

    /// A chromosome label that cannot be mapped to a global ordinal.
    /// Always fatal: every coordinate downstream depends on it.
    #[error("invalid chromosome: '{0}'")]
    InvalidChromosome(String),

    /// A transcript or exon that points at a gene absent from its source version.
    /// The row is dropped and counted rather than aborting the run.
    #[error("missing gene reference: {child} -> {gene_id}")]
    MissingGeneReference { child: String, gene_id: String },

    /// A registry row whose identifiers cannot be split into accession and version.
    /// The row is skipped and counted.
    #[error("malformed registry row (line {line}): {reason}")]
    MalformedRegistryRow { line: usize, reason: String },
}
