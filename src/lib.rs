//! Gene models: GENCODE gene/transcript/exon assembly and multi-release reconciliation.

pub mod error;

pub mod accession;
pub mod chromosome;
pub mod cli;
pub mod config;
pub mod context;
pub mod export;
pub mod gtf;
pub mod interval;
pub mod model;
pub mod output;
pub mod reconcile;
pub mod registry;
pub mod strand;
pub mod text_file;
pub mod xref;
