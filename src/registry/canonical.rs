//! Per-release canonical transcript table (gene_id → transcript_id).

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::accession::strip_version;
use crate::context::ExecutionContext;
use crate::error::Error;
use crate::text_file;

use super::{Table, cell};

#[derive(Debug, Default)]
pub struct CanonicalTranscripts {
    by_gene: HashMap<String, String>,
}

impl CanonicalTranscripts {
    /// Parse a table with `gene_id` and `transcript_id` columns. Versions are stripped.
    pub fn from_reader<R: BufRead>(ctx: &ExecutionContext, reader: R) -> Result<Self, Error> {
        let table = Table::read(reader)?;
        let gene_col = table.column("gene_id")?;
        let transcript_col = table.column("transcript_id")?;

        let mut by_gene = HashMap::with_capacity(table.len());
        for (line, row) in table.rows() {
            match (cell(row, gene_col), cell(row, transcript_col)) {
                (Some(gene_id), Some(transcript_id)) => {
                    by_gene
                        .entry(strip_version(gene_id).to_string())
                        .or_insert_with(|| strip_version(transcript_id).to_string());
                }
                _ => ctx.diagnostics().record(&Error::MalformedRegistryRow {
                    line,
                    reason: "canonical transcript row without gene_id or transcript_id".to_string(),
                }),
            }
        }
        Ok(Self { by_gene })
    }

    pub fn from_path(ctx: &ExecutionContext, path: &Path) -> Result<Self, Error> {
        Self::from_reader(ctx, text_file::open(path)?)
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            by_gene: pairs
                .into_iter()
                .map(|(g, t)| (g.to_string(), t.to_string()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, gene_id: &str) -> Option<&str> {
        self.by_gene.get(gene_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_gene.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_gene.is_empty()
    }
}
