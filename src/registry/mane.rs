//! MANE Select summary table: the curated Ensembl/RefSeq transcript pair per gene.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accession::split_version;
use crate::context::ExecutionContext;
use crate::error::Error;
use crate::text_file;

use super::{Table, cell};

/// Status of the row selected per gene when the table has a `MANE_status` column.
const MANE_SELECT_STATUS: &str = "MANE Select";

/// A curated transcript pair, with versions split from the accessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManeSelectTranscript {
    pub gene_id: String,
    pub matched_gene_version: String,
    pub ensembl_id: String,
    pub ensembl_version: String,
    pub refseq_id: String,
    pub refseq_version: String,
}

/// MANE transcripts: every curated row, plus the MANE Select row of each Ensembl gene.
#[derive(Debug, Default)]
pub struct ManeSelectTranscripts {
    rows: Vec<ManeSelectTranscript>,
    by_gene: HashMap<String, ManeSelectTranscript>,
}

impl ManeSelectTranscripts {
    /// Parse the MANE summary (`Ensembl_Gene`, `Ensembl_nuc`, `RefSeq_nuc` columns,
    /// all versioned). Rows whose accessions lack a version are skipped and counted.
    /// Every remaining row is kept for [`Self::transcripts`]; the per-gene
    /// selection only takes `MANE Select` rows when a `MANE_status` column is present.
    pub fn from_reader<R: BufRead>(ctx: &ExecutionContext, reader: R) -> Result<Self, Error> {
        let table = Table::read(reader)?;
        let gene_col = table.column("Ensembl_Gene")?;
        let ensembl_col = table.column("Ensembl_nuc")?;
        let refseq_col = table.column("RefSeq_nuc")?;
        let status_col = table.optional_column("MANE_status");

        let mut rows = Vec::with_capacity(table.len());
        let mut by_gene = HashMap::with_capacity(table.len());
        for (line, row) in table.rows() {
            let transcript = match parse_row(line, row, gene_col, ensembl_col, refseq_col) {
                Ok(t) => t,
                Err(e) => {
                    ctx.diagnostics().record(&e);
                    continue;
                }
            };

            let is_select = status_col.is_none_or(|c| cell(row, c) == Some(MANE_SELECT_STATUS));
            if is_select {
                match by_gene.entry(transcript.gene_id.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(transcript.clone());
                    }
                    Entry::Occupied(slot) => {
                        ctx.diagnostics().record_duplicate("MANE gene", slot.key());
                    }
                }
            }
            rows.push(transcript);
        }

        Ok(Self { rows, by_gene })
    }

    pub fn from_path(ctx: &ExecutionContext, path: &Path) -> Result<Self, Error> {
        Self::from_reader(ctx, text_file::open(path)?)
    }

    /// Treat every record as a MANE Select row; the first record of a gene wins.
    pub fn from_records(records: impl IntoIterator<Item = ManeSelectTranscript>) -> Self {
        let rows: Vec<ManeSelectTranscript> = records.into_iter().collect();
        let mut by_gene = HashMap::with_capacity(rows.len());
        for r in &rows {
            by_gene.entry(r.gene_id.clone()).or_insert_with(|| r.clone());
        }
        Self { rows, by_gene }
    }

    #[must_use]
    pub fn get(&self, gene_id: &str) -> Option<&ManeSelectTranscript> {
        self.by_gene.get(gene_id)
    }

    /// Every parsed row regardless of status, one per curated transcript.
    pub fn transcripts(&self) -> impl Iterator<Item = &ManeSelectTranscript> {
        self.rows.iter()
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

fn parse_row(
    line: usize,
    row: &[String],
    gene_col: usize,
    ensembl_col: usize,
    refseq_col: usize,
) -> Result<ManeSelectTranscript, Error> {
    let versioned = |col: usize, what: &str| -> Result<(String, String), Error> {
        let value = cell(row, col).ok_or_else(|| Error::MalformedRegistryRow {
            line,
            reason: format!("empty {what}"),
        })?;
        match split_version(value) {
            (id, Some(version)) => Ok((id.to_string(), version.to_string())),
            (_, None) => Err(Error::MalformedRegistryRow {
                line,
                reason: format!("{what} '{value}' has no version"),
            }),
        }
    };

    let (gene_id, matched_gene_version) = versioned(gene_col, "Ensembl_Gene")?;
    let (ensembl_id, ensembl_version) = versioned(ensembl_col, "Ensembl_nuc")?;
    let (refseq_id, refseq_version) = versioned(refseq_col, "RefSeq_nuc")?;

    Ok(ManeSelectTranscript {
        gene_id,
        matched_gene_version,
        ensembl_id,
        ensembl_version,
        refseq_id,
        refseq_version,
    })
}
