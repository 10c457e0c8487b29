//! HGNC gene symbol registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::error::Error;
use crate::text_file;

use super::{Table, cell, split_list};

/// An approved HGNC gene, keyed by its Ensembl gene accession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgncRecord {
    pub gene_id: String,
    pub hgnc_id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub previous_symbols: Vec<String>,
    pub alias_symbols: Vec<String>,
    pub omim_id: Option<String>,
}

/// HGNC records by Ensembl gene ID.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    records: HashMap<String, HgncRecord>,
}

impl SymbolRegistry {
    /// Parse an HGNC custom download (tab-separated, header row).
    ///
    /// The gene ID is the curated `Ensembl gene ID`, falling back to the
    /// Ensembl-supplied one. Rows with neither are not linked to any gene and
    /// are skipped. Where two rows claim the same gene ID the first wins.
    pub fn from_reader<R: BufRead>(ctx: &ExecutionContext, reader: R) -> Result<Self, Error> {
        let table = Table::read(reader)?;
        let hgnc_id = table.column("HGNC ID")?;
        let symbol = table.column("Approved symbol")?;
        let name = table.column("Approved name")?;
        let previous = table.column("Previous symbols")?;
        let alias = table.column("Alias symbols")?;
        let omim = table.optional_column("OMIM ID(supplied by OMIM)");
        let ensembl = table.column("Ensembl gene ID")?;
        let ensembl_supplied = table.optional_column("Ensembl ID(supplied by Ensembl)");

        let mut records = HashMap::with_capacity(table.len());
        for (_, row) in table.rows() {
            let gene_id = cell(row, ensembl).or_else(|| ensembl_supplied.and_then(|i| cell(row, i)));
            let Some(gene_id) = gene_id else {
                continue;
            };

            let record = HgncRecord {
                gene_id: gene_id.to_string(),
                hgnc_id: cell(row, hgnc_id).map(str::to_string),
                symbol: cell(row, symbol).map(str::to_string),
                name: cell(row, name).map(str::to_string),
                previous_symbols: split_list(cell(row, previous)),
                alias_symbols: split_list(cell(row, alias)),
                omim_id: omim.and_then(|i| cell(row, i)).map(str::to_string),
            };
            match records.entry(record.gene_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(slot) => ctx.diagnostics().record_duplicate("HGNC gene", slot.key()),
            }
        }

        Ok(Self { records })
    }

    pub fn from_path(ctx: &ExecutionContext, path: &Path) -> Result<Self, Error> {
        Self::from_reader(ctx, text_file::open(path)?)
    }

    pub fn from_records(records: impl IntoIterator<Item = HgncRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.gene_id.clone(), r))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, gene_id: &str) -> Option<&HgncRecord> {
        self.records.get(gene_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
