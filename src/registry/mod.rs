//! External reference tables: HGNC symbols, canonical transcripts, MANE Select.
//!
//! All three are tab-separated with a header row and are read by column name.

pub mod canonical;
pub mod hgnc;
pub mod mane;

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::Error;

/// A tab-separated table held in memory.
#[derive(Debug)]
pub struct Table {
    columns: HashMap<String, usize>,
    /// (1-based line number, cells)
    rows: Vec<(usize, Vec<String>)>,
}

impl Table {
    /// Read a header row followed by data rows. A leading `#` on the header is
    /// ignored; blank lines are skipped.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(Error::Format("table has no header row".to_string())),
            }
        };
        let columns = header
            .trim_start_matches('#')
            .trim_end_matches('\r')
            .split('\t')
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        let mut rows = Vec::new();
        for (i, line) in lines {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            rows.push((i + 1, line.split('\t').map(str::to_string).collect()));
        }

        Ok(Self { columns, rows })
    }

    /// Index of a required column.
    pub fn column(&self, name: &str) -> Result<usize, Error> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| Error::Format(format!("missing column '{name}'")))
    }

    /// Index of an optional column.
    #[must_use]
    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(|(line, cells)| (*line, cells.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A cell value; empty and absent cells are missing.
#[must_use]
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Split a comma-separated list cell into trimmed, non-empty entries.
#[must_use]
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
