//! Newline-delimited JSON hand-off between the build and export stages.

use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::types::GeneModel;
use crate::text_file;

/// Write one JSON object per line.
pub fn write_ndjson<W: Write>(writer: &mut W, models: &[GeneModel]) -> Result<(), Error> {
    for model in models {
        serde_json::to_writer(&mut *writer, model)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write gene models to `path` (gzip-compressed if it ends in `.gz`).
///
/// Output goes to a hidden sibling file that is renamed over `path` once
/// complete; on failure `path` is left as it was.
pub fn write_gene_models(path: &Path, models: &[GeneModel]) -> Result<(), Error> {
    let partial = partial_path(path)?;
    let result = text_file::create(&partial)
        .and_then(|mut writer| {
            write_ndjson(&mut writer, models)?;
            writer.finish()
        })
        .and_then(|()| fs::rename(&partial, path).map_err(Error::from));
    if result.is_err() && partial.is_file() {
        let _ = fs::remove_file(&partial);
    }
    result
}

/// `dir/.partial.name`, keeping the extension so compression is unchanged.
fn partial_path(path: &Path) -> Result<PathBuf, Error> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::Validation(format!("output path has no file name: {}", path.display())))?;
    let mut partial = OsString::from(".partial.");
    partial.push(name);
    Ok(path.with_file_name(partial))
}

/// Lazily decode gene models, one per non-blank line.
pub struct GeneModelReader<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> GeneModelReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for GeneModelReader<R> {
    type Item = Result<GeneModel, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let line_number = self.line_number;
            return Some(serde_json::from_str(&line).map_err(|e| {
                Error::Parse(format!("invalid gene model on line {line_number}: {e}"))
            }));
        }
    }
}

pub fn open_gene_models(path: &Path) -> Result<GeneModelReader<Box<dyn BufRead>>, Error> {
    Ok(GeneModelReader::new(text_file::open(path)?))
}
