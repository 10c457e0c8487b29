//! Loading gene models into a search index with replace semantics.
//!
//! The target index is dropped and recreated with a mapping derived from the
//! record types, documents are written in batches of at most `block_size`,
//! and the sink is finalized once every batch has been written.

pub mod bulk;
pub mod mapping;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Error;
use crate::model::types::GeneModel;

pub use bulk::{BulkDocument, write_bulk};
pub use mapping::{FieldType, apply_overrides, gene_model_mapping};

/// Records per write batch when none is configured.
pub const DEFAULT_BLOCK_SIZE: usize = 200;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub index_name: String,
    /// Dotted field paths whose indexing is turned off.
    pub disable_fields: Vec<String>,
    /// (dotted field path, index type) pairs.
    pub override_types: Vec<(String, String)>,
    /// Field used as the document ID.
    pub id_field: Option<String>,
    pub block_size: usize,
    pub num_shards: u32,
    /// Recorded under `_meta.exported_from` in the mapping.
    pub exported_from: Option<String>,
}

impl ExportOptions {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            disable_fields: Vec::new(),
            override_types: Vec::new(),
            id_field: None,
            block_size: DEFAULT_BLOCK_SIZE,
            num_shards: 1,
            exported_from: None,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.index_name.is_empty()
            || self.index_name.contains(['/', '\\'])
            || self.index_name.starts_with('.')
        {
            return Err(Error::Validation(format!("invalid index name '{}'", self.index_name)));
        }
        if self.block_size == 0 {
            return Err(Error::Validation("block size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Index creation body: mappings (with overrides applied) and settings.
    pub fn index_body<S: AsRef<str>>(&self, version_keys: &[S]) -> Result<Value, Error> {
        let mut mappings = gene_model_mapping(version_keys);
        apply_overrides(&mut mappings, &self.disable_fields, &self.override_types)?;
        if let (Some(from), Value::Object(object)) = (&self.exported_from, &mut mappings) {
            object.insert("_meta".to_string(), json!({ "exported_from": from }));
        }
        Ok(json!({
            "mappings": mappings,
            "settings": {
                "index.codec": "best_compression",
                "index.mapping.total_fields.limit": 10000,
                "index.number_of_replicas": 0,
                "index.number_of_shards": self.num_shards,
                "index.refresh_interval": -1,
            }
        }))
    }
}

/// Parse a `path=type` override.
pub fn parse_type_override(arg: &str) -> Result<(String, String), Error> {
    match arg.split_once('=') {
        Some((path, ty)) if !path.is_empty() && !ty.is_empty() && !ty.contains('=') => {
            Ok((path.to_string(), ty.to_string()))
        }
        _ => Err(Error::Validation(format!("expected FIELD=TYPE, got '{arg}'"))),
    }
}

/// Destination of an export.
pub trait IndexSink {
    /// Drop any existing index and create an empty one from `index_body`.
    fn recreate(&mut self, index_body: &Value) -> Result<(), Error>;

    fn write_batch(&mut self, documents: &[BulkDocument]) -> Result<(), Error>;

    /// Make the written index visible.
    fn finalize(&mut self) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub documents: usize,
    pub batches: usize,
}

/// Export every model to `sink`.
///
/// Version keys for the mapping come from the first record, since every
/// record carries all configured versions.
pub fn export_records<I, K>(records: I, options: &ExportOptions, sink: &mut K) -> Result<ExportSummary, Error>
where
    I: IntoIterator<Item = Result<GeneModel, Error>>,
    K: IndexSink + ?Sized,
{
    options.validate()?;
    let mut records = records.into_iter().peekable();

    let version_keys: Vec<String> = match records.peek() {
        Some(Ok(first)) => first.gencode.keys().cloned().collect(),
        _ => Vec::new(),
    };
    sink.recreate(&options.index_body(&version_keys)?)?;

    let mut summary = ExportSummary::default();
    let mut buffer = Vec::with_capacity(options.block_size);
    for record in records {
        let source = serde_json::to_value(record?)?;
        buffer.push(BulkDocument::new(source, options.id_field.as_deref())?);
        if buffer.len() >= options.block_size {
            flush(sink, &mut buffer, &mut summary)?;
        }
    }
    if !buffer.is_empty() {
        flush(sink, &mut buffer, &mut summary)?;
    }

    sink.finalize()?;
    info!(
        "Exported {} documents in {} batches to index '{}'",
        summary.documents, summary.batches, options.index_name
    );
    Ok(summary)
}

fn flush<K: IndexSink + ?Sized>(
    sink: &mut K,
    buffer: &mut Vec<BulkDocument>,
    summary: &mut ExportSummary,
) -> Result<(), Error> {
    sink.write_batch(buffer)?;
    summary.documents += buffer.len();
    summary.batches += 1;
    debug!("wrote batch {} ({} documents)", summary.batches, buffer.len());
    buffer.clear();
    Ok(())
}

/// Writes an index as a directory of bulk files.
///
/// Everything is written to a staging directory next to the target, which
/// replaces `<root>/<index_name>` by rename only when [`IndexSink::finalize`]
/// succeeds; an interrupted export leaves the previous index untouched.
pub struct DirectorySink {
    index_name: String,
    target: PathBuf,
    staging: PathBuf,
    files: Vec<String>,
    documents: usize,
}

impl DirectorySink {
    pub fn new(root: &Path, index_name: &str) -> Self {
        Self {
            index_name: index_name.to_string(),
            target: root.join(index_name),
            staging: root.join(format!(".{index_name}.staging")),
            files: Vec::new(),
            documents: 0,
        }
    }

    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl IndexSink for DirectorySink {
    fn recreate(&mut self, index_body: &Value) -> Result<(), Error> {
        if self.staging.exists() {
            fs::remove_dir_all(&self.staging)?;
        }
        fs::create_dir_all(&self.staging)?;
        fs::write(self.staging.join("mapping.json"), serde_json::to_vec_pretty(index_body)?)?;
        self.files.clear();
        self.documents = 0;
        Ok(())
    }

    fn write_batch(&mut self, documents: &[BulkDocument]) -> Result<(), Error> {
        let name = format!("batch-{:05}.ndjson", self.files.len());
        let mut writer = crate::text_file::create(&self.staging.join(&name))?;
        write_bulk(&mut writer, &self.index_name, documents)?;
        writer.finish()?;
        self.files.push(name);
        self.documents += documents.len();
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        let manifest = json!({
            "index": self.index_name,
            "documents": self.documents,
            "batches": self.files,
        });
        fs::write(self.staging.join("manifest.json"), serde_json::to_vec_pretty(&manifest)?)?;

        if self.target.exists() {
            fs::remove_dir_all(&self.target)?;
        }
        fs::rename(&self.staging, &self.target)?;
        Ok(())
    }
}
