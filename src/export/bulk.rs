//! Bulk-API request bodies: an action line followed by the document source.

use std::io::Write;

use serde_json::{Value, json};

use crate::error::Error;

/// A document ready for indexing, with its optional external ID.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    pub id: Option<String>,
    pub source: Value,
}

impl BulkDocument {
    /// Wrap `source`, taking the ID from `id_field` (a dotted path) when given.
    /// A missing or non-scalar ID field is an error.
    pub fn new(source: Value, id_field: Option<&str>) -> Result<Self, Error> {
        let id = match id_field {
            None => None,
            Some(field) => {
                let pointer = format!("/{}", field.replace('.', "/"));
                match source.pointer(&pointer) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(v @ Value::Number(_)) => Some(v.to_string()),
                    _ => {
                        return Err(Error::Validation(format!(
                            "document has no scalar ID field '{field}'"
                        )));
                    }
                }
            }
        };
        Ok(Self { id, source })
    }
}

/// Write `documents` in bulk format against `index_name`.
pub fn write_bulk<W: Write>(writer: &mut W, index_name: &str, documents: &[BulkDocument]) -> Result<(), Error> {
    for doc in documents {
        let action = match &doc.id {
            Some(id) => json!({ "index": { "_index": index_name, "_id": id } }),
            None => json!({ "index": { "_index": index_name } }),
        };
        serde_json::to_writer(&mut *writer, &action)?;
        writer.write_all(b"\n")?;
        serde_json::to_writer(&mut *writer, &doc.source)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
