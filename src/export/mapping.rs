//! Search-index field mappings derived from the gene model record types.

use serde_json::{Map, Value, json};

use crate::error::Error;

/// Indexable shape of a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// 32-bit integer (`integer`).
    Integer,
    /// 64-bit integer (`long`).
    Long,
    /// Exact-match string (`keyword`).
    Keyword,
    Boolean,
    /// A list or set; indexed as its element type, `nested` when the elements are structs.
    Array(Box<FieldType>),
    /// Named fields in declaration order.
    Struct(Vec<(String, FieldType)>),
}

impl FieldType {
    pub fn structure<'a>(fields: impl IntoIterator<Item = (&'a str, FieldType)>) -> Self {
        Self::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        )
    }

    pub fn array(element: FieldType) -> Self {
        Self::Array(Box::new(element))
    }

    /// The index mapping of this type.
    #[must_use]
    pub fn mapping(&self) -> Value {
        match self {
            Self::Integer => json!({ "type": "integer" }),
            Self::Long => json!({ "type": "long" }),
            Self::Keyword => json!({ "type": "keyword" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Struct(fields) => {
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), ty.mapping()))
                    .collect();
                json!({ "properties": properties })
            }
            Self::Array(element) => {
                let mut mapping = element.mapping();
                if let (Self::Struct(_), Value::Object(object)) = (element.as_ref(), &mut mapping) {
                    object.insert("type".to_string(), Value::from("nested"));
                }
                mapping
            }
        }
    }
}

fn exon_type() -> FieldType {
    use FieldType::{Integer, Keyword, Long};
    FieldType::structure([
        ("feature_type", Keyword),
        ("start", Integer),
        ("stop", Integer),
        ("xstart", Long),
        ("xstop", Long),
    ])
}

fn transcript_type() -> FieldType {
    use FieldType::{Integer, Keyword, Long};
    FieldType::structure([
        ("transcript_id", Keyword),
        ("transcript_version", Keyword),
        ("gene_id", Keyword),
        ("chrom", Keyword),
        ("strand", Keyword),
        ("start", Integer),
        ("stop", Integer),
        ("xstart", Long),
        ("xstop", Long),
        ("exons", FieldType::array(exon_type())),
        ("refseq_id", Keyword),
        ("refseq_version", Keyword),
    ])
}

fn gene_version_type() -> FieldType {
    use FieldType::{Integer, Keyword, Long};
    FieldType::structure([
        ("gene_id", Keyword),
        ("gene_version", Keyword),
        ("gene_symbol", Keyword),
        ("chrom", Keyword),
        ("strand", Keyword),
        ("start", Integer),
        ("stop", Integer),
        ("xstart", Long),
        ("xstop", Long),
        ("exons", FieldType::array(exon_type())),
        ("transcripts", FieldType::array(transcript_type())),
        ("canonical_transcript_id", Keyword),
    ])
}

fn mane_select_type() -> FieldType {
    use FieldType::Keyword;
    FieldType::structure([
        ("gene_id", Keyword),
        ("matched_gene_version", Keyword),
        ("ensembl_id", Keyword),
        ("ensembl_version", Keyword),
        ("refseq_id", Keyword),
        ("refseq_version", Keyword),
    ])
}

/// Type of a gene model document whose `gencode` field holds `version_keys`.
pub fn gene_model_type<S: AsRef<str>>(version_keys: &[S]) -> FieldType {
    use FieldType::Keyword;
    let gencode = FieldType::Struct(
        version_keys
            .iter()
            .map(|k| (k.as_ref().to_string(), gene_version_type()))
            .collect(),
    );
    FieldType::structure([
        ("gene_id", Keyword),
        ("symbol", Keyword),
        ("symbol_upper_case", Keyword),
        ("symbol_source", Keyword),
        ("hgnc_id", Keyword),
        ("name", Keyword),
        ("previous_symbols", FieldType::array(Keyword)),
        ("alias_symbols", FieldType::array(Keyword)),
        ("omim_id", Keyword),
        ("search_terms", FieldType::array(Keyword)),
        ("gencode", gencode),
        ("mane_select_transcript", mane_select_type()),
    ])
}

#[must_use]
pub fn gene_model_mapping<S: AsRef<str>>(version_keys: &[S]) -> Value {
    gene_model_type(version_keys).mapping()
}

/// Set `parameter` on the mapping of a dotted field path (`gencode.v29.transcripts`).
pub fn set_field_parameter(mapping: &mut Value, path: &str, parameter: &str, value: Value) -> Result<(), Error> {
    let mut node = mapping;
    for key in path.split('.') {
        node = node
            .get_mut("properties")
            .and_then(|p| p.get_mut(key))
            .ok_or_else(|| Error::Validation(format!("unknown field path '{path}'")))?;
    }
    match node {
        Value::Object(object) => {
            object.insert(parameter.to_string(), value);
            Ok(())
        }
        _ => Err(Error::Validation(format!("field path '{path}' is not an object mapping"))),
    }
}

/// Disable indexing of each path in `disable_fields`, then force the type of each
/// `(path, type)` in `override_types`.
pub fn apply_overrides(
    mapping: &mut Value,
    disable_fields: &[String],
    override_types: &[(String, String)],
) -> Result<(), Error> {
    for path in disable_fields {
        set_field_parameter(mapping, path, "enabled", Value::Bool(false))?;
    }
    for (path, ty) in override_types {
        set_field_parameter(mapping, path, "type", Value::from(ty.as_str()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_container_mappings() {
        let ty = FieldType::structure([
            ("flag", FieldType::Boolean),
            ("count", FieldType::Integer),
            ("tags", FieldType::array(FieldType::Keyword)),
            ("items", FieldType::array(FieldType::structure([("pos", FieldType::Long)]))),
        ]);
        assert_eq!(
            ty.mapping(),
            json!({
                "properties": {
                    "flag": { "type": "boolean" },
                    "count": { "type": "integer" },
                    "tags": { "type": "keyword" },
                    "items": { "type": "nested", "properties": { "pos": { "type": "long" } } }
                }
            })
        );
    }

    #[test]
    fn gene_model_mapping_has_version_fields() {
        let mapping = gene_model_mapping(&["v19", "v29"]);
        let v29 = &mapping["properties"]["gencode"]["properties"]["v29"]["properties"];
        assert_eq!(v29["xstart"], json!({ "type": "long" }));
        assert_eq!(v29["start"], json!({ "type": "integer" }));
        assert_eq!(v29["transcripts"]["type"], "nested");
        assert_eq!(v29["transcripts"]["properties"]["exons"]["type"], "nested");
        assert_eq!(mapping["properties"]["search_terms"], json!({ "type": "keyword" }));
        assert!(mapping["properties"]["gencode"]["properties"].get("v19").is_some());
    }

    #[test]
    fn overrides_by_dotted_path() {
        let mut mapping = gene_model_mapping(&["v29"]);
        apply_overrides(
            &mut mapping,
            &["gencode.v29.transcripts".to_string()],
            &[("symbol".to_string(), "text".to_string())],
        )
        .unwrap();
        assert_eq!(
            mapping["properties"]["gencode"]["properties"]["v29"]["properties"]["transcripts"]["enabled"],
            json!(false)
        );
        assert_eq!(mapping["properties"]["symbol"]["type"], "text");
    }

    #[test]
    fn unknown_path_is_an_error() {
        let mut mapping = gene_model_mapping(&["v29"]);
        let err = apply_overrides(&mut mapping, &["gencode.v19".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("unknown field path 'gencode.v19'"));
    }
}
