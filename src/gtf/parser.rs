//! GTF line and attribute parser.

use crate::chromosome::strip_chr_prefix;
use crate::error::Error;
use crate::strand::Strand;

use super::entry::{FeatureKind, FeatureRow};

/// Result of parsing a single GTF line.
pub enum ParsedLine {
    Row(Box<FeatureRow>),
    Discarded,
    Comment,
}

/// Column 9 attributes the model reads. Everything else is ignored.
#[derive(Debug, Default, PartialEq)]
pub struct GtfAttributes {
    pub gene_id: Option<String>,
    pub transcript_id: Option<String>,
    pub gene_name: Option<String>,
}

/// Parse a single GTF line into a feature row.
pub fn parse_line(line: &str) -> Result<ParsedLine, Error> {
    if line.starts_with('#') {
        return Ok(ParsedLine::Comment);
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ParsedLine::Comment);
    }

    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 9 {
        return Err(Error::Parse(format!(
            "GTF line has {} columns, expected 9",
            columns.len()
        )));
    }

    // Column 3: feature type (unused types are dropped before any further parsing)
    let Some(kind) = FeatureKind::from_column(columns[2]) else {
        return Ok(ParsedLine::Discarded);
    };

    let start: u32 = columns[3]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid start '{}': {e}", columns[3])))?;
    let stop: u32 = columns[4]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid end '{}': {e}", columns[4])))?;
    if start > stop {
        return Err(Error::Parse(format!("start {start} is after end {stop}")));
    }

    let strand = Strand::from_gtf(columns[6]);
    let attributes = parse_attributes(columns[8])?;

    let gene_id = attributes
        .gene_id
        .ok_or_else(|| Error::Parse("GTF row missing gene_id attribute".to_string()))?;
    if kind != FeatureKind::Gene && attributes.transcript_id.is_none() {
        return Err(Error::Parse(format!(
            "GTF {} row for {gene_id} missing transcript_id attribute",
            columns[2]
        )));
    }

    Ok(ParsedLine::Row(Box::new(FeatureRow {
        kind,
        chrom: strip_chr_prefix(columns[0]).to_string(),
        strand,
        start,
        stop,
        gene_id,
        transcript_id: attributes.transcript_id,
        gene_name: attributes.gene_name,
    })))
}

/// Parse GTF column 9: `key "value";` pairs separated by semicolons.
pub fn parse_attributes(attrs_str: &str) -> Result<GtfAttributes, Error> {
    let mut attrs = GtfAttributes::default();

    for pair in attrs_str.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .split_once(|c: char| c.is_ascii_whitespace())
            .ok_or_else(|| Error::Parse(format!("attribute missing value: '{pair}'")))?;
        let value = value.trim().trim_matches('"');

        match key {
            "gene_id" => attrs.gene_id = Some(value.to_string()),
            "transcript_id" => attrs.transcript_id = Some(value.to_string()),
            "gene_name" => attrs.gene_name = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(attrs)
}
