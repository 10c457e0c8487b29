//! Gene model record types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::gtf::entry::ExonType;
use crate::registry::mane::ManeSelectTranscript;
use crate::strand::Strand;

/// A merged exon-like region with its global coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    pub feature_type: ExonType,
    pub start: u32,
    pub stop: u32,
    pub xstart: i64,
    pub xstop: i64,
}

/// A transcript of one source version with its aggregated exons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub transcript_id: String,
    pub transcript_version: Option<String>,
    pub gene_id: String,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
    pub xstart: i64,
    pub xstop: i64,
    pub exons: Vec<Exon>,
    /// Curated RefSeq cross-reference; only filled for versions that support it.
    pub refseq_id: Option<String>,
    pub refseq_version: Option<String>,
}

/// A gene as annotated by one source version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneVersionRecord {
    pub gene_id: String,
    pub gene_version: Option<String>,
    pub gene_symbol: Option<String>,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub stop: u32,
    pub xstart: i64,
    pub xstop: i64,
    pub exons: Vec<Exon>,
    pub transcripts: Vec<TranscriptRecord>,
    pub canonical_transcript_id: Option<String>,
}

/// The reconciled record for one gene across all source versions and registries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneModel {
    pub gene_id: String,
    pub symbol: Option<String>,
    pub symbol_upper_case: Option<String>,
    pub symbol_source: Option<String>,
    pub hgnc_id: Option<String>,
    pub name: Option<String>,
    pub previous_symbols: Vec<String>,
    pub alias_symbols: Vec<String>,
    pub omim_id: Option<String>,
    pub search_terms: BTreeSet<String>,
    /// One entry per configured version label (`v19`, `v29`, ...), null where
    /// the version does not annotate this gene.
    pub gencode: BTreeMap<String, Option<GeneVersionRecord>>,
    pub mane_select_transcript: Option<ManeSelectTranscript>,
}

impl GeneModel {
    /// The record of `version_key` (e.g. `v29`), if that version annotates the gene.
    #[must_use]
    pub fn version(&self, version_key: &str) -> Option<&GeneVersionRecord> {
        self.gencode.get(version_key).and_then(Option::as_ref)
    }
}
