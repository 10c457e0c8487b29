//! Ensembl → RefSeq transcript cross-references from the MANE Select table.

use std::collections::HashMap;

use crate::model::types::TranscriptRecord;
use crate::registry::mane::ManeSelectTranscript;

/// RefSeq accession and version paired with an Ensembl transcript version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSeqTranscript {
    pub refseq_id: String,
    pub refseq_version: String,
}

/// Two-level lookup: Ensembl transcript accession → Ensembl version → RefSeq transcript.
#[derive(Debug, Default)]
pub struct CrossReferenceLookup {
    by_accession: HashMap<String, HashMap<String, RefSeqTranscript>>,
}

impl CrossReferenceLookup {
    pub fn from_mane<'a>(rows: impl IntoIterator<Item = &'a ManeSelectTranscript>) -> Self {
        let mut by_accession: HashMap<String, HashMap<String, RefSeqTranscript>> = HashMap::new();
        for row in rows {
            by_accession
                .entry(row.ensembl_id.clone())
                .or_default()
                .insert(
                    row.ensembl_version.clone(),
                    RefSeqTranscript {
                        refseq_id: row.refseq_id.clone(),
                        refseq_version: row.refseq_version.clone(),
                    },
                );
        }
        Self { by_accession }
    }

    #[must_use]
    pub fn get(&self, accession: &str, version: &str) -> Option<&RefSeqTranscript> {
        self.by_accession.get(accession)?.get(version)
    }

    /// Set the RefSeq fields of a transcript; a miss (or an unversioned
    /// transcript) leaves both fields null.
    pub fn annotate(&self, transcript: &mut TranscriptRecord) {
        let found = transcript
            .transcript_version
            .as_deref()
            .and_then(|version| self.get(&transcript.transcript_id, version));
        transcript.refseq_id = found.map(|r| r.refseq_id.clone());
        transcript.refseq_version = found.map(|r| r.refseq_version.clone());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_accession.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_accession.is_empty()
    }
}
