//! Multi-version reconciliation.
//!
//! Gene records assembled from several source releases are outer-joined by
//! gene ID into one [`GeneModel`] per gene, then enriched from the registries:
//! canonical transcripts per version, HGNC symbols and names, MANE Select and
//! the RefSeq cross-references derived from it.

pub mod symbol;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{info, warn};
use rayon::prelude::*;

use crate::context::ExecutionContext;
use crate::error::Error;
use crate::model::types::{GeneModel, GeneVersionRecord};
use crate::registry::canonical::CanonicalTranscripts;
use crate::registry::hgnc::SymbolRegistry;
use crate::registry::mane::ManeSelectTranscripts;
use crate::xref::CrossReferenceLookup;

use symbol::{SymbolRule, resolve};

/// A configured source release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceVersion {
    /// Release label as configured, e.g. `29`.
    pub label: String,
    /// Whether transcripts of this release are annotated with RefSeq accessions.
    pub supports_cross_reference: bool,
}

impl SourceVersion {
    pub fn new(label: impl Into<String>, supports_cross_reference: bool) -> Self {
        Self {
            label: label.into(),
            supports_cross_reference,
        }
    }

    /// Field name of this release in [`GeneModel::gencode`].
    #[must_use]
    pub fn key(&self) -> String {
        format!("v{}", self.label)
    }
}

/// The assembled genes of one release, with its canonical transcript table.
#[derive(Debug)]
pub struct VersionedGenes {
    pub source: SourceVersion,
    pub genes: Vec<GeneVersionRecord>,
    pub canonical: Option<CanonicalTranscripts>,
}

/// Registries shared by all releases.
#[derive(Debug, Default)]
pub struct Registries {
    pub symbols: Option<SymbolRegistry>,
    pub mane: Option<ManeSelectTranscripts>,
}

/// Orders release labels numerically when both are integers, otherwise
/// lexically with numeric labels first.
#[must_use]
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn validate_labels(sources: &[VersionedGenes]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(sources.len());
    for s in sources {
        if s.source.label.trim().is_empty() {
            return Err(Error::Validation("empty source version label".to_string()));
        }
        if !seen.insert(s.source.label.as_str()) {
            return Err(Error::Validation(format!(
                "duplicate source version label '{}'",
                s.source.label
            )));
        }
    }
    Ok(())
}

/// Join every release and registry into one model per gene, sorted by gene ID.
pub fn reconcile(
    ctx: &ExecutionContext,
    mut sources: Vec<VersionedGenes>,
    registries: &Registries,
) -> Result<Vec<GeneModel>, Error> {
    validate_labels(&sources)?;
    sources.sort_by(|a, b| compare_labels(&a.source.label, &b.source.label));

    let keys: Vec<String> = sources.iter().map(|s| s.source.key()).collect();
    let lookup = registries
        .mane
        .as_ref()
        .map(|mane| CrossReferenceLookup::from_mane(mane.transcripts()));
    let wants_cross_reference = sources.iter().any(|s| s.source.supports_cross_reference);
    match &lookup {
        Some(lookup) if !lookup.is_empty() => {
            info!("Cross-reference lookup covers {} Ensembl transcripts", lookup.len());
        }
        _ if wants_cross_reference => {
            warn!("cross-reference requested but no MANE transcripts are available");
        }
        _ => {}
    }

    // gene_id -> one slot per release, in release order
    let mut joined: BTreeMap<String, Vec<Option<GeneVersionRecord>>> = BTreeMap::new();
    for (slot, source) in sources.into_iter().enumerate() {
        let cross_reference = lookup
            .as_ref()
            .filter(|_| source.source.supports_cross_reference);
        info!(
            "Joining {} genes from {} (cross-reference: {})",
            source.genes.len(),
            source.source.key(),
            cross_reference.is_some()
        );

        for mut gene in source.genes {
            gene.canonical_transcript_id = source
                .canonical
                .as_ref()
                .and_then(|c| c.get(&gene.gene_id))
                .map(str::to_string);
            for transcript in &mut gene.transcripts {
                match cross_reference {
                    Some(lookup) => lookup.annotate(transcript),
                    None => {
                        transcript.refseq_id = None;
                        transcript.refseq_version = None;
                    }
                }
            }

            let slots = joined
                .entry(gene.gene_id.clone())
                .or_insert_with(|| vec![None; keys.len()]);
            if slots[slot].is_some() {
                ctx.diagnostics().record_duplicate("gene", &gene.gene_id);
            } else {
                slots[slot] = Some(gene);
            }
        }
    }

    let rules = SymbolRule::default_order(&keys);
    let models: Vec<GeneModel> = ctx.install(|| {
        joined
            .into_par_iter()
            .map(|(gene_id, slots)| build_model(gene_id, &keys, slots, &rules, registries))
            .collect()
    });

    info!("Reconciled {} genes across {} versions", models.len(), keys.len());
    Ok(models)
}

fn build_model(
    gene_id: String,
    keys: &[String],
    slots: Vec<Option<GeneVersionRecord>>,
    rules: &[SymbolRule],
    registries: &Registries,
) -> GeneModel {
    let gencode: BTreeMap<String, Option<GeneVersionRecord>> =
        keys.iter().cloned().zip(slots).collect();
    let hgnc = registries.symbols.as_ref().and_then(|r| r.get(&gene_id));
    let resolved = resolve(rules, hgnc, &gencode);

    let previous_symbols = hgnc.map(|r| r.previous_symbols.clone()).unwrap_or_default();
    let alias_symbols = hgnc.map(|r| r.alias_symbols.clone()).unwrap_or_default();

    let search_terms = search_terms(
        resolved
            .as_ref()
            .map(|r| r.symbol.as_str())
            .into_iter()
            .chain(previous_symbols.iter().map(String::as_str))
            .chain(alias_symbols.iter().map(String::as_str))
            .chain(
                gencode
                    .values()
                    .flatten()
                    .filter_map(|g| g.gene_symbol.as_deref()),
            ),
    );

    let mane_select_transcript = registries
        .mane
        .as_ref()
        .and_then(|m| m.get(&gene_id))
        .cloned();

    GeneModel {
        symbol_upper_case: resolved.as_ref().map(|r| r.symbol.to_uppercase()),
        symbol: resolved.as_ref().map(|r| r.symbol.clone()),
        symbol_source: resolved.map(|r| r.source),
        hgnc_id: hgnc.and_then(|r| r.hgnc_id.clone()),
        name: hgnc.and_then(|r| r.name.clone()),
        previous_symbols,
        alias_symbols,
        omim_id: hgnc.and_then(|r| r.omim_id.clone()),
        search_terms,
        gencode,
        mane_select_transcript,
        gene_id,
    }
}

/// Uppercased, trimmed, non-empty terms.
fn search_terms<'a>(terms: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    terms
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::TranscriptRecord;
    use crate::registry::hgnc::HgncRecord;
    use crate::registry::mane::ManeSelectTranscript;
    use crate::strand::Strand;

    fn transcript(gene_id: &str, id: &str, version: &str) -> TranscriptRecord {
        TranscriptRecord {
            transcript_id: id.to_string(),
            transcript_version: Some(version.to_string()),
            gene_id: gene_id.to_string(),
            chrom: "1".to_string(),
            strand: Strand::Forward,
            start: 10,
            stop: 50,
            xstart: 1_000_000_010,
            xstop: 1_000_000_050,
            exons: Vec::new(),
            refseq_id: None,
            refseq_version: None,
        }
    }

    fn gene(gene_id: &str, symbol: Option<&str>, transcripts: Vec<TranscriptRecord>) -> GeneVersionRecord {
        GeneVersionRecord {
            gene_id: gene_id.to_string(),
            gene_version: Some("1".to_string()),
            gene_symbol: symbol.map(String::from),
            chrom: "1".to_string(),
            strand: Strand::Forward,
            start: 10,
            stop: 50,
            xstart: 1_000_000_010,
            xstop: 1_000_000_050,
            exons: Vec::new(),
            transcripts,
            canonical_transcript_id: None,
        }
    }

    fn source(label: &str, xref: bool, genes: Vec<GeneVersionRecord>) -> VersionedGenes {
        VersionedGenes {
            source: SourceVersion::new(label, xref),
            genes,
            canonical: None,
        }
    }

    fn hgnc(gene_id: &str, symbol: &str, previous: &[&str], alias: &[&str]) -> HgncRecord {
        HgncRecord {
            gene_id: gene_id.to_string(),
            hgnc_id: Some("HGNC:1".to_string()),
            symbol: Some(symbol.to_string()),
            name: Some("foo protein".to_string()),
            previous_symbols: previous.iter().map(|s| s.to_string()).collect(),
            alias_symbols: alias.iter().map(|s| s.to_string()).collect(),
            omim_id: None,
        }
    }

    #[test]
    fn registry_symbol_takes_precedence() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![
            source("29", false, vec![gene("ENSG1", Some("BAZ"), vec![])]),
            source("19", false, vec![gene("ENSG1", Some("BAR"), vec![])]),
        ];
        let registries = Registries {
            symbols: Some(SymbolRegistry::from_records([hgnc("ENSG1", "FOO", &["old1"], &[" ali "])])),
            mane: None,
        };

        let models = reconcile(&ctx, sources, &registries).unwrap();
        assert_eq!(models.len(), 1);
        let m = &models[0];
        assert_eq!(m.symbol.as_deref(), Some("FOO"));
        assert_eq!(m.symbol_upper_case.as_deref(), Some("FOO"));
        assert_eq!(m.symbol_source.as_deref(), Some("registry"));
        assert_eq!(m.hgnc_id.as_deref(), Some("HGNC:1"));
        assert_eq!(m.name.as_deref(), Some("foo protein"));
        assert_eq!(
            m.search_terms.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["ALI", "BAR", "BAZ", "FOO", "OLD1"]
        );
    }

    #[test]
    fn version_symbol_fallback_in_version_order() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![
            source("29", false, vec![gene("ENSG1", Some("baz"), vec![])]),
            source("19", false, vec![gene("ENSG1", None, vec![])]),
        ];
        let models = reconcile(&ctx, sources, &Registries::default()).unwrap();
        let m = &models[0];
        assert_eq!(m.symbol.as_deref(), Some("baz"));
        assert_eq!(m.symbol_upper_case.as_deref(), Some("BAZ"));
        assert_eq!(m.symbol_source.as_deref(), Some("source (v29)"));
        assert!(m.hgnc_id.is_none());
        assert!(m.previous_symbols.is_empty());
    }

    #[test]
    fn outer_join_keeps_every_version_key() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![
            source("19", false, vec![gene("ENSG2", None, vec![]), gene("ENSG1", None, vec![])]),
            source("29", false, vec![gene("ENSG3", Some("NEW"), vec![])]),
        ];
        let models = reconcile(&ctx, sources, &Registries::default()).unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.gene_id.as_str()).collect();
        assert_eq!(ids, vec!["ENSG1", "ENSG2", "ENSG3"]);

        for m in &models {
            assert_eq!(m.gencode.keys().map(String::as_str).collect::<Vec<_>>(), vec!["v19", "v29"]);
        }
        assert!(models[0].version("v19").is_some());
        assert!(models[0].version("v29").is_none());
        assert!(models[2].version("v19").is_none());
        assert!(models[2].version("v29").is_some());

        // No symbol anywhere: null symbol and empty search terms
        assert!(models[0].symbol.is_none());
        assert!(models[0].symbol_source.is_none());
        assert!(models[0].search_terms.is_empty());
    }

    #[test]
    fn canonical_join_per_version() {
        let ctx = ExecutionContext::sequential().unwrap();
        let mut v29 = source("29", false, vec![gene("ENSG1", None, vec![])]);
        v29.canonical = Some(CanonicalTranscripts::from_pairs([("ENSG1", "ENST1")]));
        let sources = vec![source("19", false, vec![gene("ENSG1", None, vec![])]), v29];

        let models = reconcile(&ctx, sources, &Registries::default()).unwrap();
        let m = &models[0];
        assert!(m.version("v19").unwrap().canonical_transcript_id.is_none());
        assert_eq!(m.version("v29").unwrap().canonical_transcript_id.as_deref(), Some("ENST1"));
    }

    #[test]
    fn cross_reference_only_for_flagged_versions() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![
            source(
                "19",
                false,
                vec![gene("ENSG1", None, vec![transcript("ENSG1", "ENST1", "2")])],
            ),
            source(
                "29",
                true,
                vec![gene(
                    "ENSG1",
                    None,
                    vec![transcript("ENSG1", "ENST1", "2"), transcript("ENSG1", "ENST9", "1")],
                )],
            ),
        ];
        let mane = ManeSelectTranscript {
            gene_id: "ENSG1".to_string(),
            matched_gene_version: "1".to_string(),
            ensembl_id: "ENST1".to_string(),
            ensembl_version: "2".to_string(),
            refseq_id: "NM_1".to_string(),
            refseq_version: "3".to_string(),
        };
        let registries = Registries {
            symbols: None,
            mane: Some(ManeSelectTranscripts::from_records([mane.clone()])),
        };

        let models = reconcile(&ctx, sources, &registries).unwrap();
        let m = &models[0];
        assert_eq!(m.mane_select_transcript.as_ref(), Some(&mane));

        let v19 = &m.version("v19").unwrap().transcripts[0];
        assert!(v19.refseq_id.is_none());
        assert!(v19.refseq_version.is_none());

        let v29 = &m.version("v29").unwrap().transcripts;
        assert_eq!(v29[0].refseq_id.as_deref(), Some("NM_1"));
        assert_eq!(v29[0].refseq_version.as_deref(), Some("3"));
        assert!(v29[1].refseq_id.is_none());
    }

    #[test]
    fn rejects_duplicate_labels() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![source("29", false, vec![]), source("29", true, vec![])];
        let err = reconcile(&ctx, sources, &Registries::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn duplicate_gene_in_one_version_is_counted() {
        let ctx = ExecutionContext::sequential().unwrap();
        let sources = vec![source(
            "29",
            false,
            vec![gene("ENSG1", Some("A"), vec![]), gene("ENSG1", Some("B"), vec![])],
        )];
        let models = reconcile(&ctx, sources, &Registries::default()).unwrap();
        assert_eq!(models[0].symbol.as_deref(), Some("A"));
        assert_eq!(ctx.diagnostics().snapshot().duplicate_records, 1);
    }

    #[test]
    fn label_ordering_is_numeric_aware() {
        let mut labels = vec!["29", "9", "M25", "19"];
        labels.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(labels, vec!["9", "19", "29", "M25"]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let make = || {
            (0..200)
                .map(|i| gene(&format!("ENSG{i:05}"), Some(format!("s{i}").as_str()), vec![]))
                .collect::<Vec<_>>()
        };
        let seq = reconcile(
            &ExecutionContext::sequential().unwrap(),
            vec![source("19", false, make())],
            &Registries::default(),
        )
        .unwrap();
        let par = reconcile(
            &ExecutionContext::new(4).unwrap(),
            vec![source("19", false, make())],
            &Registries::default(),
        )
        .unwrap();
        assert_eq!(seq, par);
    }
}
