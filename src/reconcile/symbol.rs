//! Preferred symbol resolution.
//!
//! Rules are tried in order and the first one that yields a symbol wins.

use std::collections::BTreeMap;

use crate::model::types::GeneVersionRecord;
use crate::registry::hgnc::HgncRecord;

/// Where a resolved symbol may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolRule {
    /// The approved symbol of the HGNC registry.
    Registry,
    /// The gene symbol annotated by one source version, by version key (`v29`).
    SourceVersion(String),
}

/// A symbol together with the name of the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub symbol: String,
    pub source: String,
}

impl SymbolRule {
    /// Registry first, then every version in the given order.
    pub fn default_order<S: AsRef<str>>(version_keys: &[S]) -> Vec<SymbolRule> {
        std::iter::once(SymbolRule::Registry)
            .chain(
                version_keys
                    .iter()
                    .map(|k| SymbolRule::SourceVersion(k.as_ref().to_string())),
            )
            .collect()
    }

    fn apply(
        &self,
        registry: Option<&HgncRecord>,
        versions: &BTreeMap<String, Option<GeneVersionRecord>>,
    ) -> Option<ResolvedSymbol> {
        match self {
            SymbolRule::Registry => {
                let symbol = registry?.symbol.as_deref()?;
                Some(ResolvedSymbol {
                    symbol: symbol.to_string(),
                    source: "registry".to_string(),
                })
            }
            SymbolRule::SourceVersion(key) => {
                let record = versions.get(key)?.as_ref()?;
                let symbol = record.gene_symbol.as_deref().filter(|s| !s.is_empty())?;
                Some(ResolvedSymbol {
                    symbol: symbol.to_string(),
                    source: format!("source ({key})"),
                })
            }
        }
    }
}

/// Apply `rules` in priority order, stopping at the first match.
#[must_use]
pub fn resolve(
    rules: &[SymbolRule],
    registry: Option<&HgncRecord>,
    versions: &BTreeMap<String, Option<GeneVersionRecord>>,
) -> Option<ResolvedSymbol> {
    rules.iter().find_map(|rule| rule.apply(registry, versions))
}
