use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::reconcile::SourceVersion;

/// One annotation release to assemble.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub version: String,
    pub gtf: PathBuf,
    pub canonical_transcripts: Option<PathBuf>,
    #[serde(default)]
    pub supports_cross_reference: bool,
}

impl SourceEntry {
    #[must_use]
    pub fn source_version(&self) -> SourceVersion {
        SourceVersion::new(self.version.clone(), self.supports_cross_reference)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub sources: Vec<SourceEntry>,
    pub hgnc: Option<PathBuf>,
    pub mane_select_transcripts: Option<PathBuf>,
}

impl PipelineConfig {
    /// Read and validate a config file. Relative input paths are resolved
    /// against the directory holding the config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("config must name at least one source");
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.version.trim().is_empty() {
                bail!("source version label must not be empty");
            }
            if !seen.insert(source.version.as_str()) {
                bail!("duplicate source version '{}'", source.version);
            }
            if source.gtf.as_os_str().is_empty() {
                bail!("source version '{}' has no GTF path", source.version);
            }
        }

        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for source in &mut self.sources {
            resolve(&mut source.gtf);
            if let Some(p) = source.canonical_transcripts.as_mut() {
                resolve(p);
            }
        }
        if let Some(p) = self.hgnc.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.mane_select_transcripts.as_mut() {
            resolve(p);
        }
    }

    /// Iterate all input files uniformly as (name, path) pairs.
    pub fn input_files(&self) -> impl Iterator<Item = (String, &Path)> {
        self.sources
            .iter()
            .flat_map(|s| {
                std::iter::once((format!("GTF v{}", s.version), s.gtf.as_path())).chain(
                    s.canonical_transcripts
                        .as_deref()
                        .map(|p| (format!("canonical v{}", s.version), p)),
                )
            })
            .chain(self.hgnc.as_deref().map(|p| ("HGNC".to_string(), p)))
            .chain(
                self.mane_select_transcripts
                    .as_deref()
                    .map(|p| ("MANE Select".to_string(), p)),
            )
    }
}
