use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use genemodels::cli;
use genemodels::config::PipelineConfig;
use genemodels::context::ExecutionContext;
use genemodels::gtf;
use genemodels::model::assembly::assemble;
use genemodels::output;
use genemodels::reconcile::{Registries, VersionedGenes, reconcile};
use genemodels::registry::canonical::CanonicalTranscripts;
use genemodels::registry::hgnc::SymbolRegistry;
use genemodels::registry::mane::ManeSelectTranscripts;

#[derive(Parser)]
#[command(name = "build_gene_models", about = "Assemble and reconcile gene models across GENCODE releases")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Output gene model file (NDJSON, gzip-compressed if it ends in .gz)
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Worker threads (0 = one per core)
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();
    cli::init_logger();

    cli::banner("Build Gene Models");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = PipelineConfig::from_file(&cli_args.config)?;
    let ctx = ExecutionContext::new(cli_args.threads)?;

    cli::kv("Config", &cli_args.config.display().to_string());
    cli::kv("Output", &cli_args.out.display().to_string());
    cli::kv("Threads", &ctx.threads().to_string());
    for (name, path) in config.input_files() {
        let status = if path.exists() {
            String::new()
        } else {
            format!(" {}", "(missing)".yellow())
        };
        cli::kv(&name, &format!("{}{status}", path.display()));
    }

    eprintln!();

    // ── Registries ───────────────────────────────────────
    cli::section("Registries");

    let symbols = config
        .hgnc
        .as_deref()
        .map(|path| {
            SymbolRegistry::from_path(&ctx, path)
                .with_context(|| format!("failed to read HGNC table: {}", path.display()))
        })
        .transpose()?;
    let mane = config
        .mane_select_transcripts
        .as_deref()
        .map(|path| {
            ManeSelectTranscripts::from_path(&ctx, path)
                .with_context(|| format!("failed to read MANE Select table: {}", path.display()))
        })
        .transpose()?;

    match &symbols {
        Some(r) => cli::kv("HGNC", &format!("{} genes", r.len())),
        None => cli::warning("no HGNC table configured"),
    }
    match &mane {
        Some(m) => cli::kv("MANE Select", &format!("{} genes", m.len())),
        None => cli::warning("no MANE Select table configured"),
    }

    eprintln!();

    // ── Assembly ─────────────────────────────────────────
    cli::section("Assembly");

    let mut sources = Vec::with_capacity(config.sources.len());
    for entry in &config.sources {
        let features = gtf::load_features(&entry.gtf)
            .with_context(|| format!("failed to read GTF: {}", entry.gtf.display()))?;
        let genes = assemble(&ctx, features)
            .with_context(|| format!("failed to assemble v{}", entry.version))?;
        let canonical = entry
            .canonical_transcripts
            .as_deref()
            .map(|path| {
                CanonicalTranscripts::from_path(&ctx, path)
                    .with_context(|| format!("failed to read canonical transcripts: {}", path.display()))
            })
            .transpose()?;

        let transcripts: usize = genes.iter().map(|g| g.transcripts.len()).sum();
        cli::kv(
            &format!("v{}", entry.version),
            &format!("{} genes, {} transcripts", genes.len(), transcripts),
        );

        sources.push(VersionedGenes {
            source: entry.source_version(),
            genes,
            canonical,
        });
    }

    eprintln!();

    // ── Reconciliation ───────────────────────────────────
    cli::section("Reconciliation");

    let registries = Registries { symbols, mane };
    let models = reconcile(&ctx, sources, &registries)?;
    let with_symbol = models.iter().filter(|m| m.symbol.is_some()).count();
    let with_mane = models.iter().filter(|m| m.mane_select_transcript.is_some()).count();

    cli::kv("Genes", &models.len().to_string());
    cli::kv("With symbol", &with_symbol.to_string());
    cli::kv("With MANE Select", &with_mane.to_string());
    cli::diagnostics(&ctx.diagnostics().snapshot());

    eprintln!();

    // ── Output ───────────────────────────────────────────
    cli::section("Output");

    output::write_gene_models(&cli_args.out, &models)
        .with_context(|| format!("failed to write gene models: {}", cli_args.out.display()))?;
    cli::success(&format!("wrote {} gene models", models.len()));

    cli::print_summary(start);
    Ok(())
}
