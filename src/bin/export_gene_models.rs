use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use genemodels::cli;
use genemodels::export::{DEFAULT_BLOCK_SIZE, DirectorySink, ExportOptions, export_records, parse_type_override};
use genemodels::output;

#[derive(Parser)]
#[command(name = "export_gene_models", about = "Write gene models as search-index bulk files")]
struct Cli {
    /// Gene model file produced by build_gene_models
    input: PathBuf,

    /// Directory holding the exported indices
    output_dir: PathBuf,

    /// Index name; replaces <output_dir>/<index_name>
    index_name: String,

    /// Maximum documents per bulk file
    #[arg(long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Disable indexing of a field (dotted path, repeatable)
    #[arg(long = "disable-field")]
    disable_fields: Vec<String>,

    /// Force the index type of a field, as PATH=TYPE (repeatable)
    #[arg(long = "set-type")]
    set_types: Vec<String>,

    /// Field used as the document ID
    #[arg(long = "id-field")]
    id_field: Option<String>,

    /// Number of index shards recorded in the index settings
    #[arg(long = "num-shards", default_value_t = 1)]
    num_shards: u32,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();
    cli::init_logger();

    cli::banner("Export Gene Models");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let override_types = cli_args
        .set_types
        .iter()
        .map(|arg| parse_type_override(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let options = ExportOptions {
        index_name: cli_args.index_name.clone(),
        disable_fields: cli_args.disable_fields.clone(),
        override_types,
        id_field: cli_args.id_field.clone(),
        block_size: cli_args.block_size,
        num_shards: cli_args.num_shards,
        exported_from: Some(cli_args.input.display().to_string()),
    };

    cli::kv("Input", &cli_args.input.display().to_string());
    cli::kv("Output", &cli_args.output_dir.display().to_string());
    cli::kv("Index", &options.index_name);
    cli::kv("Block size", &options.block_size.to_string());
    if let Some(id_field) = &options.id_field {
        cli::kv("ID field", id_field);
    }
    for path in &options.disable_fields {
        cli::kv("Disabled", path);
    }
    for (path, ty) in &options.override_types {
        cli::kv("Type override", &format!("{path} = {ty}"));
    }

    eprintln!();

    // ── Export ───────────────────────────────────────────
    cli::section("Export");

    std::fs::create_dir_all(&cli_args.output_dir)
        .with_context(|| format!("failed to create output directory: {}", cli_args.output_dir.display()))?;
    let records = output::open_gene_models(&cli_args.input)
        .with_context(|| format!("failed to open gene models: {}", cli_args.input.display()))?;
    let mut sink = DirectorySink::new(&cli_args.output_dir, &options.index_name);
    let summary = export_records(records, &options, &mut sink)
        .with_context(|| format!("failed to export index '{}'", options.index_name))?;

    cli::kv("Documents", &summary.documents.to_string());
    cli::kv("Batches", &summary.batches.to_string());
    cli::success(&format!("index written to {}", sink.target().display()));

    cli::print_summary(start);
    Ok(())
}
