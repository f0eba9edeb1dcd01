// ==============================================================================
// main.rs - Line Template Entry Point
// ==============================================================================
// Description: Command-line entry point that renders one sentence per row of a
//              genome feature table from a line template
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use line_template::cache::DatasetCache;
use line_template::parsers::TableReader;
use line_template::processor::TemplateProcessor;
use line_template::template::Template;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["template", "template_text"])))]
struct Args {
    /// Template file
    #[arg(short, long, env = "LINE_TEMPLATE_FILE")]
    template: Option<PathBuf>,

    /// Template text given inline
    #[arg(long, env = "LINE_TEMPLATE_TEXT")]
    template_text: Option<String>,

    /// Tab-delimited feature table (.gz accepted)
    #[arg(short, long, env = "LINE_TEMPLATE_INPUT")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, env = "LINE_TEMPLATE_OUTPUT")]
    output: Option<PathBuf>,

    /// Cross-reference dataset as NAME=PATH (two-column TSV), repeatable
    #[arg(long, value_parser = parse_dataset)]
    dataset: Vec<(String, PathBuf)>,

    /// Comma-separated NAME=PATH datasets, normally set via LINE_TEMPLATE_DATASETS
    #[arg(long, hide = true, env = "LINE_TEMPLATE_DATASETS", value_delimiter = ',', value_parser = parse_dataset)]
    env_datasets: Vec<(String, PathBuf)>,

    /// JSON document of cross-reference datasets
    #[arg(long, env = "LINE_TEMPLATE_CACHE_JSON")]
    cache_json: Option<PathBuf>,

    /// Omit records whose output is blank
    #[arg(long, env = "LINE_TEMPLATE_SKIP_BLANK")]
    skip_blank: bool,

    /// Compile the template against the table header and exit
    #[arg(long, env = "LINE_TEMPLATE_CHECK")]
    check: bool,
}

fn parse_dataset(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected NAME=PATH, got '{}'", value)),
    }
}

fn load_cache(args: &Args) -> Result<DatasetCache> {
    let mut cache = DatasetCache::new();

    for (name, path) in args.dataset.iter().chain(&args.env_datasets) {
        cache
            .load_tsv(name, path)
            .with_context(|| format!("Failed to load dataset '{}' from {:?}", name, path))?;
    }

    if let Some(path) = &args.cache_json {
        cache
            .load_json(path)
            .with_context(|| format!("Failed to load datasets from {:?}", path))?;
    }

    info!("Cross-reference datasets: {:?}", cache.dataset_names());
    Ok(cache)
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so rendered lines own stdout)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "line_template=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let template_text = match (&args.template, &args.template_text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {:?}", path))?,
        (None, Some(text)) => text.clone(),
        (None, None) => anyhow::bail!("--template or --template-text must be provided"),
    };

    if args.check {
        let reader = TableReader::open(&args.input)
            .with_context(|| format!("Failed to open feature table {:?}", args.input))?;
        let header = reader.header();
        let template =
            Template::compile(&template_text, header).context("Failed to compile template")?;
        println!("Columns: {}", header.names().join(", "));
        println!(
            "Template OK: {} top-level commands, ~{} bytes per record",
            template.commands().len(),
            template.estimated_size()
        );
        return Ok(());
    }

    let cache = load_cache(&args)?;
    let processor = TemplateProcessor::new(template_text, cache).skip_blank(args.skip_blank);

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let stats = processor.process_file(&args.input, sink.as_mut())?;
    info!("Run summary: {}", serde_json::to_string(&stats)?);

    if stats.records_failed > 0 {
        warn!("{} record(s) could not be translated", stats.records_failed);
    }

    Ok(())
}
