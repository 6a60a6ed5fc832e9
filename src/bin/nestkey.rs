//! nestkey CLI - apply key/header transforms to NDJSON records
//!
//! Reads records (one JSON object per line), runs them through a configured
//! transform and writes the transformed records as NDJSON.

use clap::{Parser, Subcommand};
use nestkey::config::TransformConfig;
use nestkey::serialization::{NdjsonReader, NdjsonWriter};
use nestkey::transforms::{Transformation, HEADER_FIELD_MAPPING, KEY_FIELD_MAPPING};
use nestkey::TransformRegistry;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nestkey")]
#[command(version, about = "Derive record keys and headers from nested values", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct TransformArgs {
    /// YAML file naming the transform and its options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transform name (overrides the name in --config)
    #[arg(short, long)]
    transform: Option<String>,

    /// Header mapping, e.g. "region:$.geo.region,src:source"
    #[arg(long)]
    header_mapping: Option<String>,

    /// Key mapping, e.g. "id:identifier"
    #[arg(long)]
    key_mapping: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform NDJSON records
    Apply {
        #[command(flatten)]
        transform: TransformArgs,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first record that fails instead of skipping it
        #[arg(long)]
        fail_fast: bool,
    },

    /// Check a transform configuration without processing records
    Validate {
        #[command(flatten)]
        transform: TransformArgs,
    },

    /// List registered transforms and their options
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = TransformRegistry::with_builtins();

    let result = match cli.command {
        Commands::Apply {
            transform,
            input,
            output,
            fail_fast,
        } => build_transform(&registry, transform)
            .and_then(|t| apply_records(t.as_ref(), input, output, fail_fast)),
        Commands::Validate { transform } => build_transform(&registry, transform).map(|t| {
            println!("✓ {} configuration is valid", t.name());
        }),
        Commands::List => {
            list_transforms(&registry);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Merge the config file and flags, then build the transform
fn build_transform(
    registry: &TransformRegistry,
    args: TransformArgs,
) -> Result<Box<dyn Transformation>, String> {
    let mut props = match &args.config {
        Some(path) => TransformConfig::load_from_file(path).map_err(|e| e.to_string())?,
        None => TransformConfig::new(),
    };

    if let Some(name) = args.transform {
        props = props.for_transform(name);
    }
    if let Some(mapping) = args.header_mapping {
        props = props.with(HEADER_FIELD_MAPPING, mapping);
    }
    if let Some(mapping) = args.key_mapping {
        props = props.with(KEY_FIELD_MAPPING, mapping);
    }

    registry.create_from_config(&props).map_err(|e| e.to_string())
}

fn apply_records(
    transform: &dyn Transformation,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    fail_fast: bool,
) -> Result<(), String> {
    let reader: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            format!("Failed to open input {}: {}", path.display(), e)
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            format!("Failed to create output {}: {}", path.display(), e)
        })?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut records = NdjsonReader::new(reader);
    let mut writer = NdjsonWriter::new(writer);
    let mut written = 0usize;
    let mut skipped = 0usize;

    while let Some(next) = records.next() {
        let line = records.line_number();
        let result = next
            .map_err(|e| e.to_string())
            .and_then(|record| transform.apply(&record).map_err(|e| e.to_string()));

        match result {
            Ok(record) => {
                writer.write_record(&record).map_err(|e| e.to_string())?;
                written += 1;
            }
            Err(e) if fail_fast => return Err(format!("line {}: {}", line, e)),
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping record");
                skipped += 1;
            }
        }
    }

    writer.flush().map_err(|e| e.to_string())?;
    tracing::info!(transform = transform.name(), written, skipped, "done");
    Ok(())
}

fn list_transforms(registry: &TransformRegistry) {
    for name in registry.list_transforms() {
        println!("{}", name);

        for key in registry.config_def(&name).map(|def| def.keys()).unwrap_or_default() {
            println!(
                "  {} ({:?}, {:?}): {}",
                key.name, key.kind, key.importance, key.documentation
            );
        }
    }
}
