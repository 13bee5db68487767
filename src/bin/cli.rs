//! formcodec CLI
//!
//! Decodes form-urlencoded records to JSON and encodes JSON records back,
//! using a layout file.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use formcodec::{CodecConfig, ConverterRegistry, LayoutDefinition, Record, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// formcodec CLI
#[derive(Parser, Debug)]
#[command(name = "formcodec-cli")]
#[command(about = "Read and write form-urlencoded records against a layout")]
#[command(version)]
struct Args {
    /// Layout (format definition) file
    #[arg(short, long)]
    layout: PathBuf,

    /// Maximum record size in bytes
    #[arg(short, long, default_value = "16777216")]
    max_record_bytes: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a form-urlencoded record and print it as JSON
    Decode {
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Encode a JSON record as form-urlencoded bytes on stdout
    Encode {
        /// Input JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    // Logs go to stderr so stdout carries only the record
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,formcodec=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("formcodec v{}", formcodec::VERSION);

    let mut stdout = io::stdout().lock();
    if let Err(e) = run(args, &mut stdout) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Run one command, writing records to `out`
fn run<W: Write>(args: Args, out: &mut W) -> Result<()> {
    let config = CodecConfig::builder()
        .max_record_bytes(args.max_record_bytes)
        .build();
    let registry = ConverterRegistry::default();
    let layout = LayoutDefinition::from_path(&args.layout, &registry, &config)?;

    tracing::info!("Layout {} loaded", args.layout.display());

    match args.command {
        Commands::Decode { input } => {
            let mut reader = layout.reader(open_input(input.as_deref())?, &config)?;
            while let Some(record) = reader.read_record()? {
                serde_json::to_writer_pretty(&mut *out, &record)?;
                writeln!(out)?;
            }
            tracing::info!("Decoded {} record(s)", reader.record_number());
        }
        Commands::Encode { input } => {
            let record: Record = serde_json::from_reader(open_input(input.as_deref())?)?;
            let mut writer = layout.writer(&mut *out)?;
            writer.write_record(&record)?;
            writer.into_inner()?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    })
}
