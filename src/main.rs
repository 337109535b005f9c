use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use lobster_data::error::ParseError;
use lobster_data::record::LobsterEvent;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Convert a LOBSTER message file to JSON or canonical CSV")]
struct Args {
    /// Input LOBSTER message file to read (.csv)
    #[arg(long, short = 'i', env = "LOBSTER_CSV")]
    input: PathBuf,

    /// Output file path to write
    #[arg(long, short = 'o', env = "LOBSTER_OUT")]
    output: Option<PathBuf>,

    /// Write the converted events to stdout
    #[arg(long)]
    stdout: bool,

    /// Stop after this many input rows
    #[arg(long)]
    rows: Option<u64>,

    /// Output representation
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Verbose mode
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One `{"events": [...]}` document
    Json,
    /// Canonical LOBSTER rows
    Csv,
}

/// JSON document wrapper: `{"events": [...]}`.
#[derive(Debug, Serialize)]
struct EventList {
    events: Vec<LobsterEvent>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_events(args: &Args) -> Result<Vec<LobsterEvent>> {
    info!("reading {:?}", args.input);
    let file = File::open(&args.input).with_context(|| format!("open {:?}", args.input))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut events = Vec::new();
    let mut skipped = 0u64;
    for (index, result) in reader.records().enumerate() {
        let line = index as u64 + 1;
        if args.rows.is_some_and(|limit| line > limit) {
            break;
        }
        let record = result.with_context(|| format!("read {:?} line {}", args.input, line))?;
        let fields: Vec<&str> = record.iter().collect();
        match LobsterEvent::from_row(&fields) {
            Ok(event) => events.push(event),
            Err(ParseError::UnknownEventKind { code }) => {
                // unrecognized kinds are future data, not corruption
                warn!("line {}: skipping row with unrecognized event kind {:?}", line, code);
                skipped += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("parse {:?} line {}", args.input, line));
            }
        }
    }
    info!("parsed {} events, skipped {} rows", events.len(), skipped);
    Ok(events)
}

fn write_json<W: Write>(out: &mut W, events: Vec<LobsterEvent>) -> Result<()> {
    let document = EventList { events };
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut *out, formatter);
    document
        .serialize(&mut serializer)
        .context("serialize events to json")?;
    Ok(())
}

fn write_rows<W: Write>(out: &mut W, events: &[LobsterEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(&mut *out);
    for event in events {
        writer.write_record(&event.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_none() && !args.stdout {
        bail!("nothing to do: pass --output <path> and/or --stdout");
    }

    let events = read_events(&args)?;

    // --output wins over --stdout when both are given
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {:?}", path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        Format::Json => write_json(&mut out, events)?,
        Format::Csv => write_rows(&mut out, &events)?,
    }
    out.flush()?;

    if let Some(path) = &args.output {
        info!("wrote {:?}", path);
    }
    Ok(())
}
