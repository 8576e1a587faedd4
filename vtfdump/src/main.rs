//! Dumps an ASCII VTF file into a JSON.

#![allow(clippy::needless_return)] // i'll never forgive rust for this

use std::error::Error;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info};
use serde::Serialize;
use vtf::prelude::*;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Pretty-print the JSON.
  #[arg(short, long)]
  pretty: bool,
  /// Also dump the step-by-step summary (implies verification).
  #[arg(short, long)]
  summary: bool,
  /// Dump even if block references don't check out.
  #[arg(long, conflicts_with = "summary")]
  no_verify: bool,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

/// What gets written out.
#[derive(Serialize)]
struct Dump<'a> {
  /// The decoded blocks.
  file: &'a VtfFile,
  /// The summary, if asked for.
  #[serde(skip_serializing_if = "Option::is_none")]
  summary: Option<Summary>
}

/// Parses the file and writes the JSON to standard output.
fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
  let vtf = if args.file.as_os_str() == "-" {
    BlockReader::parse_bufread(BufReader::new(io::stdin()))?
  } else {
    info!("Parsing {}...", args.file.display());
    BlockReader::parse_file(&args.file)?
  };
  if !args.no_verify {
    vtf.verify()?;
  }
  let summary = if args.summary {
    Some(vtf.summary()?)
  } else {
    None
  };
  let dump = Dump { file: &vtf, summary };
  let mut out = io::stdout().lock();
  if args.pretty {
    serde_json::to_writer_pretty(&mut out, &dump)?;
  } else {
    serde_json::to_writer(&mut out, &dump)?;
  }
  writeln!(out)?;
  return Ok(());
}

fn main() {
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Warn
  };
  env_logger::builder().filter_level(log_level).init();
  if let Err(e) = run(&args) {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
