//! Lists the contents of an ASCII VTF file step by step: the geometry parts in
//! effect at each step, their sizes, and the fields defined on them.

#![allow(clippy::needless_return)]

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};
use vtf::prelude::*;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Only output errors, no progress or warnings.
  #[arg(short, long, conflicts_with = "verbose")]
  quiet: bool,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

/// Parses, verifies and summarizes the file.
fn run(args: &Cli) -> VtfResult<Summary> {
  let vtf = if args.file.as_os_str() == "-" {
    info!("Parsing standard input...");
    BlockReader::parse_bufread(BufReader::new(io::stdin()))?
  } else {
    info!("Parsing {}...", args.file.display());
    BlockReader::parse_file(&args.file)?
  };
  info!(
    "Done parsing: {} nodes, {} elements and {} results blocks.",
    vtf.nodes.len(),
    vtf.elements.len(),
    vtf.results.len()
  );
  vtf.verify()?;
  info!("Verified, {} steps.", vtf.nsteps());
  return vtf.summary();
}

fn main() -> ExitCode {
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else if args.quiet {
    LevelFilter::Error
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  return match run(&args) {
    Ok(summary) => {
      print!("{}", summary);
      ExitCode::SUCCESS
    },
    Err(e) => {
      eprintln!("Error: {}", e);
      ExitCode::FAILURE
    }
  };
}
