use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    cosmo_table::{self, CosmoTableArgs},
    fits_matrix::{self, FitsMatrixArgs},
    latex::{self, LatexArgs},
};
use serde::Serialize;
use sky_core::to_canonical_json_bytes;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "sky", about = "Astronomy toolkit checks and unit formatting", version)]
struct Cli {
    /// Enable debug logging for the sky crates.
    #[arg(long, global = true)]
    verbose: bool,
    /// Emit logs as JSON lines on stderr.
    #[arg(long = "json-logs", global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a unit string and render it as LaTeX.
    Latex(LatexArgs),
    /// Emit the cosmology reference table as canonical JSON.
    CosmoTable(CosmoTableArgs),
    /// Emit the FITS interop case matrix with expected failures.
    FitsMatrix(FitsMatrixArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);
    match cli.command {
        Command::Latex(args) => latex::run(&args),
        Command::CosmoTable(args) => cosmo_table::run(&args),
        Command::FitsMatrix(args) => fits_matrix::run(&args),
    }
}

/// Writes canonical JSON to `out`, or to stdout when no path is given.
pub(crate) fn emit_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<(), Box<dyn Error>> {
    let bytes = to_canonical_json_bytes(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        None => println!("{}", String::from_utf8(bytes)?),
    }
    Ok(())
}
