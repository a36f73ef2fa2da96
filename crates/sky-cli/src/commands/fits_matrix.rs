use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use sky_fits::{InteropConfig, PlannedCase};
use tracing::info;

use crate::emit_json;

#[derive(Args, Debug)]
pub struct FitsMatrixArgs {
    /// YAML interop configuration; defaults cover the full matrix.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the matrix here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MatrixSummary {
    seed: u64,
    rtol: f64,
    cases: Vec<PlannedCase>,
    expected_failures: usize,
}

pub fn run(args: &FitsMatrixArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => InteropConfig::load(path)?,
        None => InteropConfig::default(),
    };
    let cases = config.plan()?;
    let expected_failures = cases
        .iter()
        .map(|planned| {
            usize::from(planned.reference_writes.is_some())
                + usize::from(planned.under_test_writes.is_some())
        })
        .sum();
    info!(cases = cases.len(), expected_failures, "emitting interop matrix");
    emit_json(
        args.out.as_deref(),
        &MatrixSummary {
            seed: config.seed,
            rtol: config.rtol,
            cases,
            expected_failures,
        },
    )
}
