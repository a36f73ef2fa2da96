use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use sky_cosmo::reference_cases;
use tracing::info;

use crate::emit_json;

#[derive(Args, Debug)]
pub struct CosmoTableArgs {
    /// Write the table here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &CosmoTableArgs) -> Result<(), Box<dyn Error>> {
    let cases = reference_cases();
    for case in &cases {
        case.params.validate()?;
    }
    info!(cases = cases.len(), "emitting cosmology reference table");
    emit_json(args.out.as_deref(), &cases)
}
