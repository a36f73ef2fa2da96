use std::error::Error;

use clap::Args;
use sky_units::{parse_unit, to_latex, LatexMode};
use tracing::debug;

#[derive(Args, Debug)]
pub struct LatexArgs {
    /// Unit expression, e.g. `erg / (s cm2)`.
    pub unit: String,
    /// Use the inline format (negative exponents instead of fractions).
    #[arg(long)]
    pub inline: bool,
}

pub fn run(args: &LatexArgs) -> Result<(), Box<dyn Error>> {
    let mode = if args.inline {
        LatexMode::Inline
    } else {
        LatexMode::Display
    };
    let unit = parse_unit(&args.unit)?;
    debug!(input = %args.unit, parsed = %unit, %mode, "rendering unit");
    println!("{}", to_latex(&unit, mode)?);
    Ok(())
}
