//! Output formats for composite units.

pub mod latex;
pub mod utils;

pub use latex::{
    ends_with_superscript, format_exponential_notation, latex_escape, to_latex, unit_latex_name,
    LatexMode, LATEX_FORMAT_NAME,
};
pub use utils::{format_general, group_by_powers, split_mantissa_exponent};
