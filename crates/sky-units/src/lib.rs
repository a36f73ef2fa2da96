#![deny(missing_docs)]
#![doc = "Unit object model for the sky toolkit: named and composite units, exact powers, a unit-string parser and the LaTeX formatters."]

/// Output formats for composite units.
pub mod format;
/// Generic unit-string parsing.
pub mod parse;
/// Exact and real unit powers.
pub mod power;
/// Built-in unit registry.
pub mod registry;
/// Named and composite units.
pub mod unit;

pub use format::{to_latex, LatexMode};
pub use parse::{parse_unit, parse_unit_with};
pub use power::Power;
pub use registry::UnitRegistry;
pub use unit::{CompositeUnit, NamedUnit};

use sky_core::errors::SkyError;

impl CompositeUnit {
    /// Renders the unit in the named format (`latex` or `latex_inline`).
    pub fn to_string_format(&self, format: &str) -> Result<String, SkyError> {
        to_latex(self, format.parse()?)
    }
}
