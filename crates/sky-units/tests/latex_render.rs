use std::sync::Arc;

use sky_units::format::to_latex;
use sky_units::{parse_unit, CompositeUnit, LatexMode, NamedUnit, Power, UnitRegistry};

fn builtin(name: &str) -> CompositeUnit {
    UnitRegistry::builtin().unit(name).expect("builtin unit")
}

fn display(unit: &CompositeUnit) -> String {
    to_latex(unit, LatexMode::Display).expect("latex")
}

fn inline(unit: &CompositeUnit) -> String {
    to_latex(unit, LatexMode::Inline).expect("latex_inline")
}

#[test]
fn single_base_renders_bare_name() {
    assert_eq!(display(&builtin("m")), r"$\mathrm{m}$");
    assert_eq!(inline(&builtin("Mpc")), r"$\mathrm{Mpc}$");
}

#[test]
fn registered_display_names_win() {
    assert_eq!(display(&builtin("solMass")), r"$\mathrm{M_{\odot}}$");
    assert_eq!(display(&builtin("deg")), r"$\mathrm{{}^{\circ}}$");
    assert_eq!(display(&builtin("AA").powi(2)), r"$\mathrm{\mathring{A}^{2}}$");
}

#[test]
fn raw_names_are_escaped() {
    let custom = Arc::new(NamedUnit::new("my_unit"));
    let unit = CompositeUnit::new(1.0, vec![(custom, Power::int(2))]);
    assert_eq!(display(&unit), r"$\mathrm{my\_unit^{2}}$");
}

#[test]
fn mixed_signs_make_a_fraction() {
    let velocity = parse_unit("m / s").unwrap();
    assert_eq!(display(&velocity), r"$\mathrm{\frac{m}{s}}$");

    let flux = parse_unit("erg / (cm2 s)").unwrap();
    assert_eq!(display(&flux), r"$\mathrm{\frac{erg}{s\,cm^{2}}}$");
}

#[test]
fn empty_numerator_renders_one() {
    let rate = parse_unit("1 / s").unwrap();
    assert_eq!(display(&rate), r"$\mathrm{\frac{1}{s}}$");
}

#[test]
fn inline_mode_never_builds_fractions() {
    let flux = parse_unit("erg / (cm2 s)").unwrap();
    let rendered = inline(&flux);
    assert_eq!(rendered, r"$\mathrm{erg\,s^{-1}\,cm^{-2}}$");
    assert!(!rendered.contains(r"\frac"));
}

#[test]
fn superscripted_names_fall_back_to_short_names() {
    assert_eq!(display(&builtin("deg").powi(2)), r"$\mathrm{deg^{2}}$");
    let per_arcsec = builtin("arcsec").powi(-1);
    assert_eq!(inline(&per_arcsec), r"$\mathrm{arcsec^{-1}}$");
    assert_eq!(display(&per_arcsec), r"$\mathrm{\frac{1}{{}^{\prime\prime}}}$");
}

#[test]
fn superscript_without_short_name_is_an_error() {
    let odd = Arc::new(
        NamedUnit::new("odd")
            .with_short_names(Vec::<String>::new())
            .with_format_name("latex", r"o^{x}"),
    );
    let unit = CompositeUnit::new(1.0, vec![(odd, Power::int(3))]);
    let err = to_latex(&unit, LatexMode::Display).unwrap_err();
    assert_eq!(err.code(), "missing-short-name");
}

#[test]
fn scale_is_rendered_in_exponential_notation() {
    let unit = builtin("m").with_scale(1.0e-10);
    assert_eq!(display(&unit), r"$\mathrm{1 \times 10^{-10}\,m}$");
    let unit = builtin("Jy").with_scale(2.5e-26);
    assert_eq!(display(&unit), r"$\mathrm{2.5 \times 10^{-26}\,Jy}$");
    let unit = builtin("s").with_scale(1000.0);
    assert_eq!(display(&unit), r"$\mathrm{1000\,s}$");
}

#[test]
fn non_finite_scales_use_tokens() {
    assert_eq!(display(&builtin("m").with_scale(f64::NAN)), r"$\mathrm{{\rm NaN}\,m}$");
    assert_eq!(display(&builtin("m").with_scale(f64::INFINITY)), r"$\mathrm{\infty\,m}$");
    assert_eq!(
        display(&CompositeUnit::dimensionless(f64::NEG_INFINITY)),
        r"$\mathrm{-\infty}$"
    );
}

#[test]
fn dimensionless_unscaled_is_empty() {
    assert_eq!(display(&CompositeUnit::dimensionless(1.0)), r"$\mathrm{}$");
}

#[test]
fn rational_powers_render_as_fractions() {
    let unit = parse_unit("Hz^(1/2)").unwrap();
    assert_eq!(display(&unit), r"$\mathrm{Hz^{1/2}}$");
    let noise = parse_unit("Jy Hz(-1/2)").err();
    assert!(noise.is_some());
    let noise = parse_unit("Jy Hz**(-1/2)").unwrap();
    assert_eq!(display(&noise), r"$\mathrm{\frac{Jy}{Hz^{1/2}}}$");
    assert_eq!(inline(&noise), r"$\mathrm{Jy\,Hz^{-1/2}}$");
}

#[test]
fn zero_power_is_rejected_outside_inline_mode() {
    let m = UnitRegistry::builtin().lookup("m").unwrap();
    let unit = CompositeUnit::new(1.0, vec![(m, Power::int(0))]);
    assert_eq!(to_latex(&unit, LatexMode::Display).unwrap_err().code(), "zero-power");
    assert_eq!(inline(&unit), r"$\mathrm{m^{0}}$");
}

#[test]
fn format_names_dispatch() {
    let unit = parse_unit("km s-1 Mpc-1").unwrap();
    assert_eq!(
        unit.to_string_format("latex").unwrap(),
        r"$\mathrm{\frac{km}{Mpc\,s}}$"
    );
    assert_eq!(
        unit.to_string_format("latex_inline").unwrap(),
        r"$\mathrm{km\,Mpc^{-1}\,s^{-1}}$"
    );
    assert!(unit.to_string_format("fits").is_err());
}
