use std::sync::Arc;

use sky_units::{parse_unit, to_latex, CompositeUnit, LatexMode, NamedUnit, Power, UnitRegistry};

#[test]
fn powers_are_tagged_by_kind() {
    let half = serde_json::to_value(Power::ratio(-2, 4).unwrap()).expect("serialize");
    assert_eq!(half, serde_json::json!({"kind": "ratio", "num": -1, "den": 2}));

    let real = serde_json::to_value(Power::Real { value: 1.25 }).expect("serialize");
    assert_eq!(real, serde_json::json!({"kind": "real", "value": 1.25}));

    let restored: Power = serde_json::from_value(half).expect("deserialize");
    assert_eq!(restored, Power::ratio(-1, 2).unwrap());
    assert!(serde_json::from_str::<Power>(r#"{"kind":"complex","value":1}"#).is_err());
}

#[test]
fn parsed_unit_survives_json_and_renders_the_same() {
    let flux = parse_unit("erg / (cm2 s)").unwrap();
    let json = serde_json::to_string(&flux).expect("serialize");
    let restored: CompositeUnit = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, flux);
    assert_eq!(
        to_latex(&restored, LatexMode::Display).unwrap(),
        to_latex(&flux, LatexMode::Display).unwrap()
    );
    assert_eq!(
        to_latex(&restored, LatexMode::Inline).unwrap(),
        to_latex(&flux, LatexMode::Inline).unwrap()
    );
}

#[test]
fn format_names_and_fractional_powers_survive() {
    let angstrom = UnitRegistry::builtin().unit("AA").expect("builtin unit");
    let noise = parse_unit("Jy Hz**(-1/2)").unwrap();
    let custom = NamedUnit::new("chan").with_format_name("latex", r"\mathrm{ch}");
    let unit = CompositeUnit::new(
        2.5,
        vec![
            (Arc::clone(&angstrom.bases()[0].0), Power::int(2)),
            (Arc::new(custom), Power::Real { value: 0.5 }),
        ],
    );
    for original in [noise, unit] {
        let json = serde_json::to_vec(&original).expect("serialize");
        let restored: CompositeUnit = serde_json::from_slice(&json).expect("deserialize");
        assert_eq!(restored, original);
        assert_eq!(restored.powers(), original.powers());
        assert_eq!(
            to_latex(&restored, LatexMode::Inline).unwrap(),
            to_latex(&original, LatexMode::Inline).unwrap()
        );
    }
}
