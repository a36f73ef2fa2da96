use std::fs;
use std::path::Path;

use sky_core::errors::SkyError;
use sky_fits::InteropConfig;

fn load_yaml(dir: &Path, yaml: &str) -> Result<InteropConfig, SkyError> {
    let path = dir.join("interop.yaml");
    fs::write(&path, yaml).expect("write config");
    InteropConfig::load(&path)
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = InteropConfig::load(&path).unwrap_err();
    assert!(matches!(err, SkyError::Config(_)));
    assert_eq!(err.code(), "config-read");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn unknown_compression_type_is_a_decode_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_yaml(dir.path(), "compression_types: [LZW_1]\n").unwrap_err();
    assert!(matches!(err, SkyError::Serde(_)));
    assert_eq!(err.code(), "yaml_deserialize");
}

#[test]
fn empty_selection_carries_a_hint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_yaml(dir.path(), "dtypes: []\n").unwrap_err();
    assert!(matches!(err, SkyError::Config(_)));
    assert_eq!(err.code(), "empty-selection");
    assert!(err.to_string().ends_with("| hint: omit the key to run every value"));
}

#[test]
fn non_finite_tolerance_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_yaml(dir.path(), "rtol: .nan\n").unwrap_err();
    assert_eq!(err.code(), "invalid-tolerance");
    assert_eq!(err.info().context.get("rtol").map(String::as_str), Some("NaN"));
}
