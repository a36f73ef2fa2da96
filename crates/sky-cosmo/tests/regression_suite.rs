use std::fs;

use sky_core::errors::{ErrorInfo, SkyError};
use sky_cosmo::{
    check_case, reference_case, reference_cases, run_regression, CaseStatus, CosmologyParams,
    RegressionOpts,
};

fn table_lookup(params: &CosmologyParams, redshifts: &[f64]) -> Result<Vec<f64>, SkyError> {
    let case = reference_cases()
        .into_iter()
        .find(|case| &case.params == params)
        .ok_or_else(|| SkyError::Cosmology(ErrorInfo::new("unknown", "no such cosmology")))?;
    assert_eq!(case.redshifts, redshifts);
    Ok(case.expected_mpc)
}

#[test]
fn exact_calculator_passes_every_case() {
    let report = run_regression(&table_lookup, &reference_cases(), &RegressionOpts::default())
        .expect("regression run");
    assert_eq!(report.outcomes.len(), 28);
    assert_eq!(report.passed, 28);
    assert!(report.is_success());
    assert!(report.failures().next().is_none());
}

#[test]
fn drift_beyond_tolerance_is_reported() {
    let drifting = |params: &CosmologyParams, redshifts: &[f64]| -> Result<Vec<f64>, SkyError> {
        let mut distances = table_lookup(params, redshifts)?;
        if params.family_name() == "wCDM" {
            distances[2] *= 1.0 + 5e-4;
        }
        Ok(distances)
    };
    let report = run_regression(&drifting, &reference_cases(), &RegressionOpts::default())
        .expect("regression run");
    assert_eq!(report.failed, 3);
    for outcome in report.failures() {
        assert_eq!(outcome.family, "wCDM");
        assert_eq!(outcome.status, CaseStatus::Mismatch);
        let err = outcome.max_rel_err.expect("relative error");
        assert!(err > 4e-4 && err < 6e-4);
    }
}

#[test]
fn drift_within_tolerance_passes() {
    let nudged = |params: &CosmologyParams, redshifts: &[f64]| -> Result<Vec<f64>, SkyError> {
        Ok(table_lookup(params, redshifts)?
            .into_iter()
            .map(|d| d * (1.0 + 5e-5))
            .collect())
    };
    let report = run_regression(&nudged, &reference_cases(), &RegressionOpts::default())
        .expect("regression run");
    assert!(report.is_success());
}

#[test]
fn calculator_errors_are_recorded_not_raised() {
    let failing = |_: &CosmologyParams, _: &[f64]| -> Result<Vec<f64>, SkyError> {
        Err(SkyError::Cosmology(ErrorInfo::new("integration", "did not converge")))
    };
    let case = reference_case("FlatLambdaCDM/no-relativistic").expect("case exists");
    let outcome = check_case(&failing, &case, &RegressionOpts::default()).expect("outcome");
    assert_eq!(outcome.status, CaseStatus::CalculatorError);
    assert!(outcome.computed_mpc.is_none());
    assert!(outcome.detail.expect("detail").contains("did not converge"));
}

#[test]
fn wrong_length_is_a_mismatch() {
    let short = |_: &CosmologyParams, _: &[f64]| -> Result<Vec<f64>, SkyError> {
        Ok(vec![3364.5, 5271.0])
    };
    let case = reference_case("FlatLambdaCDM/no-relativistic").expect("case exists");
    let outcome = check_case(&short, &case, &RegressionOpts::default()).expect("outcome");
    assert_eq!(outcome.status, CaseStatus::Mismatch);
    assert!(outcome.max_rel_err.is_none());
}

#[test]
fn invalid_case_parameters_abort_the_check() {
    let mut case = reference_case("wCDM/no-relativistic").expect("case exists");
    case.params.h0 = -70.0;
    let err = check_case(&table_lookup, &case, &RegressionOpts::default()).unwrap_err();
    assert_eq!(err.code(), "invalid-h0");
}

#[test]
fn family_filter_and_yaml_options() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("regression.yaml");
    fs::write(&path, "rtol: 0.001\nfamilies:\n  - FlatwCDM\n  - w0wzCDM\n").expect("write config");

    let opts = RegressionOpts::load(&path).expect("load config");
    assert_eq!(opts.rtol, 1e-3);
    assert_eq!(opts.atol, 0.0);

    let report = run_regression(&table_lookup, &reference_cases(), &opts).expect("regression run");
    assert_eq!(report.outcomes.len(), 6);
    assert!(report
        .outcomes
        .iter()
        .all(|outcome| outcome.family == "FlatwCDM" || outcome.family == "w0wzCDM"));
}

#[test]
fn unknown_family_selection_is_an_error() {
    let opts = RegressionOpts {
        families: vec!["Einstein-de-Sitter".to_string()],
        ..RegressionOpts::default()
    };
    let err = run_regression(&table_lookup, &reference_cases(), &opts).unwrap_err();
    assert_eq!(err.code(), "no-cases");
}

#[test]
fn report_hash_is_stable() {
    let opts = RegressionOpts::default();
    let first = run_regression(&table_lookup, &reference_cases(), &opts).expect("first run");
    let second = run_regression(&table_lookup, &reference_cases(), &opts).expect("second run");
    assert_eq!(first.report_hash, second.report_hash);
    let json = serde_json::to_string(&first).expect("serialize report");
    assert!(json.contains("\"status\":\"passed\""));
}
