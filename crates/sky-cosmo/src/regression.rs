use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};
use sky_core::stable_hash_string;
use tracing::{debug, info, warn};

use crate::config::RegressionOpts;
use crate::params::CosmologyParams;
use crate::reference::ReferenceCase;

fn regression_error(code: &str, message: impl Into<String>) -> SkyError {
    SkyError::Cosmology(ErrorInfo::new(code, message))
}

/// External comoving-distance calculator.
pub trait ComovingDistance {
    /// Comoving distances in Mpc, one per redshift.
    fn comoving_distance(
        &self,
        params: &CosmologyParams,
        redshifts: &[f64],
    ) -> Result<Vec<f64>, SkyError>;
}

impl<F> ComovingDistance for F
where
    F: Fn(&CosmologyParams, &[f64]) -> Result<Vec<f64>, SkyError>,
{
    fn comoving_distance(
        &self,
        params: &CosmologyParams,
        redshifts: &[f64],
    ) -> Result<Vec<f64>, SkyError> {
        self(params, redshifts)
    }
}

/// Element-wise `|actual - expected| <= atol + rtol * |expected|`. NaN is never close.
pub fn allclose(actual: &[f64], expected: &[f64], rtol: f64, atol: f64) -> Result<bool, SkyError> {
    if actual.len() != expected.len() {
        return Err(SkyError::Cosmology(
            ErrorInfo::new("length-mismatch", "compared sequences differ in length")
                .with_context("actual", actual.len().to_string())
                .with_context("expected", expected.len().to_string()),
        ));
    }
    Ok(actual
        .iter()
        .zip(expected)
        .all(|(a, e)| (a - e).abs() <= atol + rtol * e.abs()))
}

/// Largest element-wise relative deviation from `expected`.
pub fn max_relative_error(actual: &[f64], expected: &[f64]) -> f64 {
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| {
            if a == e {
                0.0
            } else if *e == 0.0 || a.is_nan() {
                f64::INFINITY
            } else {
                ((a - e) / e).abs()
            }
        })
        .fold(0.0, f64::max)
}

/// Result of a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    /// Within tolerance.
    Passed,
    /// Computed distances outside tolerance or of the wrong length.
    Mismatch,
    /// The calculator returned an error.
    CalculatorError,
}

/// Per-case regression outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Case label.
    pub label: String,
    /// Cosmology family.
    pub family: String,
    /// Status of the comparison.
    pub status: CaseStatus,
    /// Expected distances in Mpc.
    pub expected_mpc: Vec<f64>,
    /// Computed distances in Mpc, when the calculator succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_mpc: Option<Vec<f64>>,
    /// Largest relative deviation, when lengths agree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rel_err: Option<f64>,
    /// Explanation for non-passing cases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CaseOutcome {
    /// True when the case passed.
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Summary of a regression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Per-case outcomes in table order.
    pub outcomes: Vec<CaseOutcome>,
    /// Number of passing cases.
    pub passed: usize,
    /// Number of failing cases.
    pub failed: usize,
    /// Relative tolerance used.
    pub rtol: f64,
    /// Absolute tolerance used.
    pub atol: f64,
    /// Stable hash over the outcomes and tolerances.
    pub report_hash: String,
}

impl RegressionReport {
    /// True when no case failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Outcomes that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }
}

/// Runs one case against `calculator`.
///
/// Errors are reserved for a malformed case; calculator failures and
/// mismatches are reported through the outcome.
pub fn check_case<C: ComovingDistance + ?Sized>(
    calculator: &C,
    case: &ReferenceCase,
    opts: &RegressionOpts,
) -> Result<CaseOutcome, SkyError> {
    case.params.validate()?;
    if case.redshifts.len() != case.expected_mpc.len() {
        return Err(regression_error(
            "malformed-case",
            format!("case '{}' has mismatched redshift and distance counts", case.label),
        ));
    }

    let mut outcome = CaseOutcome {
        label: case.label.clone(),
        family: case.params.family_name(),
        status: CaseStatus::Passed,
        expected_mpc: case.expected_mpc.clone(),
        computed_mpc: None,
        max_rel_err: None,
        detail: None,
    };

    match calculator.comoving_distance(&case.params, &case.redshifts) {
        Err(err) => {
            outcome.status = CaseStatus::CalculatorError;
            outcome.detail = Some(err.to_string());
        }
        Ok(computed) => {
            match allclose(&computed, &case.expected_mpc, opts.rtol, opts.atol) {
                Ok(true) => {}
                Ok(false) => {
                    outcome.status = CaseStatus::Mismatch;
                    outcome.detail = Some(format!(
                        "distances differ beyond rtol={} atol={}",
                        opts.rtol, opts.atol
                    ));
                }
                Err(err) => {
                    outcome.status = CaseStatus::Mismatch;
                    outcome.detail = Some(err.info().message.clone());
                }
            }
            if computed.len() == case.expected_mpc.len() {
                outcome.max_rel_err = Some(max_relative_error(&computed, &case.expected_mpc));
            }
            outcome.computed_mpc = Some(computed);
        }
    }

    debug!(
        label = %outcome.label,
        status = ?outcome.status,
        max_rel_err = ?outcome.max_rel_err,
        "checked comoving distances"
    );
    if !outcome.passed() {
        warn!(
            label = %outcome.label,
            params = %case.params,
            detail = ?outcome.detail,
            "comoving distance regression"
        );
    }
    Ok(outcome)
}

/// Runs every selected case and summarises the results.
pub fn run_regression<C: ComovingDistance + ?Sized>(
    calculator: &C,
    cases: &[ReferenceCase],
    opts: &RegressionOpts,
) -> Result<RegressionReport, SkyError> {
    opts.validate()?;
    let mut outcomes = Vec::with_capacity(cases.len());
    for case in cases {
        if !opts.includes(&case.params.family_name()) {
            continue;
        }
        outcomes.push(check_case(calculator, case, opts)?);
    }
    if outcomes.is_empty() {
        return Err(regression_error(
            "no-cases",
            "no reference case matched the requested families",
        ));
    }

    let passed = outcomes.iter().filter(|outcome| outcome.passed()).count();
    let failed = outcomes.len() - passed;
    let report_hash = stable_hash_string(&(&outcomes, opts.rtol, opts.atol))?;
    info!(passed, failed, rtol = opts.rtol, "comoving distance regression finished");

    Ok(RegressionReport {
        outcomes,
        passed,
        failed,
        rtol: opts.rtol,
        atol: opts.atol,
        report_hash,
    })
}
