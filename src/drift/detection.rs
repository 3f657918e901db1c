//! Drift Detection
//!
//! Per-feature drift tests and the aggregator that runs them across a whole
//! feature set. Numerical features get a two-sample Kolmogorov-Smirnov test,
//! categorical features a chi-square test of independence on their frequency
//! tables; per-feature decisions are tallied into a [`DriftReport`].
//!
//! A single degenerate feature aborts the whole run: partial reports would
//! silently change the meaning of the drift ratio.
use crate::data::{Column, Dataset, FeatureKind};
use crate::drift::features::FeatureSet;
use crate::drift::report::{DriftReport, FeatureDriftResult};
use crate::drift::stats;
use crate::errors::DriftwatchError;
use hashbrown::HashMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for a drift detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Fraction of drifted features at or above which the report flags
    /// overall drift.
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,
    /// Significance level applied by both per-feature tests.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Run per-feature tests on the rayon thread pool. Report order is the
    /// same either way.
    #[serde(default)]
    pub parallel: bool,
}

fn default_drift_threshold() -> f64 {
    0.3
}
fn default_alpha() -> f64 {
    0.05
}

impl Default for DriftConfig {
    fn default() -> Self {
        DriftConfig {
            drift_threshold: default_drift_threshold(),
            alpha: default_alpha(),
            parallel: false,
        }
    }
}

impl DriftConfig {
    fn validate(&self) -> Result<(), DriftwatchError> {
        if self.drift_threshold.is_nan() || !(0.0..=1.0).contains(&self.drift_threshold) {
            return Err(DriftwatchError::InvalidParameter(
                "drift_threshold".to_string(),
                "real value within range 0 and 1".to_string(),
                self.drift_threshold.to_string(),
            ));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(DriftwatchError::InvalidParameter(
                "alpha".to_string(),
                "real value strictly between 0 and 1".to_string(),
                self.alpha.to_string(),
            ));
        }
        Ok(())
    }
}

/// Two-sample Kolmogorov-Smirnov drift test for a numerical feature.
///
/// Returns `(drifted, p_value)` with `drifted = p_value < alpha`. The feature
/// name is used for error attribution only. Samples with no finite values are
/// rejected; samples with a single observation run, but their p-values are
/// statistically degenerate and should not be trusted.
pub fn numerical_drift(
    feature: &str,
    reference: &[f64],
    production: &[f64],
    alpha: f64,
) -> Result<(bool, f64), DriftwatchError> {
    let reference: Vec<f64> = reference.iter().copied().filter(|v| v.is_finite()).collect();
    let production: Vec<f64> = production.iter().copied().filter(|v| v.is_finite()).collect();
    if reference.is_empty() {
        return Err(DriftwatchError::DegenerateTestInput(
            feature.to_string(),
            "reference sample has no finite observations".to_string(),
        ));
    }
    if production.is_empty() {
        return Err(DriftwatchError::DegenerateTestInput(
            feature.to_string(),
            "production sample has no finite observations".to_string(),
        ));
    }
    let (_statistic, p_value) = stats::ks_2samp(&reference, &production);
    Ok((p_value < alpha, p_value))
}

/// Chi-square drift test for a categorical feature.
///
/// Builds a 2xK contingency table over the union of categories observed in
/// either sample (absent combinations count zero) and tests independence of
/// dataset origin and category value. Fails if either sample is empty or the
/// union holds fewer than two distinct categories, where the statistic is
/// undefined.
pub fn categorical_drift(
    feature: &str,
    reference: &[String],
    production: &[String],
    alpha: f64,
) -> Result<(bool, f64), DriftwatchError> {
    if reference.is_empty() {
        return Err(DriftwatchError::DegenerateTestInput(
            feature.to_string(),
            "reference sample is empty".to_string(),
        ));
    }
    if production.is_empty() {
        return Err(DriftwatchError::DegenerateTestInput(
            feature.to_string(),
            "production sample is empty".to_string(),
        ));
    }

    let mut counts: HashMap<&str, [f64; 2]> = HashMap::new();
    for value in reference {
        counts.entry(value.as_str()).or_insert([0.0; 2])[0] += 1.0;
    }
    for value in production {
        counts.entry(value.as_str()).or_insert([0.0; 2])[1] += 1.0;
    }
    if counts.len() < 2 {
        return Err(DriftwatchError::DegenerateTestInput(
            feature.to_string(),
            "contingency table collapses to a single category".to_string(),
        ));
    }

    let mut categories: Vec<&str> = counts.keys().copied().collect();
    categories.sort_unstable();
    let reference_counts: Vec<f64> = categories.iter().map(|c| counts[c][0]).collect();
    let production_counts: Vec<f64> = categories.iter().map(|c| counts[c][1]).collect();

    let (_statistic, p_value) = stats::chi2_contingency(&reference_counts, &production_counts);
    Ok((p_value < alpha, p_value))
}

/// Compare reference and production feature distributions and aggregate the
/// per-feature outcomes into a [`DriftReport`].
///
/// Columns are classified by the reference dataset's stored types; both
/// datasets must share the same column names and types, checked upfront.
/// Any degenerate feature aborts the whole report.
pub fn detect_feature_drift(
    reference: &Dataset,
    production: &Dataset,
    target_column: &str,
    config: &DriftConfig,
) -> Result<DriftReport, DriftwatchError> {
    config.validate()?;
    check_schema_alignment(reference, production)?;

    let features = FeatureSet::from_dataset(reference, target_column)?;
    if features.is_empty() {
        return Err(DriftwatchError::EmptyFeatureSet);
    }

    let jobs: Vec<(&str, FeatureKind)> = features.iter().collect();
    let run = |&(name, kind): &(&str, FeatureKind)| test_feature(reference, production, name, kind, config.alpha);
    // Parallel collection preserves job order, so reports are identical
    // regardless of completion order.
    let details: Vec<FeatureDriftResult> = if config.parallel {
        jobs.par_iter().map(run).collect::<Result<_, _>>()?
    } else {
        jobs.iter().map(run).collect::<Result<_, _>>()?
    };

    for result in &details {
        debug!(
            "feature {} ({}): p-value={:.6}, drifted={}",
            result.feature, result.kind, result.p_value, result.drifted
        );
    }
    let report = DriftReport::from_results(details, config.drift_threshold)?;
    info!(
        "drift ratio {:.4} ({} of {} features), overall drift: {}",
        report.drift_ratio, report.drifted_features, report.total_features, report.overall_drift
    );
    Ok(report)
}

fn test_feature(
    reference: &Dataset,
    production: &Dataset,
    name: &str,
    kind: FeatureKind,
    alpha: f64,
) -> Result<FeatureDriftResult, DriftwatchError> {
    let ref_column = reference
        .column(name)
        .ok_or_else(|| DriftwatchError::ColumnNotFound(name.to_string()))?;
    let prod_column = production
        .column(name)
        .ok_or_else(|| DriftwatchError::ColumnNotFound(name.to_string()))?;

    let (drifted, p_value) = match (ref_column, prod_column) {
        (Column::Numerical(r), Column::Numerical(p)) => numerical_drift(name, r, p, alpha)?,
        (Column::Categorical(r), Column::Categorical(p)) => categorical_drift(name, r, p, alpha)?,
        // Unreachable after the upfront alignment check.
        _ => {
            return Err(DriftwatchError::SchemaMismatch(format!(
                "column {} is typed differently in reference and production",
                name
            )))
        }
    };
    Ok(FeatureDriftResult {
        feature: name.to_string(),
        kind,
        p_value,
        drifted,
    })
}

fn check_schema_alignment(reference: &Dataset, production: &Dataset) -> Result<(), DriftwatchError> {
    let mut missing: Vec<&str> = reference
        .names()
        .iter()
        .filter(|name| !production.contains(name))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(DriftwatchError::SchemaMismatch(format!(
            "missing from production: {}",
            missing.join(", ")
        )));
    }
    let mut extra: Vec<&str> = production
        .names()
        .iter()
        .filter(|name| !reference.contains(name))
        .map(String::as_str)
        .collect();
    if !extra.is_empty() {
        extra.sort_unstable();
        return Err(DriftwatchError::SchemaMismatch(format!(
            "unexpected in production: {}",
            extra.join(", ")
        )));
    }
    for name in reference.names() {
        if reference.kind(name) != production.kind(name) {
            return Err(DriftwatchError::SchemaMismatch(format!(
                "column {} is typed differently in reference and production",
                name
            )));
        }
    }
    Ok(())
}
