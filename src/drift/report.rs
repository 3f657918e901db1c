//! Drift Report
//!
//! The structured result of a drift detection run: one record per tested
//! feature plus the aggregate decision. Reports are plain data; rendering
//! and persistence are up to the consumer, with JSON helpers provided.
use crate::data::FeatureKind;
use crate::errors::DriftwatchError;
use crate::schema::JsonIO;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Outcome of a single per-feature drift test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDriftResult {
    /// Feature name, exactly as it appears in the reference dataset.
    pub feature: String,
    /// Which test strategy was applied.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// P-value under the null hypothesis of no distributional change.
    pub p_value: f64,
    /// Whether the p-value fell below the significance level.
    pub drifted: bool,
}

/// Aggregate result of one drift detection run.
///
/// `details` holds exactly one entry per tested feature, numerical features
/// first and categorical second, each group in the reference dataset's
/// column order, so repeated runs produce diffable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Fraction of features flagged as drifted.
    pub drift_ratio: f64,
    /// Number of features flagged as drifted.
    pub drifted_features: usize,
    /// Number of features tested.
    pub total_features: usize,
    /// Whether `drift_ratio` reached the configured threshold.
    pub overall_drift: bool,
    /// Per-feature results.
    pub details: Vec<FeatureDriftResult>,
}

impl DriftReport {
    /// Fold per-feature results into a report. A ratio exactly at the
    /// threshold counts as overall drift.
    pub(crate) fn from_results(
        details: Vec<FeatureDriftResult>,
        drift_threshold: f64,
    ) -> Result<Self, DriftwatchError> {
        if details.is_empty() {
            return Err(DriftwatchError::EmptyFeatureSet);
        }
        let total_features = details.len();
        let drifted_features = details.iter().filter(|r| r.drifted).count();
        let drift_ratio = drifted_features as f64 / total_features as f64;
        Ok(DriftReport {
            drift_ratio,
            drifted_features,
            total_features,
            overall_drift: drift_ratio >= drift_threshold,
            details,
        })
    }

    /// Look up the result for a feature by its exact name.
    pub fn feature(&self, name: &str) -> Option<&FeatureDriftResult> {
        self.details.iter().find(|r| r.feature == name)
    }

    /// The features flagged as drifted, in report order.
    pub fn drifted(&self) -> impl Iterator<Item = &FeatureDriftResult> {
        self.details.iter().filter(|r| r.drifted)
    }
}

impl Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Drift ratio: {:.4}", self.drift_ratio)?;
        writeln!(
            f,
            "Drifted features: {} of {}",
            self.drifted_features, self.total_features
        )?;
        writeln!(f, "Overall drift detected: {}", self.overall_drift)?;
        for result in self.drifted() {
            writeln!(
                f,
                "- {} ({}), p-value={:.5}",
                result.feature, result.kind, result.p_value
            )?;
        }
        Ok(())
    }
}

impl JsonIO for DriftReport {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(feature: &str, kind: FeatureKind, p_value: f64, drifted: bool) -> FeatureDriftResult {
        FeatureDriftResult {
            feature: feature.to_string(),
            kind,
            p_value,
            drifted,
        }
    }

    fn two_feature_report(threshold: f64) -> DriftReport {
        DriftReport::from_results(
            vec![
                result("age", FeatureKind::Numerical, 0.001, true),
                result("job", FeatureKind::Categorical, 0.8, false),
            ],
            threshold,
        )
        .unwrap()
    }

    #[test]
    fn test_report_summary_invariants() {
        let report = two_feature_report(0.3);
        assert_eq!(report.total_features, 2);
        assert_eq!(report.drifted_features, 1);
        assert_eq!(report.drift_ratio, 0.5);
        assert!(report.overall_drift);
        assert_eq!(
            report.drifted_features,
            report.details.iter().filter(|r| r.drifted).count()
        );
    }

    #[test]
    fn test_ratio_at_threshold_counts_as_drift() {
        assert!(two_feature_report(0.5).overall_drift);
        assert!(!two_feature_report(0.51).overall_drift);
    }

    #[test]
    fn test_empty_results_rejected() {
        assert!(matches!(
            DriftReport::from_results(Vec::new(), 0.3),
            Err(DriftwatchError::EmptyFeatureSet)
        ));
    }

    #[test]
    fn test_feature_lookup() {
        let report = two_feature_report(0.3);
        assert_eq!(report.feature("age").unwrap().kind, FeatureKind::Numerical);
        assert!(report.feature("balance").is_none());
    }

    #[test]
    fn test_display_lists_drifted_features() {
        let rendered = two_feature_report(0.3).to_string();
        assert!(rendered.contains("Drift ratio: 0.5000"));
        assert!(rendered.contains("Overall drift detected: true"));
        assert!(rendered.contains("- age (numerical), p-value=0.00100"));
        assert!(!rendered.contains("- job"));
    }

    #[test]
    fn test_report_io_json() {
        let report = two_feature_report(0.3);
        let json = report.json_dump().unwrap();
        let report2 = DriftReport::from_json(&json).unwrap();
        assert_eq!(report, report2);
    }

    #[test]
    fn test_report_io_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("report.json");
        let report = two_feature_report(0.3);
        report.save(&file_path).unwrap();
        let report2 = DriftReport::load(&file_path).unwrap();
        assert_eq!(report, report2);
    }
}
