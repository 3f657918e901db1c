//! Drift
//!
//! The drift-detection engine: feature classification, per-feature
//! statistical tests, aggregation, and the report model.
pub mod detection;
pub mod features;
pub mod report;
pub mod stats;

pub use detection::{categorical_drift, detect_feature_drift, numerical_drift, DriftConfig};
pub use features::FeatureSet;
pub use report::{DriftReport, FeatureDriftResult};
