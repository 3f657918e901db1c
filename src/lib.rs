// Modules
pub mod data;
pub mod drift;
pub mod errors;
pub mod reader;
pub mod schema;
pub mod split;

// Individual classes, and functions
pub use data::{Column, Dataset, FeatureKind};
pub use drift::{detect_feature_drift, DriftConfig, DriftReport, FeatureDriftResult};
pub use errors::DriftwatchError;
pub use schema::{JsonIO, TableSchema};
pub use split::{stratified_split, DataSplits, SplitConfig};
