//! Feature Classification
//!
//! Partitions a reference dataset's columns into numerical and categorical
//! feature lists, excluding the target. Classification follows the stored
//! column type only; values are never inspected, so a numeric-looking code
//! column stored as categorical is tested as categorical.
use crate::data::{Dataset, FeatureKind};
use crate::errors::DriftwatchError;

/// The partition of a dataset's non-target columns by stored type, each list
/// in the dataset's original column order. Recomputed on every detection run,
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
}

impl FeatureSet {
    /// Classify every column other than `target_column`.
    ///
    /// Fails if the target column is absent from the dataset.
    pub fn from_dataset(reference: &Dataset, target_column: &str) -> Result<Self, DriftwatchError> {
        if !reference.contains(target_column) {
            return Err(DriftwatchError::ColumnNotFound(target_column.to_string()));
        }
        let mut numerical = Vec::new();
        let mut categorical = Vec::new();
        for name in reference.names() {
            if name == target_column {
                continue;
            }
            match reference.kind(name) {
                Some(FeatureKind::Numerical) => numerical.push(name.clone()),
                Some(FeatureKind::Categorical) => categorical.push(name.clone()),
                None => unreachable!("names() only yields existing columns"),
            }
        }
        Ok(FeatureSet { numerical, categorical })
    }

    /// Total number of features across both lists.
    pub fn total(&self) -> usize {
        self.numerical.len() + self.categorical.len()
    }

    /// Whether no features remain after excluding the target.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All features with their kinds: numerical first, then categorical,
    /// each in original column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureKind)> {
        self.numerical
            .iter()
            .map(|n| (n.as_str(), FeatureKind::Numerical))
            .chain(self.categorical.iter().map(|n| (n.as_str(), FeatureKind::Categorical)))
    }
}
