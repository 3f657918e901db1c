//! Schema
//!
//! The canonical expected-schema collaborator: which columns a table must
//! carry, how each is typed, and which values the target may take. Loaders
//! validate every table against a single [`TableSchema`] before anything
//! downstream sees it.
use crate::data::{Dataset, FeatureKind};
use crate::errors::DriftwatchError;
use hashbrown::HashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Expected column set and typing for one table family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Feature columns stored as numbers.
    pub numerical_features: Vec<String>,
    /// Feature columns stored as strings.
    pub categorical_features: Vec<String>,
    /// The label column. Typed categorical unless listed in `numerical_features`.
    pub target_column: String,
    /// Allowed values for the target column. Empty disables the check.
    #[serde(default)]
    pub target_values: Vec<String>,
}

impl TableSchema {
    /// Create a schema without target-value restrictions.
    pub fn new<S: Into<String>>(numerical: Vec<S>, categorical: Vec<S>, target: S) -> Self {
        TableSchema {
            numerical_features: numerical.into_iter().map(Into::into).collect(),
            categorical_features: categorical.into_iter().map(Into::into).collect(),
            target_column: target.into(),
            target_values: Vec::new(),
        }
    }

    /// Restrict the target column to the given values.
    pub fn with_target_values<S: Into<String>>(mut self, values: Vec<S>) -> Self {
        self.target_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// The bank marketing campaign schema monitored by the reference pipeline.
    pub fn bank_marketing() -> Self {
        TableSchema::new(
            vec!["age", "balance", "day", "duration", "campaign", "pdays", "previous"],
            vec![
                "job",
                "marital",
                "education",
                "default",
                "housing",
                "loan",
                "contact",
                "month",
                "poutcome",
            ],
            "y",
        )
        .with_target_values(vec!["yes", "no"])
    }

    /// Every column a conforming table must carry.
    pub fn expected_columns(&self) -> HashSet<&str> {
        self.numerical_features
            .iter()
            .chain(self.categorical_features.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.target_column.as_str()))
            .collect()
    }

    /// How a named column is stored, or `None` for columns outside the schema.
    pub fn kind_of(&self, column: &str) -> Option<FeatureKind> {
        if self.numerical_features.iter().any(|c| c == column) {
            Some(FeatureKind::Numerical)
        } else if self.categorical_features.iter().any(|c| c == column) || column == self.target_column {
            Some(FeatureKind::Categorical)
        } else {
            None
        }
    }

    /// Check a dataset against the schema: no missing columns, no unexpected
    /// columns, and no disallowed target values.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), DriftwatchError> {
        let expected = self.expected_columns();
        let present: HashSet<&str> = dataset.names().iter().map(String::as_str).collect();

        let mut missing: Vec<&str> = expected.difference(&present).copied().collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(DriftwatchError::MissingColumns(missing.join(", ")));
        }
        let mut extra: Vec<&str> = present.difference(&expected).copied().collect();
        if !extra.is_empty() {
            extra.sort_unstable();
            return Err(DriftwatchError::UnexpectedColumns(extra.join(", ")));
        }

        if !self.target_values.is_empty() {
            let target = dataset
                .column(&self.target_column)
                .ok_or_else(|| DriftwatchError::ColumnNotFound(self.target_column.clone()))?;
            if let Some(values) = target.as_categorical() {
                for value in values {
                    if !self.target_values.iter().any(|v| v == value) {
                        return Err(DriftwatchError::InvalidTargetValue(
                            value.clone(),
                            self.target_column.clone(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// JSON persistence, shared by schemas and drift reports.
pub trait JsonIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DriftwatchError> {
        fs::write(path, self.json_dump()?).map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object.
    fn json_dump(&self) -> Result<String, DriftwatchError> {
        serde_json::to_string(self).map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, DriftwatchError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| DriftwatchError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, DriftwatchError> {
        let json_str = fs::read_to_string(path).map_err(|e| DriftwatchError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl JsonIO for TableSchema {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use tempfile::tempdir;

    fn toy_schema() -> TableSchema {
        TableSchema::new(vec!["age"], vec!["job"], "y").with_target_values(vec!["yes", "no"])
    }

    fn toy_dataset() -> Dataset {
        Dataset::from_columns(vec![
            ("age".to_string(), Column::Numerical(vec![25.0, 40.0])),
            (
                "job".to_string(),
                Column::Categorical(vec!["admin".to_string(), "services".to_string()]),
            ),
            (
                "y".to_string(),
                Column::Categorical(vec!["yes".to_string(), "no".to_string()]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_conforming_dataset() {
        assert!(toy_schema().validate(&toy_dataset()).is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let dataset = Dataset::from_columns(vec![
            ("age".to_string(), Column::Numerical(vec![25.0])),
            ("y".to_string(), Column::Categorical(vec!["yes".to_string()])),
        ])
        .unwrap();
        assert!(matches!(
            toy_schema().validate(&dataset),
            Err(DriftwatchError::MissingColumns(cols)) if cols == "job"
        ));
    }

    #[test]
    fn test_validate_unexpected_column() {
        let dataset = Dataset::from_columns(vec![
            ("age".to_string(), Column::Numerical(vec![25.0])),
            ("job".to_string(), Column::Categorical(vec!["admin".to_string()])),
            ("extra".to_string(), Column::Numerical(vec![1.0])),
            ("y".to_string(), Column::Categorical(vec!["yes".to_string()])),
        ])
        .unwrap();
        assert!(matches!(
            toy_schema().validate(&dataset),
            Err(DriftwatchError::UnexpectedColumns(cols)) if cols == "extra"
        ));
    }

    #[test]
    fn test_validate_bad_target_value() {
        let dataset = Dataset::from_columns(vec![
            ("age".to_string(), Column::Numerical(vec![25.0])),
            ("job".to_string(), Column::Categorical(vec!["admin".to_string()])),
            ("y".to_string(), Column::Categorical(vec!["maybe".to_string()])),
        ])
        .unwrap();
        assert!(matches!(
            toy_schema().validate(&dataset),
            Err(DriftwatchError::InvalidTargetValue(value, _)) if value == "maybe"
        ));
    }

    #[test]
    fn test_kind_of() {
        let schema = toy_schema();
        assert_eq!(schema.kind_of("age"), Some(FeatureKind::Numerical));
        assert_eq!(schema.kind_of("job"), Some(FeatureKind::Categorical));
        assert_eq!(schema.kind_of("y"), Some(FeatureKind::Categorical));
        assert_eq!(schema.kind_of("nope"), None);
    }

    #[test]
    fn test_bank_marketing_schema() {
        let schema = TableSchema::bank_marketing();
        assert_eq!(schema.expected_columns().len(), 17);
        assert_eq!(schema.target_column, "y");
        assert_eq!(schema.kind_of("balance"), Some(FeatureKind::Numerical));
        assert_eq!(schema.kind_of("poutcome"), Some(FeatureKind::Categorical));
    }

    #[test]
    fn test_schema_io_json() {
        let schema = toy_schema();
        let json = schema.json_dump().unwrap();
        let schema2 = TableSchema::from_json(&json).unwrap();
        assert_eq!(schema, schema2);
    }

    #[test]
    fn test_schema_io_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("schema.json");
        let schema = TableSchema::bank_marketing();
        schema.save(&file_path).unwrap();
        let schema2 = TableSchema::load(&file_path).unwrap();
        assert_eq!(schema, schema2);
    }
}
