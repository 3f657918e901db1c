//! Data
//!
//! Owned tabular containers used throughout the crate. A [`Dataset`] is an
//! ordered collection of named, equal-length columns, each stored as either
//! numerical or categorical. The stored type drives which drift test a
//! feature receives; values are never re-inspected to second-guess it, so a
//! numeric-looking code column stored as categorical stays categorical.
use crate::errors::DriftwatchError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type tag of a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numerical,
    Categorical,
}

impl Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Numerical => write!(f, "numerical"),
            FeatureKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numerical(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    /// The type tag of this column.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Column::Numerical(_) => FeatureKind::Numerical,
            Column::Categorical(_) => FeatureKind::Categorical,
        }
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numerical(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// Whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numerical values, if this is a numerical column.
    pub fn as_numerical(&self) -> Option<&[f64]> {
        match self {
            Column::Numerical(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    /// The categorical values, if this is a categorical column.
    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            Column::Numerical(_) => None,
            Column::Categorical(v) => Some(v),
        }
    }

    fn take(&self, index: &[usize]) -> Column {
        match self {
            Column::Numerical(v) => Column::Numerical(index.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => Column::Categorical(index.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// An ordered collection of named, equal-length, typed columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    lookup: HashMap<String, usize>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from `(name, column)` pairs, preserving their order.
    ///
    /// Fails if a name repeats or the columns differ in length.
    pub fn from_columns(pairs: Vec<(String, Column)>) -> Result<Self, DriftwatchError> {
        let rows = pairs.first().map_or(0, |(_, c)| c.len());
        let mut names = Vec::with_capacity(pairs.len());
        let mut columns = Vec::with_capacity(pairs.len());
        let mut lookup = HashMap::with_capacity(pairs.len());
        for (name, column) in pairs {
            if column.len() != rows {
                return Err(DriftwatchError::ColumnLengthMismatch(name, column.len(), rows));
            }
            if lookup.insert(name.clone(), columns.len()).is_some() {
                return Err(DriftwatchError::DuplicateColumn(name));
            }
            names.push(name);
            columns.push(column);
        }
        Ok(Dataset {
            names,
            columns,
            lookup,
            rows,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in original order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.lookup.get(name).map(|&i| &self.columns[i])
    }

    /// The type tag of a named column.
    pub fn kind(&self, name: &str) -> Option<FeatureKind> {
        self.column(name).map(Column::kind)
    }

    /// Select a subset of rows by index, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn take(&self, index: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(index)).collect(),
            lookup: self.lookup.clone(),
            rows: index.len(),
        }
    }
}
