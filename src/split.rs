//! Split
//!
//! Seeded, target-stratified partitioning of a validated dataset into train,
//! test, and production-pool tables. The train partition doubles as the
//! frozen reference distribution that drift is later measured against.
use crate::data::{Column, Dataset};
use crate::errors::DriftwatchError;
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Fractions and seed for a three-way split. Whatever `train_fraction` and
/// `test_fraction` leave over becomes the production pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_train_fraction() -> f64 {
    0.6
}
fn default_test_fraction() -> f64 {
    0.2
}
fn default_seed() -> u64 {
    42
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            train_fraction: default_train_fraction(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
        }
    }
}

impl SplitConfig {
    fn validate(&self) -> Result<(), DriftwatchError> {
        for (name, value) in [("train_fraction", self.train_fraction), ("test_fraction", self.test_fraction)] {
            if value.is_nan() || value <= 0.0 || value >= 1.0 {
                return Err(DriftwatchError::InvalidParameter(
                    name.to_string(),
                    "real value within range 0 and 1".to_string(),
                    value.to_string(),
                ));
            }
        }
        if self.train_fraction + self.test_fraction >= 1.0 {
            return Err(DriftwatchError::InvalidParameter(
                "train_fraction + test_fraction".to_string(),
                "sum below 1 so a production pool remains".to_string(),
                (self.train_fraction + self.test_fraction).to_string(),
            ));
        }
        Ok(())
    }
}

/// The three partitions produced by [`stratified_split`].
#[derive(Debug, Clone)]
pub struct DataSplits {
    pub train: Dataset,
    pub test: Dataset,
    pub pool: Dataset,
}

/// Split a dataset into train, test, and production-pool partitions,
/// preserving the target's class proportions in each.
///
/// Rows are shuffled within each class stratum by a seeded RNG, so the split
/// is reproducible for a fixed `config.seed`.
pub fn stratified_split(
    dataset: &Dataset,
    target_column: &str,
    config: &SplitConfig,
) -> Result<DataSplits, DriftwatchError> {
    config.validate()?;
    let target = dataset
        .column(target_column)
        .ok_or_else(|| DriftwatchError::ColumnNotFound(target_column.to_string()))?;

    let mut strata: HashMap<String, Vec<usize>> = HashMap::new();
    match target {
        Column::Categorical(values) => {
            for (i, value) in values.iter().enumerate() {
                strata.entry(value.clone()).or_default().push(i);
            }
        }
        Column::Numerical(values) => {
            for (i, value) in values.iter().enumerate() {
                strata.entry(value.to_string()).or_default().push(i);
            }
        }
    }

    // Iterate strata in sorted-key order so the seed alone determines the split.
    let mut keys: Vec<&String> = strata.keys().collect();
    keys.sort_unstable();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut train_index = Vec::new();
    let mut test_index = Vec::new();
    let mut pool_index = Vec::new();

    for key in keys {
        let mut index = strata[key].clone();
        index.shuffle(&mut rng);
        let n = index.len();
        let n_train = (n as f64 * config.train_fraction).round() as usize;
        let n_test = ((n as f64 * config.test_fraction).round() as usize).min(n - n_train);
        train_index.extend_from_slice(&index[..n_train]);
        test_index.extend_from_slice(&index[n_train..n_train + n_test]);
        pool_index.extend_from_slice(&index[n_train + n_test..]);
    }

    Ok(DataSplits {
        train: dataset.take(&train_index),
        test: dataset.take(&test_index),
        pool: dataset.take(&pool_index),
    })
}
