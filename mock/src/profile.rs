use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Knobs for the random value and schema generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GenerationProfile {
    /// Seed for reproducible runs; a random seed is drawn when unset.
    pub seed: Option<u64>,
    /// Column count range for random schemas, inclusive.
    pub min_columns: usize,
    pub max_columns: usize,
    /// Longest string or binary value generated for a variable length column.
    pub max_unbounded_length: usize,
    /// Longest length declared on a random length-bounded column.
    pub max_declared_length: usize,
    /// Chance that a random column is nullable.
    pub nullable_probability: f64,
    /// Chance that a random length-bounded column uses fill semantics.
    pub fill_probability: f64,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            seed: None,
            min_columns: 1,
            max_columns: 20,
            max_unbounded_length: 64,
            max_declared_length: 100,
            nullable_probability: 0.5,
            fill_probability: 0.25,
        }
    }
}

impl GenerationProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("loading generation profile from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_columns == 0 {
            return Err(Error::Profile("min_columns must be at least 1".to_string()));
        }
        if self.min_columns > self.max_columns {
            return Err(Error::Profile(format!(
                "min_columns ({}) exceeds max_columns ({})",
                self.min_columns, self.max_columns
            )));
        }
        if self.max_declared_length == 0 {
            return Err(Error::Profile(
                "max_declared_length must be at least 1".to_string(),
            ));
        }
        for (name, p) in [
            ("nullable_probability", self.nullable_probability),
            ("fill_probability", self.fill_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Profile(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        Ok(())
    }
}
