//! Trainer configuration

use serde::{Deserialize, Serialize};

use tensorio_core::{Error, Result};

/// Configuration for a training run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of passes over the data source
    pub epochs: usize,

    /// Items per training call; the last batch of an epoch may be smaller
    pub batch_size: usize,

    /// Permute item order once before the first epoch
    pub shuffle: bool,

    /// Seed for the shuffle, random when unset
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            batch_size: 32,
            shuffle: false,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidArgument(format!("Invalid trainer config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can drive a training run
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidArgument("Batch size must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = TrainerConfig::from_json(r#"{"epochs": 5, "shuffle": true}"#).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.batch_size, 32);
        assert!(config.shuffle);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let result = TrainerConfig::from_json(r#"{"batch_size": 0}"#);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(TrainerConfig::from_json("{epochs").is_err());
    }
}
