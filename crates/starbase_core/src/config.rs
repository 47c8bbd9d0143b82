//! # Stage Configuration
//!
//! Sizing for the actor pool. Loaded once at startup, usually as the
//! `[stage]` table of the host configuration file.

use serde::{Deserialize, Serialize};

use crate::error::{ActorError, ActorResult};

/// Default number of actor slots.
pub const DEFAULT_CAPACITY: usize = 32;

/// Configuration for a [`Stage`](crate::Stage).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Number of actor slots. Fixed for the lifetime of the stage.
    pub capacity: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StageConfig {
    /// Creates a configuration with the given capacity.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidConfig`] if the document does not parse
    /// or fails validation.
    pub fn from_toml_str(text: &str) -> ActorResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ActorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable pool.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidConfig`] if the capacity is zero or does
    /// not fit a 32-bit slot index.
    pub fn validate(&self) -> ActorResult<()> {
        if self.capacity == 0 {
            return Err(ActorError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if u32::try_from(self.capacity).is_err() {
            return Err(ActorError::InvalidConfig(format!(
                "capacity {} exceeds u32::MAX",
                self.capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = StageConfig::from_toml_str("").unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_capacity_parsed() {
        let config = StageConfig::from_toml_str("capacity = 64").unwrap();
        assert_eq!(config, StageConfig::with_capacity(64));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = StageConfig::from_toml_str("capacity = 0").unwrap_err();
        assert!(matches!(err, ActorError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(StageConfig::from_toml_str("slots = 4").is_err());
    }
}
