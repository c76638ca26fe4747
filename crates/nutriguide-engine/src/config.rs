//! Configuration for the resolution engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to every resolution request
///
/// # Examples
///
/// ```
/// use nutriguide_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.store_timeout_ms, 2000);
/// assert_eq!(config.max_conditions, 16);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for a single store call once it holds a store slot (in
    /// milliseconds); time spent queued behind other calls is not counted
    /// Default: 2000
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Maximum number of distinct conditions a guide request may resolve to
    /// Default: 16
    #[serde(default = "default_max_conditions")]
    pub max_conditions: usize,

    /// Maximum number of search terms accepted by a guide request
    /// Default: 64
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Store calls allowed to run at once; the SQLite store holds a single
    /// connection, so extra calls would only queue on its lock
    /// Default: 1
    #[serde(default = "default_store_concurrency")]
    pub store_concurrency: usize,
}

fn default_store_timeout_ms() -> u64 {
    2000
}

fn default_max_conditions() -> usize {
    16
}

fn default_max_terms() -> usize {
    64
}

fn default_store_concurrency() -> usize {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            max_conditions: default_max_conditions(),
            max_terms: default_max_terms(),
            store_concurrency: default_store_concurrency(),
        }
    }
}

impl EngineConfig {
    /// Store call deadline as a Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Check that limits are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.store_timeout_ms == 0 {
            return Err("store_timeout_ms must be greater than 0".to_string());
        }
        if self.max_conditions == 0 {
            return Err("max_conditions must be greater than 0".to_string());
        }
        if self.store_concurrency == 0 {
            return Err("store_concurrency must be greater than 0".to_string());
        }
        if self.max_terms < self.max_conditions {
            return Err("max_terms must be at least max_conditions".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.store_timeout(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("store_timeout_ms = 250").unwrap();
        assert_eq!(config.store_timeout_ms, 250);
        assert_eq!(config.max_conditions, 16);
        assert_eq!(config.max_terms, 64);
        assert_eq!(config.store_concurrency, 1);
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = EngineConfig {
            store_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_terms: 2,
            max_conditions: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            store_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
