// Copyright 2025 Cowboy AI, LLC.

//! Configuration for the decorator stages of a repository chain

use crate::errors::{ConfigError, ConfigResult};
use crate::persistence::metrics::DEFAULT_MAX_SAMPLES;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Configuration for the caching stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Bound on cached entities with LRU eviction (`None` = unbounded)
    pub max_entries: Option<NonZeroUsize>,
}

/// Configuration for the debug stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Label of the stage in front of the cache
    pub cache_label: String,
    /// Label of the stage in front of the store
    pub storage_label: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            cache_label: "CacheCall".to_string(),
            storage_label: "StorageCall".to_string(),
        }
    }
}

/// Configuration for the telemetry stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Whether the telemetry stage is part of the chain
    pub enabled: bool,
    /// Duration samples kept per operation
    pub max_samples: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

/// Configuration for a full repository chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Caching stage settings
    pub cache: CacheConfig,
    /// Debug stage settings
    pub debug: DebugConfig,
    /// Telemetry stage settings
    pub telemetry: TelemetryConfig,
}

impl ChainConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that the types alone cannot enforce
    pub fn validate(&self) -> ConfigResult<()> {
        if self.debug.cache_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "debug.cache_label",
                reason: "must not be empty",
            });
        }
        if self.debug.storage_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "debug.storage_label",
                reason: "must not be empty",
            });
        }
        if self.telemetry.max_samples == 0 {
            return Err(ConfigError::Invalid {
                field: "telemetry.max_samples",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
