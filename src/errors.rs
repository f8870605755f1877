// Copyright 2025 Cowboy AI, LLC.

//! Error types for chain assembly and repository operations

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error returned by chain factories and serializers
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur while assembling a chain
#[derive(Debug, Error)]
pub enum ChainError {
    /// `build` was called before a terminal handler was supplied
    #[error("Missing handler: a chain cannot be built without a terminal handler")]
    MissingHandler,

    /// A factory refused to wrap the next stage
    #[error("Factory '{factory}' at position {position} failed: {source}")]
    Factory {
        /// Name reported by the failing factory
        factory: String,
        /// Position of the factory in addition order (0 = outermost)
        position: usize,
        /// The error returned by the factory, unchanged
        #[source]
        source: BoxError,
    },

    /// The chain configuration was rejected before any factory ran
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for chain assembly
pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    /// Check if this is a missing handler error
    pub fn is_missing_handler(&self) -> bool {
        matches!(self, ChainError::MissingHandler)
    }

    /// The error a factory returned, if this is a factory failure
    pub fn factory_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            ChainError::Factory { source, .. } => Some(source.as_ref()),
            ChainError::MissingHandler | ChainError::Config(_) => None,
        }
    }
}

/// Errors that can occur in repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No entry is stored under the requested key
    #[error("Entity not found: {key}")]
    NotFound {
        /// Debug rendering of the requested identifier
        key: String,
    },

    /// An identifier or entity could not be encoded
    #[error("Serialization error: unable to serialize {what}: {source}")]
    Serialization {
        /// What was being serialized ("identifier" or "entity")
        what: &'static str,
        /// Underlying serializer error
        #[source]
        source: BoxError,
    },

    /// Stored bytes could not be decoded into an entity
    #[error("Deserialization error: unable to unserialize entity: {source}")]
    Deserialization {
        /// Underlying serializer error
        #[source]
        source: BoxError,
    },
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised while loading or checking a chain configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting holds a value no stage can work with
    #[error("Invalid configuration: {field} {reason}")]
    Invalid {
        /// Dotted path of the offending setting
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

impl RepositoryError {
    /// Create a not found error for an identifier
    pub fn not_found(key: impl std::fmt::Debug) -> Self {
        RepositoryError::NotFound {
            key: format!("{key:?}"),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    /// Check if this is a serialization or deserialization error
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            RepositoryError::Serialization { .. } | RepositoryError::Deserialization { .. }
        )
    }
}
