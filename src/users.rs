// Copyright 2025 Cowboy AI, LLC.

//! User repository assembled from the standard stages
//!
//! The chain, outermost first:
//!
//! ```text
//! telemetry -> debug[CacheCall] -> cache -> debug[StorageCall] -> in-memory store
//! ```

use crate::{
    chain::ChainBuilder,
    config::ChainConfig,
    errors::ChainResult,
    persistence::{
        CachingRepository, DebugRepository, DebugSink, Entity, InMemoryStore,
        InstrumentedRepository, JsonSerializer, OperationMetrics, SharedRepository,
        Utf8KeySerializer,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a user id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier the user is stored under
    pub id: UserId,
    /// Display name
    pub name: String,
}

impl User {
    /// Create a user
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Entity<UserId> for User {
    fn identifier(&self) -> UserId {
        self.id.clone()
    }
}

/// Chain handle for users
pub type UserRepository = SharedRepository<User, UserId>;

/// Builder for the user chain, ready for [`ChainBuilder::build`]
///
/// The telemetry stage is left out when `config.telemetry.enabled` is false.
pub fn user_chain_builder(
    config: &ChainConfig,
    sink: DebugSink,
    metrics: OperationMetrics,
) -> ChainBuilder<UserRepository> {
    let mut builder = ChainBuilder::<UserRepository>::new();
    if config.telemetry.enabled {
        builder = builder.add(InstrumentedRepository::<User, UserId>::factory(metrics));
    }

    let store: UserRepository = Arc::new(InMemoryStore::new(
        Utf8KeySerializer::<UserId>::new(),
        JsonSerializer::<User>::new(),
    ));

    builder
        .add(DebugRepository::<User, UserId>::factory(
            sink.clone(),
            config.debug.cache_label.clone(),
        ))
        .add(CachingRepository::<User, UserId>::factory(config.cache.clone()))
        .add(DebugRepository::<User, UserId>::factory(
            sink,
            config.debug.storage_label.clone(),
        ))
        .with_handler(store)
}

/// Build the user repository chain
///
/// The configuration is validated first; an invalid one is reported as
/// [`ChainError::Config`](crate::ChainError::Config) without building any stage.
pub fn new_user_repository(
    config: &ChainConfig,
    sink: DebugSink,
    metrics: OperationMetrics,
) -> ChainResult<UserRepository> {
    config.validate()?;
    user_chain_builder(config, sink, metrics).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallContext;
    use crate::errors::{ChainError, ConfigError};
    use crate::persistence::Repository;

    #[test]
    fn test_user_identifier() {
        let user = User::new("10", "John");
        assert_eq!(user.identifier(), UserId::new("10"));
        assert_eq!(user.id.to_string(), "10");
    }

    #[test]
    fn test_chain_layout() {
        let builder = user_chain_builder(
            &ChainConfig::default(),
            DebugSink::sink(),
            OperationMetrics::new(),
        );
        assert!(builder.has_handler());
        assert_eq!(
            builder.factory_names(),
            vec!["telemetry", "debug[CacheCall]", "cache", "debug[StorageCall]"]
        );
    }

    #[test]
    fn test_telemetry_can_be_disabled() {
        let mut config = ChainConfig::default();
        config.telemetry.enabled = false;
        let builder = user_chain_builder(&config, DebugSink::sink(), OperationMetrics::new());
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.factory_names()[0], "debug[CacheCall]");
    }

    #[test]
    fn test_invalid_config_is_rejected_before_building() {
        let mut config = ChainConfig::default();
        config.debug.storage_label = String::new();

        let err = match new_user_repository(&config, DebugSink::sink(), OperationMetrics::new()) {
            Err(err) => err,
            Ok(_) => panic!("empty label must be rejected"),
        };
        assert!(matches!(
            err,
            ChainError::Config(ConfigError::Invalid {
                field: "debug.storage_label",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_round_trip_through_chain() {
        let config = ChainConfig::default();
        let metrics = OperationMetrics::from_config(&config.telemetry);
        let repo = new_user_repository(&config, DebugSink::sink(), metrics.clone()).unwrap();
        let ctx = CallContext::new();

        repo.set(&ctx, User::new("10", "John")).await.unwrap();
        assert_eq!(
            repo.get(&ctx, &UserId::new("10")).await.unwrap(),
            User::new("10", "John")
        );
        assert_eq!(metrics.call_count("set").await, 1);
        assert_eq!(metrics.call_count("get").await, 1);
    }
}
