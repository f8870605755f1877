// Copyright 2025 Cowboy AI, LLC.

//! # CIM Chain
//!
//! Decorator chain composition for CIM repositories.
//!
//! A chain is an ordered stack of wrapping stages around a terminal handler.
//! Factories are registered with a [`ChainBuilder`] in order; the first one
//! added becomes the outermost stage. Every call flows from the outermost
//! stage inwards, and each stage may short-circuit, transform, or delegate.
//!
//! The crate ships the stages used to build repository pipelines:
//! - **InMemoryStore**: terminal stage keeping serialized entities in memory
//! - **CachingRepository**: read-through cache with write invalidation
//! - **InstrumentedRepository**: per-operation latency reporting
//! - **DebugRepository**: pre-call trace lines enabled per call
//!
//! ## Example
//!
//! ```rust
//! use cim_chain::{
//!     new_user_repository, CallContext, ChainConfig, DebugSink, OperationMetrics,
//!     Repository, User, UserId,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let repo = new_user_repository(
//!     &ChainConfig::default(),
//!     DebugSink::stdout(),
//!     OperationMetrics::new(),
//! )
//! .unwrap();
//!
//! let ctx = CallContext::new();
//! repo.set(&ctx, User::new("10", "John")).await.unwrap();
//! let user = repo.get(&ctx, &UserId::new("10")).await.unwrap();
//! assert_eq!(user.name, "John");
//! # }
//! ```

#![warn(missing_docs)]

pub mod chain;
pub mod config;
pub mod context;
pub mod errors;
pub mod persistence;
pub mod users;

// Re-export core types
pub use chain::{factory_fn, ChainBuilder, ChainFactory, FactoryFn};
pub use config::{CacheConfig, ChainConfig, DebugConfig, TelemetryConfig};
pub use context::{CallContext, CorrelationId};
pub use errors::{
    BoxError, ChainError, ChainResult, ConfigError, ConfigResult, RepositoryError,
    RepositoryResult,
};
pub use persistence::{
    CachingRepository, DebugRepository, DebugSink, DurationStats, Entity, Identifier,
    InMemoryStore, InstrumentedRepository, JsonSerializer, MetricsSummary, MetricsTimer,
    OperationMetrics, Repository, Serializer, SharedRepository, Utf8KeySerializer,
};
pub use users::{new_user_repository, user_chain_builder, User, UserId, UserRepository};
