// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! The repository contract and the stages a repository chain is built from.
//!
//! ## Components
//!
//! - **Repository**: get/set/delete surface shared by every stage
//! - **InMemoryStore**: terminal stage holding serialized entities
//! - **CachingRepository**: read-through cache in front of the next stage
//! - **InstrumentedRepository**: times every call and records metrics
//! - **DebugRepository**: writes pre-call trace lines when debug is enabled

pub mod caching_repository;
pub mod debug_repository;
pub mod in_memory_store;
pub mod instrumented_repository;
pub mod metrics;
pub mod repository;
pub mod serializer;

pub use caching_repository::CachingRepository;
pub use debug_repository::{DebugRepository, DebugSink};
pub use in_memory_store::InMemoryStore;
pub use instrumented_repository::InstrumentedRepository;
pub use metrics::{DurationStats, MetricsSummary, MetricsTimer, OperationMetrics};
pub use repository::{Entity, Identifier, Repository, SharedRepository};
pub use serializer::{JsonSerializer, Serializer, Utf8KeySerializer};
