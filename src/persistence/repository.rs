// Copyright 2025 Cowboy AI, LLC.

//! Repository contract shared by every chain stage

use crate::{context::CallContext, errors::RepositoryResult};
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Key type of a stored entity
///
/// Implemented for every type usable as a map key.
pub trait Identifier: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> Identifier for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// A value that reports its own identifier
///
/// The identifier must stay stable for the lifetime of the value.
pub trait Entity<K: Identifier>: Clone + Send + Sync + 'static {
    /// The identifier this entity is stored under
    fn identifier(&self) -> K;
}

/// Get/set/delete surface implemented by stores and decorators alike
#[async_trait]
pub trait Repository<E, K>: Send + Sync
where
    E: Entity<K>,
    K: Identifier,
{
    /// Read an entity by identifier
    async fn get(&self, ctx: &CallContext, id: &K) -> RepositoryResult<E>;

    /// Write an entity under its own identifier
    async fn set(&self, ctx: &CallContext, entity: E) -> RepositoryResult<()>;

    /// Remove an entity; removing an absent entity is not an error
    async fn delete(&self, ctx: &CallContext, id: &K) -> RepositoryResult<()>;
}

/// Handle passed between chain stages
pub type SharedRepository<E, K> = Arc<dyn Repository<E, K>>;
