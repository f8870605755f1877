// Copyright 2025 Cowboy AI, LLC.

//! In-memory terminal store holding serialized entities

use crate::{
    context::CallContext,
    errors::{RepositoryError, RepositoryResult},
    persistence::{
        repository::{Entity, Identifier, Repository},
        serializer::Serializer,
    },
};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::trace;

/// Terminal repository storing entities as bytes keyed by serialized identifier
///
/// A single lock guards the whole map and is held for the full duration of
/// every operation, serialization included, so operations on one store are
/// strictly serialized. Writes are last-write-wins.
pub struct InMemoryStore<E, K> {
    entries: Mutex<HashMap<Vec<u8>, Bytes>>,
    identifier_serializer: Box<dyn Serializer<K>>,
    entity_serializer: Box<dyn Serializer<E>>,
}

impl<E, K> InMemoryStore<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    /// Create an empty store with the given encodings
    pub fn new(
        identifier_serializer: impl Serializer<K> + 'static,
        entity_serializer: impl Serializer<E> + 'static,
    ) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            identifier_serializer: Box::new(identifier_serializer),
            entity_serializer: Box::new(entity_serializer),
        }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drop every stored entry
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    fn key_bytes(&self, id: &K) -> RepositoryResult<Vec<u8>> {
        self.identifier_serializer
            .serialize(id)
            .map_err(|source| RepositoryError::Serialization {
                what: "identifier",
                source,
            })
    }
}

#[async_trait]
impl<E, K> Repository<E, K> for InMemoryStore<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    async fn get(&self, _ctx: &CallContext, id: &K) -> RepositoryResult<E> {
        let entries = self.entries.lock().await;
        let key = self.key_bytes(id)?;
        let raw = entries
            .get(&key)
            .ok_or_else(|| RepositoryError::not_found(id))?;
        self.entity_serializer
            .deserialize(raw)
            .map_err(|source| RepositoryError::Deserialization { source })
    }

    async fn set(&self, _ctx: &CallContext, entity: E) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().await;
        let id = entity.identifier();
        let key = self.key_bytes(&id)?;
        let raw = self
            .entity_serializer
            .serialize(&entity)
            .map_err(|source| RepositoryError::Serialization {
                what: "entity",
                source,
            })?;
        trace!(id = ?id, bytes = raw.len(), "Storing entity");
        entries.insert(key, Bytes::from(raw));
        Ok(())
    }

    async fn delete(&self, _ctx: &CallContext, id: &K) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().await;
        let key = self.key_bytes(id)?;
        if entries.remove(&key).is_some() {
            trace!(id = ?id, "Removed entity");
        }
        Ok(())
    }
}
