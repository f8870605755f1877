// Copyright 2025 Cowboy AI, LLC.

//! Read-through cache in front of the next chain stage

use crate::{
    chain::{ChainFactory, FactoryFn},
    config::CacheConfig,
    context::CallContext,
    errors::RepositoryResult,
    persistence::repository::{Entity, Identifier, Repository, SharedRepository},
};
use async_trait::async_trait;
use lru::LruCache;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// Repository decorator memoizing successful reads
///
/// `get` holds the cache lock for the whole call, including the delegated
/// read on a miss, so all reads through one cache are serialized with each
/// other and with invalidations. `set` and `delete` only hold the lock while
/// dropping the cached entry and release it before delegating the write.
///
/// A concurrent miss that lands between the invalidation and the delegated
/// write may cache the value from before the write.
pub struct CachingRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    next: SharedRepository<E, K>,
    entries: Mutex<LruCache<K, E>>,
}

impl<E, K> CachingRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    /// Create an unbounded cache in front of `next`
    pub fn new(next: SharedRepository<E, K>) -> Self {
        Self::with_config(next, &CacheConfig::default())
    }

    /// Create a cache sized by `config`
    pub fn with_config(next: SharedRepository<E, K>, config: &CacheConfig) -> Self {
        let entries = match config.max_entries {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            next,
            entries: Mutex::new(entries),
        }
    }

    /// Factory placing a cache in front of the next stage
    pub fn factory(config: CacheConfig) -> impl ChainFactory<SharedRepository<E, K>> {
        FactoryFn::named("cache", move |next: SharedRepository<E, K>| {
            let stage: SharedRepository<E, K> = Arc::new(Self::with_config(next, &config));
            Ok(stage)
        })
    }

    /// Number of cached entities
    pub async fn cached_len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether an entity is cached under `id`
    pub async fn is_cached(&self, id: &K) -> bool {
        self.entries.lock().await.contains(id)
    }

    /// Drop every cached entity
    pub async fn invalidate_all(&self) {
        self.entries.lock().await.clear();
    }

    async fn invalidate(&self, id: &K) {
        let mut entries = self.entries.lock().await;
        if entries.pop(id).is_some() {
            trace!(id = ?id, "Invalidated cache entry");
        }
    }
}

#[async_trait]
impl<E, K> Repository<E, K> for CachingRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    async fn get(&self, ctx: &CallContext, id: &K) -> RepositoryResult<E> {
        let mut entries = self.entries.lock().await;
        if let Some(entity) = entries.get(id) {
            trace!(id = ?id, "Cache hit");
            return Ok(entity.clone());
        }

        trace!(id = ?id, "Cache miss");
        let entity = self.next.get(ctx, id).await?;
        // Keyed by the identifier the entity reports, not the one requested.
        entries.put(entity.identifier(), entity.clone());
        Ok(entity)
    }

    async fn set(&self, ctx: &CallContext, entity: E) -> RepositoryResult<()> {
        self.invalidate(&entity.identifier()).await;
        self.next.set(ctx, entity).await
    }

    async fn delete(&self, ctx: &CallContext, id: &K) -> RepositoryResult<()> {
        self.invalidate(id).await;
        self.next.delete(ctx, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use mockall::{mock, predicate::eq, Sequence};
    use std::num::NonZeroUsize;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        value: String,
    }

    impl Entity<u32> for Item {
        fn identifier(&self) -> u32 {
            self.id
        }
    }

    fn item(id: u32, value: &str) -> Item {
        Item {
            id,
            value: value.to_string(),
        }
    }

    mock! {
        Next {}

        #[async_trait]
        impl Repository<Item, u32> for Next {
            async fn get(&self, ctx: &CallContext, id: &u32) -> RepositoryResult<Item>;
            async fn set(&self, ctx: &CallContext, entity: Item) -> RepositoryResult<()>;
            async fn delete(&self, ctx: &CallContext, id: &u32) -> RepositoryResult<()>;
        }
    }

    fn cache(next: MockNext) -> CachingRepository<Item, u32> {
        CachingRepository::<Item, u32>::new(Arc::new(next))
    }

    #[tokio::test]
    async fn test_hit_skips_next_stage() {
        let mut next = MockNext::new();
        next.expect_get()
            .with(mockall::predicate::always(), eq(1))
            .times(1)
            .returning(|_, _| Ok(item(1, "one")));
        let cache = cache(next);
        let ctx = CallContext::new();

        assert_eq!(cache.get(&ctx, &1).await.unwrap(), item(1, "one"));
        assert_eq!(cache.get(&ctx, &1).await.unwrap(), item(1, "one"));
        assert!(cache.is_cached(&1).await);
    }

    #[tokio::test]
    async fn test_failed_read_caches_nothing() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(2)
            .returning(|_, id| Err(RepositoryError::not_found(*id)));
        let cache = cache(next);
        let ctx = CallContext::new();

        assert!(cache.get(&ctx, &9).await.unwrap_err().is_not_found());
        assert!(cache.get(&ctx, &9).await.unwrap_err().is_not_found());
        assert_eq!(cache.cached_len().await, 0);
    }

    #[tokio::test]
    async fn test_set_invalidates_before_delegating() {
        let mut seq = Sequence::new();
        let mut next = MockNext::new();
        next.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(item(1, "old")));
        next.expect_set()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        next.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(item(1, "new")));
        let cache = cache(next);
        let ctx = CallContext::new();

        assert_eq!(cache.get(&ctx, &1).await.unwrap().value, "old");
        cache.set(&ctx, item(1, "new")).await.unwrap();
        assert!(!cache.is_cached(&1).await);
        assert_eq!(cache.get(&ctx, &1).await.unwrap().value, "new");
    }

    #[tokio::test]
    async fn test_delete_invalidates() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(2)
            .returning(|_, _| Ok(item(4, "four")));
        next.expect_delete().times(1).returning(|_, _| Ok(()));
        let cache = cache(next);
        let ctx = CallContext::new();

        cache.get(&ctx, &4).await.unwrap();
        cache.delete(&ctx, &4).await.unwrap();
        assert!(!cache.is_cached(&4).await);
        cache.get(&ctx, &4).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_errors_propagate_after_invalidation() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(1)
            .returning(|_, _| Ok(item(2, "two")));
        next.expect_set()
            .times(1)
            .returning(|_, _| {
                Err(RepositoryError::Serialization {
                    what: "entity",
                    source: "read only".into(),
                })
            });
        let cache = cache(next);
        let ctx = CallContext::new();

        cache.get(&ctx, &2).await.unwrap();
        let err = cache.set(&ctx, item(2, "changed")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization { .. }));
        assert!(!cache.is_cached(&2).await);
    }

    #[tokio::test]
    async fn test_keys_by_returned_identifier() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(1)
            .returning(|_, _| Ok(item(20, "redirected")));
        let cache = cache(next);
        let ctx = CallContext::new();

        cache.get(&ctx, &10).await.unwrap();
        assert!(!cache.is_cached(&10).await);
        assert!(cache.is_cached(&20).await);
        // served from cache without reaching the next stage
        assert_eq!(cache.get(&ctx, &20).await.unwrap().value, "redirected");
    }

    #[tokio::test]
    async fn test_bounded_cache_evicts_least_recently_used() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(4)
            .returning(|_, id| Ok(item(*id, "v")));
        let config = CacheConfig {
            max_entries: NonZeroUsize::new(2),
        };
        let cache = CachingRepository::<Item, u32>::with_config(Arc::new(next), &config);
        let ctx = CallContext::new();

        cache.get(&ctx, &1).await.unwrap();
        cache.get(&ctx, &2).await.unwrap();
        cache.get(&ctx, &3).await.unwrap();
        assert_eq!(cache.cached_len().await, 2);
        assert!(!cache.is_cached(&1).await);

        // evicted entry is fetched again
        cache.get(&ctx, &1).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let mut next = MockNext::new();
        next.expect_get()
            .times(2)
            .returning(|_, id| Ok(item(*id, "v")));
        let cache = cache(next);
        let ctx = CallContext::new();

        cache.get(&ctx, &1).await.unwrap();
        cache.get(&ctx, &2).await.unwrap();
        cache.invalidate_all().await;
        assert_eq!(cache.cached_len().await, 0);
    }
}
