//! Telemetry wrapper timing every repository call

use crate::{
    chain::{ChainFactory, FactoryFn},
    context::{CallContext, CorrelationId},
    errors::RepositoryResult,
    persistence::{
        metrics::{MetricsTimer, OperationMetrics},
        repository::{Entity, Identifier, Repository, SharedRepository},
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// Repository wrapper that reports how long each call took
///
/// Every call is delegated unconditionally. On return, success or failure,
/// the elapsed time is emitted as a tracing event labelled with the operation
/// name and recorded into the metrics collector. A call dropped before the
/// delegate returns is still reported. The delegate's result is returned
/// untouched.
pub struct InstrumentedRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    next: SharedRepository<E, K>,
    metrics: OperationMetrics,
}

impl<E, K> InstrumentedRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    /// Create a new instrumented repository
    pub fn new(next: SharedRepository<E, K>) -> Self {
        Self::with_metrics(next, OperationMetrics::new())
    }

    /// Create with an existing metrics collector
    pub fn with_metrics(next: SharedRepository<E, K>, metrics: OperationMetrics) -> Self {
        Self { next, metrics }
    }

    /// Factory placing telemetry in front of the next stage
    pub fn factory(metrics: OperationMetrics) -> impl ChainFactory<SharedRepository<E, K>> {
        FactoryFn::named("telemetry", move |next: SharedRepository<E, K>| {
            let stage: SharedRepository<E, K> = Arc::new(Self::with_metrics(next, metrics.clone()));
            Ok(stage)
        })
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> &OperationMetrics {
        &self.metrics
    }
}

/// Reports one call exactly once, including a call dropped before completion
///
/// A dropped call is logged with `cancelled = true` and counted as an error.
struct CallRecord {
    timer: Option<MetricsTimer>,
    metrics: OperationMetrics,
    correlation_id: CorrelationId,
}

impl CallRecord {
    fn start(operation: &'static str, ctx: &CallContext, metrics: &OperationMetrics) -> Self {
        Self {
            timer: Some(MetricsTimer::start(operation)),
            metrics: metrics.clone(),
            correlation_id: ctx.correlation_id(),
        }
    }

    async fn finish<T: Send>(mut self, result: RepositoryResult<T>) -> RepositoryResult<T> {
        if let Some(timer) = self.timer.take() {
            let operation = timer.operation();
            let elapsed = timer.finish();
            info!(
                target: "cim_chain::telemetry",
                operation,
                elapsed_us = elapsed.as_micros() as u64,
                ok = result.is_ok(),
                cancelled = false,
                correlation_id = %self.correlation_id,
                "{operation}: {elapsed:?}"
            );
            self.metrics.record(operation, elapsed, result.is_err()).await;
        }
        result
    }
}

impl Drop for CallRecord {
    fn drop(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        let operation = timer.operation();
        let elapsed = timer.finish();
        info!(
            target: "cim_chain::telemetry",
            operation,
            elapsed_us = elapsed.as_micros() as u64,
            ok = false,
            cancelled = true,
            correlation_id = %self.correlation_id,
            "{operation}: {elapsed:?} (cancelled)"
        );
        // metrics lock is async
        if let Ok(handle) = Handle::try_current() {
            let metrics = self.metrics.clone();
            handle.spawn(async move { metrics.record(operation, elapsed, true).await });
        }
    }
}

#[async_trait]
impl<E, K> Repository<E, K> for InstrumentedRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    async fn get(&self, ctx: &CallContext, id: &K) -> RepositoryResult<E> {
        let record = CallRecord::start("get", ctx, &self.metrics);
        let result = self.next.get(ctx, id).await;
        record.finish(result).await
    }

    async fn set(&self, ctx: &CallContext, entity: E) -> RepositoryResult<()> {
        let record = CallRecord::start("set", ctx, &self.metrics);
        let result = self.next.set(ctx, entity).await;
        record.finish(result).await
    }

    async fn delete(&self, ctx: &CallContext, id: &K) -> RepositoryResult<()> {
        let record = CallRecord::start("delete", ctx, &self.metrics);
        let result = self.next.delete(ctx, id).await;
        record.finish(result).await
    }
}
