// Copyright 2025 Cowboy AI, LLC.

//! Debug wrapper writing a trace line before each call

use crate::{
    chain::{ChainFactory, FactoryFn},
    context::CallContext,
    errors::RepositoryResult,
    persistence::repository::{Entity, Identifier, Repository, SharedRepository},
};
use async_trait::async_trait;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Shared destination for debug trace lines
///
/// Clones write to the same destination, so stacked debug stages produce
/// their lines in call order.
#[derive(Clone)]
pub struct DebugSink {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl DebugSink {
    /// Sink writing to any byte stream
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink discarding everything
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    /// Write one line; failures are ignored
    pub fn write_line(&self, line: fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_fmt(line);
            let _ = out.write_all(b"\n");
            let _ = out.flush();
        }
    }
}

impl fmt::Debug for DebugSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSink").finish_non_exhaustive()
    }
}

/// Repository wrapper emitting `[DEBUG][<label>] Pre<Op>` before delegating
///
/// Lines are written only when the call's context has debug enabled. The
/// call is delegated either way and its result is returned unchanged.
pub struct DebugRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    next: SharedRepository<E, K>,
    sink: DebugSink,
    label: String,
}

impl<E, K> DebugRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    /// Create a debug stage writing to `sink` under `label`
    pub fn new(next: SharedRepository<E, K>, sink: DebugSink, label: impl Into<String>) -> Self {
        Self {
            next,
            sink,
            label: label.into(),
        }
    }

    /// Factory placing a debug stage in front of the next stage
    pub fn factory(
        sink: DebugSink,
        label: impl Into<String>,
    ) -> impl ChainFactory<SharedRepository<E, K>> {
        let label = label.into();
        FactoryFn::named(
            format!("debug[{label}]"),
            move |next: SharedRepository<E, K>| {
                let stage: SharedRepository<E, K> =
                    Arc::new(Self::new(next, sink.clone(), label.clone()));
                Ok(stage)
            },
        )
    }

    /// Label distinguishing this stage from other debug stages
    pub fn label(&self) -> &str {
        &self.label
    }

    fn trace(&self, ctx: &CallContext, operation: &str) {
        if ctx.is_debug_enabled() {
            self.sink
                .write_line(format_args!("[DEBUG][{}] Pre{}", self.label, operation));
        }
    }
}

#[async_trait]
impl<E, K> Repository<E, K> for DebugRepository<E, K>
where
    E: Entity<K>,
    K: Identifier,
{
    async fn get(&self, ctx: &CallContext, id: &K) -> RepositoryResult<E> {
        self.trace(ctx, "Get");
        self.next.get(ctx, id).await
    }

    async fn set(&self, ctx: &CallContext, entity: E) -> RepositoryResult<()> {
        self.trace(ctx, "Set");
        self.next.set(ctx, entity).await
    }

    async fn delete(&self, ctx: &CallContext, id: &K) -> RepositoryResult<()> {
        self.trace(ctx, "Delete");
        self.next.delete(ctx, id).await
    }
}
