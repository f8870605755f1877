// Copyright 2025 Cowboy AI, LLC.

//! Chain builder: assembles factories around a terminal handler

use super::factory::ChainFactory;
use crate::errors::{ChainError, ChainResult};
use std::fmt;
use tracing::debug;

/// Builds a chain of wrapping stages with a handler as the last stage
///
/// The first factory added is the outermost stage and is invoked first by
/// callers; the last factory added sits directly in front of the handler.
/// Factories must be added in a deterministic order, so the builder is
/// consumed by value and never shared between threads while assembling.
///
/// # Examples
///
/// ```rust
/// use cim_chain::{ChainBuilder, ChainError};
///
/// let result = ChainBuilder::<String>::new().build();
/// assert!(matches!(result, Err(ChainError::MissingHandler)));
/// ```
pub struct ChainBuilder<T> {
    factories: Vec<Box<dyn ChainFactory<T>>>,
    handler: Option<T>,
}

impl<T> ChainBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            handler: None,
        }
    }

    /// Append a factory; no validation happens until [`build`](Self::build)
    pub fn add(mut self, factory: impl ChainFactory<T> + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Append an already boxed factory
    pub fn add_boxed(mut self, factory: Box<dyn ChainFactory<T>>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Set the terminal handler, replacing any previous one
    pub fn with_handler(mut self, handler: T) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Number of factories added so far
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factories were added
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Whether a terminal handler has been set
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Names of the added factories, outermost first
    pub fn factory_names(&self) -> Vec<String> {
        self.factories.iter().map(|f| f.name().to_string()).collect()
    }

    /// Assemble the chain
    ///
    /// Factories run from last added to first added, each wrapping the result
    /// of the previous one. The first failing factory aborts the build: its
    /// error is returned, factories added before it are never invoked, and
    /// the stages built so far are dropped.
    pub fn build(self) -> ChainResult<T> {
        let Some(handler) = self.handler else {
            return Err(ChainError::MissingHandler);
        };

        let stages = self.factories.len();
        let mut next = handler;
        for (position, factory) in self.factories.iter().enumerate().rev() {
            next = factory.create(next).map_err(|source| {
                debug!(
                    factory = factory.name(),
                    position,
                    error = %source,
                    "Chain factory failed"
                );
                ChainError::Factory {
                    factory: factory.name().to_string(),
                    position,
                    source,
                }
            })?;
            debug!(factory = factory.name(), position, "Wrapped chain stage");
        }

        debug!(stages, "Chain built");
        Ok(next)
    }
}

impl<T> Default for ChainBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChainBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("factories", &self.factory_names())
            .field("has_handler", &self.has_handler())
            .finish()
    }
}
