// Copyright 2025 Cowboy AI, LLC.

//! Per-call options threaded through every repository operation

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier correlating the log lines of one logical call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a fresh correlation id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Explicit options for a single call into a chain
///
/// The debug flag is opt-in: a context built with [`CallContext::new`] never
/// produces trace lines. Stages only read the context; they never modify it.
///
/// # Examples
///
/// ```rust
/// use cim_chain::CallContext;
///
/// let ctx = CallContext::new();
/// assert!(!ctx.is_debug_enabled());
///
/// let ctx = ctx.with_debug();
/// assert!(ctx.is_debug_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    correlation_id: CorrelationId,
    debug: bool,
}

impl CallContext {
    /// Context with debug tracing disabled
    pub fn new() -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            debug: false,
        }
    }

    /// Context bound to an existing correlation id
    pub fn with_correlation_id(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            debug: false,
        }
    }

    /// Enable debug tracing for calls made with this context
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Whether debug tracing was requested
    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Correlation id of this call
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
