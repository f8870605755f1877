// Copyright 2025 Cowboy AI, LLC.

//! Chain factories: units of wrapping behavior

use crate::errors::BoxError;
use std::fmt;

/// Wraps the next stage of a chain into a new stage
///
/// `T` is the capability handle flowing through the chain, typically a trait
/// object such as `Arc<dyn Repository<E, K>>`. A factory may refuse to wrap by
/// returning an error, which aborts the whole build.
pub trait ChainFactory<T>: Send + Sync {
    /// Produce a stage that delegates to `next`
    fn create(&self, next: T) -> Result<T, BoxError>;

    /// Name used in logs and build errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapter exposing a plain closure as a [`ChainFactory`]
///
/// # Examples
///
/// ```rust
/// use cim_chain::{ChainBuilder, FactoryFn};
///
/// let chain = ChainBuilder::<i32>::new()
///     .add(FactoryFn::new(|next: i32| Ok(next * 10)))
///     .add(FactoryFn::new(|next: i32| Ok(next + 1)))
///     .with_handler(4)
///     .build()
///     .unwrap();
///
/// // last added wraps the handler first
/// assert_eq!(chain, 50);
/// ```
pub struct FactoryFn<F> {
    name: String,
    func: F,
}

impl<F> FactoryFn<F> {
    /// Wrap a closure
    pub fn new<T>(func: F) -> Self
    where
        F: Fn(T) -> Result<T, BoxError> + Send + Sync,
    {
        Self {
            name: "factory_fn".to_string(),
            func,
        }
    }

    /// Wrap a closure under a name shown in logs and errors
    pub fn named<T>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(T) -> Result<T, BoxError> + Send + Sync,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FactoryFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryFn").field("name", &self.name).finish()
    }
}

impl<T, F> ChainFactory<T> for FactoryFn<F>
where
    F: Fn(T) -> Result<T, BoxError> + Send + Sync,
{
    fn create(&self, next: T) -> Result<T, BoxError> {
        (self.func)(next)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shorthand for [`FactoryFn::new`]
pub fn factory_fn<T, F>(func: F) -> FactoryFn<F>
where
    F: Fn(T) -> Result<T, BoxError> + Send + Sync,
{
    FactoryFn::new(func)
}
