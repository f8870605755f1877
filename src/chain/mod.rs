// Copyright 2025 Cowboy AI, LLC.

//! # Chain Composition
//!
//! Assembles independently defined wrapping stages around a terminal handler.
//!
//! ## Components
//!
//! - **ChainFactory**: wraps a "next" stage into a new stage, or fails
//! - **FactoryFn**: adapter turning a closure into a factory
//! - **ChainBuilder**: ordered factories plus one handler, built on demand

mod builder;
mod factory;

pub use builder::ChainBuilder;
pub use factory::{factory_fn, ChainFactory, FactoryFn};
