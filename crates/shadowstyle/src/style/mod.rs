//! Stylesheet cache: entries, their load state, and the registry that owns them.
//!
//! This module provides the core caching primitives:
//!
//! - [`StyleEntry`]: One stylesheet, its load state and its waiting consumers
//! - [`StyleLoad`]: The future driving an entry's single in-flight fetch
//! - [`StyleRegistry`]: One entry per resource identifier
//! - [`StyleError`] / [`FetchError`]: Errors from loading and resolution

mod entry;
mod error;
mod registry;

pub use entry::{LoadState, StyleEntry, StyleLoad};
pub use error::{FetchError, StyleError};
pub use registry::StyleRegistry;
