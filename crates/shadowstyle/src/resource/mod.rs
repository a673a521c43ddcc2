//! External collaborators: fetching stylesheet text and naming resources.
//!
//! - [`StyleFetcher`]: The injected fetch capability, with [`StaticFetcher`]
//!   and [`FileFetcher`] implementations
//! - [`ResourceResolver`]: Maps a `(kind, name)` pair to a fetchable identifier

mod fetch;
mod resolve;

pub use fetch::{FileFetcher, StaticFetcher, StyleFetcher};
pub use resolve::{ResolverConfig, ResourceResolver, ResourceRule};

#[cfg(test)]
pub(crate) use fetch::testing;
