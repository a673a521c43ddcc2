//! # Shadowstyle - Shared Stylesheets for Custom Elements
//!
//! Custom elements that style their isolated root with an external stylesheet
//! face two problems: every instance fetching the same file, and a flash of
//! unstyled content while it arrives. This crate solves both with a per-URL
//! cache that fetches each stylesheet at most once at a time and hands the text
//! to every waiting element, in order, the moment it lands. Until then each
//! element shows a placeholder style that keeps it hidden and out of flow.
//!
//! ## Concepts
//!
//! - [`StyleRegistry`]: One [`StyleEntry`] per resource identifier
//! - [`StyleEntry`]: Load state (`Unloaded`, `Loading`, `Complete`), cached
//!   text, and the queue of slots waiting for it
//! - [`StyledElement`]: Writes the placeholder, then either applies cached
//!   text immediately or queues itself and triggers the load
//! - [`StyleFetcher`]: The injected fetch capability
//! - [`ResourceResolver`]: Maps `(kind, name)` to an identifier
//! - [`StyleHost`]: Spawns loads on a tokio `LocalSet`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use shadowstyle::{
//!     ElementPhase, ElementStyle, ShadowRoot, StaticFetcher, StyleRegistry, StyledElement,
//!     PLACEHOLDER_STYLE,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let fetcher = StaticFetcher::new().add("a.css", "body{color:red}");
//! let registry = StyleRegistry::new(Rc::new(fetcher));
//! let style = ElementStyle::new("a.css");
//!
//! let (r1, r2) = (ShadowRoot::new(), ShadowRoot::new());
//! let (_e1, load) = StyledElement::attach(&registry, &style, &r1);
//! let (e2, joined) = StyledElement::attach(&registry, &style, &r2);
//!
//! // Both hidden, one fetch in flight.
//! assert_eq!(r2.first_style().unwrap().text(), PLACEHOLDER_STYLE);
//! assert!(joined.is_none());
//!
//! load.unwrap().await.unwrap();
//! assert_eq!(e2.phase(), ElementPhase::Styled);
//! assert_eq!(r2.first_style().unwrap().text(), "body{color:red}");
//! # });
//! ```
//!
//! ## Failure
//!
//! A failed fetch resets its entry to `Unloaded` and is returned to whoever
//! drives the load. Elements already waiting stay hidden; the next
//! construction for the same identifier retries once, and a success styles
//! every waiting element. There is no automatic retry, eviction or expiry.
//!
//! ## Threading
//!
//! Everything here is single-threaded (`Rc`, `RefCell`). The check that
//! moves an entry from `Unloaded` to `Loading` never suspends, which is what
//! guarantees at most one fetch per identifier without locks.

pub mod element;
pub mod host;
pub mod resource;
pub mod style;

pub use element::{
    ComponentStyle, ElementPhase, ElementStyle, ShadowChild, ShadowRoot, StyleNode, StyleSlot,
    StyledElement, PLACEHOLDER_STYLE,
};
pub use host::{spawn_load, LoadHandle, StyleHost};
pub use resource::{
    FileFetcher, ResolverConfig, ResourceResolver, ResourceRule, StaticFetcher, StyleFetcher,
};
pub use style::{FetchError, LoadState, StyleEntry, StyleError, StyleLoad, StyleRegistry};
