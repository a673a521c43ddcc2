//! Driving loads on a single-threaded tokio executor.
//!
//! Entries and elements are `!Send`, so their loads run as local tasks. A
//! [`StyleHost`] must be used from inside a [`tokio::task::LocalSet`].
//!
//! # Example
//!
//! ```rust
//! use shadowstyle::{ElementStyle, ShadowRoot, StaticFetcher, StyleHost};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(tokio::task::LocalSet::new().run_until(async {
//! let host = StyleHost::with_fetcher(StaticFetcher::new().add("card.css", ":host{}"));
//! let root = ShadowRoot::new();
//!
//! let (_card, load) = host.attach(&ElementStyle::new("card.css"), &root);
//! load.unwrap().await.unwrap().unwrap();
//! assert_eq!(root.first_style().unwrap().text(), ":host{}");
//! # }));
//! ```

use std::rc::Rc;

use tokio::task::JoinHandle;

use crate::element::{ComponentStyle, ShadowRoot, StyledElement};
use crate::resource::StyleFetcher;
use crate::style::{StyleError, StyleLoad, StyleRegistry};

/// Join handle of a spawned stylesheet load.
pub type LoadHandle = JoinHandle<Result<(), StyleError>>;

/// Attaches elements and runs the loads they start.
#[derive(Debug, Clone)]
pub struct StyleHost {
    registry: StyleRegistry,
}

impl StyleHost {
    pub fn new(registry: StyleRegistry) -> Self {
        Self { registry }
    }

    /// Creates a host with a fresh registry backed by `fetcher`.
    pub fn with_fetcher(fetcher: impl StyleFetcher + 'static) -> Self {
        Self::new(StyleRegistry::new(Rc::new(fetcher)))
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Attaches a styled element to `root` and spawns its load, if it started
    /// one.
    ///
    /// # Panics
    ///
    /// Panics when a load is spawned outside a `LocalSet`.
    pub fn attach(
        &self,
        component: &dyn ComponentStyle,
        root: &ShadowRoot,
    ) -> (StyledElement, Option<LoadHandle>) {
        let (element, load) = StyledElement::attach(&self.registry, component, root);
        (element, load.map(spawn_load))
    }

    /// Warms the cache for `identifier` on a local task.
    pub fn prefetch(&self, identifier: &str) -> Option<LoadHandle> {
        self.registry.prefetch(identifier).map(spawn_load)
    }
}

/// Spawns `load` on the current `LocalSet`.
///
/// A failed load is logged at error level and returned through the handle;
/// nothing retries it.
///
/// # Panics
///
/// Panics when called outside a `LocalSet`.
pub fn spawn_load(load: StyleLoad) -> LoadHandle {
    tokio::task::spawn_local(async move {
        let identifier = load.identifier().to_string();
        let result = load.await;
        if let Err(err) = &result {
            tracing::error!("Unhandled stylesheet load failure for {}: {}", identifier, err);
        }
        result
    })
}
