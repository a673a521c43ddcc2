//! Stylesheet registry: one [`StyleEntry`] per resource identifier.
//!
//! [`StyleRegistry`] is the only way entries are created, which makes the
//! identifier-to-entry mapping a bijection for the registry's lifetime. There
//! is no removal: once an identifier has an entry it keeps it, loaded or not.
//!
//! # Lifecycle
//!
//! The registry is an ordinary value. Create one at startup, hand clones to
//! whatever constructs elements, and let it live as long as the UI does. Tests
//! create a fresh registry each so that cache state never leaks between them.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use shadowstyle::{LoadState, StaticFetcher, StyleRegistry};
//!
//! let fetcher = StaticFetcher::new().add("a.css", "body{color:red}");
//! let registry = StyleRegistry::new(Rc::new(fetcher));
//!
//! let entry = registry.get_or_create("a.css");
//! assert_eq!(entry.state(), LoadState::Unloaded);
//! assert_eq!(registry.len(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::entry::{StyleEntry, StyleLoad};
use crate::resource::StyleFetcher;

struct RegistryInner {
    entries: RefCell<HashMap<String, StyleEntry>>,
    fetcher: Rc<dyn StyleFetcher>,
}

/// Registry of cached stylesheets keyed by resource identifier.
///
/// Clones share the same entries.
///
/// # Thread Safety
///
/// The registry is single-threaded (`!Send`). All entry state changes happen
/// on the thread that owns it, which is what makes the load guard race-free.
#[derive(Clone)]
pub struct StyleRegistry {
    inner: Rc<RegistryInner>,
}

impl StyleRegistry {
    /// Creates an empty registry whose entries load through `fetcher`.
    pub fn new(fetcher: Rc<dyn StyleFetcher>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                entries: RefCell::new(HashMap::new()),
                fetcher,
            }),
        }
    }

    /// Returns the entry for `identifier`, creating an unloaded one if absent.
    pub fn get_or_create(&self, identifier: &str) -> StyleEntry {
        if let Some(entry) = self.inner.entries.borrow().get(identifier) {
            tracing::trace!("Style cache hit for {}", identifier);
            return entry.clone();
        }

        tracing::debug!("Creating style entry for {}", identifier);
        let entry = StyleEntry::new(identifier, Rc::clone(&self.inner.fetcher));
        self.inner
            .entries
            .borrow_mut()
            .insert(identifier.to_string(), entry.clone());
        entry
    }

    /// Looks up an entry without creating one.
    pub fn get(&self, identifier: &str) -> Option<StyleEntry> {
        self.inner.entries.borrow().get(identifier).cloned()
    }

    /// Starts loading `identifier` before any element needs it.
    ///
    /// Returns `None` when the stylesheet is already cached or loading.
    pub fn prefetch(&self, identifier: &str) -> Option<StyleLoad> {
        self.get_or_create(identifier).ensure_loaded()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns true if no entries have been created.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Returns all registered identifiers, in no particular order.
    pub fn identifiers(&self) -> Vec<String> {
        self.inner.entries.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("entries", &self.inner.entries.borrow().values())
            .finish()
    }
}
