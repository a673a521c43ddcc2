//! A single cached stylesheet and the consumers waiting for it.
//!
//! # Load states
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Unloaded` | No fetch in flight, no text. Initial state and the state after a failure. |
//! | `Loading` | Exactly one fetch is in flight. Further `ensure_loaded` calls are no-ops. |
//! | `Complete` | Text is cached. Terminal. |
//!
//! The `Unloaded -> Loading` transition happens synchronously inside
//! [`StyleEntry::ensure_loaded`]; only the returned [`StyleLoad`] suspends. Two
//! callers on the same thread therefore can never both start a fetch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use once_cell::unsync::OnceCell;

use super::error::StyleError;
use crate::element::StyleSlot;
use crate::resource::StyleFetcher;

/// Load state of a [`StyleEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Complete,
}

struct EntryInner {
    identifier: String,
    state: Cell<LoadState>,
    text: OnceCell<Rc<str>>,
    pending: RefCell<Vec<Weak<dyn StyleSlot>>>,
    attempts: Cell<u32>,
    fetcher: Rc<dyn StyleFetcher>,
}

/// Shared handle to one stylesheet resource.
///
/// Cloning the handle is cheap; all clones observe the same state. Entries are
/// created only by [`StyleRegistry::get_or_create`](crate::StyleRegistry::get_or_create).
#[derive(Clone)]
pub struct StyleEntry {
    inner: Rc<EntryInner>,
}

impl StyleEntry {
    pub(crate) fn new(identifier: impl Into<String>, fetcher: Rc<dyn StyleFetcher>) -> Self {
        Self {
            inner: Rc::new(EntryInner {
                identifier: identifier.into(),
                state: Cell::new(LoadState::Unloaded),
                text: OnceCell::new(),
                pending: RefCell::new(Vec::new()),
                attempts: Cell::new(0),
                fetcher,
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    pub fn state(&self) -> LoadState {
        self.inner.state.get()
    }

    pub fn is_complete(&self) -> bool {
        self.state() == LoadState::Complete
    }

    /// Returns the cached text once the entry is complete.
    pub fn text(&self) -> Option<Rc<str>> {
        self.inner.text.get().cloned()
    }

    /// Number of consumers waiting for the text.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Number of fetches this entry has started.
    pub fn attempts(&self) -> u32 {
        self.inner.attempts.get()
    }

    /// Queues `slot` to receive the text when the entry completes.
    ///
    /// Only a weak handle is kept; a slot dropped before the flush is skipped.
    /// Enqueueing onto a complete entry is allowed but the slot will never be
    /// flushed, so read [`text`](Self::text) directly instead.
    pub fn enqueue(&self, slot: &Rc<dyn StyleSlot>) {
        self.inner.pending.borrow_mut().push(Rc::downgrade(slot));
    }

    /// Starts loading the stylesheet unless a load is already in flight or
    /// the text is cached.
    ///
    /// Returns the load to drive when this call started one. The returned
    /// future resolves after every pending consumer has received the text, or
    /// with [`StyleError::Fetch`] after the entry has been reset to
    /// [`LoadState::Unloaded`]. Queued consumers are left in place on failure
    /// and are flushed by whichever later load succeeds.
    pub fn ensure_loaded(&self) -> Option<StyleLoad> {
        match self.state() {
            LoadState::Loading => {
                tracing::trace!("Joining in-flight load of {}", self.identifier());
                None
            }
            LoadState::Complete => None,
            LoadState::Unloaded => {
                self.inner.state.set(LoadState::Loading);
                self.inner.attempts.set(self.inner.attempts.get() + 1);
                tracing::debug!(
                    "Loading stylesheet {} (attempt {})",
                    self.identifier(),
                    self.attempts()
                );
                let guard = LoadGuard {
                    inner: Rc::clone(&self.inner),
                    armed: true,
                };
                Some(StyleLoad::new(self.identifier(), guard.run()))
            }
        }
    }

    fn complete(inner: &EntryInner, text: String) {
        let text = Rc::clone(inner.text.get_or_init(|| Rc::from(text)));
        inner.state.set(LoadState::Complete);

        let pending = std::mem::take(&mut *inner.pending.borrow_mut());
        let mut flushed = 0;
        for slot in pending.iter().filter_map(|weak| weak.upgrade()) {
            slot.set_text(&text);
            flushed += 1;
        }

        tracing::info!(
            "Loaded stylesheet {} ({} bytes, {} waiting consumers styled)",
            inner.identifier,
            text.len(),
            flushed
        );
    }
}

impl fmt::Debug for StyleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleEntry")
            .field("identifier", &self.inner.identifier)
            .field("state", &self.state())
            .field("pending", &self.pending_len())
            .field("attempts", &self.attempts())
            .finish()
    }
}

/// Owns the `Loading` state for the duration of one fetch.
///
/// Dropping an armed guard resets the entry to `Unloaded`, which covers both
/// fetch failure and a load future abandoned before it finished.
struct LoadGuard {
    inner: Rc<EntryInner>,
    armed: bool,
}

impl LoadGuard {
    async fn run(mut self) -> Result<(), StyleError> {
        let fetcher = Rc::clone(&self.inner.fetcher);
        let result = fetcher.fetch(&self.inner.identifier).await;
        match result {
            Ok(text) => {
                self.armed = false;
                StyleEntry::complete(&self.inner, text);
                Ok(())
            }
            Err(source) => Err(StyleError::Fetch {
                identifier: self.inner.identifier.clone(),
                source,
            }),
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.inner.state.set(LoadState::Unloaded);
        tracing::warn!(
            "Load of {} did not complete; reset to unloaded with {} consumers still waiting",
            self.inner.identifier,
            self.inner.pending.borrow().len()
        );
    }
}

/// An in-flight stylesheet load.
///
/// Does nothing unless polled. Dropping it before completion resets the entry
/// to [`LoadState::Unloaded`].
#[must_use = "a style load does nothing unless awaited or spawned"]
pub struct StyleLoad {
    identifier: String,
    future: Pin<Box<dyn Future<Output = Result<(), StyleError>>>>,
}

impl StyleLoad {
    fn new(
        identifier: &str,
        future: impl Future<Output = Result<(), StyleError>> + 'static,
    ) -> Self {
        Self {
            identifier: identifier.to_string(),
            future: Box::pin(future),
        }
    }

    /// Identifier of the stylesheet being loaded.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Future for StyleLoad {
    type Output = Result<(), StyleError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for StyleLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleLoad")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
