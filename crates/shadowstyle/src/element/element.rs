//! Elements that render behind a shared, lazily fetched stylesheet.

use std::rc::Rc;

use super::component::ComponentStyle;
use super::slot::{ShadowRoot, StyleNode, StyleSlot};
use crate::style::{StyleEntry, StyleLoad, StyleRegistry};

/// Where an element is in its styling lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPhase {
    /// Placeholder shown; queued on an entry that has no text yet.
    Waiting,
    /// Final stylesheet text applied.
    Styled,
}

/// A consumer of a cached stylesheet.
///
/// Construction is fully synchronous: the placeholder is written, the entry is
/// bound, and the element is either styled on the spot (cache hit) or queued on
/// the entry. If construction started a fetch, the load is returned next to
/// the element. The load belongs to the entry and every element queued on it,
/// so it lives independently of the element that happened to start it.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use shadowstyle::{
///     ElementPhase, ElementStyle, ShadowRoot, StaticFetcher, StyleRegistry, StyledElement,
///     PLACEHOLDER_STYLE,
/// };
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let registry = StyleRegistry::new(Rc::new(StaticFetcher::new().add("a.css", "p{}")));
/// let card = ElementStyle::new("a.css");
/// let root = ShadowRoot::new();
///
/// let (element, load) = StyledElement::attach(&registry, &card, &root);
/// let node = root.first_style().unwrap();
/// assert_eq!(node.text(), PLACEHOLDER_STYLE);
///
/// load.unwrap().await.unwrap();
/// assert_eq!(element.phase(), ElementPhase::Styled);
/// assert_eq!(node.text(), "p{}");
/// # });
/// ```
pub struct StyledElement {
    entry: StyleEntry,
    slot: Rc<dyn StyleSlot>,
}

impl StyledElement {
    /// Binds `slot` to the stylesheet named by `component`.
    ///
    /// Returns the load this construction started, if any. Only the first
    /// element constructed against a cold (or reset) entry gets one; later
    /// elements join it through the entry's queue. Dropping the load resets
    /// the entry, so drive it to completion.
    pub fn new(
        registry: &StyleRegistry,
        component: &dyn ComponentStyle,
        slot: Rc<dyn StyleSlot>,
    ) -> (Self, Option<StyleLoad>) {
        slot.set_text(component.placeholder());

        let entry = registry.get_or_create(component.resource());
        let load = match entry.text() {
            Some(text) => {
                slot.set_text(&text);
                None
            }
            None => {
                entry.enqueue(&slot);
                entry.ensure_loaded()
            }
        };

        (Self { entry, slot }, load)
    }

    /// Creates a style node, prepends it to `root` and binds it.
    pub fn attach(
        registry: &StyleRegistry,
        component: &dyn ComponentStyle,
        root: &ShadowRoot,
    ) -> (Self, Option<StyleLoad>) {
        let node = Rc::new(StyleNode::new());
        root.prepend_style(Rc::clone(&node));
        Self::new(registry, component, node)
    }

    pub fn phase(&self) -> ElementPhase {
        if self.entry.is_complete() {
            ElementPhase::Styled
        } else {
            ElementPhase::Waiting
        }
    }

    pub fn resource(&self) -> &str {
        self.entry.identifier()
    }

    pub fn entry(&self) -> &StyleEntry {
        &self.entry
    }

    pub fn slot(&self) -> &Rc<dyn StyleSlot> {
        &self.slot
    }
}

impl std::fmt::Debug for StyledElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyledElement")
            .field("resource", &self.resource())
            .field("phase", &self.phase())
            .finish()
    }
}
