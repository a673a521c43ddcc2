//! Presentation slots: where style text takes effect.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// An isolated container that displays style text.
///
/// The host environment provides the slot; the cache only ever replaces its
/// whole text, never appends partial content.
pub trait StyleSlot {
    /// Replaces the displayed style text.
    fn set_text(&self, text: &str);
}

/// In-memory style node, the default [`StyleSlot`].
#[derive(Debug, Default)]
pub struct StyleNode {
    text: RefCell<String>,
    writes: Cell<usize>,
}

impl StyleNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently displayed text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of times the text has been set.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StyleSlot for StyleNode {
    fn set_text(&self, text: &str) {
        let mut current = self.text.borrow_mut();
        current.clear();
        current.push_str(text);
        self.writes.set(self.writes.get() + 1);
    }
}

/// A child of a [`ShadowRoot`].
#[derive(Debug, Clone)]
pub enum ShadowChild {
    Style(Rc<StyleNode>),
    Content(String),
}

/// The isolated root an element renders into.
///
/// Style nodes are prepended so they apply before any content is laid out.
#[derive(Debug, Default)]
pub struct ShadowRoot {
    children: RefCell<Vec<ShadowChild>>,
}

impl ShadowRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a style node ahead of every existing child.
    pub fn prepend_style(&self, node: Rc<StyleNode>) {
        self.children.borrow_mut().insert(0, ShadowChild::Style(node));
    }

    pub fn append_content(&self, markup: impl Into<String>) {
        self.children
            .borrow_mut()
            .push(ShadowChild::Content(markup.into()));
    }

    /// Returns the first style node, which is the one that wins the cascade
    /// race against content.
    pub fn first_style(&self) -> Option<Rc<StyleNode>> {
        self.children.borrow().iter().find_map(|child| match child {
            ShadowChild::Style(node) => Some(Rc::clone(node)),
            ShadowChild::Content(_) => None,
        })
    }

    pub fn children(&self) -> Vec<ShadowChild> {
        self.children.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }
}
