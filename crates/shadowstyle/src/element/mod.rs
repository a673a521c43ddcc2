//! Consumer side of the cache: elements and the slots they style.
//!
//! This module provides:
//!
//! - [`StyledElement`]: Binds a slot to a cached stylesheet, hidden until styled
//! - [`ComponentStyle`] / [`ElementStyle`]: Per-variant style configuration
//! - [`StyleSlot`], [`StyleNode`], [`ShadowRoot`]: Where style text takes effect

mod component;
#[allow(clippy::module_inception)]
mod element;
mod slot;

pub use component::{ComponentStyle, ElementStyle, PLACEHOLDER_STYLE};
pub use element::{ElementPhase, StyledElement};
pub use slot::{ShadowChild, ShadowRoot, StyleNode, StyleSlot};
