//! Per-variant style configuration.

use std::borrow::Cow;

use crate::resource::ResourceResolver;
use crate::style::StyleError;

/// Style shown while the real stylesheet loads.
///
/// Takes the host out of layout flow and hides it so unstyled content never
/// flashes on screen.
pub const PLACEHOLDER_STYLE: &str = "\
:host {
  position: absolute !important;
  visibility: hidden !important;
}
";

/// Capability of any element variant that wants a cached external stylesheet.
pub trait ComponentStyle {
    /// Identifier of the stylesheet, used as the cache key.
    fn resource(&self) -> &str;

    /// Style written before the stylesheet is available.
    fn placeholder(&self) -> &str {
        PLACEHOLDER_STYLE
    }
}

/// Explicit style configuration for one element variant.
///
/// # Example
///
/// ```rust
/// use shadowstyle::{ComponentStyle, ElementStyle, PLACEHOLDER_STYLE};
///
/// let card = ElementStyle::new("https://cdn.example.com/styles/card.css");
/// assert_eq!(card.placeholder(), PLACEHOLDER_STYLE);
///
/// let badge = ElementStyle::new("badge.css").with_placeholder(":host{display:none}");
/// assert_eq!(badge.placeholder(), ":host{display:none}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStyle {
    resource: String,
    placeholder: Cow<'static, str>,
}

impl ElementStyle {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            placeholder: Cow::Borrowed(PLACEHOLDER_STYLE),
        }
    }

    /// Builds the configuration from a logical `(kind, name)` pair.
    ///
    /// # Errors
    ///
    /// Fails before any fetch if the resolver does not know `kind`.
    pub fn resolved(
        resolver: &ResourceResolver,
        kind: &str,
        name: &str,
    ) -> Result<Self, StyleError> {
        Ok(Self::new(resolver.resolve(kind, name)?))
    }

    /// Replaces the placeholder style, returning the configuration for chaining.
    pub fn with_placeholder(mut self, placeholder: impl Into<Cow<'static, str>>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

impl ComponentStyle for ElementStyle {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}
