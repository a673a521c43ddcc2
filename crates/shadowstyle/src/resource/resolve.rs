//! Resolution of logical resource names to fetchable identifiers.
//!
//! A [`ResourceResolver`] turns a `(kind, name)` pair such as
//! `("style", "card")` into a concrete URL such as
//! `https://cdn.example.com/assets/styles/card.css`. The cache itself never
//! looks inside identifiers; resolution only happens when an element variant
//! builds its [`ElementStyle`](crate::ElementStyle).
//!
//! # Configuration
//!
//! Rules are read from YAML:
//!
//! ```yaml
//! base_url: https://cdn.example.com/assets/
//! resources:
//!   style:
//!     directory: styles
//!     extension: css
//!   theme:
//!     directory: themes
//!     extension: css
//! ```
//!
//! Unknown kinds fail synchronously with
//! [`StyleError::UnknownResourceType`]; no fetch is ever attempted for them.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::style::StyleError;

/// Where resources of one kind live, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRule {
    /// Directory under the base URL, without leading or trailing slashes.
    pub directory: String,
    /// File extension without the dot. Empty means none.
    #[serde(default)]
    pub extension: String,
}

impl ResourceRule {
    pub fn new(directory: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }
}

/// Resolver configuration, as read from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    pub resources: BTreeMap<String, ResourceRule>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert("style".to_string(), ResourceRule::new("styles", "css"));
        Self {
            base_url: "file:///".to_string(),
            resources,
        }
    }
}

impl ResolverConfig {
    /// Parses a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, StyleError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Maps `(kind, name)` pairs to fetchable identifiers.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    base: Url,
    rules: BTreeMap<String, ResourceRule>,
}

impl ResourceResolver {
    /// Builds a resolver, validating the base URL.
    pub fn new(config: ResolverConfig) -> Result<Self, StyleError> {
        let mut base = Url::parse(&config.base_url).map_err(|source| StyleError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        // Url::join replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            rules: config.resources,
        })
    }

    pub fn from_yaml(source: &str) -> Result<Self, StyleError> {
        Self::new(ResolverConfig::from_yaml(source)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resource kinds this resolver knows about.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }

    /// Resolves `name` of resource type `kind` to an identifier.
    ///
    /// # Errors
    ///
    /// - [`StyleError::UnknownResourceType`] if `kind` has no rule
    /// - [`StyleError::InvalidResourceName`] if `name` is empty, absolute,
    ///   contains `..` segments or URL syntax (`\`, `%`, `:`, `?`, `#`), or
    ///   otherwise resolves outside the rule's directory
    pub fn resolve(&self, kind: &str, name: &str) -> Result<String, StyleError> {
        let rule = self
            .rules
            .get(kind)
            .ok_or_else(|| StyleError::UnknownResourceType {
                kind: kind.to_string(),
            })?;

        let invalid = || StyleError::InvalidResourceName {
            name: name.to_string(),
        };
        if name.is_empty()
            || name.starts_with('/')
            || name.contains(['\\', '%', ':', '?', '#'])
            || name.split('/').any(|s| s == "..")
        {
            return Err(invalid());
        }

        let mut relative = String::new();
        let directory = rule.directory.trim_matches('/');
        if !directory.is_empty() {
            relative.push_str(directory);
            relative.push('/');
        }
        relative.push_str(name);
        if !rule.extension.is_empty() {
            relative.push('.');
            relative.push_str(&rule.extension);
        }

        let url = self
            .base
            .join(&relative)
            .map_err(|source| StyleError::InvalidUrl {
                url: relative.clone(),
                source,
            })?;
        if !url.as_str().starts_with(self.scope(directory)?.as_str()) {
            return Err(invalid());
        }
        tracing::trace!("Resolved {}:{} to {}", kind, name, url);
        Ok(url.into())
    }

    /// The URL every resource under `directory` must stay inside.
    fn scope(&self, directory: &str) -> Result<Url, StyleError> {
        if directory.is_empty() {
            return Ok(self.base.clone());
        }
        let relative = format!("{}/", directory);
        self.base
            .join(&relative)
            .map_err(|source| StyleError::InvalidUrl {
                url: relative,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdn() -> ResourceResolver {
        ResourceResolver::from_yaml(
            r#"
base_url: https://cdn.example.com/assets
resources:
  style:
    directory: styles
    extension: css
  raw:
    directory: ""
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_config_maps_styles() {
        let resolver = ResourceResolver::new(ResolverConfig::default()).unwrap();
        assert_eq!(
            resolver.resolve("style", "card").unwrap(),
            "file:///styles/card.css"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let resolver = cdn();
        assert_eq!(resolver.base_url().as_str(), "https://cdn.example.com/assets/");
        assert_eq!(
            resolver.resolve("style", "forms/input").unwrap(),
            "https://cdn.example.com/assets/styles/forms/input.css"
        );
    }

    #[test]
    fn test_rule_without_directory_or_extension() {
        let resolver = cdn();
        assert_eq!(
            resolver.resolve("raw", "reset.css").unwrap(),
            "https://cdn.example.com/assets/reset.css"
        );
    }

    #[test]
    fn test_unknown_kind_fails() {
        let result = cdn().resolve("font", "mono");
        match result {
            Err(StyleError::UnknownResourceType { kind }) => assert_eq!(kind, "font"),
            other => panic!("expected unknown resource type, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_escaping_names() {
        let resolver = cdn();
        for name in [
            "",
            "/etc/passwd",
            "../secret",
            "a/../../b",
            "%2e%2e/%2e%2e/secret",
            "..\\..\\secret",
            "a?b#c",
        ] {
            assert!(
                matches!(
                    resolver.resolve("style", name),
                    Err(StyleError::InvalidResourceName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_absolute_url_without_directory() {
        let resolver = cdn();
        for name in ["https://evil.test/x", "//evil.test/x", "file:///etc/passwd"] {
            assert!(
                matches!(
                    resolver.resolve("raw", name),
                    Err(StyleError::InvalidResourceName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
        assert_eq!(
            resolver.resolve("raw", "themes/dark.css").unwrap(),
            "https://cdn.example.com/assets/themes/dark.css"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ResolverConfig {
            base_url: "not a url".to_string(),
            ..ResolverConfig::default()
        };
        assert!(matches!(
            ResourceResolver::new(config),
            Err(StyleError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ResolverConfig::from_yaml("resources: [1, 2"),
            Err(StyleError::Config(_))
        ));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ResolverConfig::from_yaml("base_url: https://x.test/").unwrap();
        assert_eq!(config.base_url, "https://x.test/");
        assert!(config.resources.contains_key("style"));
    }

    #[test]
    fn test_kinds_listed() {
        let binding = cdn();
        let kinds: Vec<&str> = binding.kinds().collect();
        assert_eq!(kinds, vec!["raw", "style"]);
    }
}
