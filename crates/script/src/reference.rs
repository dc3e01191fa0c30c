//! Script references: what code a parameter runs.
//!
//! Every type here is immutable after construction. Fields are private and
//! the builder-style methods consume `self`, so changing a script always
//! produces a new value.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Language identifier handed to the sandbox gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptLanguage(String);

impl ScriptLanguage {
    /// Language used when nothing else is configured.
    pub const DEFAULT: &'static str = "groovy";

    /// Create a language identifier.
    pub fn new(language: impl Into<String>) -> Self {
        Self(language.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScriptLanguage {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Script text plus whether it asks to run inside the sandbox.
///
/// The text is kept byte-for-byte, including surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptSource {
    text: String,
    #[serde(default)]
    sandboxed: bool,
}

impl ScriptSource {
    /// Create a source.
    pub fn new(text: impl Into<String>, sandboxed: bool) -> Self {
        Self {
            text: text.into(),
            sandboxed,
        }
    }

    /// A sandboxed source.
    pub fn sandboxed(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// The empty source, used as "no fallback".
    pub fn empty() -> Self {
        Self::default()
    }

    /// The script text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the script asks to run sandboxed.
    pub fn is_sandboxed(&self) -> bool {
        self.sandboxed
    }

    /// Whether there is nothing to run (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A primary script and the fallback run when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineScript {
    primary: ScriptSource,
    /// Always persisted, even when empty.
    fallback: ScriptSource,
}

impl InlineScript {
    /// Create an inline script.
    pub fn new(primary: ScriptSource, fallback: ScriptSource) -> Self {
        Self { primary, fallback }
    }

    /// The primary script.
    pub fn primary(&self) -> &ScriptSource {
        &self.primary
    }

    /// The fallback script; blank means "no fallback".
    pub fn fallback(&self) -> &ScriptSource {
        &self.fallback
    }

    /// Whether a fallback exists.
    pub fn has_fallback(&self) -> bool {
        !self.fallback.is_blank()
    }
}

/// A pointer to a script managed by a [`ScriptCatalog`](crate::ScriptCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogScript {
    catalog_id: String,
    #[serde(default)]
    parameters: IndexMap<String, String>,
    #[serde(default)]
    must_exist: bool,
}

impl CatalogScript {
    /// Point at a catalog entry, with no arguments and `must_exist = false`.
    pub fn new(catalog_id: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            parameters: IndexMap::new(),
            must_exist: false,
        }
    }

    /// Add an argument. Arguments keep insertion order.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Require the entry to exist.
    #[must_use]
    pub fn must_exist(mut self, must_exist: bool) -> Self {
        self.must_exist = must_exist;
        self
    }

    /// The catalog id.
    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    /// The arguments passed to the catalog script.
    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    /// Whether a missing entry is a hard failure.
    pub fn is_required(&self) -> bool {
        self.must_exist
    }
}

/// What code to run for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptRef {
    /// Script text stored with the parameter.
    Inline(InlineScript),
    /// Script looked up by id.
    Catalog(CatalogScript),
}

impl ScriptRef {
    /// Shorthand for an inline reference.
    pub fn inline(primary: ScriptSource, fallback: ScriptSource) -> Self {
        Self::Inline(InlineScript::new(primary, fallback))
    }

    /// Shorthand for a catalog reference.
    pub fn catalog(script: CatalogScript) -> Self {
        Self::Catalog(script)
    }

    /// Short label for logs: `inline` or `catalog:<id>`.
    pub fn describe(&self) -> String {
        match self {
            Self::Inline(_) => "inline".to_owned(),
            Self::Catalog(catalog) => format!("catalog:{}", catalog.catalog_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_fallback_means_none() {
        let inline = InlineScript::new(ScriptSource::new("return 1", false), ScriptSource::new("  \n", false));
        assert!(!inline.has_fallback());
        assert_eq!(inline.fallback().text(), "  \n");
    }

    #[test]
    fn inline_serializes_empty_fallback() {
        let script = ScriptRef::inline(ScriptSource::new("return 1..10", false), ScriptSource::empty());
        let value = serde_json::to_value(&script).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "inline",
                "primary": {"text": "return 1..10", "sandboxed": false},
                "fallback": {"text": "", "sandboxed": false}
            })
        );
    }

    #[test]
    fn catalog_keeps_parameter_order() {
        let script = CatalogScript::new("dummy.groovy")
            .with_parameter("zeta", "1")
            .with_parameter("alpha", "2")
            .must_exist(true);
        let keys: Vec<_> = script.parameters().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert!(script.is_required());
    }

    #[test]
    fn catalog_defaults_on_load() {
        let script: ScriptRef =
            serde_json::from_value(json!({"type": "catalog", "catalog_id": "x"})).unwrap();
        match script {
            ScriptRef::Catalog(catalog) => {
                assert!(catalog.parameters().is_empty());
                assert!(!catalog.is_required());
            }
            ScriptRef::Inline(_) => panic!("expected catalog"),
        }
    }

    #[test]
    fn inline_without_fallback_key_is_rejected() {
        let result: Result<ScriptRef, _> = serde_json::from_value(json!({
            "type": "inline",
            "primary": {"text": "return 1..10"}
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("fallback"), "{err}");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<ScriptRef, _> = serde_json::from_value(json!({"type": "remote"}));
        assert!(result.is_err());
    }

    #[test]
    fn describe() {
        assert_eq!(ScriptRef::catalog(CatalogScript::new("a.groovy")).describe(), "catalog:a.groovy");
    }

    #[test]
    fn default_language() {
        assert_eq!(ScriptLanguage::default().as_str(), "groovy");
    }
}
