//! Language and theme specifications.
//!
//! Callers name a language or theme either by a canonical string or by handing
//! over a raw descriptor object. Both shapes are modeled as tagged variants so
//! every consumer matches them exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use codefence_theme::DEFAULT_THEME;

/// Canonical name of the plain-text sentinel language.
pub const PLAIN_TEXT: &str = "plaintext";

/// Whether `name` designates the plain-text sentinel.
pub fn is_plain_text(name: &str) -> bool {
    matches!(name, "plaintext" | "plain" | "text" | "txt")
}

/// A raw descriptor object (grammar or theme), as decoded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Map<String, Value>);

impl Descriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The `name` field, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Merge `fields` into this descriptor.
    ///
    /// With `overwrite == false`, keys already present keep their value.
    pub fn merge(&mut self, fields: Map<String, Value>, overwrite: bool) {
        for (key, value) in fields {
            if overwrite || !self.0.contains_key(&key) {
                self.0.insert(key, value);
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Key-sorted JSON rendering, identical for structurally equal descriptors.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        write_canonical(&Value::Object(self.0.clone()), &mut out);
        out
    }
}

impl From<Map<String, Value>> for Descriptor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// Keys are sorted here rather than relying on `Map` iteration order, which
// follows insertion order once any crate in the build enables serde_json's
// `preserve_order` feature.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// The language to highlight.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LanguageSpec {
    /// A language the engine knows by name (or alias).
    Named(String),
    /// No tokenization; the code is emitted as plain text.
    #[default]
    PlainText,
    /// A grammar supplied by the caller.
    Raw(Descriptor),
}

impl LanguageSpec {
    /// The identifier passed to the engine when highlighting.
    ///
    /// Raw descriptors without a `name` yield an empty string; engines reject
    /// such descriptors at registration time.
    pub fn effective_name(&self) -> &str {
        match self {
            LanguageSpec::Named(name) => name,
            LanguageSpec::PlainText => PLAIN_TEXT,
            LanguageSpec::Raw(descriptor) => descriptor.name().unwrap_or_default(),
        }
    }

    /// Structural identity used for cache keys.
    pub fn canonical(&self) -> String {
        match self {
            LanguageSpec::Named(name) => format!("named:{name}"),
            LanguageSpec::PlainText => PLAIN_TEXT.to_string(),
            LanguageSpec::Raw(descriptor) => format!("raw:{}", descriptor.canonical()),
        }
    }
}

impl From<&str> for LanguageSpec {
    fn from(name: &str) -> Self {
        if is_plain_text(name) {
            LanguageSpec::PlainText
        } else {
            LanguageSpec::Named(name.to_string())
        }
    }
}

impl From<String> for LanguageSpec {
    fn from(name: String) -> Self {
        if is_plain_text(&name) {
            LanguageSpec::PlainText
        } else {
            LanguageSpec::Named(name)
        }
    }
}

impl From<Descriptor> for LanguageSpec {
    fn from(descriptor: Descriptor) -> Self {
        LanguageSpec::Raw(descriptor)
    }
}

/// The color theme to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSpec {
    Named(String),
    Raw(Descriptor),
}

impl Default for ThemeSpec {
    fn default() -> Self {
        ThemeSpec::Named(DEFAULT_THEME.to_string())
    }
}

impl ThemeSpec {
    /// Canonical theme name.
    pub fn name(&self) -> &str {
        match self {
            ThemeSpec::Named(name) => name,
            ThemeSpec::Raw(descriptor) => descriptor.name().unwrap_or_default(),
        }
    }

    /// Structural identity used for cache keys.
    pub fn canonical(&self) -> String {
        match self {
            ThemeSpec::Named(name) => format!("named:{name}"),
            ThemeSpec::Raw(descriptor) => format!("raw:{}", descriptor.canonical()),
        }
    }
}

impl From<&str> for ThemeSpec {
    fn from(name: &str) -> Self {
        ThemeSpec::Named(name.to_string())
    }
}

impl From<String> for ThemeSpec {
    fn from(name: String) -> Self {
        ThemeSpec::Named(name)
    }
}

impl From<Descriptor> for ThemeSpec {
    fn from(descriptor: Descriptor) -> Self {
        ThemeSpec::Raw(descriptor)
    }
}
