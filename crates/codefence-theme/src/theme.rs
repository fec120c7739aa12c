//! Theme descriptors.
//!
//! Themes use the VS Code / TextMate shape: a `name`, default foreground and
//! background colors, and a list of `tokenColors` rules that map scope
//! selectors to settings. A scope such as `keyword.control.rust` is colored by
//! the rule with the longest selector that prefixes it (`keyword.control`
//! beats `keyword`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the theme used when the caller does not pick one.
pub const DEFAULT_THEME: &str = "github-dark";

/// Error when parsing a theme descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// The descriptor is not valid JSON or does not have the theme shape.
    #[error("invalid theme descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A color theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Canonical theme name, e.g. `github-dark`.
    pub name: String,

    /// `dark` or `light`, when the descriptor says.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Default foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,

    /// Default background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,

    /// Workbench colors; only `editor.foreground` / `editor.background` are read.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, String>,

    /// Scope rules.
    #[serde(default)]
    pub token_colors: Vec<TokenColor>,
}

/// One `tokenColors` rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenColor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub scope: ScopeSelector,
    #[serde(default)]
    pub settings: TokenSettings,
}

/// A rule's scope selector: a single (possibly comma separated) string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeSelector {
    One(String),
    Many(Vec<String>),
}

impl Default for ScopeSelector {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl ScopeSelector {
    /// Iterate over the individual selectors.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        let parts: Vec<&str> = match self {
            ScopeSelector::One(s) => s.split(',').collect(),
            ScopeSelector::Many(list) => list.iter().flat_map(|s| s.split(',')).collect(),
        };
        parts.into_iter().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Style settings of a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

impl Theme {
    /// Parse a theme from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a theme from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ThemeError> {
        Ok(serde_json::from_value(value)?)
    }

    fn is_dark(&self) -> bool {
        self.kind.as_deref() != Some("light")
    }

    /// Default foreground color.
    pub fn foreground(&self) -> &str {
        self.fg
            .as_deref()
            .or_else(|| self.colors.get("editor.foreground").map(String::as_str))
            .unwrap_or(if self.is_dark() { "#bbbbbb" } else { "#333333" })
    }

    /// Default background color.
    pub fn background(&self) -> &str {
        self.bg
            .as_deref()
            .or_else(|| self.colors.get("editor.background").map(String::as_str))
            .unwrap_or(if self.is_dark() { "#1e1e1e" } else { "#ffffff" })
    }

    /// Find the settings of the most specific rule matching `scope`.
    ///
    /// Among selectors of equal length, the later rule wins.
    pub fn style_for(&self, scope: &str) -> Option<&TokenSettings> {
        let mut best: Option<(usize, &TokenSettings)> = None;
        for rule in &self.token_colors {
            for selector in rule.scope.selectors() {
                if !scope_matches(selector, scope) {
                    continue;
                }
                if best.is_none_or(|(len, _)| selector.len() >= len) {
                    best = Some((selector.len(), &rule.settings));
                }
            }
        }
        best.map(|(_, settings)| settings)
    }

    /// Foreground color for `scope`, falling back to the theme foreground.
    pub fn foreground_for(&self, scope: &str) -> &str {
        self.style_for(scope)
            .and_then(|settings| settings.foreground.as_deref())
            .unwrap_or_else(|| self.foreground())
    }
}

fn scope_matches(selector: &str, scope: &str) -> bool {
    scope == selector
        || (scope.len() > selector.len()
            && scope.starts_with(selector)
            && scope.as_bytes()[selector.len()] == b'.')
}

/// Built-in themes, parsed once on first use.
pub mod builtin {
    use std::sync::OnceLock;

    use super::Theme;

    /// Names of all built-in themes.
    pub const NAMES: &[&str] = &["github-dark", "github-light", "css-variables"];

    macro_rules! builtin_theme {
        ($fn_name:ident, $file:literal) => {
            pub fn $fn_name() -> &'static Theme {
                static THEME: OnceLock<Theme> = OnceLock::new();
                THEME.get_or_init(|| {
                    Theme::from_json(include_str!(concat!("../themes/", $file)))
                        .expect("built-in theme is a valid descriptor")
                })
            }
        };
    }

    builtin_theme!(github_dark, "github-dark.json");
    builtin_theme!(github_light, "github-light.json");
    builtin_theme!(css_variables, "css-variables.json");

    /// Look up a built-in theme by name.
    pub fn get(name: &str) -> Option<&'static Theme> {
        match name {
            "github-dark" => Some(github_dark()),
            "github-light" => Some(github_light()),
            "css-variables" => Some(css_variables()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_parse_and_match_names() {
        for name in builtin::NAMES {
            let theme = builtin::get(name).unwrap();
            assert_eq!(&theme.name, name);
        }
        assert!(builtin::get("solarized").is_none());
    }

    #[test]
    fn test_longest_selector_wins() {
        let theme = Theme::from_json(
            r##"{
                "name": "t",
                "fg": "#111111",
                "tokenColors": [
                    { "scope": "keyword", "settings": { "foreground": "#000001" } },
                    { "scope": ["keyword.control", "storage"], "settings": { "foreground": "#000002" } }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(theme.foreground_for("keyword.other"), "#000001");
        assert_eq!(theme.foreground_for("keyword.control.rust"), "#000002");
        assert_eq!(theme.foreground_for("storage.type"), "#000002");
        // `keywords` is not a child scope of `keyword`
        assert_eq!(theme.foreground_for("keywords"), "#111111");
    }

    #[test]
    fn test_comma_separated_selectors() {
        let theme = Theme::from_json(
            r##"{
                "name": "t",
                "tokenColors": [
                    { "scope": "comment, string.quoted", "settings": { "foreground": "#abcdef" } }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(theme.foreground_for("comment.line"), "#abcdef");
        assert_eq!(theme.foreground_for("string.quoted.double"), "#abcdef");
        assert!(theme.style_for("string.unquoted").is_none());
    }

    #[test]
    fn test_editor_colors_fallback() {
        let theme = Theme::from_json(
            r##"{
                "name": "t",
                "type": "light",
                "colors": { "editor.foreground": "#010101" }
            }"##,
        )
        .unwrap();

        assert_eq!(theme.foreground(), "#010101");
        assert_eq!(theme.background(), "#ffffff");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = Theme::from_json(r#"{ "tokenColors": [] }"#).unwrap_err();
        assert!(matches!(err, ThemeError::Parse(_)));
    }
}
