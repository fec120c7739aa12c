//! Rewrites applied to the highlighter's output tree.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use codefence_highlight::{Element, Hooks, Node, Root};
use codefence_theme::{CSS_VARIABLES_THEME, PLACEHOLDERS, variable_for};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// How long lines are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Lines keep their length; the block scrolls horizontally.
    #[default]
    NoWrap,
    /// Long lines wrap.
    Wrap,
    /// No layout styles are added.
    Unstyled,
}

impl WrapMode {
    /// Declarations appended to the block container's `style`.
    pub fn declarations(self) -> Option<&'static str> {
        match self {
            WrapMode::NoWrap => Some("overflow-x: auto;"),
            WrapMode::Wrap => Some("overflow-x: auto; white-space: pre-wrap; word-wrap: break-word;"),
            WrapMode::Unstyled => None,
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WrapMode::NoWrap => "nowrap",
            WrapMode::Wrap => "wrap",
            WrapMode::Unstyled => "unstyled",
        })
    }
}

/// Error for an unrecognized wrap mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wrap mode `{0}` (expected nowrap, wrap or unstyled)")]
pub struct ParseWrapModeError(String);

impl FromStr for WrapMode {
    type Err = ParseWrapModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nowrap" => Ok(WrapMode::NoWrap),
            "wrap" => Ok(WrapMode::Wrap),
            "unstyled" => Ok(WrapMode::Unstyled),
            other => Err(ParseWrapModeError(other.to_string())),
        }
    }
}

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = PLACEHOLDERS
        .iter()
        .map(|(placeholder, _)| regex::escape(placeholder))
        .collect();
    Regex::new(&format!("(?i)(?:{})\\b", alternatives.join("|")))
        .expect("placeholder pattern is valid")
});

/// Replace `css-variables` placeholder colors in a style declaration with
/// custom property references.
///
/// `color:#000005` becomes `color:var(--codefence-token-string)`. Everything
/// else passes through unchanged.
pub fn replace_css_variables(style: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(style, |caps: &Captures<'_>| {
            let placeholder = &caps[0];
            variable_for(placeholder)
                .map(str::to_string)
                .unwrap_or_else(|| placeholder.to_string())
        })
        .into_owned()
}

/// Append declarations to a style string.
fn append_style(style: &str, declarations: &str) -> String {
    let style = style.trim_end();
    if style.is_empty() {
        declarations.to_string()
    } else if style.ends_with(';') {
        format!("{style} {declarations}")
    } else {
        format!("{style}; {declarations}")
    }
}

/// The hooks that turn engine output into a codefence fragment.
#[derive(Debug, Clone)]
pub struct Transformer<'a> {
    /// Effective language name, exposed as `data-language`.
    pub language: &'a str,
    /// Canonical name of the active theme.
    pub theme: &'a str,
    pub wrap: WrapMode,
    pub inline: bool,
    /// Class token the engine emits.
    pub engine_class: &'a str,
    /// Class token it is replaced with.
    pub class_name: &'a str,
}

impl Hooks for Transformer<'_> {
    fn code(&mut self, code: &mut Element) -> Option<Node> {
        if !self.inline || code.children.is_empty() {
            return None;
        }
        Some(code.children.remove(0))
    }

    fn pre(&mut self, pre: &mut Element) -> Option<Node> {
        if self.inline {
            pre.tag = "code".to_string();
        }

        if let Some(class) = pre.properties.get_mut("class") {
            if !self.engine_class.is_empty() {
                *class = class.replace(self.engine_class, self.class_name);
            }
        }

        if let Some(declarations) = self.wrap.declarations() {
            let style = append_style(pre.property("style").unwrap_or_default(), declarations);
            pre.set_property("style", style);
        }

        pre.set_property("data-language", self.language);
        None
    }

    fn root(&mut self, root: &mut Root) -> Option<Root> {
        if self.theme != CSS_VARIABLES_THEME {
            return None;
        }
        root.visit_elements_mut(|element| {
            if let Some(style) = element.properties.get_mut("style") {
                *style = replace_css_variables(style);
            }
        });
        None
    }
}
