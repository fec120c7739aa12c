//! Theme support for codefence syntax highlighting.
//!
//! This crate provides:
//! - Theme descriptors in the VS Code shape (`name`, `fg`, `bg`, `tokenColors`)
//! - Scope selector matching for token coloring
//! - Built-in themes (github-dark, github-light, css-variables)
//! - The placeholder table used by the `css-variables` theme

pub mod css_variables;
pub mod theme;

pub use css_variables::{CSS_VARIABLES_THEME, PLACEHOLDERS, variable_for};
pub use theme::{DEFAULT_THEME, ScopeSelector, Theme, ThemeError, TokenColor, TokenSettings, builtin};
