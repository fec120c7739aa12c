//! Placeholder colors of the `css-variables` theme.
//!
//! The `css-variables` theme colors every token with a reserved hex value.
//! After highlighting, each placeholder is swapped for a CSS custom property so
//! the page stylesheet decides the actual palette:
//!
//! ```css
//! :root {
//!   --codefence-color-text: #24292e;
//!   --codefence-color-background: #ffffff;
//!   --codefence-token-keyword: #d73a49;
//! }
//! ```

/// Canonical name of the theme whose colors are CSS variables.
pub const CSS_VARIABLES_THEME: &str = "css-variables";

/// Placeholder color → replacement `var(...)` reference.
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    ("#000001", "var(--codefence-color-text)"),
    ("#000002", "var(--codefence-color-background)"),
    ("#000004", "var(--codefence-token-constant)"),
    ("#000005", "var(--codefence-token-string)"),
    ("#000006", "var(--codefence-token-comment)"),
    ("#000007", "var(--codefence-token-keyword)"),
    ("#000008", "var(--codefence-token-parameter)"),
    ("#000009", "var(--codefence-token-function)"),
    ("#000010", "var(--codefence-token-string-expression)"),
    ("#000011", "var(--codefence-token-punctuation)"),
    ("#000012", "var(--codefence-token-link)"),
];

/// Look up the CSS variable reference for a placeholder color.
pub fn variable_for(placeholder: &str) -> Option<&'static str> {
    PLACEHOLDERS
        .iter()
        .find(|(color, _)| color.eq_ignore_ascii_case(placeholder))
        .map(|(_, variable)| *variable)
}
