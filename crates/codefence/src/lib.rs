//! Render source code into syntax-highlighted HTML fragments.
//!
//! A render call goes through four stages:
//!
//! 1. **Normalization**: raw grammar descriptors are rewritten into the shape
//!    engines accept ([`Normalizer`]). A `path` field loads the grammar from a
//!    file below the configured grammar directory.
//! 2. **Highlighter lookup**: highlighters are expensive to build, so they are
//!    cached per set of languages and themes ([`HighlighterCache`]).
//! 3. **Highlighting**: the engine turns code into a markup tree, calling the
//!    [`Transformer`] hooks as it goes. These apply inline rendering, class
//!    renaming, wrap styles and, for the `css-variables` theme, swap
//!    placeholder colors for CSS custom properties.
//! 4. **Serialization** of the tree to HTML.
//!
//! # Example
//!
//! ```rust,ignore
//! use codefence::{CodeInput, WrapMode};
//!
//! let html = codefence::render(
//!     &CodeInput::new("fn main() {}")
//!         .language("rust")
//!         .theme("github-light")
//!         .wrap(WrapMode::Wrap),
//! )
//! .await?;
//! ```
//!
//! [`render`] uses a process-wide [`Renderer`] with the default
//! [`Config`]. Create a [`Renderer`] directly to change the grammar directory,
//! the class name or the engine.

pub mod cache;
pub mod config;
pub mod error;
pub mod normalize;
mod renderer;
pub mod transform;

pub use cache::{HighlighterCache, HighlighterKey};
pub use config::Config;
pub use error::{ConfigError, Error, GrammarLoadCause, GrammarLoadError, HighlighterInitError};
pub use normalize::{Normalizer, normalize_fields};
pub use renderer::{CodeInput, Renderer};
pub use transform::{Transformer, WrapMode, replace_css_variables};

pub use codefence_highlight::{
    BasicEngine, Descriptor, Engine, EngineError, LanguageSpec, PLAIN_TEXT, ThemeSpec,
};
pub use codefence_theme::{CSS_VARIABLES_THEME, DEFAULT_THEME};

use std::sync::LazyLock;

static RENDERER: LazyLock<Renderer> = LazyLock::new(Renderer::new);

/// Render `input` with the shared default renderer.
pub async fn render(input: &CodeInput) -> Result<String, Error> {
    RENDERER.render(input).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_global_render_reuses_highlighters() {
        let input = CodeInput::new("[a]\nb = 1").language("toml");
        let first = render(&input).await.unwrap();
        let second = render(&input).await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains(r#"data-language="toml""#));
        assert!(!RENDERER.cache().is_empty());
    }
}
