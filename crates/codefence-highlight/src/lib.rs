//! Highlighting engine interface for codefence.
//!
//! This crate defines what the rendering pipeline expects from a highlighting
//! engine, and ships a small reference engine.
//!
//! # Architecture
//!
//! - [`Engine`]: builds highlighters. Construction may be expensive (grammar
//!   compilation, theme loading) and is async so engines can fetch resources.
//! - [`Highlight`]: a built highlighter. Highlighting itself is synchronous and
//!   returns a markup tree ([`Root`]).
//! - [`Hooks`]: extension points the highlighter calls back into while it
//!   assembles the tree. Each hook may mutate the node in place or return a
//!   replacement.
//!
//! The tree an engine produces has this shape:
//!
//! ```text
//! root
//! └── pre.highlight.<theme>      <- Hooks::pre
//!     └── code                    <- Hooks::code
//!         ├── span.line
//!         ├── "\n"
//!         └── span.line
//! ```
//!
//! [`Hooks::root`] runs last, over the fully assembled tree.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use codefence_highlight::{BasicEngine, Engine, Highlight, HighlightOptions, LanguageSpec, NoHooks, ThemeSpec};
//!
//! let highlighter = BasicEngine
//!     .create(&[LanguageSpec::from("rust")], &[ThemeSpec::default()])
//!     .await?;
//! let options = HighlightOptions { language: "rust", theme: "github-dark" };
//! let html = highlighter.highlight("fn main() {}", &options, &mut NoHooks)?.to_html();
//! ```

mod basic;
mod descriptor;
pub mod grammar;
mod markup;
mod types;

pub use basic::{BasicEngine, BasicHighlighter, builtin_languages};
pub use descriptor::{Descriptor, LanguageSpec, PLAIN_TEXT, ThemeSpec, is_plain_text};
pub use markup::{Element, Node, Properties, Root, html_escape};
pub use types::{EngineError, HighlightOptions};

use std::future::Future;

/// Class token engines put on the block container by default.
pub const DEFAULT_CLASS: &str = "highlight";

/// Extension points called while a highlighter builds its output tree.
///
/// Every method defaults to "no change". Returning `Some` substitutes the
/// node that would have been emitted.
pub trait Hooks {
    /// The inner content container (`code`), once all lines are in place.
    fn code(&mut self, _code: &mut Element) -> Option<Node> {
        None
    }

    /// The outer block container (`pre`), with its final child attached.
    fn pre(&mut self, _pre: &mut Element) -> Option<Node> {
        None
    }

    /// The whole tree, after every other hook ran.
    fn root(&mut self, _root: &mut Root) -> Option<Root> {
        None
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl Hooks for NoHooks {}

/// A highlighter with a fixed set of registered languages and themes.
///
/// Highlighters are shared between concurrent callers, so highlighting takes
/// `&self`.
pub trait Highlight: Send + Sync {
    /// Highlight `code` into a markup tree.
    ///
    /// Fails when `options` names a language or theme this highlighter was not
    /// built with.
    fn highlight(
        &self,
        code: &str,
        options: &HighlightOptions<'_>,
        hooks: &mut dyn Hooks,
    ) -> Result<Root, EngineError>;
}

/// Builds highlighters.
pub trait Engine: Send + Sync {
    /// The highlighter type this engine builds.
    type Highlighter: Highlight + 'static;

    /// Class token the engine puts on its block container.
    fn class_name(&self) -> &str {
        DEFAULT_CLASS
    }

    /// Build a highlighter that knows exactly `languages` and `themes`.
    ///
    /// The plain-text language is always available.
    fn create(
        &self,
        languages: &[LanguageSpec],
        themes: &[ThemeSpec],
    ) -> impl Future<Output = Result<Self::Highlighter, EngineError>> + Send;
}
