use std::path::PathBuf;

use codefence_highlight::EngineError;

/// Why a grammar file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum GrammarLoadCause {
    #[error("could not read file")]
    Read(#[source] std::io::Error),

    #[error("invalid JSON")]
    Json(#[source] serde_json::Error),

    #[error("invalid TOML")]
    Toml(#[source] toml::de::Error),

    #[error("document is not an object")]
    NotAnObject,
}

/// A grammar descriptor's `path` could not be turned into fields.
#[derive(Debug, thiserror::Error)]
#[error("failed to load grammar from {}: {cause}", path.display())]
pub struct GrammarLoadError {
    /// The resolved path.
    pub path: PathBuf,
    #[source]
    pub cause: GrammarLoadCause,
}

/// The engine failed to build a highlighter.
///
/// Nothing is cached; a later request with the same languages and themes
/// tries again.
#[derive(Debug, thiserror::Error)]
#[error("failed to create highlighter for languages [{}] and themes [{}]", languages.join(", "), themes.join(", "))]
pub struct HighlighterInitError {
    pub languages: Vec<String>,
    pub themes: Vec<String>,
    #[source]
    pub source: EngineError,
}

/// A configuration file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors returned by [`crate::Renderer::render`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    GrammarLoad(#[from] GrammarLoadError),

    #[error(transparent)]
    HighlighterInit(#[from] HighlighterInitError),

    /// An engine error raised while highlighting, passed through unchanged.
    /// The facade adds no failure mode of its own here.
    #[error("highlighting failed")]
    Highlight(#[from] EngineError),
}
