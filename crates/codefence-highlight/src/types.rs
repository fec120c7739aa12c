use codefence_theme::ThemeError;

/// Per-call highlight parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions<'a> {
    /// Effective language identifier (name or alias).
    pub language: &'a str,
    /// Canonical theme name.
    pub theme: &'a str,
}

/// Errors reported by a highlighting engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A named language the engine does not provide.
    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    /// A grammar descriptor was rejected.
    #[error("invalid grammar `{language}`: {message}")]
    InvalidGrammar { language: String, message: String },

    /// A named theme the engine does not provide.
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),

    /// A theme descriptor was rejected.
    #[error("invalid theme `{theme}`")]
    InvalidTheme {
        theme: String,
        #[source]
        source: ThemeError,
    },

    /// Highlighting asked for a language that was not registered.
    #[error("language `{0}` is not loaded in this highlighter")]
    LanguageNotLoaded(String),

    /// Highlighting asked for a theme that was not registered.
    #[error("theme `{0}` is not loaded in this highlighter")]
    ThemeNotLoaded(String),
}
