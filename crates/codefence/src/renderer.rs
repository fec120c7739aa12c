use codefence_highlight::{BasicEngine, Engine, Highlight, HighlightOptions, LanguageSpec, ThemeSpec};

use crate::cache::HighlighterCache;
use crate::config::Config;
use crate::error::Error;
use crate::normalize::Normalizer;
use crate::transform::{Transformer, WrapMode};

/// One block of code to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeInput {
    pub code: String,
    pub language: LanguageSpec,
    pub theme: ThemeSpec,
    pub wrap: WrapMode,
    pub inline: bool,
}

impl CodeInput {
    /// Plain text in the default theme, not wrapped, rendered as a block.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn language(mut self, language: impl Into<LanguageSpec>) -> Self {
        self.language = language.into();
        self
    }

    pub fn theme(mut self, theme: impl Into<ThemeSpec>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

/// Renders code blocks to HTML fragments.
///
/// A renderer owns its highlighter cache, so it should be created once and
/// shared.
pub struct Renderer<E: Engine = BasicEngine> {
    config: Config,
    normalizer: Normalizer,
    cache: HighlighterCache<E>,
}

impl Renderer {
    /// Create a renderer with the default configuration and the basic engine.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_engine(BasicEngine, config)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Renderer<E> {
    /// Create a renderer backed by a custom engine.
    pub fn with_engine(engine: E, config: Config) -> Self {
        Self {
            normalizer: Normalizer::new(config.grammar_dir.clone()),
            cache: HighlighterCache::new(engine),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &HighlighterCache<E> {
        &self.cache
    }

    /// Render `input` as an HTML fragment.
    pub async fn render(&self, input: &CodeInput) -> Result<String, Error> {
        let language = self.normalizer.normalize(input.language.clone()).await?;
        let languages = [language];
        let themes = [input.theme.clone()];

        let highlighter = self.cache.acquire(&languages, &themes).await?;

        let [language] = &languages;
        let [theme] = &themes;
        let language_name = language.effective_name();
        let theme_name = theme.name();

        let mut transformer = Transformer {
            language: language_name,
            theme: theme_name,
            wrap: input.wrap,
            inline: input.inline,
            engine_class: self.cache.engine().class_name(),
            class_name: &self.config.class_name,
        };
        let options = HighlightOptions {
            language: language_name,
            theme: theme_name,
        };

        let root = highlighter.highlight(&input.code, &options, &mut transformer)?;
        Ok(root.to_html())
    }
}
