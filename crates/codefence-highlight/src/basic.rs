//! Reference engine: regex grammars and VS Code style themes.
//!
//! Grammars for `rust`, `json` and `toml` are compiled in. Any other grammar
//! has to be supplied as a raw descriptor (see [`crate::grammar`]).

use std::collections::HashMap;
use std::sync::Arc;

use codefence_theme::{Theme, builtin};

use crate::descriptor::{LanguageSpec, PLAIN_TEXT, ThemeSpec};
use crate::grammar::{CompiledGrammar, GrammarConfig};
use crate::markup::{Element, Node, Root};
use crate::types::{EngineError, HighlightOptions};
use crate::{DEFAULT_CLASS, Engine, Highlight, Hooks};

const BUILTIN_GRAMMARS: &[(&str, &str)] = &[
    ("rust", include_str!("../grammars/rust.json")),
    ("json", include_str!("../grammars/json.json")),
    ("toml", include_str!("../grammars/toml.json")),
];

/// Look up a compiled-in grammar by name or alias.
fn builtin_grammar(language: &str) -> Result<Option<CompiledGrammar>, EngineError> {
    for (name, source) in BUILTIN_GRAMMARS {
        let config = GrammarConfig::from_json(name, source)?;
        if config.name == language || config.aliases.iter().any(|alias| alias == language) {
            return CompiledGrammar::new(config).map(Some);
        }
    }
    Ok(None)
}

/// Names of the compiled-in grammars.
pub fn builtin_languages() -> impl Iterator<Item = &'static str> {
    BUILTIN_GRAMMARS.iter().map(|(name, _)| *name)
}

/// The reference engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEngine;

impl Engine for BasicEngine {
    type Highlighter = BasicHighlighter;

    async fn create(
        &self,
        languages: &[LanguageSpec],
        themes: &[ThemeSpec],
    ) -> Result<BasicHighlighter, EngineError> {
        let mut highlighter = BasicHighlighter::default();
        highlighter.register_grammar(Arc::new(CompiledGrammar::plain_text()));

        for language in languages {
            let grammar = match language {
                LanguageSpec::PlainText => continue,
                LanguageSpec::Named(name) => builtin_grammar(name)?
                    .ok_or_else(|| EngineError::UnknownLanguage(name.clone()))?,
                LanguageSpec::Raw(descriptor) => {
                    CompiledGrammar::new(GrammarConfig::from_descriptor(descriptor)?)?
                }
            };
            highlighter.register_grammar(Arc::new(grammar));
        }

        for theme in themes {
            let theme = match theme {
                ThemeSpec::Named(name) => builtin::get(name)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownTheme(name.clone()))?,
                ThemeSpec::Raw(descriptor) => Theme::from_value(descriptor.clone().into_value())
                    .map_err(|source| EngineError::InvalidTheme {
                        theme: theme.name().to_string(),
                        source,
                    })?,
            };
            tracing::debug!(theme = %theme.name, "registered theme");
            highlighter.themes.insert(theme.name.clone(), theme);
        }

        Ok(highlighter)
    }
}

/// A highlighter with a fixed set of grammars and themes.
#[derive(Default)]
pub struct BasicHighlighter {
    grammars: HashMap<String, Arc<CompiledGrammar>>,
    themes: HashMap<String, Theme>,
}

impl BasicHighlighter {
    fn register_grammar(&mut self, grammar: Arc<CompiledGrammar>) {
        tracing::debug!(language = grammar.name(), "registered grammar");
        for alias in grammar.aliases() {
            self.grammars.insert(alias.clone(), Arc::clone(&grammar));
        }
        self.grammars
            .insert(grammar.name().to_string(), Arc::clone(&grammar));
    }

    /// Names and aliases of every registered language.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// Names of every registered theme.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    fn render_line(grammar: &CompiledGrammar, theme: &Theme, line: &str) -> Element {
        let mut element = Element::new("span").with_property("class", "line");
        for token in grammar.tokenize_line(line) {
            let color = match token.scope {
                Some(scope) => theme.foreground_for(scope),
                None => theme.foreground(),
            };
            element.children.push(
                Element::new("span")
                    .with_property("style", format!("color:{color}"))
                    .with_child(Node::text(token.text))
                    .into(),
            );
        }
        element
    }
}

impl Highlight for BasicHighlighter {
    fn highlight(
        &self,
        code: &str,
        options: &HighlightOptions<'_>,
        hooks: &mut dyn Hooks,
    ) -> Result<Root, EngineError> {
        let language = if options.language.is_empty() {
            PLAIN_TEXT
        } else {
            options.language
        };
        let grammar = self
            .grammars
            .get(language)
            .ok_or_else(|| EngineError::LanguageNotLoaded(language.to_string()))?;
        let theme = self
            .themes
            .get(options.theme)
            .ok_or_else(|| EngineError::ThemeNotLoaded(options.theme.to_string()))?;

        let mut code_element = Element::new("code");
        let source = code.trim_end_matches(['\n', '\r']);
        for (i, line) in source.split('\n').enumerate() {
            if i > 0 {
                code_element.children.push(Node::text("\n"));
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            code_element
                .children
                .push(Self::render_line(grammar, theme, line).into());
        }

        let code_node = hooks
            .code(&mut code_element)
            .unwrap_or_else(|| code_element.into());

        let mut pre = Element::new("pre")
            .with_property("class", format!("{DEFAULT_CLASS} {}", theme.name))
            .with_property(
                "style",
                format!(
                    "background-color:{};color:{}",
                    theme.background(),
                    theme.foreground()
                ),
            )
            .with_property("tabindex", "0")
            .with_child(code_node);
        let pre_node = hooks.pre(&mut pre).unwrap_or_else(|| pre.into());

        let mut root = Root::new(vec![pre_node]);
        Ok(hooks.root(&mut root).unwrap_or(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoHooks;
    use crate::descriptor::Descriptor;
    use serde_json::json;

    async fn highlighter(languages: &[LanguageSpec]) -> BasicHighlighter {
        BasicEngine
            .create(languages, &[ThemeSpec::default()])
            .await
            .unwrap()
    }

    fn options<'a>(language: &'a str) -> HighlightOptions<'a> {
        HighlightOptions {
            language,
            theme: "github-dark",
        }
    }

    #[tokio::test]
    async fn test_tree_shape() {
        let h = highlighter(&[LanguageSpec::from("rust")]).await;
        let root = h
            .highlight("fn main() {}\n\n", &options("rust"), &mut NoHooks)
            .unwrap();
        let html = root.to_html();
        assert!(html.starts_with(
            r#"<pre class="highlight github-dark" style="background-color:#24292e;color:#e1e4e8" tabindex="0"><code><span class="line">"#
        ));
        assert!(html.contains(r#"<span style="color:#f97583">fn</span>"#));
        // Trailing newlines are dropped: one line, no separators
        assert!(!html.contains('\n'));
        assert!(html.ends_with("</span></code></pre>"));
    }

    #[tokio::test]
    async fn test_lines_are_separated() {
        let h = highlighter(&[]).await;
        let root = h
            .highlight("a\r\nb\nc", &options(PLAIN_TEXT), &mut NoHooks)
            .unwrap();
        let Node::Element(pre) = &root.children[0] else {
            panic!("expected pre element");
        };
        let code = pre.children[0].as_element().unwrap();
        let lines: Vec<_> = code
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|line| Node::Element(line.clone()).text_content())
            .collect();
        assert_eq!(lines, ["a", "b", "c"]);
        assert_eq!(code.children.len(), 5);
    }

    #[tokio::test]
    async fn test_aliases_resolve() {
        let h = highlighter(&[LanguageSpec::from("rs")]).await;
        assert!(h.languages().any(|l| l == "rust"));
        assert!(h.highlight("let x = 1;", &options("rs"), &mut NoHooks).is_ok());
    }

    #[tokio::test]
    async fn test_raw_grammar() {
        let descriptor = Descriptor::from_value(json!({
            "name": "ini",
            "patterns": [{ "match": ";.*$", "name": "comment.line.ini" }]
        }))
        .unwrap();
        let h = highlighter(&[LanguageSpec::Raw(descriptor)]).await;
        let html = h
            .highlight("key = 1 ; note", &options("ini"), &mut NoHooks)
            .unwrap()
            .to_html();
        assert!(html.contains("; note</span>"));
    }

    #[tokio::test]
    async fn test_unknown_language_and_theme() {
        let err = BasicEngine
            .create(&[LanguageSpec::from("cobol")], &[ThemeSpec::default()])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::UnknownLanguage(ref l) if l == "cobol"));

        let err = BasicEngine
            .create(&[], &[ThemeSpec::from("nope")])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::UnknownTheme(ref t) if t == "nope"));
    }

    #[tokio::test]
    async fn test_unregistered_language_is_rejected() {
        let h = highlighter(&[]).await;
        let err = h
            .highlight("x", &options("rust"), &mut NoHooks)
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::LanguageNotLoaded(_)));
        let err = h
            .highlight(
                "x",
                &HighlightOptions {
                    language: PLAIN_TEXT,
                    theme: "github-light",
                },
                &mut NoHooks,
            )
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::ThemeNotLoaded(_)));
    }

    struct Recorder(Vec<&'static str>);

    impl Hooks for Recorder {
        fn code(&mut self, _code: &mut Element) -> Option<Node> {
            self.0.push("code");
            None
        }

        fn pre(&mut self, pre: &mut Element) -> Option<Node> {
            self.0.push("pre");
            Some(Element::new("div").with_child(pre.clone()).into())
        }

        fn root(&mut self, _root: &mut Root) -> Option<Root> {
            self.0.push("root");
            None
        }
    }

    #[tokio::test]
    async fn test_hook_order_and_replacement() {
        let h = highlighter(&[]).await;
        let mut hooks = Recorder(Vec::new());
        let root = h.highlight("x", &options(PLAIN_TEXT), &mut hooks).unwrap();
        assert_eq!(hooks.0, ["code", "pre", "root"]);
        assert!(root.to_html().starts_with("<div><pre "));
    }
}
