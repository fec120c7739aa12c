//! Regex grammars for the basic engine.
//!
//! A grammar is a flat list of single-line `match` patterns, each tagged with a
//! TextMate-style scope name:
//!
//! ```json
//! {
//!   "name": "ini",
//!   "aliases": ["cfg"],
//!   "patterns": [
//!     { "match": ";.*$", "name": "comment.line.ini" },
//!     { "match": "^\\[[^\\]]*\\]", "name": "entity.name.section.ini" }
//!   ]
//! }
//! ```
//!
//! Patterns without a `match` (for instance `include` or `begin`/`end` rules of
//! full TextMate grammars) are ignored.

use regex::Regex;
use serde::Deserialize;

use crate::descriptor::{Descriptor, PLAIN_TEXT};
use crate::types::EngineError;

/// Grammar descriptor shape accepted by the basic engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub scope_name: Option<String>,
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

/// One pattern of a grammar.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    #[serde(default, rename = "match")]
    pub regex: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl GrammarConfig {
    /// Read a grammar from a normalized descriptor.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self, EngineError> {
        serde_json::from_value(descriptor.clone().into_value()).map_err(|e| {
            EngineError::InvalidGrammar {
                language: descriptor.name().unwrap_or("<unnamed>").to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Parse a grammar from a JSON document.
    pub fn from_json(language: &str, json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidGrammar {
            language: language.to_string(),
            message: e.to_string(),
        })
    }
}

struct Rule {
    regex: Regex,
    scope: Option<String>,
}

/// A slice of a line with the scope that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub scope: Option<&'a str>,
}

/// A grammar with compiled patterns.
pub struct CompiledGrammar {
    name: String,
    aliases: Vec<String>,
    rules: Vec<Rule>,
}

impl CompiledGrammar {
    /// Compile a grammar configuration.
    pub fn new(config: GrammarConfig) -> Result<Self, EngineError> {
        if config.name.is_empty() {
            return Err(EngineError::InvalidGrammar {
                language: "<unnamed>".to_string(),
                message: "grammar name is empty".to_string(),
            });
        }

        let mut rules = Vec::with_capacity(config.patterns.len());
        for pattern in config.patterns {
            let Some(source) = pattern.regex else {
                continue;
            };
            let regex = Regex::new(&source).map_err(|e| EngineError::InvalidGrammar {
                language: config.name.clone(),
                message: e.to_string(),
            })?;
            rules.push(Rule {
                regex,
                scope: pattern.name,
            });
        }

        Ok(Self {
            name: config.name,
            aliases: config.aliases,
            rules,
        })
    }

    /// The grammar used for the plain-text sentinel: no patterns.
    pub fn plain_text() -> Self {
        Self {
            name: PLAIN_TEXT.to_string(),
            aliases: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Split a single line into tokens.
    ///
    /// At each position the leftmost match wins; ties go to the pattern listed
    /// first. Empty matches are skipped. Text no pattern covers is emitted as
    /// unscoped tokens.
    pub fn tokenize_line<'a>(&'a self, line: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            let mut best: Option<(usize, usize, &Rule)> = None;
            for rule in &self.rules {
                let Some(m) = first_non_empty(&rule.regex, line, pos) else {
                    continue;
                };
                if best.is_none_or(|(start, _, _)| m.start() < start) {
                    best = Some((m.start(), m.end(), rule));
                }
            }

            let Some((start, end, rule)) = best else {
                break;
            };
            if start > pos {
                tokens.push(Token {
                    text: &line[pos..start],
                    scope: None,
                });
            }
            tokens.push(Token {
                text: &line[start..end],
                scope: rule.scope.as_deref(),
            });
            pos = end;
        }

        if pos < line.len() {
            tokens.push(Token {
                text: &line[pos..],
                scope: None,
            });
        }

        tokens
    }
}

/// Leftmost non-empty match at or after `start`.
fn first_non_empty<'h>(regex: &Regex, line: &'h str, start: usize) -> Option<regex::Match<'h>> {
    let mut at = start;
    loop {
        let m = regex.find_at(line, at)?;
        if m.start() < m.end() {
            return Some(m);
        }
        at = m.end() + line[m.end()..].chars().next()?.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar(json: &str) -> CompiledGrammar {
        CompiledGrammar::new(GrammarConfig::from_json("test", json).unwrap()).unwrap()
    }

    #[test]
    fn test_leftmost_match_wins() {
        let g = grammar(
            r#"{
                "name": "t",
                "patterns": [
                    { "match": "b+", "name": "b" },
                    { "match": "a", "name": "a" }
                ]
            }"#,
        );
        let tokens = g.tokenize_line("xabb y");
        assert_eq!(
            tokens,
            vec![
                Token { text: "x", scope: None },
                Token { text: "a", scope: Some("a") },
                Token { text: "bb", scope: Some("b") },
                Token { text: " y", scope: None },
            ]
        );
    }

    #[test]
    fn test_ties_go_to_first_pattern() {
        let g = grammar(
            r#"{
                "name": "t",
                "patterns": [
                    { "match": "\\bfn\\b", "name": "keyword" },
                    { "match": "[a-z]+", "name": "variable" }
                ]
            }"#,
        );
        let scopes: Vec<_> = g.tokenize_line("fn main").iter().map(|t| t.scope).collect();
        assert_eq!(scopes, vec![Some("keyword"), None, Some("variable")]);
    }

    #[test]
    fn test_patterns_without_match_are_ignored() {
        let g = grammar(
            r##"{
                "name": "t",
                "patterns": [
                    { "include": "#strings" },
                    { "match": "\\d+", "name": "constant.numeric" }
                ]
            }"##,
        );
        assert_eq!(g.tokenize_line("x 42").len(), 2);
    }

    #[test]
    fn test_empty_matches_do_not_loop() {
        let g = grammar(r#"{ "name": "t", "patterns": [{ "match": "a*", "name": "a" }] }"#);
        let tokens = g.tokenize_line("bbb");
        assert_eq!(tokens, vec![Token { text: "bbb", scope: None }]);
    }

    #[test]
    fn test_empty_match_does_not_hide_later_match() {
        let g = grammar(r#"{ "name": "t", "patterns": [{ "match": "a*", "name": "a" }] }"#);
        assert_eq!(
            g.tokenize_line("bab"),
            vec![
                Token { text: "b", scope: None },
                Token { text: "a", scope: Some("a") },
                Token { text: "b", scope: None },
            ]
        );
        assert_eq!(
            g.tokenize_line("éaa"),
            vec![
                Token { text: "é", scope: None },
                Token { text: "aa", scope: Some("a") },
            ]
        );
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let config =
            GrammarConfig::from_json("t", r#"{ "name": "t", "patterns": [{ "match": "(" }] }"#)
                .unwrap();
        let err = CompiledGrammar::new(config).err().unwrap();
        assert!(matches!(err, EngineError::InvalidGrammar { ref language, .. } if language == "t"));
    }

    #[test]
    fn test_plain_text_has_single_token() {
        let g = CompiledGrammar::plain_text();
        assert_eq!(
            g.tokenize_line("let x = 1;"),
            vec![Token { text: "let x = 1;", scope: None }]
        );
    }
}
