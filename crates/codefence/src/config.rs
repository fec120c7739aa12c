//! Renderer configuration.
//!
//! Read from a `codefence.toml` file:
//!
//! ```toml
//! grammar-dir = "/srv/site/grammars"
//! class-name = "codefence"
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Brand class token put on rendered blocks.
pub const DEFAULT_CLASS_NAME: &str = "codefence";

/// Settings fixed for the lifetime of a [`crate::Renderer`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Root that relative grammar `path` fields resolve against.
    pub grammar_dir: PathBuf,

    /// Class token that replaces the engine's own on the block container.
    pub class_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grammar_dir: default_grammar_dir(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

/// The `grammars/` directory shipped with this crate.
pub fn default_grammar_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/grammars"))
}

impl Config {
    /// Parse a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load a configuration file.
    ///
    /// A relative `grammar-dir` is taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.grammar_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.grammar_dir = parent.join(&config.grammar_dir);
            }
        }

        tracing::debug!(path = %path.display(), grammar_dir = %config.grammar_dir.display(), "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.class_name, "codefence");
        assert!(config.grammar_dir.ends_with("grammars"));
        assert!(config.grammar_dir.is_absolute());
        assert_eq!(Config::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(r#"class-name = "fence""#).unwrap();
        assert_eq!(config.class_name, "fence");
        assert_eq!(config.grammar_dir, default_grammar_dir());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("theme = \"x\"").is_err());
    }

    #[test]
    fn test_load_resolves_relative_grammar_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codefence.toml");
        fs::write(
            &path,
            indoc! {r#"
                grammar-dir = "langs"
                class-name = "fence"
            "#},
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.grammar_dir, dir.path().join("langs"));
        assert_eq!(config.class_name, "fence");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
