//! Descriptor normalization.
//!
//! Raw language descriptors come in a few legacy shapes. Before they reach an
//! engine they are rewritten into the canonical one:
//!
//! - `path`: fields are loaded from a JSON (or `.toml`) file below the grammar
//!   root. Fields already on the descriptor win.
//! - `id`: copied to `name`, then removed.
//! - `grammar`: an object whose fields are lifted to the top level, then
//!   removed.

use std::path::{Path, PathBuf};

use codefence_highlight::{Descriptor, LanguageSpec};
use serde_json::{Map, Value};

use crate::error::{GrammarLoadCause, GrammarLoadError};

/// Rewrites language specs into the shape engines accept.
#[derive(Debug, Clone)]
pub struct Normalizer {
    root: PathBuf,
}

impl Normalizer {
    /// Create a normalizer resolving relative grammar paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a grammar `path` field against the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Normalize a language spec.
    ///
    /// Named and plain-text specs are returned as they are.
    pub async fn normalize(&self, language: LanguageSpec) -> Result<LanguageSpec, GrammarLoadError> {
        let LanguageSpec::Raw(mut descriptor) = language else {
            return Ok(language);
        };

        if let Some(path) = descriptor.remove("path") {
            match path {
                Value::String(path) => {
                    let mut fields = self.load(&self.resolve(&path)).await?;
                    // Grammar files do not chain to other files.
                    fields.remove("path");
                    descriptor.merge(fields, false);
                }
                other => tracing::warn!(path = %other, "ignoring non-string grammar path"),
            }
        }

        normalize_fields(&mut descriptor);
        Ok(LanguageSpec::Raw(descriptor))
    }

    async fn load(&self, path: &Path) -> Result<Map<String, Value>, GrammarLoadError> {
        let fail = |cause| GrammarLoadError {
            path: path.to_path_buf(),
            cause,
        };

        tracing::debug!(path = %path.display(), "loading grammar file");
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| fail(GrammarLoadCause::Read(e)))?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let value = if is_toml {
            toml::from_str::<Value>(&contents).map_err(|e| fail(GrammarLoadCause::Toml(e)))?
        } else {
            serde_json::from_str::<Value>(&contents).map_err(|e| fail(GrammarLoadCause::Json(e)))?
        };

        match value {
            Value::Object(fields) => Ok(fields),
            _ => Err(fail(GrammarLoadCause::NotAnObject)),
        }
    }
}

/// Apply the `id` and `grammar` rewrites. Does not touch the filesystem.
///
/// An `id` lifted out of `grammar` is applied like a top-level one.
pub fn normalize_fields(descriptor: &mut Descriptor) {
    apply_id(descriptor);

    while let Some(grammar) = descriptor.remove("grammar") {
        match grammar {
            Value::Object(mut fields) => {
                fields.remove("path");
                descriptor.merge(fields, true);
                apply_id(descriptor);
            }
            other => tracing::warn!(grammar = %other, "dropping non-object grammar field"),
        }
    }
}

fn apply_id(descriptor: &mut Descriptor) {
    if let Some(id) = descriptor.remove("id") {
        descriptor.insert("name", id);
    }
}
