//! Single-flight highlighter cache.
//!
//! Building a highlighter compiles grammars and loads themes, so instances are
//! built once per distinct set of languages and themes and then shared. When
//! several callers ask for the same set at once, one of them builds it and the
//! others wait for that result.

use std::collections::BTreeSet;
use std::sync::Arc;

use codefence_highlight::{Engine, LanguageSpec, ThemeSpec};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::error::HighlighterInitError;

/// Identity of a highlighter: which languages and themes it was built with.
///
/// Specs are compared by canonical form, so request order and duplicates do
/// not matter, and two raw descriptors with the same name but different
/// content are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlighterKey {
    languages: BTreeSet<String>,
    themes: BTreeSet<String>,
}

impl HighlighterKey {
    pub fn new(languages: &[LanguageSpec], themes: &[ThemeSpec]) -> Self {
        Self {
            languages: languages.iter().map(LanguageSpec::canonical).collect(),
            themes: themes.iter().map(ThemeSpec::canonical).collect(),
        }
    }
}

type Slot<H> = Arc<OnceCell<Arc<H>>>;

/// Caches highlighters built by an engine.
///
/// Entries are never evicted; [`HighlighterCache::clear`] drops all of them.
pub struct HighlighterCache<E: Engine> {
    engine: E,
    slots: DashMap<HighlighterKey, Slot<E::Highlighter>>,
}

impl<E: Engine> HighlighterCache<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            slots: DashMap::new(),
        }
    }

    /// The engine used to build highlighters.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get the highlighter for exactly `languages` and `themes`, building it on
    /// first use.
    ///
    /// Concurrent calls with the same key share one construction. A failed
    /// construction leaves nothing behind, so the next call retries.
    pub async fn acquire(
        &self,
        languages: &[LanguageSpec],
        themes: &[ThemeSpec],
    ) -> Result<Arc<E::Highlighter>, HighlighterInitError> {
        let key = HighlighterKey::new(languages, themes);

        // Clone the slot out so the shard lock is released before awaiting.
        let slot = Arc::clone(self.slots.entry(key.clone()).or_default().value());

        if let Some(highlighter) = slot.get() {
            trace!("highlighter cache hit");
            return Ok(Arc::clone(highlighter));
        }

        let highlighter = slot
            .get_or_try_init(|| async {
                debug!(
                    languages = languages.len(),
                    themes = themes.len(),
                    "creating highlighter"
                );
                self.engine
                    .create(languages, themes)
                    .await
                    .map(Arc::new)
                    .map_err(|source| HighlighterInitError {
                        languages: languages
                            .iter()
                            .map(|l| l.effective_name().to_string())
                            .collect(),
                        themes: themes.iter().map(|t| t.name().to_string()).collect(),
                        source,
                    })
            })
            .await;

        match highlighter {
            Ok(highlighter) => Ok(Arc::clone(highlighter)),
            Err(err) => {
                // Only drop the slot if no other caller has filled or replaced it.
                self.slots
                    .remove_if(&key, |_, s| Arc::ptr_eq(s, &slot) && s.get().is_none());
                Err(err)
            }
        }
    }

    /// Number of keys with a built or in-flight highlighter.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every cached highlighter.
    ///
    /// Callers holding an instance keep it; constructions in flight complete
    /// but their result is not reachable through the cache anymore.
    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl<E: Engine + Default> Default for HighlighterCache<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}
