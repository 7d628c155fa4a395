//! Multi-key fuzzy matching with "lower is better" scores.
//!
//! Scores live in `[0, 1]`. A case-insensitive exact substring hit always
//! lands in `[0, 0.5)`, shorter haystacks scoring better, and a full match
//! scores `0`. Anything else falls back to a skim-style subsequence match
//! mapped into `[0.5, 1]` relative to how well the pattern matches itself.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Scores at or above this value came from a subsequence match.
pub const SUBSEQUENCE_FLOOR: f64 = 0.5;

/// Accessor for one searchable field of a record.
pub type Key<T> = fn(&T) -> &str;

/// A matched record.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem<T> {
    /// The matched record.
    pub item: T,
    /// Position of the record in the searched input.
    pub ref_index: usize,
    /// Match quality; lower is better.
    pub score: f64,
}

/// Fuzzy matcher over a fixed set of keys per record.
pub struct FuzzySearch {
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for FuzzySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzySearch").finish_non_exhaustive()
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzySearch {
    /// Creates a case-insensitive matcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Scores `pattern` against `text`; `None` means no match.
    #[must_use]
    pub fn score(&self, text: &str, pattern: &str) -> Option<f64> {
        let pattern = pattern.trim();
        if pattern.is_empty() || text.is_empty() {
            return None;
        }

        let haystack = text.to_lowercase();
        let needle = pattern.to_lowercase();
        if haystack.contains(&needle) {
            #[allow(clippy::cast_precision_loss)]
            let coverage = needle.chars().count() as f64 / haystack.chars().count() as f64;
            return Some(SUBSEQUENCE_FLOOR * (1.0 - coverage.min(1.0)));
        }

        let raw = self.matcher.fuzzy_match(text, pattern)?;
        let perfect = self.matcher.fuzzy_match(pattern, pattern).unwrap_or(raw).max(1);
        #[allow(clippy::cast_precision_loss)]
        let ratio = (raw as f64 / perfect as f64).clamp(0.0, 1.0);
        Some(SUBSEQUENCE_FLOOR + SUBSEQUENCE_FLOOR * (1.0 - ratio))
    }

    /// Matches every record on `keys` and returns the hits, best first.
    ///
    /// A record scores as its best key; records matching no key are
    /// dropped. Equal scores keep input order.
    pub fn search<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        pattern: &str,
        keys: &[Key<T>],
    ) -> Vec<SearchResultItem<T>> {
        let mut hits: Vec<_> = items
            .into_iter()
            .enumerate()
            .filter_map(|(ref_index, item)| {
                let score = keys
                    .iter()
                    .filter_map(|key| self.score(key(&item), pattern))
                    .min_by(f64::total_cmp)?;
                Some(SearchResultItem {
                    item,
                    ref_index,
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }
}
