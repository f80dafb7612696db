//! Title normalization for search comparisons.
//!
//! `normalize_text` is pure. `TitleNormalizer` wraps it with a bounded LRU
//! memo for repeated queries.

use linked_hash_map::LinkedHashMap;
use regex::Regex;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

/// Anything that is not a word character, whitespace or a hyphen
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid punctuation regex"));

/// Runs of hyphens, underscores and whitespace
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid separator regex"));

pub const DEFAULT_CACHE_SIZE: usize = 5000;

/// Canonical lowercase form of a title or query.
///
/// Punctuation is dropped, then hyphens, underscores and whitespace collapse
/// into single spaces, so `"Spider-Man: Homecoming"` and
/// `"spider man homecoming"` normalize identically. Blank input yields `""`.
/// The output is a fixed point: `normalize_text(normalize_text(x)) == normalize_text(x)`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    SEPARATORS.replace_all(&stripped, " ").trim().to_string()
}

/// Thread-safe memoizing wrapper around [`normalize_text`]
pub struct TitleNormalizer {
    capacity: usize,
    cache: Mutex<LinkedHashMap<String, String>>,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl TitleNormalizer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            cache: Mutex::new(LinkedHashMap::new()),
        }
    }

    /// The memo map, even if another thread panicked while holding the lock.
    ///
    /// Every mutation leaves the map consistent, so a poisoned lock is still a valid memo.
    fn memo(&self) -> MutexGuard<'_, LinkedHashMap<String, String>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn normalize(&self, text: &str) -> String {
        {
            let mut cache = self.memo();
            if let Some(hit) = cache.get_refresh(text) {
                return hit.clone();
            }
        }

        let normalized = normalize_text(text);

        let mut cache = self.memo();
        cache.insert(text.to_string(), normalized.clone());
        while cache.len() > self.capacity {
            cache.pop_front();
        }

        normalized
    }

    pub fn cached_len(&self) -> usize {
        self.memo().len()
    }

    pub fn is_cached(&self, text: &str) -> bool {
        self.memo().contains_key(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_text("The Lord of the Rings!"), "the lord of the rings");
        assert_eq!(normalize_text("Se7en."), "se7en");
        assert_eq!(normalize_text("Ocean's Eleven"), "oceans eleven");
    }

    #[test]
    fn test_hyphen_and_spacing_variants_align() {
        assert_eq!(
            normalize_text("Spider-Man: Homecoming"),
            normalize_text("Spider Man Homecoming")
        );
        assert_eq!(normalize_text("x_men -- days"), "x men days");
        assert_eq!(normalize_text("  Mad\tMax  "), "mad max");
    }

    #[test]
    fn test_punctuation_between_spaces_collapses() {
        assert_eq!(normalize_text("Batman : The Movie"), "batman the movie");
        assert_eq!(normalize_text("Mission: Impossible - Fallout"), "mission impossible fallout");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text("?!"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Spider-Man: Homecoming",
            "Batman : The Movie",
            "  __weird--title__  ",
            "Amélie",
            "2001: A Space Odyssey",
            "",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_keeps_unicode_letters_and_digits() {
        assert_eq!(normalize_text("Amélie"), "amélie");
        assert_eq!(normalize_text("2001: A Space Odyssey"), "2001 a space odyssey");
    }

    #[test]
    fn test_memo_matches_pure_function() {
        let normalizer = TitleNormalizer::new(10);
        let first = normalizer.normalize("Spider-Man");
        let second = normalizer.normalize("Spider-Man");
        assert_eq!(first, "spider man");
        assert_eq!(first, second);
        assert_eq!(normalizer.cached_len(), 1);
    }

    #[test]
    fn test_memo_evicts_least_recently_used() {
        let normalizer = TitleNormalizer::new(2);
        normalizer.normalize("Alien");
        normalizer.normalize("Aliens");
        // refresh "Alien" so "Aliens" becomes the oldest entry
        normalizer.normalize("Alien");
        normalizer.normalize("Alien 3");

        assert_eq!(normalizer.cached_len(), 2);
        assert!(normalizer.is_cached("Alien"));
        assert!(normalizer.is_cached("Alien 3"));
        assert!(!normalizer.is_cached("Aliens"));
    }

    #[test]
    fn test_poisoned_memo_still_reports_entries() {
        let normalizer = Arc::new(TitleNormalizer::new(10));
        normalizer.normalize("Alien");

        let poisoner = Arc::clone(&normalizer);
        let outcome = std::thread::spawn(move || {
            let _guard = poisoner.cache.lock().unwrap();
            panic!("poison the memo");
        })
        .join();
        assert!(outcome.is_err());
        assert!(normalizer.cache.is_poisoned());

        assert_eq!(normalizer.cached_len(), 1);
        assert!(normalizer.is_cached("Alien"));
        assert_eq!(normalizer.normalize("Aliens"), "aliens");
        assert_eq!(normalizer.cached_len(), 2);
    }

    #[test]
    fn test_concurrent_use() {
        let normalizer = Arc::new(TitleNormalizer::new(8));
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let normalizer = Arc::clone(&normalizer);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let title = format!("Movie-{} Part_{}", i % 12, worker);
                        assert_eq!(normalizer.normalize(&title), normalize_text(&title));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(normalizer.cached_len() <= 8);
    }
}
