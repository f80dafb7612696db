//! "Did you mean" matching.
//!
//! Similarity is the Ratcliff/Obershelp ratio `2*M / (|a| + |b|)`, where `M`
//! counts the characters in the longest common block plus, recursively, the
//! matching characters to its left and right.

use std::collections::HashSet;

/// Similarity ratio in `[0, 1]` between two strings, compared by `char`
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Upper bound on `similarity_ratio` using only lengths
fn length_bound(a_len: usize, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    2.0 * a_len.min(b_len) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Start in `a`, start in `b` and length of the longest common substring.
/// Among equally long blocks the one earliest in `a` wins.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            cur[j] = if a[i - 1] == b[j - 1] { prev[j - 1] + 1 } else { 0 };
            if cur[j] > best.2 {
                best = (i - cur[j], j - cur[j], cur[j]);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

/// A suggestion and its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct CloseMatch {
    pub candidate: String,
    pub score: f64,
}

/// Up to `limit` distinct candidates scoring at least `cutoff` against `query`.
///
/// Best scores first; equal scores keep candidate order. Empty candidates are
/// never suggested.
pub fn close_matches<'a, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<CloseMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    if limit == 0 || query.is_empty() {
        return Vec::new();
    }

    let query_len = query.chars().count();
    let mut seen = HashSet::new();
    let mut scored = Vec::new();

    for candidate in candidates {
        if candidate.is_empty() || !seen.insert(candidate) {
            continue;
        }
        if length_bound(query_len, candidate.chars().count()) < cutoff {
            continue;
        }
        let score = similarity_ratio(query, candidate);
        if score >= cutoff {
            scored.push(CloseMatch {
                candidate: candidate.to_string(),
                score,
            });
        }
    }

    scored.sort_by(|x, y| y.score.total_cmp(&x.score));
    scored.truncate(limit);
    scored
}
