use crate::util::{levenshtein_distance, longest_common_block};

/// Case-insensitive string similarity in `[0.0, 1.0]`.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f32;
}

/// Ratcliff/Obershelp "gestalt" ratio: `2·M / (|a| + |b|)` where `M` counts
/// the characters in recursively found longest common blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestaltRatio;

impl Similarity for GestaltRatio {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matching_chars(&a, &b) as f32 / total as f32
    }
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];

    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        let (i, j, k) = longest_common_block(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push(((alo, i), (blo, j)));
        }
        if i + k < ahi && j + k < bhi {
            pending.push(((i + k, ahi), (j + k, bhi)));
        }
    }

    matched
}

/// `1 - distance / max_len` over Levenshtein edit distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl Similarity for NormalizedLevenshtein {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 1.0;
        }
        1.0 - (levenshtein_distance(&a, &b) as f32 / max_len as f32)
    }
}
