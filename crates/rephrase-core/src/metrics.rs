//! Lexical scoring utilities: edit distance, set overlap, and dispersion.

use std::collections::HashSet;

use crate::text;

/// Per-operation costs for [`weighted_edit_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWeights {
    /// Cost of inserting one character.
    pub insertion: usize,
    /// Cost of deleting one character.
    pub deletion: usize,
    /// Cost of substituting one character.
    pub substitution: usize,
}

impl EditWeights {
    /// Plain Levenshtein costs.
    pub const UNIT: Self = Self {
        insertion: 1,
        deletion: 1,
        substitution: 1,
    };

    /// Costs used when judging whether a rewrite drifted too far.
    pub const SIMILARITY: Self = Self {
        insertion: 1,
        deletion: 1,
        substitution: 2,
    };
}

impl Default for EditWeights {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Edit distance between `a` and `b` over characters with per-operation costs.
///
/// Symmetric whenever `insertion == deletion`.
pub fn weighted_edit_distance(a: &str, b: &str, weights: EditWeights) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).map(|j| j * weights.insertion).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = (i + 1) * weights.deletion;
        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { 0 } else { weights.substitution };
            curr[j + 1] = (prev[j] + substitution)
                .min(prev[j + 1] + weights.deletion)
                .min(curr[j] + weights.insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 − distance / max(len)`, clamped to `[0, 1]`; two empty strings are identical.
pub fn normalized_similarity(a: &str, b: &str, weights: EditWeights) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = weighted_edit_distance(a, b, weights) as f64;
    (1.0 - distance / max_len as f64).clamp(0.0, 1.0)
}

/// Jaccard overlap of the lowercase word sets of `a` and `b`.
pub fn lexical_overlap(a: &str, b: &str) -> f64 {
    let left: HashSet<String> = text::extract_words(a).into_iter().collect();
    let right: HashSet<String> = text::extract_words(b).into_iter().collect();
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let shared = left.intersection(&right).count() as f64;
    let union = left.union(&right).count() as f64;
    shared / union
}

/// Blend of edit similarity (substitutions cost double) and word overlap.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    0.6 * normalized_similarity(a, b, EditWeights::SIMILARITY) + 0.4 * lexical_overlap(a, b)
}

/// Arithmetic mean; zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; zero for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard deviation divided by the mean; zero when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(weighted_edit_distance("kitten", "sitting", EditWeights::UNIT), 3);
        assert_eq!(weighted_edit_distance("", "abc", EditWeights::UNIT), 3);
        assert_eq!(weighted_edit_distance("same", "same", EditWeights::UNIT), 0);
    }

    #[test]
    fn substitution_cost_applies() {
        // With substitution at 2, replacing costs the same as delete + insert
        assert_eq!(weighted_edit_distance("cat", "cut", EditWeights::SIMILARITY), 2);
        let pricey = EditWeights {
            insertion: 1,
            deletion: 1,
            substitution: 5,
        };
        assert_eq!(weighted_edit_distance("cat", "cut", pricey), 2);
    }

    #[test]
    fn symmetric_when_insert_equals_delete() {
        let weights = EditWeights {
            insertion: 2,
            deletion: 2,
            substitution: 3,
        };
        for (a, b) in [("flaw", "lawn"), ("intention", "execution"), ("", "xyz")] {
            assert_eq!(
                weighted_edit_distance(a, b, weights),
                weighted_edit_distance(b, a, weights)
            );
        }
    }

    #[test]
    fn asymmetric_costs_are_directional() {
        let weights = EditWeights {
            insertion: 1,
            deletion: 3,
            substitution: 10,
        };
        assert_eq!(weighted_edit_distance("", "ab", weights), 2);
        assert_eq!(weighted_edit_distance("ab", "", weights), 6);
    }

    #[test]
    fn unicode_counts_chars() {
        assert_eq!(weighted_edit_distance("café", "cafe", EditWeights::UNIT), 1);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(normalized_similarity("", "", EditWeights::UNIT), 1.0);
        assert_eq!(normalized_similarity("abc", "xyz", EditWeights::SIMILARITY), 0.0);
        assert!((normalized_similarity("abcd", "abce", EditWeights::UNIT) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn overlap_is_case_insensitive() {
        assert_eq!(lexical_overlap("The cat", "the CAT"), 1.0);
        assert!((lexical_overlap("a b", "b c") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(lexical_overlap("", ""), 1.0);
        assert_eq!(lexical_overlap("word", ""), 0.0);
    }

    #[test]
    fn text_similarity_of_identical_text_is_one() {
        assert!((text_similarity("Same words here.", "Same words here.") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dispersion() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-9);
        assert!((variance(&values) - 4.0).abs() < 1e-9);
        assert!((std_dev(&values) - 2.0).abs() < 1e-9);
        assert!((coefficient_of_variation(&values) - 0.4).abs() < 1e-9);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
    }
}
