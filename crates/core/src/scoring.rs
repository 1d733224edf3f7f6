//! Keyword-overlap scoring and top-K selection for pose candidates.
//!
//! A candidate is scored against the description the user asked for by
//! tokenizing both sides into lowercase, punctuation-stripped word sets and
//! taking `|intersection| / |intended tokens|`. Selection happens exactly
//! once per batch; the result is persisted and never recomputed.

use std::collections::HashSet;

/// Score assigned when the intended-token set is empty.
///
/// A non-zero floor keeps degenerate batches from tie-breaking on whatever
/// order a hash set happens to iterate in.
pub const EMPTY_INTENT_SCORE: f64 = 0.05;

/// Default number of candidates marked approved per batch.
pub const DEFAULT_KEEP_TOP: usize = 3;

/// Bounds for the configurable keep-top value.
pub const MIN_KEEP_TOP: usize = 1;
pub const MAX_KEEP_TOP: usize = 5;

/// Tokenize text into a lowercase word set with punctuation stripped.
///
/// Any non-alphanumeric character is treated as a separator, so
/// `"Mid-sprint, arms pumping!"` yields `{mid, sprint, arms, pumping}`.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Score a candidate's combined text against the intended description.
///
/// Deterministic: identical inputs always produce identical scores.
pub fn score_candidate(intended: &str, candidate: &str) -> f64 {
    let intended_tokens = tokenize(intended);
    if intended_tokens.is_empty() {
        return EMPTY_INTENT_SCORE;
    }

    let candidate_tokens = tokenize(candidate);
    let overlap = intended_tokens
        .iter()
        .filter(|t| candidate_tokens.contains(*t))
        .count();

    overlap as f64 / intended_tokens.len() as f64
}

/// Clamp a requested keep-top value into `[MIN_KEEP_TOP, MAX_KEEP_TOP]`,
/// defaulting when absent.
pub fn clamp_keep_top(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_KEEP_TOP)
        .clamp(MIN_KEEP_TOP, MAX_KEEP_TOP)
}

/// Select the `keep_top` highest-scoring candidates of one batch.
///
/// Returns one approval flag per input score, in input order. Ties are
/// broken by submission order (stable sort), so an earlier candidate wins
/// over a later one with the same score. Exactly `min(n, keep_top)` flags
/// are true.
pub fn select_top_k(scores: &[f64], keep_top: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut approved = vec![false; scores.len()];
    for &idx in order.iter().take(keep_top) {
        approved[idx] = true;
    }
    approved
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_strips_punctuation_and_case() {
        let tokens = tokenize("Mid-sprint, ARMS pumping!");
        assert!(tokens.contains("mid"));
        assert!(tokens.contains("sprint"));
        assert!(tokens.contains("arms"));
        assert!(tokens.contains("pumping"));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn scoring_is_deterministic() {
        let a = score_candidate("sprinting forward fast", "sprinting fast pose");
        let b = score_candidate("sprinting forward fast", "sprinting fast pose");
        assert_eq!(a, b);
    }

    #[test]
    fn scoring_is_case_and_whitespace_insensitive() {
        let a = score_candidate("Sprinting   Forward", "sprinting forward");
        let b = score_candidate("sprinting forward", "SPRINTING  FORWARD");
        assert_eq!(a, b);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn empty_intent_floors_at_minimum() {
        assert_eq!(score_candidate("", "anything at all"), EMPTY_INTENT_SCORE);
        assert_eq!(score_candidate("...", "anything"), EMPTY_INTENT_SCORE);
    }

    #[test]
    fn partial_overlap_is_a_ratio() {
        // 2 of 4 intended tokens present.
        let score = score_candidate("running fast down hill", "fast hill photo");
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn keep_top_is_clamped() {
        assert_eq!(clamp_keep_top(None), DEFAULT_KEEP_TOP);
        assert_eq!(clamp_keep_top(Some(0)), MIN_KEEP_TOP);
        assert_eq!(clamp_keep_top(Some(9)), MAX_KEEP_TOP);
        assert_eq!(clamp_keep_top(Some(2)), 2);
    }

    #[test]
    fn select_top_k_marks_exactly_k() {
        let scores = [0.2, 0.9, 0.5, 0.7];
        let approved = select_top_k(&scores, 2);
        assert_eq!(approved, vec![false, true, false, true]);
        assert_eq!(approved.iter().filter(|a| **a).count(), 2);
    }

    #[test]
    fn select_top_k_with_small_batch_marks_all() {
        let approved = select_top_k(&[0.3, 0.1], 5);
        assert_eq!(approved, vec![true, true]);
    }

    #[test]
    fn ties_break_by_submission_order() {
        let scores = [0.5, 0.5, 0.5];
        let approved = select_top_k(&scores, 2);
        assert_eq!(approved, vec![true, true, false]);
    }

    #[test]
    fn run_versus_idle_example() {
        // keep_top = 1 must approve the candidate whose tokens best overlap
        // the intended "sprinting forward" description.
        let intended = ["sprinting forward", "standing relaxed"];
        let candidates = [
            "Run sprinting forward generated candidate",
            "Idle standing relaxed generated candidate",
        ];

        let scores: Vec<f64> = intended
            .iter()
            .zip(candidates.iter())
            .map(|(i, c)| score_candidate(i, c))
            .collect();

        // Score each candidate against the *first* requested description to
        // mirror a single intended-pose query.
        let run_score = score_candidate("sprinting forward", candidates[0]);
        let idle_score = score_candidate("sprinting forward", candidates[1]);
        assert!(run_score > idle_score);

        let approved = select_top_k(&scores, 1);
        assert_eq!(approved.iter().filter(|a| **a).count(), 1);
    }
}
