//! Approximate substring matching.
//!
//! Scores follow the Bitap convention: a match costs `errors / pattern_len`
//! plus a proximity penalty of `|start - location| / distance`, so `0.0` is a
//! perfect match at the expected location and `1.0` is no match at all.
//!
//! Instead of the bit-parallel formulation (which caps patterns at the machine
//! word size) this runs Sellers' edit-distance recurrence over the reversed
//! strings. A free start in the reversed text is a free end in the original,
//! so each column yields the fewest edits needed to match the pattern against
//! some substring starting at that column's position.

/// Tunables for a single pattern match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Where in the text the match is expected to start
    pub location: usize,
    /// How far from `location` a match may drift before the penalty reaches 1.0
    pub distance: usize,
    /// Maximum admitted score
    pub threshold: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            location: 0,
            distance: 100,
            threshold: 0.2,
        }
    }
}

/// Best match of a pattern inside a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
    /// Score in `[0, 1]`, lower is better
    pub score: f64,
    /// Edit operations needed
    pub errors: usize,
    /// Start of the matched span, in chars
    pub start: usize,
    /// End of the matched span (exclusive), in chars
    pub end: usize,
}

/// Combine edit count and drift into a Bitap score.
pub fn compute_score(errors: usize, pattern_len: usize, start: usize, params: &MatchParams) -> f64 {
    let accuracy = errors as f64 / pattern_len.max(1) as f64;
    let proximity = start.abs_diff(params.location);

    if params.distance == 0 {
        return if proximity == 0 { accuracy.min(1.0) } else { 1.0 };
    }

    (accuracy + proximity as f64 / params.distance as f64).min(1.0)
}

/// Find the best-scoring approximate occurrence of `pattern` in `text`.
///
/// Both slices are expected to be already case-folded by the caller. Returns
/// `None` for an empty pattern or when no occurrence scores within
/// `params.threshold`.
pub fn best_match(text: &[char], pattern: &[char], params: &MatchParams) -> Option<PatternMatch> {
    let m = pattern.len();
    let n = text.len();
    if m == 0 {
        return None;
    }

    // Column j of the reversed text ends at reversed index j; origin tracks
    // where in the reversed text the alignment began.
    let rev_text: Vec<char> = text.iter().rev().copied().collect();
    let rev_pattern: Vec<char> = pattern.iter().rev().copied().collect();

    // Two rows for space optimization: (edits, origin)
    let mut prev: Vec<(usize, usize)> = (0..=n).map(|j| (0, j)).collect();
    let mut curr: Vec<(usize, usize)> = vec![(0, 0); n + 1];

    for i in 1..=m {
        curr[0] = (i, 0);
        for j in 1..=n {
            let cost = usize::from(rev_pattern[i - 1] != rev_text[j - 1]);
            let diagonal = (prev[j - 1].0 + cost, prev[j - 1].1);
            let up = (prev[j].0 + 1, prev[j].1);
            let left = (curr[j - 1].0 + 1, curr[j - 1].1);

            let mut best = diagonal;
            if up.0 < best.0 {
                best = up;
            }
            if left.0 < best.0 {
                best = left;
            }
            curr[j] = best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let mut found: Option<PatternMatch> = None;
    for (j, &(errors, origin)) in prev.iter().enumerate() {
        let start = n - j;
        let end = n - origin;
        let score = compute_score(errors, m, start, params);
        if score > params.threshold {
            continue;
        }
        let better = match found {
            None => true,
            Some(current) => {
                score < current.score || (score == current.score && start < current.start)
            }
        };
        if better {
            found = Some(PatternMatch {
                score,
                errors,
                start,
                end,
            });
        }
    }

    found
}

/// Convenience wrapper over [`best_match`] for `&str` inputs, folding case.
pub fn match_str(text: &str, pattern: &str, params: &MatchParams) -> Option<PatternMatch> {
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let pattern: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();
    best_match(&text, &pattern, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(threshold: f64) -> MatchParams {
        MatchParams {
            threshold,
            ..MatchParams::default()
        }
    }

    #[test]
    fn test_exact_match_scores_zero() {
        let m = match_str("bottle", "bottle", &params(0.2)).unwrap();
        assert_eq!(m.score, 0.0);
        assert_eq!(m.errors, 0);
        assert_eq!((m.start, m.end), (0, 6));
    }

    #[test]
    fn test_misspelling_within_threshold() {
        let m = match_str("Bottle", "botle", &params(0.2)).unwrap();
        assert_eq!(m.errors, 1);
        assert_eq!(m.start, 0);
        assert!((m.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_partial_token() {
        let m = match_str("Apple", "appl", &params(0.2)).unwrap();
        assert_eq!(m.score, 0.0);
        assert_eq!((m.start, m.end), (0, 4));
    }

    #[test]
    fn test_proximity_penalty() {
        let m = match_str("plastic bottle", "bottle", &params(0.2)).unwrap();
        assert_eq!(m.errors, 0);
        assert_eq!(m.start, 8);
        assert!((m.score - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_far_match_rejected() {
        let text = format!("{}bottle", "x".repeat(30));
        assert!(match_str(&text, "bottle", &params(0.2)).is_none());
        assert!(match_str(&text, "bottle", &params(0.4)).is_some());
    }

    #[test]
    fn test_no_overlap() {
        assert!(match_str("Banana", "xyz", &params(0.2)).is_none());
    }

    #[test]
    fn test_apricot_rejects_appl() {
        assert!(match_str("apricot", "appl", &params(0.2)).is_none());
    }

    #[test]
    fn test_zero_distance() {
        let strict = MatchParams {
            distance: 0,
            ..params(1.0)
        };
        assert_eq!(match_str("bottle", "bottle", &strict).unwrap().score, 0.0);
        // drifting from the location is a full miss, so the anchored
        // alignment that deletes "a " wins
        let m = match_str("a bottle", "bottle", &strict).unwrap();
        assert_eq!(m.start, 0);
        assert_eq!(m.errors, 2);
        assert!((m.score - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pattern() {
        assert!(match_str("bottle", "", &params(1.0)).is_none());
    }

    #[test]
    fn test_empty_text() {
        assert!(match_str("", "a", &params(0.2)).is_none());
        let m = match_str("", "a", &params(1.0)).unwrap();
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_case_folded() {
        let upper = match_str("BOTTLE", "bottle", &params(0.2)).unwrap();
        let lower = match_str("bottle", "BOTTLE", &params(0.2)).unwrap();
        assert_eq!(upper, lower);
    }
}
