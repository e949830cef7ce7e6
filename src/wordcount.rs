//! Word-count check for generated articles.

use serde::{Deserialize, Serialize};

/// Allowed distance from the target, in words, when none is configured.
pub const DEFAULT_TOLERANCE: u32 = 50;

/// Outcome of comparing a body's length with the requested target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCountVerdict {
    pub actual_words: usize,
    pub target: u32,
    pub tolerance: u32,
    pub within_tolerance: bool,
}

impl WordCountVerdict {
    /// Signed distance from the target (negative when short).
    pub fn difference(&self) -> i64 {
        self.actual_words as i64 - i64::from(self.target)
    }

    /// One-line summary for terminal output and error messages.
    pub fn summary(&self) -> String {
        if self.within_tolerance {
            format!(
                "Word count ({}) is within acceptable range of target {} ± {}",
                self.actual_words, self.target, self.tolerance
            )
        } else {
            format!(
                "Word count ({}) differs from target ({}) by {} (tolerance {})",
                self.actual_words,
                self.target,
                self.difference().abs(),
                self.tolerance
            )
        }
    }
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Compare `blog_content`'s word count with `target`.
pub fn evaluate(blog_content: &str, target: u32, tolerance: u32) -> WordCountVerdict {
    let actual_words = count_words(blog_content);
    let distance = (actual_words as i64 - i64::from(target)).unsigned_abs();

    WordCountVerdict {
        actual_words,
        target,
        tolerance,
        within_tolerance: distance <= u64::from(tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_target_is_within() {
        let verdict = evaluate("a b c d e", 5, DEFAULT_TOLERANCE);
        assert_eq!(verdict.actual_words, 5);
        assert!(verdict.within_tolerance);
    }

    #[test]
    fn test_far_from_target_is_outside() {
        let verdict = evaluate("a b c d e", 200, DEFAULT_TOLERANCE);
        assert_eq!(verdict.actual_words, 5);
        assert!(!verdict.within_tolerance);
        assert_eq!(verdict.difference(), -195);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        assert!(evaluate("a b c", 5, 2).within_tolerance);
        assert!(!evaluate("a b", 5, 2).within_tolerance);
        assert!(evaluate("a b c d e f g", 5, 2).within_tolerance);
        assert!(!evaluate("a b c d e f g h", 5, 2).within_tolerance);
    }

    #[test]
    fn test_empty_content_counts_zero() {
        let verdict = evaluate("", 1000, 50);
        assert_eq!(verdict.actual_words, 0);
        assert!(!verdict.within_tolerance);

        assert!(evaluate("   \n\t ", 0, 0).within_tolerance);
    }

    #[test]
    fn test_whitespace_runs_and_markdown() {
        assert_eq!(count_words("  one\ttwo\n\nthree   four  "), 4);
        assert_eq!(count_words("## Heading\n- bullet point"), 5);
    }

    #[test]
    fn test_summary_wording() {
        assert_eq!(
            evaluate("a b c d e", 5, 50).summary(),
            "Word count (5) is within acceptable range of target 5 ± 50"
        );
        assert_eq!(
            evaluate("a b c d e", 200, 50).summary(),
            "Word count (5) differs from target (200) by 195 (tolerance 50)"
        );
    }
}
