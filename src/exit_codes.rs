//! Exit code constants for the aladin CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, bad config, unreadable files)
//! - 2: Template failure (skeleton references an unknown placeholder)
//! - 3: Inference failure (the model command produced no result)
//! - 4: Word-count miss under `--strict`

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or I/O on user paths.
pub const USER_ERROR: i32 = 1;

/// Template failure: the prompt skeleton could not be rendered.
pub const TEMPLATE_FAILURE: i32 = 2;

/// Inference failure: spawn error, non-zero exit, timeout, or empty reply.
pub const INFERENCE_FAILURE: i32 = 3;

/// Word-count miss: the blog body is outside the tolerance and `--strict` was set.
pub const WORD_COUNT_MISS: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            TEMPLATE_FAILURE,
            INFERENCE_FAILURE,
            WORD_COUNT_MISS,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(WORD_COUNT_MISS, 4);
    }
}
