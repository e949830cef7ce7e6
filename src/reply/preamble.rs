//! Raw replies and acknowledgement stripping.

use std::fmt;

/// A model reply exactly as the inference caller returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply(String);

impl RawReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the reply has no visible text.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The reply with `preamble` removed from its front.
    pub fn strip_preamble(&self, preamble: &str) -> &str {
        strip_preamble(&self.0, preamble)
    }
}

impl From<String> for RawReply {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for RawReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove a known acknowledgement from the start of `raw`.
///
/// Exact, case-sensitive prefix match against the untrimmed reply. On a match
/// the remainder is returned with leading whitespace removed. Every reply
/// starts with an empty preamble, so `""` only trims. Anything else is
/// returned as-is.
///
/// Back-to-back echoes are all removed, not just the first. A single strip
/// would leave `"P\nbody"` behind for `"P\nP\nbody"`, and a second call would
/// then change it again; looping keeps `strip(strip(x)) == strip(x)`.
pub fn strip_preamble<'a>(raw: &'a str, preamble: &str) -> &'a str {
    let mut rest = match raw.strip_prefix(preamble) {
        Some(rest) => rest.trim_start(),
        None => return raw,
    };
    if preamble.is_empty() {
        return rest;
    }
    while let Some(again) = rest.strip_prefix(preamble) {
        rest = again.trim_start();
    }
    rest
}
