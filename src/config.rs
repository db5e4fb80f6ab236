//! Decoder limits

/// Default maximum nesting depth of embedded messages
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Limits applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest allowed embedded message; the top-level message is depth 0
    pub max_depth: usize,
}

impl DecoderConfig {
    /// Sets the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
