// SPDX-License-Identifier: Apache-2.0

/// Nesting bound used by the convenience entry points. Matches the range of
/// an 8-bit depth counter.
pub const DEFAULT_MAX_DEPTH: usize = 255;

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed nesting of braced tables and arrays. The implicit root
    /// table does not count.
    pub max_depth: usize,
}

impl ParserConfig {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
