/// Resource limits applied when compiling a rule.
///
/// The depth limit bounds both the parser's recursion (bracket nesting is
/// checked before parsing) and the evaluator's, since evaluation recurses once
/// per tree level.
///
/// ```
/// use ruleval::{Limits, Rule};
///
/// let limits = Limits::new().max_depth(8).max_length(256);
/// assert!(Rule::compile_with("a + b < c", limits).is_ok());
/// assert!(Rule::compile_with("((((((((((a))))))))))", limits).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_depth: usize,
    max_length: Option<usize>,
}

impl Limits {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum depth of the expression tree.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Maximum rule text length in bytes. Unlimited by default.
    #[must_use]
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn length_limit(&self) -> Option<usize> {
        self.max_length
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_length: None,
        }
    }
}
