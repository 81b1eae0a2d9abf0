/// Tuning knobs for the record assembler.
///
/// Defaults are the production values; the `with_*` methods exist mostly
/// for tests and for callers that know their reports are unusually dense.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Maximum number of records the index-paired heuristic strategy may
    /// produce (guards against runaway false positives on noisy text).
    pub(crate) heuristic_cap: usize,
    /// Maximum number of placeholder records emitted when nothing at all
    /// was recognized.
    pub(crate) placeholder_cap: usize,
    /// Maximum byte length of the text window scanned around one record
    /// boundary.
    pub(crate) window_cap: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            heuristic_cap: 10,
            placeholder_cap: 3,
            window_cap: 4096,
        }
    }
}

impl AssemblerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heuristic_cap(mut self, cap: usize) -> Self {
        self.heuristic_cap = cap;
        self
    }

    pub fn with_placeholder_cap(mut self, cap: usize) -> Self {
        self.placeholder_cap = cap;
        self
    }

    pub fn with_window_cap(mut self, cap: usize) -> Self {
        self.window_cap = cap;
        self
    }
}
