//! Scan counters.
//!
//! Every `Tokens` scan keeps a `ScanStats` up to date as it goes; reading it
//! is free and does not disturb the scan.

/// Counters for one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Units taken from the source, including the one in progress.
    pub units: usize,
    /// Tokens emitted.
    pub tokens: usize,
    /// Matches consumed without emitting a token.
    pub ignored: usize,
    /// Ruleset switches performed.
    pub switches: usize,
}

impl ScanStats {
    /// Total matches, emitted or not.
    pub fn matches(&self) -> usize {
        self.tokens + self.ignored
    }
}
