//! Error types for rule compilation and scanning.

use std::sync::Arc;

use thiserror::Error;

use crate::{Location, RulesetName};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, LexError>;

/// Coarse classification of a [`LexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad rules or rulesets; raised while building, never while scanning.
    Configuration,
    /// A rule name with no entry in the token-kind registry.
    Resolution,
    /// Input that the active rules cannot account for.
    Lexical,
}

/// Everything that can go wrong building a tokenizer or scanning with it.
#[derive(Debug, Clone, Error)]
pub enum LexError {
    /// A rule's pattern does not compile.
    #[error("rule {rule}, bad regexp: '{pattern}'")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The alternation built from a ruleset does not compile even though
    /// every member pattern does on its own (clashing group names, size limits).
    #[error("ruleset {ruleset}: combined pattern rejected")]
    CombinedPattern {
        ruleset: RulesetName,
        #[source]
        source: regex::Error,
    },

    #[error("ruleset {ruleset} has no rules")]
    EmptyRuleset { ruleset: RulesetName },

    #[error("rule mapping has no default ruleset entry")]
    MissingDefaultRuleset,

    #[error("ruleset {ruleset} declared more than once")]
    DuplicateRuleset { ruleset: RulesetName },

    /// A switch rule names a ruleset that was never declared.
    #[error("rule {rule} switches to undeclared ruleset {target}")]
    UnknownRuleset { rule: String, target: RulesetName },

    #[error("unknown token kind ({name})")]
    UnresolvedKind { name: String },

    /// A Convert rule matched text its converter refused.
    #[error("{location}: rule {rule} cannot convert '{text}': {reason}")]
    Conversion { rule: String, text: String, reason: String, location: Location },

    /// The rules stopped matching before the end of a unit.
    #[error("{}: unmatched @{offset}, {unit:?}", describe_position(.label, .line))]
    Unmatched { label: Option<Arc<str>>, line: Option<usize>, offset: usize, unit: Arc<str> },
}

impl LexError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LexError::InvalidPattern { .. }
            | LexError::CombinedPattern { .. }
            | LexError::EmptyRuleset { .. }
            | LexError::MissingDefaultRuleset
            | LexError::DuplicateRuleset { .. }
            | LexError::UnknownRuleset { .. } => ErrorCategory::Configuration,
            LexError::UnresolvedKind { .. } => ErrorCategory::Resolution,
            LexError::Conversion { .. } | LexError::Unmatched { .. } => ErrorCategory::Lexical,
        }
    }

    /// Offset into the failing unit, for lexical failures.
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexError::Unmatched { offset, .. } => Some(*offset),
            LexError::Conversion { location, .. } => Some(location.start),
            _ => None,
        }
    }
}

fn describe_position(label: &Option<Arc<str>>, line: &Option<usize>) -> String {
    let label = label.as_deref().unwrap_or("unknown");
    match line {
        Some(line) => format!("{label}:{line}"),
        None => label.to_string(),
    }
}
