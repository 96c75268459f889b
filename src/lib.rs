//! Rule-driven lexical engine.
//!
//! A [`Tokenizer`] is built from ordered [`RuleSpec`]s, optionally grouped into
//! named rulesets, and turns a sequence of text units (usually lines) into a
//! lazy stream of [`Token`]s. Each ruleset compiles into a single alternation;
//! the earliest declared rule wins when several could match at the same
//! offset. Switch rules change the active ruleset mid-scan, which is how
//! multi-line constructs such as block comments are expressed.
//!
//! ```
//! use rulelex::{rules, Tokenizer, TokenValue};
//!
//! let tokenizer = Tokenizer::new(rules![
//!     keep_if "NEWLINE" => r"\s+", keep: "\n";
//!     "IDENTIFIER" => r"[A-Za-z_][A-Za-z_0-9]*";
//!     integer "CONSTANT" => r"-?[0-9]+";
//! ]?)?;
//!
//! let values: Vec<TokenValue> =
//!     tokenizer.tokens(["abc -42\n"]).map(|t| t.map(|t| t.value)).collect::<Result<_, _>>()?;
//! assert_eq!(values, [TokenValue::from("abc"), TokenValue::Int(-42), TokenValue::from("\n")]);
//! # Ok::<(), rulelex::LexError>(())
//! ```

use std::fmt;
use std::sync::Arc;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod linefilter;
mod rule;
pub mod rules;
mod stream;

pub use api::{ScanOptions, Tokenizer};
pub use engine::{Grammar, RuleTable, Ruleset, ScanStats, TokenKind, TokenKinds, Tokens};
pub use error::{ErrorCategory, LexError, Result};
pub use linefilter::{LineContinuation, split_units};
pub use rule::{Converter, RuleSpec, RulesetName, SwitchTarget, Transform};
pub use stream::{Mark, TokenStream};

/// Payload of a token: the matched text, or whatever a converter made of it.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl TokenValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TokenValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::Text(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        TokenValue::Text(s)
    }
}

impl From<i64> for TokenValue {
    fn from(n: i64) -> Self {
        TokenValue::Int(n)
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Text(s) => write!(f, "{s:?}"),
            TokenValue::Int(n) => write!(f, "{n}"),
            TokenValue::Float(x) => write!(f, "{x}"),
            TokenValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Where a token was found.
///
/// `start`/`end` are byte offsets into the token's origin unit, half-open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Diagnostic label, typically a file name.
    pub source: Option<Arc<str>>,
    /// Line number of the unit, when numbering is enabled.
    pub line: Option<usize>,
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source.as_deref().unwrap_or("unknown");
        match self.line {
            Some(line) => write!(f, "{source}:{line}:{}", self.start),
            None => write!(f, "{source}:@{}", self.start),
        }
    }
}

/// A matched lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// The whole unit the token was found in.
    pub origin: Arc<str>,
    pub location: Location,
}

impl Token {
    /// The raw text of the match, regardless of any conversion.
    pub fn lexeme(&self) -> &str {
        self.origin.get(self.location.start..self.location.end).unwrap_or("")
    }
}
