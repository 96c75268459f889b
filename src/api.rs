use std::sync::Arc;

use crate::engine::{Grammar, RuleTable, TokenKind, TokenKinds, Tokens};
use crate::{Result, Token};

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Label recorded in every token location, usually the input's file name.
    pub source: Option<Arc<str>>,
    /// Line number of the first unit; `None` leaves tokens unnumbered.
    pub start_line: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { source: None, start_line: Some(1) }
    }
}

/// A configured tokenizer.
///
/// Cloning is cheap: the compiled rules and the kind registry are shared. Each
/// call to [`Tokenizer::tokens`] starts an independent scan in the default
/// ruleset.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    table: Arc<RuleTable>,
    kinds: Arc<TokenKinds>,
    options: ScanOptions,
}

impl Tokenizer {
    /// Compile `grammar` and derive its kind registry.
    ///
    /// # Example
    /// ```
    /// use rulelex::{RuleSpec, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new(vec![RuleSpec::new("A", "a")?, RuleSpec::new("B", "b")?])?;
    /// let count = tokenizer.tokens(["ab", "ba"]).count();
    /// assert_eq!(count, 4);
    /// # Ok::<(), rulelex::LexError>(())
    /// ```
    pub fn new(grammar: impl Into<Grammar>) -> Result<Self> {
        Ok(Self::from_table(Arc::new(RuleTable::compile(grammar)?)))
    }

    /// Use an already compiled table.
    pub fn from_table(table: Arc<RuleTable>) -> Self {
        let kinds = Arc::new(TokenKinds::from_table(&table));
        Self { table, kinds, options: ScanOptions::default() }
    }

    /// Replace the derived registry, e.g. with one shared by related grammars.
    /// Names the registry lacks fail when their rules first emit a token.
    pub fn with_kinds(mut self, kinds: Arc<TokenKinds>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.options.source = Some(source.into());
        self
    }

    pub fn with_start_line(mut self, line: usize) -> Self {
        self.options.start_line = Some(line);
        self
    }

    pub fn without_line_numbers(mut self) -> Self {
        self.options.start_line = None;
        self
    }

    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    pub fn kinds(&self) -> &Arc<TokenKinds> {
        &self.kinds
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Kind id for a rule name.
    pub fn kind(&self, name: &str) -> Option<TokenKind> {
        self.kinds.get(name)
    }

    /// Kind name of `token`.
    pub fn kind_name(&self, token: &Token) -> Option<&str> {
        self.kinds.name(token.kind)
    }

    /// Start a scan over `units`.
    pub fn tokens<I>(&self, units: I) -> Tokens<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<Arc<str>>,
    {
        self.tokens_with(units, &self.options)
    }

    /// Start a scan with options other than the tokenizer's own.
    pub fn tokens_with<I>(&self, units: I, options: &ScanOptions) -> Tokens<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<Arc<str>>,
    {
        Tokens::new(Arc::clone(&self.table), Arc::clone(&self.kinds), options, units.into_iter())
    }

    /// Tokenize a single unit, unnumbered, starting from the default ruleset.
    pub fn tokenize_unit(&self, unit: &str) -> Result<Vec<Token>> {
        let options = ScanOptions { source: self.options.source.clone(), start_line: None };
        self.tokens_with(std::iter::once(unit), &options).collect()
    }
}
