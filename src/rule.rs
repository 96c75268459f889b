//! Rule declarations: a named pattern plus what to do with its matches.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::{LexError, Result, TokenValue};

/// Name of a ruleset. Exactly one ruleset in every table is the default one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RulesetName {
    Default,
    Named(String),
}

impl RulesetName {
    pub fn named(name: impl Into<String>) -> Self {
        RulesetName::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, RulesetName::Default)
    }
}

impl From<&str> for RulesetName {
    fn from(name: &str) -> Self {
        RulesetName::Named(name.to_string())
    }
}

impl From<String> for RulesetName {
    fn from(name: String) -> Self {
        RulesetName::Named(name)
    }
}

impl fmt::Display for RulesetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesetName::Default => f.write_str("<default>"),
            RulesetName::Named(name) => f.write_str(name),
        }
    }
}

/// Where a switch rule sends the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchTarget {
    Ruleset(RulesetName),
    /// The ruleset declared after the active one, wrapping around.
    Next,
}

impl SwitchTarget {
    pub fn default_ruleset() -> Self {
        SwitchTarget::Ruleset(RulesetName::Default)
    }

    pub fn named(name: impl Into<String>) -> Self {
        SwitchTarget::Ruleset(RulesetName::named(name))
    }
}

type ConvertFn = dyn Fn(&str) -> std::result::Result<TokenValue, String> + Send + Sync;

/// Value conversion applied to the raw text of a match.
#[derive(Clone)]
pub struct Converter {
    label: &'static str,
    func: Arc<ConvertFn>,
}

impl Converter {
    /// Wrap a custom conversion. `label` only shows up in `Debug` output.
    pub fn new<F>(label: &'static str, func: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<TokenValue, String> + Send + Sync + 'static,
    {
        Self { label, func: Arc::new(func) }
    }

    /// Signed decimal integer.
    pub fn integer() -> Self {
        Self::new("integer", |text| text.parse::<i64>().map(TokenValue::Int).map_err(|e| e.to_string()))
    }

    pub fn float() -> Self {
        Self::new("float", |text| text.parse::<f64>().map(TokenValue::Float).map_err(|e| e.to_string()))
    }

    /// Integer in the given radix, with an optional leading `-`.
    pub fn radix(radix: u32) -> Self {
        Self::new("radix", move |text| {
            i64::from_str_radix(text, radix).map(TokenValue::Int).map_err(|e| format!("base {radix}: {e}"))
        })
    }

    pub fn convert(&self, text: &str) -> std::result::Result<TokenValue, String> {
        (self.func)(text)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("label", &self.label).field("func", &"<function>").finish()
    }
}

/// The closed set of things a rule can do with a match.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Emit the matched text as-is.
    Identity,
    /// Consume the match, emit nothing.
    Ignore,
    /// Emit the converter's output as the value.
    Convert(Converter),
    /// Emit `keep` as the value if the match contains it, otherwise nothing.
    KeepIf { keep: String },
    /// Make `target` the active ruleset, then handle the match as `then` does.
    Switch { target: SwitchTarget, then: Box<Transform> },
}

/// One named pattern with its transformation.
///
/// Patterns are compiled on construction so a bad one is reported against the
/// rule that carries it. A rule without a pattern reserves its name as a token
/// kind but never matches anything.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    name: String,
    pattern: Option<Regex>,
    transform: Transform,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();
        match Regex::new(&pattern) {
            Ok(regex) => Ok(Self { name, pattern: Some(regex), transform: Transform::Identity }),
            Err(source) => Err(LexError::InvalidPattern { rule: name, pattern, source }),
        }
    }

    /// A name-only rule: registered as a token kind, excluded from matching.
    pub fn reserved(name: impl Into<String>) -> Self {
        Self { name: name.into(), pattern: None, transform: Transform::Identity }
    }

    pub fn ignore(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        Ok(Self::new(name, pattern)?.with_transform(Transform::Ignore))
    }

    pub fn convert(name: impl Into<String>, pattern: impl Into<String>, converter: Converter) -> Result<Self> {
        Ok(Self::new(name, pattern)?.with_transform(Transform::Convert(converter)))
    }

    pub fn integer(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        Self::convert(name, pattern, Converter::integer())
    }

    pub fn keep_if(name: impl Into<String>, pattern: impl Into<String>, keep: impl Into<String>) -> Result<Self> {
        Ok(Self::new(name, pattern)?.with_transform(Transform::KeepIf { keep: keep.into() }))
    }

    /// Switch to `target` and emit the match unchanged.
    pub fn switch(name: impl Into<String>, pattern: impl Into<String>, target: SwitchTarget) -> Result<Self> {
        Ok(Self::new(name, pattern)?.switching(target))
    }

    /// Make this rule switch to `target` on top of its current transform, so
    /// an ignored or converted match can still change rulesets.
    pub fn switching(mut self, target: SwitchTarget) -> Self {
        let then = match self.transform {
            Transform::Switch { then, .. } => then,
            other => Box::new(other),
        };
        self.transform = Transform::Switch { target, then };
        self
    }

    /// `keyword("if")` is the rule `IF` matching `if` when no ASCII word
    /// character follows.
    ///
    /// A word ending in a word character needs a boundary after it; one ending
    /// in anything else needs the opposite, so `<=` matches in `<= x` but not
    /// in `<=x`.
    pub fn keyword(word: &str) -> Result<Self> {
        // `(?-u:\B)` is rejected for str patterns, so a non-word ending uses the Unicode form.
        let boundary = match word.chars().next_back() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => r"(?-u:\b)",
            Some(c) if c.is_alphanumeric() => r"\b",
            _ => r"\B",
        };
        Self::new(word.to_uppercase(), format!("{}{boundary}", regex::escape(word)))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    pub(crate) fn regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tokenizer;
    use rstest::rstest;

    #[test]
    fn bad_pattern_fails_at_construction() {
        let err = RuleSpec::new("BROKEN", "(abc").unwrap_err();
        let LexError::InvalidPattern { rule, pattern, .. } = &err else {
            panic!("expected InvalidPattern, got {err:?}");
        };
        assert_eq!(rule, "BROKEN");
        assert_eq!(pattern, "(abc");
        assert!(err.to_string().contains("'(abc'"));
    }

    #[test]
    fn keyword_uppercases_and_escapes() {
        let rule = RuleSpec::keyword("if").unwrap();
        assert_eq!(rule.name(), "IF");
        assert_eq!(rule.pattern(), Some(r"if(?-u:\b)"));

        let dotted = RuleSpec::keyword(".word").unwrap();
        assert_eq!(dotted.pattern(), Some(r"\.word(?-u:\b)"));

        let op = RuleSpec::keyword("<=").unwrap();
        assert_eq!(op.name(), "<=");
        assert_eq!(op.pattern(), Some(r"<=\B"));
    }

    fn operator_tokenizer() -> Tokenizer {
        Tokenizer::new(vec![
            RuleSpec::keyword("<=").unwrap(),
            RuleSpec::new("OP", "[<=]+").unwrap(),
            RuleSpec::new("ID", "[a-z]+").unwrap(),
            RuleSpec::ignore("WS", r"\s+").unwrap(),
        ])
        .unwrap()
    }

    #[rstest]
    #[case("<= x", &["<=", "ID"])]
    #[case("<=x", &["OP", "ID"])]
    #[case("<=", &["<="])]
    fn punctuation_keyword_needs_a_non_word_follower(#[case] text: &str, #[case] expected: &[&str]) {
        let tokenizer = operator_tokenizer();
        let names: Vec<&str> =
            tokenizer.tokenize_unit(text).unwrap().iter().map(|t| tokenizer.kind_name(t).unwrap()).collect();
        assert_eq!(names, expected);
    }

    #[rstest]
    #[case("if x", true)]
    #[case("ifx", false)]
    #[case("if\u{e9}", true)]
    fn word_keyword_boundary_is_ascii(#[case] text: &str, #[case] matches_keyword: bool) {
        let rule = RuleSpec::keyword("if").unwrap();
        let found = rule.regex().and_then(|r| r.find(text)).is_some_and(|m| m.start() == 0);
        assert_eq!(found, matches_keyword);
    }

    #[test]
    fn switching_wraps_the_current_transform() {
        let rule = RuleSpec::ignore("OPEN", r"/\*").unwrap().switching(SwitchTarget::named("COMMENT"));
        let Transform::Switch { target, then } = rule.transform() else {
            panic!("expected a switch, got {:?}", rule.transform());
        };
        assert_eq!(target, &SwitchTarget::named("COMMENT"));
        assert!(matches!(**then, Transform::Ignore));

        let retargeted = rule.switching(SwitchTarget::Next);
        let Transform::Switch { target, then } = retargeted.transform() else {
            panic!("expected a switch");
        };
        assert_eq!(target, &SwitchTarget::Next);
        assert!(matches!(**then, Transform::Ignore));
    }

    #[test]
    fn reserved_rule_has_no_pattern() {
        let rule = RuleSpec::reserved("EOF");
        assert_eq!(rule.pattern(), None);
        assert!(matches!(rule.transform(), Transform::Identity));
    }

    #[test]
    fn converters_report_failures() {
        assert_eq!(Converter::integer().convert("-42"), Ok(TokenValue::Int(-42)));
        assert!(Converter::integer().convert("4x").is_err());
        assert_eq!(Converter::radix(8).convert("777"), Ok(TokenValue::Int(511)));
        assert!(Converter::radix(8).convert("8").unwrap_err().starts_with("base 8"));
        assert_eq!(Converter::float().convert("2.5"), Ok(TokenValue::Float(2.5)));
    }

    #[test]
    fn ruleset_names_display() {
        assert_eq!(RulesetName::Default.to_string(), "<default>");
        assert_eq!(RulesetName::from("COMMENT").to_string(), "COMMENT");
        assert!(RulesetName::Default.is_default());
    }
}
