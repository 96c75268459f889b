//! Ruleset compilation.
//!
//! This is the static side of the engine. Each ruleset's rules are merged into
//! one alternation where every member pattern sits in its own labelled group:
//!
//! ```text
//! [IF "if\b", IDENT "[a-z]+", WS "\s+"]
//!   ──▶  (?P<PN0000>if\b)|(?P<PN0001>[a-z]+)|(?P<PN0002>\s+)
//! ```
//!
//! Labels are positional rather than rule names because names may repeat.
//! The alternation is leftmost-first, so when two members could match at the
//! same offset the one declared earlier wins. That is the engine's tie-break
//! rule and callers order their rules around it.
//!
//! ## Invariants
//!
//! - Every ruleset has at least one rule; the default ruleset always exists.
//! - `Ruleset::labels` maps capture-group indices to indices into
//!   `Ruleset::rules`; rules without a pattern have no label.
//! - Switch targets are resolved to ruleset indices here, so the scanner never
//!   looks a ruleset up by name.

use std::collections::HashMap;

use regex::{Captures, Regex};
use tracing::debug;

use crate::{LexError, Result, RuleSpec, RulesetName, SwitchTarget, Transform};

/// Rule declarations in either accepted shape.
///
/// A flat list is the default ruleset on its own; the mapping form must name
/// the default ruleset and keeps declaration order, which is what
/// [`SwitchTarget::Next`] follows.
#[derive(Debug, Clone)]
pub enum Grammar {
    Flat(Vec<RuleSpec>),
    Rulesets(Vec<(RulesetName, Vec<RuleSpec>)>),
}

impl Grammar {
    fn into_rulesets(self) -> Vec<(RulesetName, Vec<RuleSpec>)> {
        match self {
            Grammar::Flat(rules) => vec![(RulesetName::Default, rules)],
            Grammar::Rulesets(rulesets) => rulesets,
        }
    }
}

impl From<Vec<RuleSpec>> for Grammar {
    fn from(rules: Vec<RuleSpec>) -> Self {
        Grammar::Flat(rules)
    }
}

impl From<Vec<(RulesetName, Vec<RuleSpec>)>> for Grammar {
    fn from(rulesets: Vec<(RulesetName, Vec<RuleSpec>)>) -> Self {
        Grammar::Rulesets(rulesets)
    }
}

impl<const N: usize> From<[(RulesetName, Vec<RuleSpec>); N]> for Grammar {
    fn from(rulesets: [(RulesetName, Vec<RuleSpec>); N]) -> Self {
        Grammar::Rulesets(rulesets.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwitchTo {
    Index(usize),
    Next,
}

/// A compiled, named group of rules.
#[derive(Debug)]
pub struct Ruleset {
    name: RulesetName,
    rules: Vec<RuleSpec>,
    /// `None` when no member has a pattern.
    pattern: Option<Regex>,
    /// (capture group index, rule index), in declaration order.
    labels: Vec<(usize, usize)>,
    /// Resolved destination for each `Transform::Switch` rule.
    switches: Vec<Option<SwitchTo>>,
}

impl Ruleset {
    fn compile(name: RulesetName, rules: Vec<RuleSpec>) -> Result<Self> {
        if rules.is_empty() {
            return Err(LexError::EmptyRuleset { ruleset: name });
        }

        let alternatives: Vec<(String, &str)> = rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| rule.pattern().map(|p| (format!("PN{i:04}"), p)))
            .collect();

        let (pattern, labels) = if alternatives.is_empty() {
            (None, Vec::new())
        } else {
            let joined = alternatives.iter().map(|(label, p)| format!("(?P<{label}>{p})")).collect::<Vec<_>>().join("|");
            let regex = Regex::new(&joined).map_err(|source| LexError::CombinedPattern { ruleset: name.clone(), source })?;
            let labels = label_slots(&regex, &alternatives);
            (Some(regex), labels)
        };

        debug!(ruleset = %name, rules = rules.len(), matchable = labels.len(), "compiled ruleset");

        let switches = vec![None; rules.len()];
        Ok(Self { name, rules, pattern, labels, switches })
    }

    pub fn name(&self) -> &RulesetName {
        &self.name
    }

    /// Rules in declaration (priority) order.
    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    /// The combined alternation, if any rule has a pattern.
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Index of the rule whose labelled group took part in `caps`.
    pub(crate) fn rule_for(&self, caps: &Captures<'_>) -> Option<usize> {
        self.labels.iter().find(|(group, _)| caps.get(*group).is_some()).map(|(_, rule)| *rule)
    }

    pub(crate) fn switch_for(&self, index: usize) -> Option<SwitchTo> {
        self.switches.get(index).copied().flatten()
    }
}

fn label_slots(regex: &Regex, alternatives: &[(String, &str)]) -> Vec<(usize, usize)> {
    let names: Vec<Option<&str>> = regex.capture_names().collect();
    alternatives
        .iter()
        .filter_map(|(label, _)| {
            let group = names.iter().position(|n| *n == Some(label.as_str()))?;
            let rule = label.strip_prefix("PN")?.parse::<usize>().ok()?;
            Some((group, rule))
        })
        .collect()
}

/// Every ruleset of a grammar, compiled.
#[derive(Debug)]
pub struct RuleTable {
    rulesets: Vec<Ruleset>,
    by_name: HashMap<RulesetName, usize>,
    default: usize,
}

impl RuleTable {
    /// Validate and compile a grammar.
    ///
    /// Fails if the default ruleset is missing, a ruleset is declared twice or
    /// is empty, a combined pattern does not compile, or a switch rule names an
    /// undeclared ruleset.
    pub fn compile(grammar: impl Into<Grammar>) -> Result<Self> {
        let declared = grammar.into().into_rulesets();

        let default = declared.iter().position(|(name, _)| name.is_default()).ok_or(LexError::MissingDefaultRuleset)?;

        let mut by_name = HashMap::with_capacity(declared.len());
        for (index, (name, _)) in declared.iter().enumerate() {
            if by_name.insert(name.clone(), index).is_some() {
                return Err(LexError::DuplicateRuleset { ruleset: name.clone() });
            }
        }

        if let Some((name, _)) = declared.iter().find(|(_, rules)| rules.is_empty()) {
            return Err(LexError::EmptyRuleset { ruleset: name.clone() });
        }

        let mut rulesets = declared.into_iter().map(|(name, rules)| Ruleset::compile(name, rules)).collect::<Result<Vec<_>>>()?;

        for ruleset in &mut rulesets {
            for (index, rule) in ruleset.rules.iter().enumerate() {
                let Transform::Switch { target, .. } = rule.transform() else { continue };
                let resolved = match target {
                    SwitchTarget::Next => SwitchTo::Next,
                    SwitchTarget::Ruleset(name) => match by_name.get(name) {
                        Some(&to) => SwitchTo::Index(to),
                        None => {
                            return Err(LexError::UnknownRuleset { rule: rule.name().to_string(), target: name.clone() });
                        }
                    },
                };
                ruleset.switches[index] = Some(resolved);
            }
        }

        Ok(Self { rulesets, by_name, default })
    }

    /// Rulesets in declaration order.
    pub fn rulesets(&self) -> &[Ruleset] {
        &self.rulesets
    }

    pub fn ruleset(&self, name: &RulesetName) -> Option<&Ruleset> {
        self.by_name.get(name).and_then(|&i| self.rulesets.get(i))
    }

    pub fn default_ruleset(&self) -> &Ruleset {
        &self.rulesets[self.default]
    }

    /// Every rule name across all rulesets, duplicates included.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rulesets.iter().flat_map(|rs| rs.rules.iter().map(|r| r.name()))
    }

    pub(crate) fn default_index(&self) -> usize {
        self.default
    }

    pub(crate) fn get(&self, index: usize) -> &Ruleset {
        &self.rulesets[index]
    }

    /// Ruleset index reached by following `to` from `from`.
    pub(crate) fn follow(&self, from: usize, to: SwitchTo) -> usize {
        match to {
            SwitchTo::Index(index) => index,
            SwitchTo::Next => (from + 1) % self.rulesets.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    fn spec(name: &str, pattern: &str) -> RuleSpec {
        RuleSpec::new(name, pattern).unwrap()
    }

    #[test]
    fn flat_list_becomes_default_ruleset() {
        let table = RuleTable::compile(vec![spec("A", "a"), spec("B", "b")]).unwrap();
        assert_eq!(table.rulesets().len(), 1);
        assert!(table.default_ruleset().name().is_default());
        assert_eq!(table.default_ruleset().pattern().map(|r| r.as_str()), Some("(?P<PN0000>a)|(?P<PN0001>b)"));
    }

    #[test]
    fn reserved_rules_are_left_out_of_the_alternation() {
        let table = RuleTable::compile(vec![spec("A", "a"), RuleSpec::reserved("EOF"), spec("B", "b")]).unwrap();
        let ruleset = table.default_ruleset();
        assert_eq!(ruleset.pattern().map(|r| r.as_str()), Some("(?P<PN0000>a)|(?P<PN0002>b)"));
        assert_eq!(ruleset.labels.iter().map(|(_, r)| *r).collect::<Vec<_>>(), [0, 2]);
        assert_eq!(table.rule_names().collect::<Vec<_>>(), ["A", "EOF", "B"]);
    }

    #[test]
    fn only_reserved_rules_compile_to_no_pattern() {
        let table = RuleTable::compile(vec![RuleSpec::reserved("X")]).unwrap();
        assert!(table.default_ruleset().pattern().is_none());
    }

    #[test]
    fn mapping_requires_default() {
        let err = RuleTable::compile([(RulesetName::named("ALT"), vec![spec("A", "a")])]).unwrap_err();
        assert!(matches!(err, LexError::MissingDefaultRuleset));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn empty_rulesets_are_rejected() {
        let err = RuleTable::compile(Vec::<RuleSpec>::new()).unwrap_err();
        assert!(matches!(err, LexError::EmptyRuleset { ruleset: RulesetName::Default }));

        let err = RuleTable::compile([(RulesetName::Default, vec![spec("A", "a")]), (RulesetName::named("ALT"), vec![])])
            .unwrap_err();
        assert!(matches!(err, LexError::EmptyRuleset { ruleset } if ruleset == RulesetName::named("ALT")));
    }

    #[test]
    fn duplicate_ruleset_names_are_rejected() {
        let err = RuleTable::compile([
            (RulesetName::Default, vec![spec("A", "a")]),
            (RulesetName::named("ALT"), vec![spec("B", "b")]),
            (RulesetName::named("ALT"), vec![spec("C", "c")]),
        ])
        .unwrap_err();
        assert!(matches!(err, LexError::DuplicateRuleset { .. }));
    }

    #[test]
    fn switch_to_undeclared_ruleset_is_rejected() {
        let rules = vec![RuleSpec::switch("GO", "@", SwitchTarget::named("NOWHERE")).unwrap()];
        let err = RuleTable::compile(rules).unwrap_err();
        let LexError::UnknownRuleset { rule, target } = err else {
            panic!("expected UnknownRuleset");
        };
        assert_eq!(rule, "GO");
        assert_eq!(target, RulesetName::named("NOWHERE"));
    }

    #[test]
    fn clashing_group_names_fail_as_combined_pattern() {
        let err = RuleTable::compile(vec![spec("A", "(?P<x>a)"), spec("B", "(?P<x>b)")]).unwrap_err();
        assert!(matches!(err, LexError::CombinedPattern { .. }));
    }

    #[test]
    fn next_wraps_in_declaration_order() {
        let table = RuleTable::compile([
            (RulesetName::named("FIRST"), vec![RuleSpec::switch("N", "n", SwitchTarget::Next).unwrap()]),
            (RulesetName::Default, vec![spec("A", "a")]),
        ])
        .unwrap();
        assert_eq!(table.default_index(), 1);
        assert_eq!(table.follow(0, SwitchTo::Next), 1);
        assert_eq!(table.follow(1, SwitchTo::Next), 0);
        assert_eq!(table.get(0).switch_for(0), Some(SwitchTo::Next));
    }
}
