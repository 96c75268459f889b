//! Token-kind registry.
//!
//! The set of kinds is closed: one per distinct rule name across every
//! ruleset, assigned in name order so ids do not depend on how rules were
//! declared. A registry can also be built from an explicit name list and
//! handed to several tokenizers so related grammars agree on ids.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::compiled_rules::RuleTable;

/// Opaque token-kind identifier. Only meaningful together with the
/// [`TokenKinds`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(u32);

impl TokenKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKinds {
    names: Vec<String>,
    ids: HashMap<String, TokenKind>,
}

impl TokenKinds {
    /// Registry from arbitrary names; duplicates merge.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let names: Vec<String> = sorted.into_iter().collect();
        let ids = names.iter().enumerate().map(|(i, name)| (name.clone(), TokenKind(i as u32))).collect();
        Self { names, ids }
    }

    /// Registry covering every rule name in `table`.
    pub fn from_table(table: &RuleTable) -> Self {
        Self::from_names(table.rule_names())
    }

    pub fn get(&self, name: &str) -> Option<TokenKind> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, kind: TokenKind) -> Option<&str> {
        self.names.get(kind.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Kinds with their names, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenKind, &str)> + '_ {
        self.names.iter().enumerate().map(|(i, name)| (TokenKind(i as u32), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleSpec, RulesetName};

    #[test]
    fn ids_follow_name_order_not_declaration_order() {
        let kinds = TokenKinds::from_names(["ZED", "ALPHA", "MID", "ALPHA"]);
        assert_eq!(kinds.len(), 3);
        let names: Vec<&str> = kinds.iter().map(|(_, n)| n).collect();
        assert_eq!(names, ["ALPHA", "MID", "ZED"]);
        assert!(kinds.get("ALPHA") < kinds.get("ZED"));
    }

    #[test]
    fn names_merge_across_rulesets() {
        let table = RuleTable::compile([
            (RulesetName::Default, vec![RuleSpec::new("FOO", "f").unwrap(), RuleSpec::new("BAR", "b").unwrap()]),
            (RulesetName::named("ALT"), vec![RuleSpec::new("FOO", "g").unwrap(), RuleSpec::reserved("EOF")]),
        ])
        .unwrap();
        let kinds = TokenKinds::from_table(&table);
        assert_eq!(kinds.iter().map(|(_, n)| n).collect::<Vec<_>>(), ["BAR", "EOF", "FOO"]);
    }

    #[test]
    fn lookups_round_trip() {
        let kinds = TokenKinds::from_names(["A", "B"]);
        let b = kinds.get("B").unwrap();
        assert_eq!(kinds.name(b), Some("B"));
        assert_eq!(kinds.get("C"), None);
        assert!(!kinds.is_empty());
    }
}
