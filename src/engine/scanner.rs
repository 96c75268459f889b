//! The scan loop.
//!
//! A `Tokens` value is one in-progress scan: it pulls units from its source on
//! demand and yields tokens one at a time. Its mutable state is the active
//! ruleset (which persists from unit to unit) and, within a unit, the cursor
//! marking how much of the unit has been consumed.
//!
//! ## Per-unit loop
//!
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            v                                                │
//! active ruleset changed? ── yes ─▶ restart search at cursor  │
//!            │                                                │
//!            v                                                │
//! next match of the active alternation                        │
//!   none, or starts past cursor ──▶ stop: cursor == len ? done : Unmatched
//!            │                                                │
//!            v                                                │
//! cursor = match end; transform; maybe switch ruleset         │
//!            │                                                │
//!            └── emit token (unless ignored) ─────────────────┘
//! ```
//!
//! There is no skipping ahead: a gap between the cursor and the next match is
//! a lexical error for the unit. An empty match is accepted at most once per
//! position, so a scan always makes progress.

use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::{debug, trace};

use super::compiled_rules::{RuleTable, Ruleset};
use super::metrics::ScanStats;
use super::registry::TokenKinds;
use super::transform::{Outcome, apply};
use crate::{LexError, Location, Result, RulesetName, ScanOptions, Token};

/// Lazy token stream over a sequence of units.
///
/// Yields `Err` at most once: after a failure the stream is exhausted.
#[derive(Debug)]
pub struct Tokens<I> {
    table: Arc<RuleTable>,
    kinds: Arc<TokenKinds>,
    source: Option<Arc<str>>,
    units: I,
    next_line: Option<usize>,
    /// Index of the active ruleset in `table`.
    active: usize,
    unit: Option<UnitScan>,
    stats: ScanStats,
    finished: bool,
}

#[derive(Debug)]
struct UnitScan {
    text: Arc<str>,
    line: Option<usize>,
    cursor: usize,
    pass: Option<Pass>,
    /// Position of the last empty match taken in this unit.
    empty_at: Option<usize>,
}

/// Search state for one ruleset over the unconsumed suffix of a unit.
#[derive(Debug, Clone, Copy)]
struct Pass {
    ruleset: usize,
    /// Cursor when the pass started; match positions are relative to it.
    base: usize,
    search_at: usize,
    /// Position of the last empty match in this pass, relative to `base`.
    last_empty: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    rule: usize,
    start: usize,
    end: usize,
}

enum Step {
    Emit(Token),
    Skip,
    EndOfUnit,
}

impl<I> Tokens<I> {
    pub(crate) fn new(table: Arc<RuleTable>, kinds: Arc<TokenKinds>, options: &ScanOptions, units: I) -> Self {
        let active = table.default_index();
        Self {
            table,
            kinds,
            source: options.source.clone(),
            units,
            next_line: options.start_line,
            active,
            unit: None,
            stats: ScanStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Name of the ruleset that will be used for the next match.
    pub fn active_ruleset(&self) -> &RulesetName {
        self.table.get(self.active).name()
    }

    fn begin_unit(&mut self, text: Arc<str>) {
        let line = self.next_line;
        self.next_line = line.map(|n| n + 1);
        self.stats.units += 1;
        self.unit = Some(UnitScan { text, line, cursor: 0, pass: None, empty_at: None });
    }

    fn step(&mut self) -> Result<Step> {
        let Some(scan) = self.unit.as_mut() else {
            return Ok(Step::EndOfUnit);
        };
        let table = &*self.table;

        if scan.pass.map(|p| p.ruleset) != Some(self.active) {
            let last_empty = (scan.empty_at == Some(scan.cursor)).then_some(0);
            scan.pass = Some(Pass { ruleset: self.active, base: scan.cursor, search_at: 0, last_empty });
        }
        let Some(pass) = scan.pass.as_mut() else {
            return Ok(Step::EndOfUnit);
        };
        let ruleset = table.get(pass.ruleset);

        let candidate = next_candidate(ruleset, &scan.text, pass).filter(|c| c.start == scan.cursor);
        let Some(Candidate { rule: rule_index, start, end }) = candidate else {
            if scan.cursor == scan.text.len() {
                trace!(line = ?scan.line, "unit consumed");
                return Ok(Step::EndOfUnit);
            }
            debug!(ruleset = %ruleset.name(), line = ?scan.line, offset = scan.cursor, "no rule matches at cursor");
            return Err(LexError::Unmatched {
                label: self.source.clone(),
                line: scan.line,
                offset: scan.cursor,
                unit: scan.text.clone(),
            });
        };

        scan.cursor = end;
        if start == end {
            scan.empty_at = Some(end);
        }

        let rule = &ruleset.rules()[rule_index];
        let text = &scan.text[start..end];
        let location = Location { source: self.source.clone(), line: scan.line, start, end };

        let outcome = apply(rule.transform(), text).map_err(|reason| LexError::Conversion {
            rule: rule.name().to_string(),
            text: text.to_string(),
            reason,
            location: location.clone(),
        })?;

        if let Some(to) = ruleset.switch_for(rule_index) {
            let next = table.follow(self.active, to);
            debug!(rule = rule.name(), from = %ruleset.name(), to = %table.get(next).name(), "switching ruleset");
            self.active = next;
            self.stats.switches += 1;
        }

        match outcome {
            Outcome::Drop => {
                self.stats.ignored += 1;
                Ok(Step::Skip)
            }
            Outcome::Emit(value) => {
                let kind = self.kinds.get(rule.name()).ok_or_else(|| LexError::UnresolvedKind { name: rule.name().to_string() })?;
                self.stats.tokens += 1;
                Ok(Step::Emit(Token { kind, value, origin: scan.text.clone(), location }))
            }
        }
    }
}

/// Next match of `ruleset` in the suffix of `unit` that `pass` covers.
///
/// Searching resumes where the previous match ended. An empty match may follow
/// a non-empty one at the same position, but never another empty one: when
/// the alternation's preferred match would repeat an empty match, the first
/// rule with a non-empty match there is taken instead, and failing that the
/// search moves one character on.
fn next_candidate(ruleset: &Ruleset, unit: &str, pass: &mut Pass) -> Option<Candidate> {
    let regex = ruleset.pattern()?;
    let haystack = unit.get(pass.base..)?;
    let mut at = pass.search_at;

    loop {
        if at > haystack.len() {
            return None;
        }
        let caps = regex.captures_at(haystack, at)?;
        let whole = caps.get(0)?;
        let (rule, start, end) = if whole.is_empty() && pass.last_empty == Some(whole.start()) {
            match non_empty_at(ruleset, haystack, whole.start()) {
                Some(found) => found,
                None => {
                    at = step_past(haystack, whole.start())?;
                    continue;
                }
            }
        } else {
            (ruleset.rule_for(&caps)?, whole.start(), whole.end())
        };

        pass.search_at = end;
        pass.last_empty = (start == end).then_some(end);
        return Some(Candidate { rule, start: pass.base + start, end: pass.base + end });
    }
}

/// First rule, in declaration order, whose match at `at` is non-empty.
fn non_empty_at(ruleset: &Ruleset, haystack: &str, at: usize) -> Option<(usize, usize, usize)> {
    ruleset.rules().iter().enumerate().find_map(|(index, rule)| {
        let m = rule.regex()?.find_at(haystack, at)?;
        (m.start() == at && !m.is_empty()).then_some((index, m.start(), m.end()))
    })
}

fn step_past(haystack: &str, at: usize) -> Option<usize> {
    haystack.get(at..)?.chars().next().map(|c| at + c.len_utf8())
}

impl<I> Iterator for Tokens<I>
where
    I: Iterator,
    I::Item: Into<Arc<str>>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if self.unit.is_none() {
                let Some(text) = self.units.next() else {
                    self.finished = true;
                    return None;
                };
                self.begin_unit(text.into());
            }

            match self.step() {
                Ok(Step::Emit(token)) => return Some(Ok(token)),
                Ok(Step::Skip) => {}
                Ok(Step::EndOfUnit) => self.unit = None,
                Err(err) => {
                    self.finished = true;
                    self.unit = None;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<I> FusedIterator for Tokens<I>
where
    I: Iterator,
    I::Item: Into<Arc<str>>,
{
}
