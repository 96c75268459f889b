//! Backslash line continuation.
//!
//! An adapter over a stream of units (lines with their terminators) that joins
//! a line ending in an escaped terminator onto the line after it:
//!
//! ```text
//! "foo \\\n"  ─┐
//! "bar\n"     ─┴─▶ "foo bar\n", "\n"   (filler keeps the line count)
//! ```
//!
//! A terminator is escaped when it is preceded by an odd number of
//! backslashes; with an even run the backslashes are left alone and the line
//! passes through. Backslashes anywhere else in a line are not looked at.

use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Iterator adapter performing backslash-newline joining.
#[derive(Debug)]
pub struct LineContinuation<I> {
    units: I,
    preserve_line_count: bool,
    carry: String,
    fillers: usize,
    ready: VecDeque<String>,
    exhausted: bool,
}

impl<I> LineContinuation<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Join continued lines, emitting a blank `"\n"` unit after each merged
    /// unit for every line folded into it.
    pub fn new(units: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            units: units.into_iter(),
            preserve_line_count: true,
            carry: String::new(),
            fillers: 0,
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Whether to emit filler units; on by default.
    pub fn preserve_line_count(mut self, preserve: bool) -> Self {
        self.preserve_line_count = preserve;
        self
    }

    fn flush(&mut self, unit: String) {
        self.ready.push_back(unit);
        self.ready.extend(std::iter::repeat_n(String::from("\n"), self.fillers));
        self.fillers = 0;
    }
}

/// The unit minus its escaped terminator, if the terminator is escaped.
fn continued(unit: &str) -> Option<&str> {
    let body = unit.strip_suffix('\n')?;
    let body = body.strip_suffix('\r').unwrap_or(body);
    let run = body.bytes().rev().take_while(|&b| b == b'\\').count();
    (run % 2 == 1).then(|| &body[..body.len() - 1])
}

impl<I> Iterator for LineContinuation<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(unit) = self.ready.pop_front() {
                return Some(unit);
            }
            if self.exhausted {
                return None;
            }

            match self.units.next() {
                Some(unit) => {
                    let unit = unit.as_ref();
                    if let Some(body) = continued(unit) {
                        self.carry.push_str(body);
                        if self.preserve_line_count {
                            self.fillers += 1;
                        }
                    } else {
                        let mut joined = std::mem::take(&mut self.carry);
                        joined.push_str(unit);
                        self.flush(joined);
                    }
                }
                None => {
                    self.exhausted = true;
                    if !self.carry.is_empty() {
                        let rest = std::mem::take(&mut self.carry);
                        self.ready.push_back(rest);
                    }
                    self.ready.extend(std::iter::repeat_n(String::from("\n"), self.fillers));
                    self.fillers = 0;
                }
            }
        }
    }
}

impl<I> FusedIterator for LineContinuation<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
}

/// Split `text` into units, each keeping its trailing `\n`.
pub fn split_units(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}
