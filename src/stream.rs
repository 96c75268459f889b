//! Lookahead and backtracking over a token stream.
//!
//! Hand-written parsers sitting on top of a [`Tokens`](crate::Tokens) scan
//! usually want to peek ahead, push tokens back, or try a production and undo
//! it if it fails. `TokenStream` adds that to any iterator.
//!
//! Several streams can be read back to back with [`TokenStream::chained`].
//!
//! Marks nest. Items consumed while a mark is open are recorded against it;
//! rewinding pushes them back in order, accepting keeps them consumed and hands
//! them to the enclosing mark, if any, so an outer rewind still restores them:
//!
//! ```text
//! mark A ── get 1 ── mark B ── get 2 ── accept B ── get 3 ── rewind A
//!                                                   next: 1, 2, 3
//! ```
//!
//! The eof item is never recorded, so rewinding over it leaves the stream at
//! eof.

use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Handle for an open mark; see [`TokenStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug)]
pub struct TokenStream<I: Iterator> {
    inner: I,
    /// Yielded once after `inner` runs dry.
    last: Option<I::Item>,
    /// Returned forever once everything else is exhausted.
    eof: Option<I::Item>,
    pushed: VecDeque<I::Item>,
    marks: Vec<Vec<I::Item>>,
}

impl<I> TokenStream<I>
where
    I: Iterator,
    I::Item: Clone,
{
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Self { inner: inner.into_iter(), last: None, eof: None, pushed: VecDeque::new(), marks: Vec::new() }
    }

    /// Append one final item after the wrapped stream ends.
    pub fn with_last(mut self, item: I::Item) -> Self {
        self.last = Some(item);
        self
    }

    /// Return `item` indefinitely once the stream is exhausted, instead of
    /// ending. A stream with an eof item never returns `None`.
    pub fn with_eof(mut self, item: I::Item) -> Self {
        self.eof = Some(item);
        self
    }

    fn fill(&mut self, n: usize) {
        while self.pushed.len() < n {
            match self.inner.next().or_else(|| self.last.take()) {
                Some(item) => self.pushed.push_back(item),
                None => break,
            }
        }
    }

    pub fn peek(&mut self) -> Option<&I::Item> {
        self.fill(1);
        self.pushed.front().or(self.eof.as_ref())
    }

    /// The next item if `pred` accepts it, or `eof_match` whatever `pred`
    /// says once the stream is at eof.
    pub fn peek_if_or<'a>(
        &'a mut self,
        pred: impl FnOnce(&I::Item) -> bool,
        eof_match: &'a I::Item,
    ) -> Option<&'a I::Item> {
        if self.at_eof() {
            return Some(eof_match);
        }
        self.peek_if(pred)
    }

    /// Up to `n` upcoming items without consuming them. Shorter than `n` only
    /// when the stream ends and has no eof item.
    pub fn peek_n(&mut self, n: usize) -> Vec<&I::Item> {
        self.fill(n);
        let real = self.pushed.len().min(n);
        let padding = match &self.eof {
            Some(eof) => std::iter::repeat_n(eof, n - real).collect(),
            None => Vec::new(),
        };
        self.pushed.iter().take(real).chain(padding).collect()
    }

    /// The next item, if `pred` accepts it.
    pub fn peek_if(&mut self, pred: impl FnOnce(&I::Item) -> bool) -> Option<&I::Item> {
        self.peek().filter(|item| pred(item))
    }

    /// True once only the eof item (or nothing) remains.
    pub fn at_eof(&mut self) -> bool {
        self.fill(1);
        self.pushed.is_empty()
    }

    pub fn next_token(&mut self) -> Option<I::Item> {
        self.fill(1);
        let Some(item) = self.pushed.pop_front() else {
            return self.eof.clone();
        };
        if let Some(frame) = self.marks.last_mut() {
            frame.push(item.clone());
        }
        Some(item)
    }

    /// Consume up to `n` items.
    pub fn take_n(&mut self, n: usize) -> Vec<I::Item> {
        (0..n).map_while(|_| self.next_token()).collect()
    }

    /// Push `item` back onto the front of the stream.
    pub fn unget(&mut self, item: I::Item) {
        self.pushed.push_front(item);
    }

    /// Push `items` back so that they come out again in the given order.
    pub fn unget_all(&mut self, items: Vec<I::Item>) {
        for item in items.into_iter().rev() {
            self.pushed.push_front(item);
        }
    }

    /// Start recording consumed items.
    pub fn mark(&mut self) -> Mark {
        self.marks.push(Vec::new());
        Mark(self.marks.len())
    }

    /// Everything recorded since `mark`, closing it and any mark opened after it.
    fn close(&mut self, mark: Mark) -> Option<Vec<I::Item>> {
        let Mark(depth) = mark;
        if depth == 0 || depth > self.marks.len() {
            return None;
        }
        Some(self.marks.drain(depth - 1..).flatten().collect())
    }

    /// Keep everything consumed since `mark`.
    pub fn accept(&mut self, mark: Mark) {
        if let Some(consumed) = self.close(mark) {
            if let Some(parent) = self.marks.last_mut() {
                parent.extend(consumed);
            }
        }
    }

    /// Put back everything consumed since `mark`.
    pub fn rewind(&mut self, mark: Mark) {
        if let Some(consumed) = self.close(mark) {
            self.unget_all(consumed);
        }
    }

    /// Run `f` under a mark: accepted if it returns `Some`, rewound otherwise.
    pub fn attempt<R>(&mut self, f: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        let mark = self.mark();
        let result = f(self);
        match result {
            Some(_) => self.accept(mark),
            None => self.rewind(mark),
        }
        result
    }
}

impl<S> TokenStream<std::iter::Flatten<S>>
where
    S: Iterator,
    S::Item: IntoIterator,
    <S::Item as IntoIterator>::Item: Clone,
{
    /// Read `streams` one after another as a single stream.
    pub fn chained(streams: impl IntoIterator<IntoIter = S>) -> Self {
        Self::new(streams.into_iter().flatten())
    }
}

impl<I> Iterator for TokenStream<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.next_token()
    }
}

impl<I> FusedIterator for TokenStream<I>
where
    I: FusedIterator,
    I::Item: Clone,
{
}
