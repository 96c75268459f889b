//! Ready-made grammars.
//!
//! These are ordinary rule lists built with the public API. They serve the CLI
//! and double as worked examples of each transformation.

use std::sync::Arc;

use crate::{RuleTable, Tokenizer};

pub mod asm;
pub mod clike;

fn shared(table: &crate::Result<Arc<RuleTable>>) -> crate::Result<Tokenizer> {
    table.as_ref().map(|t| Tokenizer::from_table(Arc::clone(t))).map_err(Clone::clone)
}
