//! Matching engine.
//!
//! Tokenizing is split into a static side and a scanning side:
//!
//! ```text
//! Vec<RuleSpec> / [(RulesetName, Vec<RuleSpec>)]
//!        │  Grammar (one canonical shape)
//!        v
//!  RuleTable::compile                          (compiled_rules.rs)
//!    - one alternation per ruleset, labelled per rule
//!    - switch targets resolved to ruleset indices
//!        │
//!        ├── TokenKinds::from_table            (registry.rs)
//!        │     sorted, de-duplicated rule names
//!        v
//!  Tokens (one per scan)                       (scanner.rs)
//!    - active ruleset + cursor
//!    - per unit: match at cursor, apply transform (transform.rs), emit
//!    - ScanStats                               (metrics.rs)
//! ```
//!
//! `RuleTable` and `TokenKinds` are immutable once built and are shared behind
//! `Arc`s. Everything mutable lives in a `Tokens` value, which belongs to a
//! single scan.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events at `debug` (compilation, ruleset switches,
//! failures) and `trace` (per-unit progress) level.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/transform.rs"]
mod transform;

pub use compiled_rules::{Grammar, RuleTable, Ruleset};
pub use metrics::ScanStats;
pub use registry::{TokenKind, TokenKinds};
pub use scanner::Tokens;
