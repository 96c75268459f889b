//! Line-oriented assembler syntax in the PDP-11 style.
//!
//! Numbers are octal unless they end in a dot (`10.` is ten). Whitespace is
//! dropped except that any run containing a newline becomes a single `NEWLINE`
//! token, so statements stay separated.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{Converter, Result, RuleSpec, RuleTable, TokenValue, Tokenizer};

static TABLE: Lazy<Result<Arc<RuleTable>>> = Lazy::new(|| grammar().and_then(RuleTable::compile).map(Arc::new));

pub fn tokenizer() -> Result<Tokenizer> {
    super::shared(&TABLE)
}

pub fn grammar() -> Result<Vec<RuleSpec>> {
    let label = Converter::new("label", |text| Ok(TokenValue::from(text.trim_end_matches(':'))));
    let decimal = Converter::new("decimal", |text| {
        text.trim_end_matches('.').parse::<i64>().map(TokenValue::Int).map_err(|e| e.to_string())
    });

    rules![
        keep_if "NEWLINE" => r"\s+", keep: "\n";
        ignore "COMMENT" => ";.*";
        convert "LABEL" => r"[A-Za-z_.$][A-Za-z0-9_.$]*:", with: label;
        "REGISTER" => r"(?:r[0-7]|sp|pc)\b";
        convert "DECIMAL" => r"[0-9]+\.", with: decimal;
        convert "OCTAL" => r"[0-7]+\b", with: Converter::radix(8);
        "SYMBOL" => r"[A-Za-z_.$][A-Za-z0-9_.$]*";
        "IMMEDIATE" => "#";
        "DEFERRED" => "@";
        "LPAREN" => r"\(";
        "RPAREN" => r"\)";
        "PLUS" => r"\+";
        "MINUS" => "-";
        "COMMA" => ",";
        "ASSIGN" => "=";
    ]
}
