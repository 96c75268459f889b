//! Lexical rules for a small C-like language.
//!
//! Block comments live in their own `COMMENT` ruleset so they can span lines;
//! everything inside one is consumed without producing tokens.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{Converter, Result, RuleSpec, RuleTable, RulesetName, SwitchTarget, TokenValue, Tokenizer};

pub const COMMENT: &str = "COMMENT";

const KEYWORDS: &[&str] = &["break", "char", "continue", "else", "for", "if", "int", "return", "struct", "void", "while"];

static TABLE: Lazy<Result<Arc<RuleTable>>> = Lazy::new(|| grammar().and_then(RuleTable::compile).map(Arc::new));

/// Tokenizer over the shared, compiled grammar.
pub fn tokenizer() -> Result<Tokenizer> {
    super::shared(&TABLE)
}

fn hex() -> Converter {
    Converter::new("hex", |text| {
        let digits = text.get(2..).unwrap_or_default();
        i64::from_str_radix(digits, 16).map(TokenValue::Int).map_err(|e| e.to_string())
    })
}

/// The rulesets, default first.
pub fn grammar() -> Result<Vec<(RulesetName, Vec<RuleSpec>)>> {
    let mut main = rules![
        ignore "WHITESPACE" => r"\s+";
        switch "COMMENT_START" => r"/\*", to: SwitchTarget::named(COMMENT);
        ignore "LINE_COMMENT" => r"//.*";
    ]?;

    for word in KEYWORDS {
        main.push(RuleSpec::keyword(word)?);
    }

    main.extend(rules![
        "IDENTIFIER" => r"[A-Za-z_][A-Za-z_0-9]*";
        convert "HEX" => r"0[xX][0-9a-fA-F]+", with: hex();
        convert "FLOAT" => r"[0-9]+\.[0-9]*(?:[eE][-+]?[0-9]+)?", with: Converter::float();
        integer "CONSTANT" => r"[0-9]+";
        "STRING" => r#""(?:[^"\\]|\\.)*""#;
        "CHAR" => r"'(?:[^'\\]|\\.)'";
        "OPERATOR" => r"==|!=|<=|>=|&&|\|\||\+\+|--|->|[-+*/%<>=!&|^~]";
        "LBRACE" => r"\{";
        "RBRACE" => r"\}";
        "LPAREN" => r"\(";
        "RPAREN" => r"\)";
        "LBRACKET" => r"\[";
        "RBRACKET" => r"\]";
        "SEMICOLON" => ";";
        "COMMA" => ",";
    ]?);

    let comment = rules![
        ignore "C_NOTSTAR" => r"[^*]+";
        switch "COMMENT_END" => r"\*/", to: SwitchTarget::default_ruleset();
        ignore "C_STAR" => r"\*";
    ]?;

    Ok(vec![(RulesetName::Default, main), (RulesetName::named(COMMENT), comment)])
}
