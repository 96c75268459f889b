use rulelex::{LexError, ScanStats, Token, Tokenizer};

mod ansi {
    use std::fmt::Display;

    /// What a piece of report text is; decides its color.
    #[derive(Debug, Clone, Copy)]
    pub enum Role {
        Title,
        Rule,
        Position,
        Kind,
        Value,
        Count,
        Muted,
        Error,
    }

    impl Role {
        fn sgr(self) -> &'static str {
            match self {
                Role::Title => "1;36",
                Role::Rule => "90",
                Role::Position => "33",
                Role::Kind => "34",
                Role::Value => "1;32",
                Role::Count => "32",
                Role::Muted => "2",
                Role::Error => "1;31",
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn style(&self, role: Role, text: impl Display) -> String {
            if self.enabled { format!("\x1b[{}m{text}\x1b[0m", role.sgr()) } else { text.to_string() }
        }
    }
}

use ansi::{Palette, Role};

pub struct Report<'a> {
    pub label: &'a str,
    pub tokenizer: &'a Tokenizer,
    pub tokens: &'a [Token],
    pub stats: ScanStats,
}

pub fn print_scan(report: &Report<'_>, failure: Option<&LexError>, color: bool) {
    let palette = Palette::new(color);
    let section = |title: &str| println!("\n{}", palette.style(Role::Rule, format!("━━━ {title} ━━━")));

    println!("\n{}", palette.style(Role::Title, format!("⚙  Scanning: {}", report.label)));

    section("Tokens");
    if report.tokens.is_empty() {
        println!("  {}", palette.style(Role::Muted, "No tokens produced"));
    }
    for token in report.tokens {
        let line = token.location.line.map_or_else(|| "-".to_string(), |n| n.to_string());
        let kind = report.tokenizer.kind_name(token).unwrap_or("?");
        println!(
            "  {} {} {} {}",
            palette.style(Role::Position, format!("{line:>4}:{}..{}", token.location.start, token.location.end)),
            palette.style(Role::Kind, format!("{kind:<14}")),
            palette.style(Role::Muted, "│"),
            palette.style(Role::Value, &token.value),
        );
    }

    if let Some(err) = failure {
        section("Error");
        println!("  {} {err}", palette.style(Role::Error, format!("{:?}", err.category())));
    }

    section("Counts");
    let stats = &report.stats;
    let counts = [("Units", stats.units), ("Tokens", stats.tokens), ("Ignored", stats.ignored), ("Switches", stats.switches)];
    let line: Vec<String> =
        counts.iter().map(|(name, n)| format!("{name}: {}", palette.style(Role::Count, n))).collect();
    println!("  {}", line.join("  │  "));
    println!();
}
