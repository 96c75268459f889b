mod debug_report;

use clap::{Parser, ValueEnum};
use rulelex::{LexError, LineContinuation, Token, Tokenizer, rules, split_units};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GrammarChoice {
    /// C-like source with block and line comments.
    Clike,
    /// PDP-11 style assembler.
    Asm,
}

#[derive(Parser)]
#[command(name = "rulelex", version, about = "Tokenize a file with one of the built-in grammars")]
struct Cli {
    /// Input file; reads stdin when omitted or `-`.
    file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "clike")]
    grammar: GrammarChoice,

    /// Do not join lines ending in a backslash.
    #[arg(long)]
    no_continuation: bool,

    /// Leave tokens without line numbers.
    #[arg(long)]
    no_line_numbers: bool,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("RULELEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let (label, input) = match read_input(cli.file.as_ref()) {
        Ok(read) => read,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let tokenizer = match grammar(cli.grammar) {
        Ok(tokenizer) => tokenizer.with_source(label.as_str()),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };
    let tokenizer = if cli.no_line_numbers { tokenizer.without_line_numbers() } else { tokenizer };

    let units: Vec<String> = if cli.no_continuation {
        split_units(&input).map(String::from).collect()
    } else {
        LineContinuation::new(split_units(&input)).collect()
    };

    let color = if cli.no_color { false } else { cli.color || io::stdout().is_terminal() };

    let mut scan = tokenizer.tokens(units);
    let mut tokens: Vec<Token> = Vec::new();
    let mut failure: Option<LexError> = None;
    for result in scan.by_ref() {
        match result {
            Ok(token) => tokens.push(token),
            Err(err) => failure = Some(err),
        }
    }

    let report = debug_report::Report { label: &label, tokenizer: &tokenizer, tokens: &tokens, stats: scan.stats() };
    debug_report::print_scan(&report, failure.as_ref(), color);

    if failure.is_some() {
        std::process::exit(1);
    }
}

fn grammar(choice: GrammarChoice) -> rulelex::Result<Tokenizer> {
    match choice {
        GrammarChoice::Clike => rules::clike::tokenizer(),
        GrammarChoice::Asm => rules::asm::tokenizer(),
    }
}

fn read_input(file: Option<&PathBuf>) -> io::Result<(String, String)> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let text = std::fs::read_to_string(path)?;
            Ok((path.display().to_string(), text))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(("<stdin>".to_string(), buffer))
        }
    }
}
