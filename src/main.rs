mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use config::Config;
use logquery_core::{
    Operator, Term, add_to_query_with, concat_query_strings, escape, field_query,
    format_timestamp, is_phrase, not, predicate,
};

/// Logquery - Build escaped, composable log search query fragments
#[derive(Parser, Debug)]
#[command(name = "logquery")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./logquery.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the result as a JSON object
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a term contains a space and is quoted as a phrase
    IsPhrase {
        #[arg(allow_hyphen_values = true)]
        term: String,
    },

    /// Escape a term so it is matched literally
    Escape {
        #[arg(allow_hyphen_values = true)]
        term: String,
    },

    /// Add a term to an existing query
    Add {
        #[arg(allow_hyphen_values = true)]
        old_query: String,

        #[arg(allow_hyphen_values = true)]
        new_term: String,

        /// Joining operator (AND, OR, NOT)
        #[arg(long)]
        operator: Option<Operator>,
    },

    /// Join several fragments into one query
    Concat {
        #[arg(allow_hyphen_values = true)]
        fragments: Vec<String>,

        /// Joining operator (AND, OR, NOT)
        #[arg(long)]
        operator: Option<Operator>,

        /// Do not wrap fragments in brackets
        #[arg(long)]
        no_brackets: bool,
    },

    /// Format a timestamp as a quoted indexer datetime literal
    Timestamp {
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Treat the value as milliseconds since the Unix epoch
        #[arg(long)]
        millis: bool,
    },

    /// Build a field predicate
    Predicate {
        field: String,

        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Escape the value first
        #[arg(long)]
        escape: bool,
    },

    /// Negate a query
    Not {
        #[arg(allow_hyphen_values = true)]
        query: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::IsPhrase { .. } => "is-phrase",
            Self::Escape { .. } => "escape",
            Self::Add { .. } => "add",
            Self::Concat { .. } => "concat",
            Self::Timestamp { .. } => "timestamp",
            Self::Predicate { .. } => "predicate",
            Self::Not { .. } => "not",
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(report(run(args)))
}

/// Print a failure once and map it to a process exit status
fn report(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let result = execute(&args.command, &config)?;

    if args.json {
        let output = json!({ "command": args.command.name(), "result": result });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        match result {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

/// Run a single command against the loaded config
fn execute(command: &Command, config: &Config) -> Result<Value> {
    tracing::debug!(command = command.name(), "executing");

    let result = match command {
        Command::IsPhrase { term } => Value::Bool(is_phrase(term)),
        Command::Escape { term } => Value::String(escape(term)),
        Command::Add {
            old_query,
            new_term,
            operator,
        } => {
            let operator = operator.unwrap_or(config.operator);
            Value::String(add_to_query_with(old_query, new_term, operator))
        }
        Command::Concat {
            fragments,
            operator,
            no_brackets,
        } => {
            let options = config.concat_options(*operator, *no_brackets);
            Value::String(concat_query_strings(fragments, &options))
        }
        Command::Timestamp { value, millis } => {
            let term = if *millis {
                parse_millis(value)?
            } else {
                Term::from(value)
            };
            Value::String(format_timestamp(term))
        }
        Command::Predicate {
            field,
            value,
            escape,
        } => {
            if *escape {
                Value::String(field_query(field, value))
            } else {
                Value::String(predicate(field, value))
            }
        }
        Command::Not { query } => Value::String(not(query)),
    };

    Ok(result)
}

fn parse_millis(value: &str) -> Result<Term> {
    let trimmed = value.trim();
    trimmed
        .parse::<i64>()
        .map(Term::from)
        .or_else(|_| trimmed.parse::<f64>().map(Term::from))
        .with_context(|| format!("'{}' is not a number of milliseconds", value))
}
