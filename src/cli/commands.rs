//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Walk paginated listing APIs
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operation catalog file (YAML)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a listing operation and print its items
    List(ListArgs),

    /// List the operations in the catalog
    Operations,

    /// Validate the catalog
    Validate,
}

/// Arguments for `list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Operation name
    pub operation: String,

    /// Filter parameter, repeatable
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Stop once at least this many items were retrieved
    #[arg(long, allow_negative_numbers = true)]
    pub max_items: Option<i64>,

    /// Resume from this token and fetch a single page
    #[arg(long)]
    pub starting_token: Option<String>,

    /// Fetch a single page and print the next token
    #[arg(long)]
    pub manual: bool,

    /// Fields to print: `*`, `Name` or `Name,Arn`
    #[arg(short, long)]
    pub select: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
