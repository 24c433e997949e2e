// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// argparse: Parse a command line against a TOML parser definition.
///
/// The definition file declares the program, its groups and its arguments.
/// Everything after it is parsed against that definition and the resulting
/// values are printed as JSON.
///
/// Examples:
/// - `argparse copy.toml a.txt -vv --num=3`
/// - `argparse copy.toml --line "a.txt -n 3 'with spaces'"`
/// - `argparse copy.toml -- --help`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML parser definition.
    pub definition: PathBuf,

    /// Parse this single shell-quoted string instead of the trailing arguments.
    #[arg(long, conflicts_with = "args")]
    pub line: Option<String>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,

    /// Arguments handed to the defined parser.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
