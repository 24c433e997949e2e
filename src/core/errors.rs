// src/core/errors.rs

use crate::models::{Value, ValueType};
use std::path::PathBuf;
use thiserror::Error;

/// Mistakes in how a parser was put together. Detected while registering
/// arguments or while preparing a parse.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Can't mix positional and optional aliases: '{alias}' on argument '{dest}'.")]
    MixedAliases { alias: String, dest: String },
    #[error("An argument name or flag can't be empty.")]
    EmptyAlias,
    #[error("Flag '{0}' is already registered.")]
    DuplicateAlias(String),
    #[error(
        "Optional argument '{flag}' in '{token}' takes one or more values and must come last in a cluster."
    )]
    ClusteredValueFlag { token: String, flag: String },
    #[error("Assignment syntax used for '{token}', which takes {nargs} values; it's only valid for exactly one.")]
    AssignmentArity { token: String, nargs: usize },
    #[error("Argument '{0}' stores a constant but no constant was configured.")]
    MissingConst(String),
    #[error("Group '{0}' is not defined.")]
    UnknownGroup(String),
    #[error("The parser can't be modified once parsing has begun.")]
    Sealed,
    #[error("Could not read parser definition at '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse parser definition at '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Problems with the tokens supplied on the command line.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid optional argument '{0}'.")]
    UnknownFlag(String),
    #[error("Too many positional arguments specified: unexpected '{0}'.")]
    TooManyPositionals(String),
    #[error("Not enough arguments for '{dest}': expected {expected}, got {found}.")]
    NotEnoughValues {
        dest: String,
        expected: usize,
        found: usize,
    },
    #[error("Argument '{token}' is already defined.")]
    Duplicate { dest: String, token: String },
    #[error("Required argument '{0}' missing.")]
    MissingRequired(String),
    #[error("Invalid {expected} value '{value}' for '{dest}'.")]
    InvalidValue {
        dest: String,
        value: String,
        expected: ValueType,
    },
    #[error("Invalid choice '{value}' for '{dest}' (choose from {}).", choices_list(.choices))]
    InvalidChoice {
        dest: String,
        value: Value,
        choices: Vec<Value>,
    },
    #[error("Argument '{second}' is not allowed with '{first}' (group '{group}').")]
    MutuallyExclusive {
        group: String,
        first: String,
        second: String,
    },
    #[error("Command line has unbalanced quoting: {0}")]
    UnbalancedQuotes(String),
}

fn choices_list(choices: &[Value]) -> String {
    let quoted: Vec<String> = choices.iter().map(|c| format!("'{}'", c)).collect();
    quoted.join(", ")
}

/// Reasons a typed lookup into parsed results can fail.
#[derive(Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("No value recorded for '{0}'.")]
    Absent(String),
    #[error("Value for '{dest}' is a {found}, not a {expected}.")]
    TypeMismatch {
        dest: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Any failure surfaced by a parse call.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
