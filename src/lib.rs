//! A small command-line argument parser in the spirit of Python's `argparse`.
//!
//! Arguments are registered on an [`ArgumentParser`], either in code through the
//! chaining [`ArgBuilder`] or declaratively from a TOML [`ParserConfig`]. Parsing
//! yields an [`Args`] map from destination names to typed [`Value`]s, or the
//! rendered help text when a help flag was given.
//!
//! ```
//! use argparse::{ActionKind, ArgumentParser, ValueType};
//!
//! let mut parser = ArgumentParser::new();
//! parser.prog("copy");
//! parser.add_argument(["src"]).unwrap();
//! parser
//!     .add_argument(["-n", "--num"])
//!     .unwrap()
//!     .nargs(1)
//!     .value_type(ValueType::Int);
//! parser.add_argument(["-v"]).unwrap().action(ActionKind::Count);
//!
//! let args = parser
//!     .parse_args(["a.txt", "-vv", "--num=3"])
//!     .unwrap()
//!     .into_args()
//!     .unwrap();
//! assert_eq!(args.get::<i64>("num"), Ok(3));
//! assert_eq!(args.get::<i64>("v"), Ok(2));
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;

pub use crate::core::{
    args::{Args, FromValue},
    builder::ArgBuilder,
    config_loader::{ArgumentConfig, GroupConfig, ParserConfig},
    engine::ParseOutcome,
    errors::{ConfigError, Error, LookupError, ParseError},
    group::ArgGroup,
    parser::ArgumentParser,
};
pub use crate::models::{Action, ActionId, ActionKind, ArgKind, Group, GroupId, Value, ValueType};
