// src/core/config_loader.rs

//! # Config Loader
//!
//! Declarative parser definitions. A TOML document describes the global parser
//! settings, any extra groups (`[[group]]`) and every argument (`[[argument]]`);
//! `ParserConfig::build` turns it into a ready-to-use `ArgumentParser` through the
//! same registration calls a program would make by hand.
//!
//! ```toml
//! prog = "copy"
//! description = "Copies files."
//!
//! [[group]]
//! name = "Output"
//! mutex = true
//!
//! [[argument]]
//! aliases = ["-v", "--verbose"]
//! action = "count"
//!
//! [[argument]]
//! aliases = ["--json"]
//! action = "store_true"
//! group = "Output"
//! ```

use crate::{
    core::{builder::ArgBuilder, errors::ConfigError, parser::ArgumentParser},
    models::{ActionKind, GroupId, Value, ValueType},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

/// Top-level parser definition.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    pub prog: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    pub epilog: Option<String>,
    pub prefix_chars: Option<String>,
    pub add_help: Option<bool>,
    pub term_width: Option<usize>,
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupConfig>,
    #[serde(default, rename = "argument")]
    pub arguments: Vec<ArgumentConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mutex: bool,
}

/// One `[[argument]]` table. Only `aliases` is mandatory.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ArgumentConfig {
    pub aliases: Vec<String>,
    pub dest: Option<String>,
    #[serde(default)]
    pub action: ActionKind,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    pub nargs: Option<usize>,
    #[serde(default)]
    pub required: bool,
    pub default: Option<Value>,
    #[serde(rename = "const")]
    pub const_value: Option<Value>,
    #[serde(default)]
    pub choices: Vec<Value>,
    #[serde(default)]
    pub help: String,
    pub metavar: Option<String>,
    /// Name of the group to place the argument in; one of the defaults or a `[[group]]`.
    pub group: Option<String>,
}

impl ParserConfig {
    /// Parses a definition from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads and parses a definition file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading parser definition from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a parser from the definition.
    pub fn build(&self) -> Result<ArgumentParser, ConfigError> {
        let mut parser = ArgumentParser::new();
        // Prefix characters first: aliases are classified as they are registered.
        if let Some(chars) = &self.prefix_chars {
            parser.prefix_chars(chars.clone());
        }
        if let Some(prog) = &self.prog {
            parser.prog(prog.clone());
        }
        if let Some(usage) = &self.usage {
            parser.usage(usage.clone());
        }
        if let Some(description) = &self.description {
            parser.description(description.clone());
        }
        if let Some(epilog) = &self.epilog {
            parser.epilog(epilog.clone());
        }
        if let Some(add_help) = self.add_help {
            parser.add_help(add_help);
        }
        if let Some(width) = self.term_width {
            parser.term_width(width);
        }

        let mut group_ids: HashMap<String, GroupId> = parser
            .groups()
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name().to_string(), GroupId(i)))
            .collect();
        for group in &self.groups {
            let id = parser
                .add_argument_group(group.name.clone())?
                .description(group.description.clone())
                .mutex(group.mutex)
                .id();
            group_ids.insert(group.name.clone(), id);
        }

        for arg in &self.arguments {
            let group = match &arg.group {
                Some(name) => Some(
                    *group_ids
                        .get(name)
                        .ok_or_else(|| ConfigError::UnknownGroup(name.clone()))?,
                ),
                None => None,
            };
            let builder = parser.add_argument_to(group, arg.aliases.clone())?;
            apply_argument(arg, builder);
        }
        Ok(parser)
    }
}

fn apply_argument(arg: &ArgumentConfig, builder: ArgBuilder<'_>) {
    let mut builder = builder
        .action(arg.action)
        .value_type(arg.value_type)
        .required(arg.required)
        .help(arg.help.clone());
    if let Some(dest) = &arg.dest {
        builder = builder.dest(dest.clone());
    }
    if let Some(nargs) = arg.nargs {
        builder = builder.nargs(nargs);
    }
    if let Some(default) = &arg.default {
        builder = builder.default_value(default.clone());
    }
    if let Some(constant) = &arg.const_value {
        builder = builder.const_value(constant.clone());
    }
    if !arg.choices.is_empty() {
        builder = builder.choices(arg.choices.clone());
    }
    if let Some(metavar) = &arg.metavar {
        builder.metavar(metavar.clone());
    }
}
