// src/core/parser.rs

//! # Argument Parser
//!
//! The `ArgumentParser` is the registry every other piece hangs off. It owns all
//! actions, the flag index, the positional order and the groups. Everything else
//! (builders, groups, the parse engine, the help formatter) refers to actions
//! through `ActionId` handles into this single owning vector.

use crate::{
    constants::{
        DEFAULT_PREFIX_CHARS, DEFAULT_TERM_WIDTH, HELP_DESCRIPTION, HELP_LONG_NAME,
        HELP_SHORT_NAME, OPTIONAL_GROUP_IDX, OPTIONAL_GROUP_NAME, POSITIONAL_GROUP_IDX,
        POSITIONAL_GROUP_NAME,
    },
    core::{builder::ArgBuilder, errors::ConfigError, group::ArgGroup},
    models::{Action, ActionId, ActionKind, ArgKind, DestOrigin, Group, GroupId},
};
use std::collections::HashMap;

/// How a single token (or alias) reads under the configured prefix characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Positional,
    /// One prefix character, e.g. `-v` or a cluster like `-abc`.
    Short,
    /// Doubled prefix character, e.g. `--name`.
    Long,
    /// The bare doubled prefix (`--`), ending option processing.
    Terminator,
}

/// A parser for command-line arguments.
///
/// Arguments are registered first (see [`ArgumentParser::add_argument`]); the first
/// parse call seals the parser, after which its structure can no longer change.
/// Parsing itself keeps all per-run state outside the parser, so one parser can be
/// used for any number of parses.
#[derive(Debug)]
pub struct ArgumentParser {
    pub(crate) actions: Vec<Action>,
    pub(crate) flags: HashMap<String, ActionId>,
    pub(crate) positionals: Vec<ActionId>,
    pub(crate) groups: Vec<Group>,

    pub(crate) prefix_chars: String,
    pub(crate) prog: String,
    pub(crate) usage: String,
    pub(crate) description: String,
    pub(crate) epilog: String,
    pub(crate) term_width: usize,
    pub(crate) add_help: bool,
    pub(crate) styled_help: bool,
    pub(crate) sealed: bool,
}

impl Default for ArgumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentParser {
    /// Creates an empty parser with the two default groups in place.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            flags: HashMap::new(),
            positionals: Vec::new(),
            groups: vec![
                Group::new(POSITIONAL_GROUP_NAME),
                Group::new(OPTIONAL_GROUP_NAME),
            ],
            prefix_chars: DEFAULT_PREFIX_CHARS.to_string(),
            prog: String::new(),
            usage: String::new(),
            description: String::new(),
            epilog: String::new(),
            term_width: DEFAULT_TERM_WIDTH,
            add_help: true,
            styled_help: false,
            sealed: false,
        }
    }

    // --- GLOBAL CONFIGURATION ---

    /// Sets the program name shown in the generated usage line.
    pub fn prog(&mut self, name: impl Into<String>) -> &mut Self {
        self.prog = name.into();
        self
    }

    /// Replaces the generated usage line with a fixed text.
    pub fn usage(&mut self, text: impl Into<String>) -> &mut Self {
        self.usage = text.into();
        self
    }

    /// Sets the paragraph shown between the usage line and the groups.
    pub fn description(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = text.into();
        self
    }

    /// Sets the text shown after all groups.
    pub fn epilog(&mut self, text: impl Into<String>) -> &mut Self {
        self.epilog = text.into();
        self
    }

    /// Sets the characters that introduce optional arguments.
    ///
    /// Aliases are classified when they are registered, so this should be set
    /// before any argument is added. Ignored once the parser is sealed.
    pub fn prefix_chars(&mut self, chars: impl Into<String>) -> &mut Self {
        if self.sealed {
            log::warn!("Ignoring prefix characters change on a sealed parser.");
            return self;
        }
        if !self.actions.is_empty() {
            log::warn!("Prefix characters changed after arguments were registered; existing aliases keep their classification.");
        }
        self.prefix_chars = chars.into();
        self
    }

    /// Enables or disables the automatic `-h`/`--help` argument. Ignored once sealed.
    pub fn add_help(&mut self, enabled: bool) -> &mut Self {
        if self.sealed {
            log::warn!("Ignoring automatic help toggle on a sealed parser.");
            return self;
        }
        self.add_help = enabled;
        self
    }

    /// Sets the column at which help text wraps.
    pub fn term_width(&mut self, width: usize) -> &mut Self {
        self.term_width = width;
        self
    }

    /// Renders group titles and the usage header with terminal styling.
    pub fn styled_help(&mut self, enabled: bool) -> &mut Self {
        self.styled_help = enabled;
        self
    }

    // --- ACCESSORS ---

    /// The configured program name, possibly empty.
    pub fn prog_name(&self) -> &str {
        &self.prog
    }

    /// The configured prefix characters.
    pub fn prefix(&self) -> &str {
        &self.prefix_chars
    }

    /// All registered actions in registration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The action behind a handle.
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    /// All groups, the two default ones first.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The group behind a handle.
    pub fn group_info(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Finds the action bound to a flag spelling, e.g. `--name`.
    pub fn lookup_flag(&self, alias: &str) -> Option<ActionId> {
        self.flags.get(alias).copied()
    }

    /// Whether the first parse has already happened.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.get_mut(id.0)
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0)
    }

    // --- REGISTRATION ---

    /// Adds an argument. Names that don't start with a prefix character are
    /// positional; `-x` style names are short flags and `--name` style names are
    /// long flags. All names of one argument must be of the same sort.
    ///
    /// Returns a builder for chaining further configuration.
    pub fn add_argument<I, S>(&mut self, names: I) -> Result<ArgBuilder<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_argument_to(None, names)
    }

    /// Creates a new, empty argument group.
    pub fn add_argument_group(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ArgGroup<'_>, ConfigError> {
        self.ensure_open()?;
        let id = GroupId(self.groups.len());
        let name = name.into();
        log::debug!("Registering group '{}' at index {}", name, id.0);
        self.groups.push(Group::new(name));
        Ok(ArgGroup::new(self, id))
    }

    /// Reopens a handle on an existing group. Fails once the parser is sealed.
    pub fn group(&mut self, id: GroupId) -> Result<ArgGroup<'_>, ConfigError> {
        self.ensure_open()?;
        if id.0 >= self.groups.len() {
            return Err(ConfigError::UnknownGroup(format!("#{}", id.0)));
        }
        Ok(ArgGroup::new(self, id))
    }

    /// Registers an argument either into an explicit group, or into one of the
    /// two default groups depending on how its first name is classified.
    pub(crate) fn add_argument_to<I, S>(
        &mut self,
        group: Option<GroupId>,
        names: I,
    ) -> Result<ArgBuilder<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_open()?;
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let first = names.first().ok_or(ConfigError::EmptyAlias)?;
        let arg_kind = self.classify_alias(first)?;

        // Validate every name up front so a failure leaves no half-registered action.
        for (i, name) in names.iter().enumerate() {
            if self.classify_alias(name)? != arg_kind {
                return Err(ConfigError::MixedAliases {
                    alias: name.clone(),
                    dest: first.clone(),
                });
            }
            let repeated = names.iter().take(i).any(|n| n == name);
            if arg_kind == ArgKind::Optional && (repeated || self.flags.contains_key(name)) {
                return Err(ConfigError::DuplicateAlias(name.clone()));
            }
        }

        let group = group.unwrap_or(match arg_kind {
            ArgKind::Positional => GroupId(POSITIONAL_GROUP_IDX),
            ArgKind::Optional => GroupId(OPTIONAL_GROUP_IDX),
        });
        let id = ActionId(self.actions.len());
        self.actions.push(Action::new(arg_kind, group));
        if let Some(g) = self.group_mut(group) {
            g.members.push(id);
        }
        if arg_kind == ArgKind::Positional {
            self.positionals.push(id);
        }
        for name in names {
            self.attach_alias(id, name)?;
        }
        log::debug!(
            "Registered {:?} argument '{}' as action #{}",
            arg_kind,
            self.action(id).map_or("", Action::dest),
            id.0
        );
        Ok(ArgBuilder::new(self, id))
    }

    /// Binds one more name to an existing action, inferring its dest as it goes.
    pub(crate) fn attach_alias(&mut self, id: ActionId, name: String) -> Result<(), ConfigError> {
        let arg_kind = self.classify_alias(&name)?;
        let token_kind = self.classify(&name);
        let action = self.actions.get(id.0).ok_or(ConfigError::EmptyAlias)?;
        if action.arg_kind != arg_kind {
            return Err(ConfigError::MixedAliases {
                alias: name,
                dest: action.dest.clone(),
            });
        }
        if action.aliases.contains(&name) {
            return Ok(());
        }
        if arg_kind == ArgKind::Optional {
            if self.flags.contains_key(&name) {
                return Err(ConfigError::DuplicateAlias(name));
            }
            self.flags.insert(name.clone(), id);
        }

        let (origin, inferred) = match token_kind {
            TokenKind::Short => (DestOrigin::Short, name.chars().skip(1).collect::<String>()),
            TokenKind::Long => (DestOrigin::Long, name.chars().skip(2).collect::<String>()),
            TokenKind::Positional | TokenKind::Terminator => (DestOrigin::Short, name.clone()),
        };
        if let Some(action) = self.action_mut(id) {
            let replace = match origin {
                DestOrigin::Long => action.dest_origin <= DestOrigin::Long,
                _ => action.dest_origin == DestOrigin::Unset,
            };
            if replace {
                action.dest = inferred;
                action.dest_origin = origin;
            }
            action.aliases.push(name);
        }
        Ok(())
    }

    // --- CLASSIFICATION ---

    pub(crate) fn is_prefix(&self, c: char) -> bool {
        self.prefix_chars.contains(c)
    }

    pub(crate) fn classify(&self, token: &str) -> TokenKind {
        let mut chars = token.chars();
        match chars.next() {
            Some(first) if self.is_prefix(first) => match chars.next() {
                None => TokenKind::Positional,
                Some(second) if second == first => {
                    if chars.next().is_none() {
                        TokenKind::Terminator
                    } else {
                        TokenKind::Long
                    }
                }
                Some(_) => TokenKind::Short,
            },
            _ => TokenKind::Positional,
        }
    }

    /// Classifies a name given at registration time. Prefixed names with nothing
    /// after the prefix (`-`, `--`) can't be used as aliases.
    fn classify_alias(&self, name: &str) -> Result<ArgKind, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyAlias);
        }
        let starts_with_prefix = name.chars().next().is_some_and(|c| self.is_prefix(c));
        match self.classify(name) {
            TokenKind::Short | TokenKind::Long => Ok(ArgKind::Optional),
            TokenKind::Positional if !starts_with_prefix => Ok(ArgKind::Positional),
            TokenKind::Positional | TokenKind::Terminator => Err(ConfigError::EmptyAlias),
        }
    }

    // --- SEALING ---

    fn ensure_open(&self) -> Result<(), ConfigError> {
        if self.sealed {
            Err(ConfigError::Sealed)
        } else {
            Ok(())
        }
    }

    /// Freezes the parser's structure ahead of the first parse: installs the
    /// automatic help argument and checks that constant-valued actions have a constant.
    /// Calling it again is a no-op.
    pub(crate) fn seal(&mut self) -> Result<(), ConfigError> {
        if self.sealed {
            return Ok(());
        }
        if let Some(action) = self
            .actions
            .iter()
            .find(|a| a.kind.needs_const() && a.const_value.is_none())
        {
            return Err(ConfigError::MissingConst(action.dest.clone()));
        }
        if self.add_help {
            self.install_help();
        }
        self.sealed = true;
        log::debug!(
            "Parser sealed with {} actions, {} flags, {} positionals",
            self.actions.len(),
            self.flags.len(),
            self.positionals.len()
        );
        Ok(())
    }

    /// The help spellings still free for the automatic help argument.
    ///
    /// Uses the first configured prefix character; with no prefix characters at
    /// all, the bare names `h` and `help` are used instead.
    pub(crate) fn help_aliases(&self) -> Vec<String> {
        let candidates = match self.prefix_chars.chars().next() {
            Some(p) => vec![
                format!("{}{}", p, HELP_SHORT_NAME),
                format!("{}{}{}", p, p, HELP_LONG_NAME),
            ],
            None => vec![HELP_SHORT_NAME.to_string(), HELP_LONG_NAME.to_string()],
        };
        candidates
            .into_iter()
            .filter(|alias| !self.flags.contains_key(alias))
            .collect()
    }

    fn install_help(&mut self) {
        let aliases = self.help_aliases();
        if aliases.is_empty() {
            log::debug!("Both help spellings are taken; skipping automatic help.");
            return;
        }
        let group = GroupId(OPTIONAL_GROUP_IDX);
        let id = ActionId(self.actions.len());
        let mut action = Action::new(ArgKind::Optional, group);
        action.kind = ActionKind::Help;
        action.dest = HELP_LONG_NAME.to_string();
        action.dest_origin = DestOrigin::Explicit;
        action.help = HELP_DESCRIPTION.to_string();
        for alias in &aliases {
            self.flags.insert(alias.clone(), id);
        }
        action.aliases = aliases;
        self.actions.push(action);
        if let Some(g) = self.group_mut(group) {
            g.members.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups_exist() {
        let parser = ArgumentParser::new();
        let names: Vec<&str> = parser.groups().iter().map(Group::name).collect();
        assert_eq!(names, vec!["Positional Arguments", "Options"]);
    }

    #[test]
    fn test_classify_tokens() {
        let parser = ArgumentParser::new();
        assert_eq!(parser.classify("file"), TokenKind::Positional);
        assert_eq!(parser.classify("-"), TokenKind::Positional);
        assert_eq!(parser.classify("-v"), TokenKind::Short);
        assert_eq!(parser.classify("-abc"), TokenKind::Short);
        assert_eq!(parser.classify("--name"), TokenKind::Long);
        assert_eq!(parser.classify("--"), TokenKind::Terminator);
        assert_eq!(parser.classify(""), TokenKind::Positional);
    }

    #[test]
    fn test_classify_with_custom_prefix() {
        let mut parser = ArgumentParser::new();
        parser.prefix_chars("+/");
        assert_eq!(parser.classify("+x"), TokenKind::Short);
        assert_eq!(parser.classify("//long"), TokenKind::Long);
        assert_eq!(parser.classify("-x"), TokenKind::Positional);
        assert_eq!(parser.classify("+/x"), TokenKind::Short);
    }

    #[test]
    fn test_registration_places_into_default_groups() {
        let mut parser = ArgumentParser::new();
        parser.add_argument(["input"]).unwrap();
        parser.add_argument(["-v", "--verbose"]).unwrap();

        assert_eq!(parser.groups()[0].members(), &[ActionId(0)]);
        assert_eq!(parser.groups()[1].members(), &[ActionId(1)]);
        assert_eq!(parser.positionals, vec![ActionId(0)]);
        assert_eq!(parser.lookup_flag("-v"), Some(ActionId(1)));
        assert_eq!(parser.lookup_flag("--verbose"), Some(ActionId(1)));
    }

    #[test]
    fn test_dest_inference() {
        let mut parser = ArgumentParser::new();
        parser.add_argument(["-v", "--verbose"]).unwrap();
        parser.add_argument(["--long-first", "-l"]).unwrap();
        parser.add_argument(["-a", "-b"]).unwrap();
        parser.add_argument(["input"]).unwrap();

        let dests: Vec<&str> = parser.actions().iter().map(Action::dest).collect();
        assert_eq!(dests, vec!["verbose", "long-first", "a", "input"]);
    }

    #[test]
    fn test_mixed_aliases_rejected() {
        let mut parser = ArgumentParser::new();
        let result = parser.add_argument(["-v", "verbose"]);
        assert!(matches!(result, Err(ConfigError::MixedAliases { .. })));
        // Nothing was registered by the failed call.
        assert!(parser.actions().is_empty());

        let result = parser.add_argument(["input", "--input"]);
        assert!(matches!(result, Err(ConfigError::MixedAliases { .. })));
    }

    #[test]
    fn test_duplicate_and_empty_aliases_rejected() {
        let mut parser = ArgumentParser::new();
        parser.add_argument(["-v"]).unwrap();
        assert!(matches!(
            parser.add_argument(["--verbose", "-v"]),
            Err(ConfigError::DuplicateAlias(a)) if a == "-v"
        ));
        assert!(matches!(
            parser.add_argument(Vec::<String>::new()),
            Err(ConfigError::EmptyAlias)
        ));
        assert!(matches!(parser.add_argument(["--"]), Err(ConfigError::EmptyAlias)));
    }

    #[test]
    fn test_seal_installs_help_and_blocks_registration() {
        let mut parser = ArgumentParser::new();
        parser.add_argument(["-v"]).unwrap();
        parser.seal().unwrap();

        let help = parser.lookup_flag("--help").unwrap();
        assert_eq!(parser.lookup_flag("-h"), Some(help));
        assert_eq!(parser.action(help).unwrap().kind(), ActionKind::Help);
        assert!(matches!(parser.add_argument(["-x"]), Err(ConfigError::Sealed)));
        assert!(matches!(
            parser.add_argument_group("late"),
            Err(ConfigError::Sealed)
        ));

        // Sealing twice does not install a second help action.
        let count = parser.actions().len();
        parser.seal().unwrap();
        assert_eq!(parser.actions().len(), count);
    }

    #[test]
    fn test_help_only_takes_free_spellings() {
        let mut parser = ArgumentParser::new();
        parser.add_argument(["-h", "--host"]).unwrap();
        parser.seal().unwrap();
        let help = parser.lookup_flag("--help").unwrap();
        assert_eq!(parser.action(help).unwrap().aliases(), &["--help".to_string()]);
        assert_eq!(parser.lookup_flag("-h"), Some(ActionId(0)));
    }

    #[test]
    fn test_help_with_custom_and_empty_prefix() {
        let mut parser = ArgumentParser::new();
        parser.prefix_chars("+");
        parser.seal().unwrap();
        assert!(parser.lookup_flag("+h").is_some());
        assert!(parser.lookup_flag("++help").is_some());

        let mut bare = ArgumentParser::new();
        bare.prefix_chars("");
        bare.seal().unwrap();
        assert!(bare.lookup_flag("h").is_some());
        assert!(bare.lookup_flag("help").is_some());
    }

    #[test]
    fn test_seal_requires_constants() {
        let mut parser = ArgumentParser::new();
        parser
            .add_argument(["--fast"])
            .unwrap()
            .action(ActionKind::StoreConst);
        assert!(matches!(parser.seal(), Err(ConfigError::MissingConst(d)) if d == "fast"));
    }
}
