// src/core/engine.rs

//! # Parse Engine
//!
//! A single left-to-right pass over the raw tokens. Each token is classified
//! against the prefix characters, resolved to an action, handed exactly as many
//! value tokens as the action takes, converted and dispatched. The first error
//! aborts the scan; a help dispatch stops it without validating anything else.

use crate::{
    core::{
        action::{Flow, ParseState},
        args::Args,
        errors::{ConfigError, Error, ParseError},
        parser::{ArgumentParser, TokenKind},
    },
    models::{Action, ActionId, Value, ValueType},
};
use std::path::Path;

/// The result of a successful parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Parsing finished and every requirement was met.
    Args(Args),
    /// A help argument was supplied; carries the rendered help text.
    Help(String),
}

impl ParseOutcome {
    /// The parsed arguments, or `None` for a help outcome.
    pub fn into_args(self) -> Option<Args> {
        match self {
            Self::Args(args) => Some(args),
            Self::Help(_) => None,
        }
    }

    /// Whether a help argument stopped the parse.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help(_))
    }
}

/// Cursor over the raw token vector.
struct Scanner<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> Scanner<'t> {
    fn new(tokens: &'t [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next_token(&mut self) -> Option<&'t str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    /// Takes up to `count` tokens; fewer are returned when the input runs out.
    fn take(&mut self, count: usize) -> Vec<&'t str> {
        let end = self.pos.saturating_add(count).min(self.tokens.len());
        let taken: Vec<&'t str> = self
            .tokens
            .iter()
            .take(end)
            .skip(self.pos)
            .map(String::as_str)
            .collect();
        self.pos = end;
        taken
    }
}

impl ArgumentParser {
    /// Parses a token vector (without the program name).
    ///
    /// The first call seals the parser. Each call works on fresh state, so the
    /// same parser can be used again with different input.
    pub fn parse_args<I, S>(&mut self, tokens: I) -> Result<ParseOutcome, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seal()?;
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.run(&tokens)
    }

    /// Parses the process arguments. The program name is taken from argv[0]
    /// unless one was configured.
    pub fn parse_env(&mut self) -> Result<ParseOutcome, Error> {
        let mut argv = std::env::args();
        if let Some(argv0) = argv.next() {
            if self.prog.is_empty() {
                let name = Path::new(&argv0)
                    .file_name()
                    .map_or_else(|| argv0.clone(), |n| n.to_string_lossy().into_owned());
                self.prog = name;
            }
        }
        self.parse_args(argv)
    }

    /// Splits a shell-quoted command line into tokens and parses them.
    pub fn parse_line(&mut self, line: &str) -> Result<ParseOutcome, Error> {
        let tokens =
            shlex::split(line).ok_or_else(|| ParseError::UnbalancedQuotes(line.to_string()))?;
        self.parse_args(tokens)
    }

    fn run(&self, tokens: &[String]) -> Result<ParseOutcome, Error> {
        let mut state = ParseState::new(self);
        let mut scanner = Scanner::new(tokens);
        let mut next_positional = 0;
        let mut options_ended = false;

        while let Some(token) = scanner.next_token() {
            let kind = if options_ended {
                TokenKind::Positional
            } else {
                self.classify(token)
            };
            log::trace!("Token '{}' classified as {:?}", token, kind);

            let flow = match kind {
                TokenKind::Terminator => {
                    options_ended = true;
                    continue;
                }
                TokenKind::Short => self.scan_short(token, &mut scanner, &mut state)?,
                TokenKind::Long => self.scan_long(token, &mut scanner, &mut state)?,
                TokenKind::Positional => {
                    // Without prefix characters, bare flags (e.g. `help`) match by name.
                    match self.bare_flag(token, options_ended) {
                        Some(id) => self.consume(id, token, None, &mut scanner, &mut state)?,
                        None => self.scan_positional(
                            token,
                            &mut next_positional,
                            &mut scanner,
                            &mut state,
                        )?,
                    }
                }
            };
            if let Flow::Help(text) = flow {
                return Ok(ParseOutcome::Help(text));
            }
        }

        self.check_required(&state)?;
        Ok(ParseOutcome::Args(state.into_args()))
    }

    fn bare_flag(&self, token: &str, options_ended: bool) -> Option<ActionId> {
        if self.prefix_chars.is_empty() && !options_ended {
            self.lookup_flag(token)
        } else {
            None
        }
    }

    /// `-x`, or a cluster of one-character flags like `-xyz`. Every flag but the
    /// last must take no values; the last one consumes values as usual.
    fn scan_short(
        &self,
        token: &str,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
    ) -> Result<Flow, Error> {
        if let Some(id) = self.lookup_flag(token) {
            return self.consume(id, token, None, scanner, state);
        }

        let mut chars = token.chars();
        let prefix = chars
            .next()
            .ok_or_else(|| ParseError::UnknownFlag(token.to_string()))?;
        let flags: Vec<char> = chars.collect();
        let last = flags.len().saturating_sub(1);

        for (i, flag) in flags.iter().enumerate() {
            let alias = format!("{}{}", prefix, flag);
            let id = self
                .lookup_flag(&alias)
                .ok_or_else(|| ParseError::UnknownFlag(alias.clone()))?;
            if i == last {
                return self.consume(id, &alias, None, scanner, state);
            }
            if self.action_for(id, &alias)?.effective_nargs() != 0 {
                return Err(ConfigError::ClusteredValueFlag {
                    token: token.to_string(),
                    flag: alias,
                }
                .into());
            }
            let flow = self.dispatch(id, Vec::new(), &alias, state)?;
            if flow != Flow::Continue {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    /// `--name`, or `--name=value` for options taking exactly one value.
    fn scan_long(
        &self,
        token: &str,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
    ) -> Result<Flow, Error> {
        let (name, assigned) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let id = self
            .lookup_flag(name)
            .ok_or_else(|| ParseError::UnknownFlag(name.to_string()))?;
        self.consume(id, name, assigned, scanner, state)
    }

    /// The next unclaimed positional argument takes this token as its first value.
    fn scan_positional(
        &self,
        token: &str,
        next_positional: &mut usize,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
    ) -> Result<Flow, Error> {
        let id = self
            .positionals
            .get(*next_positional)
            .copied()
            .ok_or_else(|| ParseError::TooManyPositionals(token.to_string()))?;
        *next_positional += 1;

        let action = self.action_for(id, token)?;
        let nargs = action.effective_nargs();
        let mut raw = Vec::with_capacity(nargs);
        if nargs > 0 {
            raw.push(token);
            raw.extend(scanner.take(nargs - 1));
        }
        let values = self.convert_all(action, &raw, nargs)?;
        self.dispatch(id, values, token, state)
    }

    /// Collects the action's values, either from an inline assignment or from the
    /// following tokens, then dispatches it.
    fn consume(
        &self,
        id: ActionId,
        origin: &str,
        assigned: Option<&str>,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
    ) -> Result<Flow, Error> {
        let action = self.action_for(id, origin)?;
        let nargs = action.effective_nargs();
        let values = match assigned {
            Some(text) => {
                if nargs != 1 {
                    return Err(ConfigError::AssignmentArity {
                        token: origin.to_string(),
                        nargs,
                    }
                    .into());
                }
                vec![self.convert(action, text)?]
            }
            None => {
                let raw = scanner.take(nargs);
                self.convert_all(action, &raw, nargs)?
            }
        };
        self.dispatch(id, values, origin, state)
    }

    fn dispatch(
        &self,
        id: ActionId,
        values: Vec<Value>,
        origin: &str,
        state: &mut ParseState,
    ) -> Result<Flow, Error> {
        let action = self.action_for(id, origin)?;
        self.check_mutex(id, action, origin, state)?;
        log::debug!(
            "Dispatching {:?} for '{}' -> '{}' with {} value(s)",
            action.kind(),
            origin,
            action.dest(),
            values.len()
        );
        let flow = action.process(id, self, state, values, origin)?;
        state.mark_present(id, action.dest());
        Ok(flow)
    }

    fn action_for(&self, id: ActionId, origin: &str) -> Result<&Action, ParseError> {
        self.action(id)
            .ok_or_else(|| ParseError::UnknownFlag(origin.to_string()))
    }

    fn check_mutex(
        &self,
        id: ActionId,
        action: &Action,
        origin: &str,
        state: &mut ParseState,
    ) -> Result<(), ParseError> {
        let Some(group) = self.group_info(action.group()) else {
            return Ok(());
        };
        if !group.is_mutex() {
            return Ok(());
        }
        if let Some(other) = state.claim_group(action.group(), id) {
            let first = self
                .action(other)
                .and_then(|a| a.aliases().first().cloned())
                .unwrap_or_default();
            return Err(ParseError::MutuallyExclusive {
                group: group.name().to_string(),
                first,
                second: origin.to_string(),
            });
        }
        Ok(())
    }

    fn convert_all(
        &self,
        action: &Action,
        raw: &[&str],
        expected: usize,
    ) -> Result<Vec<Value>, ParseError> {
        if raw.len() < expected {
            return Err(ParseError::NotEnoughValues {
                dest: action.dest().to_string(),
                expected,
                found: raw.len(),
            });
        }
        raw.iter().map(|text| self.convert(action, text)).collect()
    }

    /// Converts one token per the action's value type, then checks its choices.
    fn convert(&self, action: &Action, text: &str) -> Result<Value, ParseError> {
        let invalid = || ParseError::InvalidValue {
            dest: action.dest().to_string(),
            value: text.to_string(),
            expected: action.value_type(),
        };
        let value = match action.value_type() {
            ValueType::String | ValueType::Custom => Value::Str(text.to_string()),
            ValueType::Int => Value::Int(text.parse::<i64>().map_err(|_| invalid())?),
            ValueType::Float => Value::Float(text.parse::<f64>().map_err(|_| invalid())?),
        };
        if !action.choices().is_empty() && !action.choices().contains(&value) {
            return Err(ParseError::InvalidChoice {
                dest: action.dest().to_string(),
                value,
                choices: action.choices().to_vec(),
            });
        }
        Ok(value)
    }

    fn check_required(&self, state: &ParseState) -> Result<(), ParseError> {
        let missing = self
            .actions()
            .iter()
            .enumerate()
            .find(|(i, action)| action.is_required() && !state.is_present(ActionId(*i)));
        match missing {
            Some((_, action)) => Err(ParseError::MissingRequired(action.dest().to_string())),
            None => Ok(()),
        }
    }
}

// MARK: --- UNIT TESTS ---
