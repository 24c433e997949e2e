// src/core/action.rs

//! # Action Dispatch
//!
//! Each `ActionKind` decides how the values collected for a recognized argument
//! land in the results. Dispatch is a plain `match` over the closed set of kinds.
//!
//! Everything that changes during a parse (which actions were seen, which member
//! claimed a mutex group, the results themselves) lives in `ParseState`, created
//! fresh for every parse call. Actions stay untouched, so a parser can be reused.

use crate::{
    core::{args::Args, errors::ParseError, parser::ArgumentParser},
    models::{Action, ActionId, ActionKind, GroupId, Value},
};
use std::collections::{HashMap, HashSet};

/// What the engine should do after an action ran.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Flow {
    Continue,
    /// Stop scanning and hand the rendered help text back to the caller.
    Help(String),
}

/// Mutable state of one parse call.
#[derive(Debug)]
pub(crate) struct ParseState {
    args: Args,
    present: Vec<bool>,
    /// Destinations written by an occurrence in this parse, as opposed to seeded.
    supplied: HashSet<String>,
    mutex_claims: HashMap<GroupId, ActionId>,
}

impl ParseState {
    /// Creates the state for a new parse, seeding every action's default.
    pub(crate) fn new(parser: &ArgumentParser) -> Self {
        let mut args = Args::new();
        for action in parser.actions() {
            if let Some(seed) = action.seed_value() {
                args.insert(action.dest(), seed);
            }
        }
        Self {
            args,
            present: vec![false; parser.actions().len()],
            supplied: HashSet::new(),
            mutex_claims: HashMap::new(),
        }
    }

    /// Whether the action was supplied at least once so far in this parse.
    pub(crate) fn is_present(&self, id: ActionId) -> bool {
        self.present.get(id.0).copied().unwrap_or(false)
    }

    pub(crate) fn args(&self) -> &Args {
        &self.args
    }

    pub(crate) fn mark_present(&mut self, id: ActionId, dest: &str) {
        if let Some(slot) = self.present.get_mut(id.0) {
            *slot = true;
        }
        self.supplied.insert(dest.to_string());
    }

    /// Records `id` as the member supplied for `group`, returning the member that
    /// claimed it earlier if that was a different one.
    pub(crate) fn claim_group(&mut self, group: GroupId, id: ActionId) -> Option<ActionId> {
        match self.mutex_claims.get(&group) {
            Some(&other) if other != id => Some(other),
            Some(_) => None,
            None => {
                self.mutex_claims.insert(group, id);
                None
            }
        }
    }

    pub(crate) fn into_args(self) -> Args {
        self.args
    }

    /// The list currently accumulated under `dest` by this parse, whichever
    /// action wrote it. A seeded default is not carried over: the first real
    /// occurrence for the dest starts a fresh list.
    fn accumulated(&self, dest: &str) -> Vec<Value> {
        if !self.supplied.contains(dest) {
            return Vec::new();
        }
        match self.args.value(dest) {
            Some(Value::List(items)) => items.clone(),
            Some(other) => vec![other.clone()],
            None => Vec::new(),
        }
    }
}

impl Action {
    /// Runs this action's behavior for one occurrence on the command line.
    ///
    /// `values` are already converted; `origin` is the token text that matched,
    /// used in error messages.
    pub(crate) fn process(
        &self,
        id: ActionId,
        parser: &ArgumentParser,
        state: &mut ParseState,
        values: Vec<Value>,
        origin: &str,
    ) -> Result<Flow, ParseError> {
        match self.kind {
            ActionKind::Store => {
                self.reject_duplicate(id, state, origin)?;
                let mut values = values;
                let value = match values.len() {
                    0 => self.default.clone(),
                    1 => values.pop(),
                    _ => Some(Value::List(values)),
                };
                if let Some(value) = value {
                    state.args.insert(&self.dest, value);
                }
            }
            ActionKind::StoreConst => {
                self.reject_duplicate(id, state, origin)?;
                if let Some(constant) = &self.const_value {
                    state.args.insert(&self.dest, constant.clone());
                }
            }
            ActionKind::StoreTrue => state.args.insert(&self.dest, Value::Bool(true)),
            ActionKind::StoreFalse => state.args.insert(&self.dest, Value::Bool(false)),
            ActionKind::Append => {
                let mut items = state.accumulated(&self.dest);
                let mut values = values;
                match values.len() {
                    0 => {}
                    1 => items.extend(values.pop()),
                    _ => items.push(Value::List(values)),
                }
                state.args.insert(&self.dest, Value::List(items));
            }
            ActionKind::AppendConst => {
                let mut items = state.accumulated(&self.dest);
                items.extend(self.const_value.clone());
                state.args.insert(&self.dest, Value::List(items));
            }
            ActionKind::Count => {
                let count = match state.args.value(&self.dest) {
                    Some(Value::Int(n)) => *n,
                    _ => 0,
                };
                state.args.insert(&self.dest, Value::Int(count.saturating_add(1)));
            }
            ActionKind::Help => return Ok(Flow::Help(parser.format_help())),
        }
        Ok(Flow::Continue)
    }

    fn reject_duplicate(
        &self,
        id: ActionId,
        state: &ParseState,
        origin: &str,
    ) -> Result<(), ParseError> {
        if state.is_present(id) {
            return Err(ParseError::Duplicate {
                dest: self.dest.clone(),
                token: origin.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser_with(kind: ActionKind) -> (ArgumentParser, ActionId) {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["-x", "--ex"])
            .unwrap()
            .action(kind)
            .const_value("C")
            .id();
        (parser, id)
    }

    fn run(
        parser: &ArgumentParser,
        id: ActionId,
        state: &mut ParseState,
        values: Vec<Value>,
    ) -> Result<Flow, ParseError> {
        let action = parser.action(id).unwrap();
        let flow = action.process(id, parser, state, values, "--ex")?;
        state.mark_present(id, action.dest());
        Ok(flow)
    }

    #[test]
    fn test_store_single_multiple_and_duplicate() {
        let (parser, id) = parser_with(ActionKind::Store);
        let mut state = ParseState::new(&parser);
        run(&parser, id, &mut state, vec![Value::from("a")]).unwrap();
        assert_eq!(state.args().get::<String>("ex"), Ok("a".to_string()));

        let err = run(&parser, id, &mut state, vec![Value::from("b")]).unwrap_err();
        assert!(matches!(err, ParseError::Duplicate { ref dest, .. } if dest == "ex"));

        let mut state = ParseState::new(&parser);
        run(&parser, id, &mut state, vec![Value::from("a"), Value::from("b")]).unwrap();
        assert_eq!(
            state.args().get::<Vec<String>>("ex"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_store_const_and_flags() {
        let (parser, id) = parser_with(ActionKind::StoreConst);
        let mut state = ParseState::new(&parser);
        run(&parser, id, &mut state, vec![]).unwrap();
        assert_eq!(state.args().get::<String>("ex"), Ok("C".to_string()));
        assert!(run(&parser, id, &mut state, vec![]).is_err());

        let (parser, id) = parser_with(ActionKind::StoreFalse);
        let mut state = ParseState::new(&parser);
        assert_eq!(state.args().get::<bool>("ex"), Ok(true));
        run(&parser, id, &mut state, vec![]).unwrap();
        run(&parser, id, &mut state, vec![]).unwrap();
        assert_eq!(state.args().get::<bool>("ex"), Ok(false));
    }

    #[test]
    fn test_append_replaces_seed_then_accumulates() {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["-I"])
            .unwrap()
            .action(ActionKind::Append)
            .nargs(1)
            .default_value(vec!["/usr/include"])
            .id();
        let mut state = ParseState::new(&parser);
        assert_eq!(
            state.args().get::<Vec<String>>("I"),
            Ok(vec!["/usr/include".to_string()])
        );

        run(&parser, id, &mut state, vec![Value::from("a")]).unwrap();
        run(&parser, id, &mut state, vec![Value::from("b")]).unwrap();
        assert_eq!(
            state.args().get::<Vec<String>>("I"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_append_const_shared_dest_accumulates_across_actions() {
        let mut parser = ArgumentParser::new();
        let as_str = parser
            .add_argument(["--str"])
            .unwrap()
            .action(ActionKind::AppendConst)
            .const_value("str")
            .dest("types")
            .default_value(vec!["none"])
            .id();
        let as_int = parser
            .add_argument(["--int"])
            .unwrap()
            .action(ActionKind::AppendConst)
            .const_value("int")
            .dest("types")
            .id();

        let mut state = ParseState::new(&parser);
        run(&parser, as_str, &mut state, vec![]).unwrap();
        run(&parser, as_int, &mut state, vec![]).unwrap();
        run(&parser, as_str, &mut state, vec![]).unwrap();
        assert_eq!(
            state.args().get::<Vec<String>>("types"),
            Ok(vec!["str".to_string(), "int".to_string(), "str".to_string()])
        );
    }

    #[test]
    fn test_append_shared_dest_accumulates_across_actions() {
        let mut parser = ArgumentParser::new();
        let include = parser
            .add_argument(["-I"])
            .unwrap()
            .action(ActionKind::Append)
            .nargs(1)
            .dest("paths")
            .default_value(vec!["/usr/include"])
            .id();
        let system = parser
            .add_argument(["--system"])
            .unwrap()
            .action(ActionKind::Append)
            .nargs(1)
            .dest("paths")
            .id();

        let mut state = ParseState::new(&parser);
        run(&parser, include, &mut state, vec![Value::from("a")]).unwrap();
        run(&parser, system, &mut state, vec![Value::from("b")]).unwrap();
        assert_eq!(
            state.args().get::<Vec<String>>("paths"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_append_const_and_count() {
        let (parser, id) = parser_with(ActionKind::AppendConst);
        let mut state = ParseState::new(&parser);
        run(&parser, id, &mut state, vec![]).unwrap();
        run(&parser, id, &mut state, vec![]).unwrap();
        assert_eq!(
            state.args().get::<Vec<String>>("ex"),
            Ok(vec!["C".to_string(), "C".to_string()])
        );

        let (parser, id) = parser_with(ActionKind::Count);
        let mut state = ParseState::new(&parser);
        assert_eq!(state.args().get::<i64>("ex"), Ok(0));
        for _ in 0..3 {
            run(&parser, id, &mut state, vec![]).unwrap();
        }
        assert_eq!(state.args().get::<i64>("ex"), Ok(3));
    }

    #[test]
    fn test_help_stops_with_rendered_text() {
        let mut parser = ArgumentParser::new();
        parser.usage("tool [options]");
        let id = parser.add_argument(["--x"]).unwrap().action(ActionKind::Help).id();
        let mut state = ParseState::new(&parser);
        let flow = run(&parser, id, &mut state, vec![]).unwrap();
        assert!(matches!(flow, Flow::Help(ref text) if text.starts_with("usage: tool [options]")));
    }

    #[test]
    fn test_claim_group() {
        let parser = ArgumentParser::new();
        let mut state = ParseState::new(&parser);
        let group = GroupId(2);
        assert_eq!(state.claim_group(group, ActionId(0)), None);
        assert_eq!(state.claim_group(group, ActionId(0)), None);
        assert_eq!(state.claim_group(group, ActionId(1)), Some(ActionId(0)));
    }
}
