// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// --- VALUES ---

/// A typed value produced by the parser, or declared as a default/constant/choice.
///
/// The enum is `untagged` so that the same values read naturally from TOML
/// definitions and serialize to plain JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Short, human-readable name of the variant, used in type-mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Drives how a raw token is converted before it reaches an action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    Int,
    Float,
    /// No conversion; the raw text is handed to the action untouched.
    Custom,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

// --- ACTIONS ---

/// The behavior triggered when an argument is recognized.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    Store,
    StoreConst,
    StoreTrue,
    StoreFalse,
    Append,
    AppendConst,
    Count,
    Help,
}

impl ActionKind {
    /// Whether the kind reads trailing value tokens at all.
    /// Every other kind behaves as a pure flag whatever `nargs` says.
    pub fn consumes_values(self) -> bool {
        matches!(self, Self::Store | Self::Append)
    }

    /// Whether the kind records a configured constant instead of user input.
    pub fn needs_const(self) -> bool {
        matches!(self, Self::StoreConst | Self::AppendConst)
    }
}

/// Whether an argument is matched by position or by a prefixed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Positional,
    Optional,
}

/// Stable handle to an action owned by an `ArgumentParser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    /// Position of the action in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable handle to a group owned by an `ArgumentParser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position of the group in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where an action's dest came from. A later alias may only replace a dest
/// whose origin ranks at or below its own (a short alias only fills an unset dest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum DestOrigin {
    Unset,
    Short,
    Long,
    Explicit,
}

/// One registered argument and all of its metadata.
#[derive(Debug, Clone)]
pub struct Action {
    pub(crate) dest: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) arg_kind: ArgKind,
    pub(crate) kind: ActionKind,
    pub(crate) value_type: ValueType,
    pub(crate) nargs: usize,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) const_value: Option<Value>,
    pub(crate) choices: Vec<Value>,
    pub(crate) help: String,
    pub(crate) metavar: Option<String>,
    pub(crate) group: GroupId,
    pub(crate) dest_origin: DestOrigin,
}

impl Action {
    pub(crate) fn new(arg_kind: ArgKind, group: GroupId) -> Self {
        Self {
            dest: String::new(),
            aliases: Vec::new(),
            arg_kind,
            kind: ActionKind::Store,
            value_type: ValueType::String,
            // A positional's own token is its first value.
            nargs: match arg_kind {
                ArgKind::Positional => 1,
                ArgKind::Optional => 0,
            },
            required: false,
            default: None,
            const_value: None,
            choices: Vec::new(),
            help: String::new(),
            metavar: None,
            group,
            dest_origin: DestOrigin::Unset,
        }
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arg_kind(&self) -> ArgKind {
        self.arg_kind
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn const_value(&self) -> Option<&Value> {
        self.const_value.as_ref()
    }

    pub fn choices(&self) -> &[Value] {
        &self.choices
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn is_positional(&self) -> bool {
        self.arg_kind == ArgKind::Positional
    }

    /// The number of values the action actually receives when matched.
    ///
    /// Flag-like kinds always take zero. Positionals take at least one,
    /// because the matching token is itself the first value.
    pub fn effective_nargs(&self) -> usize {
        if !self.kind.consumes_values() {
            return 0;
        }
        match self.arg_kind {
            ArgKind::Positional => self.nargs.max(1),
            ArgKind::Optional => self.nargs,
        }
    }

    /// The value placed in the results before scanning starts, if any.
    pub fn seed_value(&self) -> Option<Value> {
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match self.kind {
            ActionKind::StoreTrue => Some(Value::Bool(false)),
            ActionKind::StoreFalse => Some(Value::Bool(true)),
            ActionKind::Count => Some(Value::Int(0)),
            _ => None,
        }
    }

    /// The placeholder shown for this argument's values in usage and help.
    pub fn display_metavar(&self) -> String {
        match (&self.metavar, self.arg_kind) {
            (Some(m), _) => m.clone(),
            (None, ArgKind::Positional) => self.dest.clone(),
            (None, ArgKind::Optional) => self.dest.to_uppercase(),
        }
    }
}

// --- GROUPS ---

/// A named, ordered collection of arguments.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) members: Vec<ActionId>,
    pub(crate) mutex: bool,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            members: Vec::new(),
            mutex: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn members(&self) -> &[ActionId] {
        &self.members
    }

    pub fn is_mutex(&self) -> bool {
        self.mutex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_effective_nargs_by_kind() {
        let mut action = Action::new(ArgKind::Optional, GroupId(1));
        action.nargs = 2;
        assert_eq!(action.effective_nargs(), 2);

        action.kind = ActionKind::Count;
        assert_eq!(action.effective_nargs(), 0);

        let mut positional = Action::new(ArgKind::Positional, GroupId(0));
        positional.nargs = 0;
        assert_eq!(positional.effective_nargs(), 1);
    }

    #[test]
    fn test_seed_values() {
        let mut action = Action::new(ArgKind::Optional, GroupId(1));
        assert_eq!(action.seed_value(), None);

        action.kind = ActionKind::StoreFalse;
        assert_eq!(action.seed_value(), Some(Value::Bool(true)));

        action.kind = ActionKind::Count;
        action.default = Some(Value::Int(5));
        assert_eq!(action.seed_value(), Some(Value::Int(5)));
    }

    #[test]
    fn test_value_deserializes_untagged_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            a: Value,
            b: Value,
            c: Value,
        }
        let holder: Holder = toml::from_str("a = 3\nb = 'x'\nc = [1.5, true]").unwrap();
        assert_eq!(holder.a, Value::Int(3));
        assert_eq!(holder.b, Value::from("x"));
        assert_eq!(
            holder.c,
            Value::List(vec![Value::Float(1.5), Value::Bool(true)])
        );
    }
}
