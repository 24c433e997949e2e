// src/core/builder.rs

use crate::{
    core::{errors::ConfigError, parser::ArgumentParser},
    models::{Action, ActionId, ActionKind, DestOrigin, Value, ValueType},
};

/// A handle used for configuring one registered argument.
///
/// The builder only holds the action's `ActionId`, so changing the action kind
/// never leaves a stale alias binding behind: every alias keeps pointing at the
/// same slot. Calls are meant to be chained directly onto `add_argument`.
#[derive(Debug)]
pub struct ArgBuilder<'p> {
    parser: &'p mut ArgumentParser,
    id: ActionId,
}

impl<'p> ArgBuilder<'p> {
    pub(crate) fn new(parser: &'p mut ArgumentParser, id: ActionId) -> Self {
        Self { parser, id }
    }

    /// The handle of the action being configured.
    pub fn id(&self) -> ActionId {
        self.id
    }

    fn update(self, f: impl FnOnce(&mut Action)) -> Self {
        if let Some(action) = self.parser.action_mut(self.id) {
            f(action);
        }
        self
    }

    /// Attaches another name or flag. Mixing positional and optional names fails.
    pub fn alias(self, name: impl Into<String>) -> Result<Self, ConfigError> {
        self.parser.attach_alias(self.id, name.into())?;
        Ok(self)
    }

    /// Sets what happens when the argument is recognized.
    pub fn action(self, kind: ActionKind) -> Self {
        self.update(|a| a.kind = kind)
    }

    /// Sets the help line shown next to the aliases.
    pub fn help(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.update(|a| a.help = text)
    }

    /// Sets the value placeholder shown in usage and help.
    pub fn metavar(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|a| a.metavar = Some(name))
    }

    /// Overrides the inferred destination name. Later aliases won't change it.
    pub fn dest(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|a| {
            a.dest = name;
            a.dest_origin = DestOrigin::Explicit;
        })
    }

    /// Value recorded when the argument is never supplied.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|a| a.default = Some(value))
    }

    /// Constant recorded by `StoreConst` and `AppendConst`.
    pub fn const_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|a| a.const_value = Some(value))
    }

    /// Sets how value tokens are converted.
    pub fn value_type(self, value_type: ValueType) -> Self {
        self.update(|a| a.value_type = value_type)
    }

    /// Number of values the argument consumes when matched.
    pub fn nargs(self, count: usize) -> Self {
        self.update(|a| a.nargs = count)
    }

    /// Makes the parse fail when the argument is never supplied.
    pub fn required(self, required: bool) -> Self {
        self.update(|a| a.required = required)
    }

    /// Restricts accepted values. Compared after type conversion.
    pub fn choices<I, V>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
        self.update(|a| a.choices = choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_configuration() {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["-n"])
            .unwrap()
            .alias("--count")
            .unwrap()
            .value_type(ValueType::Int)
            .nargs(1)
            .default_value(7)
            .required(true)
            .metavar("N")
            .help("how many")
            .id();

        let action = parser.action(id).unwrap();
        assert_eq!(action.dest(), "count");
        assert_eq!(action.aliases(), &["-n".to_string(), "--count".to_string()]);
        assert_eq!(action.value_type(), ValueType::Int);
        assert_eq!(action.effective_nargs(), 1);
        assert_eq!(action.default_value(), Some(&Value::Int(7)));
        assert!(action.is_required());
        assert_eq!(action.display_metavar(), "N");
        assert_eq!(action.help(), "how many");
    }

    #[test]
    fn test_alias_of_wrong_sort_fails_immediately() {
        let mut parser = ArgumentParser::new();
        let result = parser.add_argument(["-v"]).unwrap().alias("verbose");
        assert!(matches!(result, Err(ConfigError::MixedAliases { .. })));
    }

    #[test]
    fn test_switching_action_keeps_alias_bindings() {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["-q", "--quiet"])
            .unwrap()
            .action(ActionKind::StoreTrue)
            .action(ActionKind::Count)
            .id();

        assert_eq!(parser.lookup_flag("-q"), Some(id));
        assert_eq!(parser.lookup_flag("--quiet"), Some(id));
        assert_eq!(parser.action(id).unwrap().kind(), ActionKind::Count);
    }

    #[test]
    fn test_explicit_dest_survives_later_aliases() {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["-o"])
            .unwrap()
            .dest("target")
            .alias("--output")
            .unwrap()
            .id();
        assert_eq!(parser.action(id).unwrap().dest(), "target");
    }

    #[test]
    fn test_choices_are_converted_to_values() {
        let mut parser = ArgumentParser::new();
        let id = parser
            .add_argument(["--mode"])
            .unwrap()
            .choices(["fast", "slow"])
            .id();
        assert_eq!(
            parser.action(id).unwrap().choices(),
            &[Value::from("fast"), Value::from("slow")]
        );
    }
}
