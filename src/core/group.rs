// src/core/group.rs

use crate::{
    core::{builder::ArgBuilder, errors::ConfigError, parser::ArgumentParser},
    models::GroupId,
};

/// A group of arguments, used to lay arguments out together in help and to make
/// them mutually exclusive.
///
/// This is a thin facade: arguments added through it are registered in the owning
/// parser exactly like `ArgumentParser::add_argument` does, except that they are
/// recorded under this group instead of the default positional/optional groups.
#[derive(Debug)]
pub struct ArgGroup<'p> {
    parser: &'p mut ArgumentParser,
    id: GroupId,
}

impl<'p> ArgGroup<'p> {
    pub(crate) fn new(parser: &'p mut ArgumentParser, id: GroupId) -> Self {
        Self { parser, id }
    }

    /// The handle of this group.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Sets the text shown under the group title in help.
    pub fn description(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if let Some(group) = self.parser.group_mut(self.id) {
            group.description = text;
        }
        self
    }

    /// When set, at most one member of the group may be supplied per parse.
    pub fn mutex(self, mutex: bool) -> Self {
        if let Some(group) = self.parser.group_mut(self.id) {
            group.mutex = mutex;
        }
        self
    }

    /// Adds an argument to this group instead of a default one.
    pub fn add_argument<I, S>(&mut self, names: I) -> Result<ArgBuilder<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parser.add_argument_to(Some(self.id), names)
    }
}
