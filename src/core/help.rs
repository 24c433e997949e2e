// src/core/help.rs

use crate::{
    constants::{HELP_DESCRIPTION, HELP_INDENT, MIN_HELP_WIDTH, OPTIONAL_GROUP_IDX},
    core::parser::ArgumentParser,
    models::{Action, ActionKind, ArgKind, Group},
};
use colored::*;

/// One rendered argument line before alignment: the alias column and its help text.
struct Row {
    names: String,
    help: String,
}

impl ArgumentParser {
    /// Renders the complete help text: usage, description, one section per
    /// non-empty group, and the epilog.
    pub fn format_help(&self) -> String {
        let mut sections = vec![self.format_usage()];

        if !self.description.is_empty() {
            sections.push(wrap_words(&self.description, self.term_width).join("\n"));
        }

        for (idx, group) in self.groups.iter().enumerate() {
            let rows = self.group_rows(idx, group);
            if rows.is_empty() {
                continue;
            }
            sections.push(self.render_group(group, &rows));
        }

        if !self.epilog.is_empty() {
            sections.push(wrap_words(&self.epilog, self.term_width).join("\n"));
        }

        let mut text = sections.join("\n\n");
        text.push('\n');
        text
    }

    /// The usage line. Uses the configured usage text when there is one, otherwise
    /// builds it from the program name and the registered arguments.
    pub fn format_usage(&self) -> String {
        let header = if self.styled_help {
            "usage:".yellow().bold().to_string()
        } else {
            "usage:".to_string()
        };
        if !self.usage.is_empty() {
            return format!("{} {}", header, self.usage);
        }

        let mut parts = Vec::new();
        if !self.prog.is_empty() {
            parts.push(self.prog.clone());
        }
        if let Some(help) = self.help_usage_alias() {
            parts.push(format!("[{}]", help));
        }
        for action in self.actions.iter().filter(|a| !a.is_positional()) {
            if action.kind() == ActionKind::Help {
                continue;
            }
            let Some(first) = action.aliases().first() else {
                continue;
            };
            let mut part = first.clone();
            for _ in 0..action.effective_nargs() {
                part.push(' ');
                part.push_str(&action.display_metavar());
            }
            if action.is_required() {
                parts.push(part);
            } else {
                parts.push(format!("[{}]", part));
            }
        }
        for id in &self.positionals {
            if let Some(action) = self.action(*id) {
                let metavar = action.display_metavar();
                let count = action.effective_nargs().max(1);
                parts.push(vec![metavar; count].join(" "));
            }
        }

        if parts.is_empty() {
            header
        } else {
            format!("{} {}", header, parts.join(" "))
        }
    }

    /// The help spelling shown in the usage line, whether or not the help action
    /// has been installed yet.
    fn help_usage_alias(&self) -> Option<String> {
        if self.sealed {
            self.actions
                .iter()
                .find(|a| a.kind() == ActionKind::Help)
                .and_then(|a| a.aliases().first().cloned())
        } else if self.add_help {
            self.help_aliases().into_iter().next()
        } else {
            None
        }
    }

    fn group_rows(&self, idx: usize, group: &Group) -> Vec<Row> {
        let mut rows: Vec<Row> = group
            .members()
            .iter()
            .filter_map(|id| self.action(*id))
            .map(|action| Row {
                names: alias_column(action),
                help: action.help().to_string(),
            })
            .collect();

        // Before the first parse the automatic help is not registered yet; show it
        // where it will land.
        if idx == OPTIONAL_GROUP_IDX && !self.sealed && self.add_help {
            let aliases = self.help_aliases();
            if !aliases.is_empty() {
                rows.push(Row {
                    names: aliases.join(", "),
                    help: HELP_DESCRIPTION.to_string(),
                });
            }
        }
        rows
    }

    fn render_group(&self, group: &Group, rows: &[Row]) -> String {
        let mut lines = Vec::new();
        let title = format!("{}:", group.name());
        if self.styled_help {
            lines.push(title.bold().to_string());
        } else {
            lines.push(title);
        }
        if !group.description().is_empty() {
            lines.extend(wrap_words(group.description(), self.term_width));
            lines.push(String::new());
        }

        let width = rows
            .iter()
            .map(|r| r.names.chars().count())
            .max()
            .unwrap_or(0);
        let pad_col = HELP_INDENT.len() + width + 1;
        let help_width = self.term_width.saturating_sub(pad_col).max(MIN_HELP_WIDTH);

        for row in rows {
            let wrapped = wrap_words(&row.help, help_width);
            let mut help_lines = wrapped.iter();
            match help_lines.next() {
                Some(first) => {
                    lines.push(format!("{}{:<width$} {}", HELP_INDENT, row.names, first));
                }
                None => lines.push(format!("{}{}", HELP_INDENT, row.names)),
            }
            for rest in help_lines {
                lines.push(format!("{}{}", " ".repeat(pad_col), rest));
            }
        }
        lines.join("\n")
    }
}

/// Comma-joined aliases, followed by value placeholders for options that take values.
fn alias_column(action: &Action) -> String {
    let names = action.aliases().join(", ");
    match action.arg_kind() {
        ArgKind::Positional => action.metavar.clone().unwrap_or(names),
        ArgKind::Optional => {
            let nargs = action.effective_nargs();
            if nargs == 0 {
                names
            } else {
                let metavars = vec![action.display_metavar(); nargs].join(" ");
                format!("{} {}", names, metavars)
            }
        }
    }
}

/// Greedy word wrap that only breaks on whitespace. A word longer than `width`
/// is never split; it simply gets a line of its own.
pub(crate) fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
