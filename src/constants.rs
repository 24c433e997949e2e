// src/constants.rs

/// The prefix characters a fresh parser recognizes for optional arguments.
pub const DEFAULT_PREFIX_CHARS: &str = "-";

/// The title of the group every positional argument lands in by default.
pub const POSITIONAL_GROUP_NAME: &str = "Positional Arguments";

/// The title of the group every optional argument lands in by default.
pub const OPTIONAL_GROUP_NAME: &str = "Options";

/// Index of the default positional group inside the parser's group list.
pub const POSITIONAL_GROUP_IDX: usize = 0;

/// Index of the default optional group inside the parser's group list.
pub const OPTIONAL_GROUP_IDX: usize = 1;

/// The column at which rendered help text is wrapped.
pub const DEFAULT_TERM_WIDTH: usize = 90;

/// Help text is never squeezed into fewer columns than this, even for wide alias columns.
pub const MIN_HELP_WIDTH: usize = 20;

/// Indentation applied to every argument row in the help output.
pub const HELP_INDENT: &str = "  ";

/// Short spelling (without prefix) of the automatic help flag.
pub const HELP_SHORT_NAME: &str = "h";

/// Long spelling (without prefix) of the automatic help flag.
pub const HELP_LONG_NAME: &str = "help";

/// Help line attached to the automatic help flag.
pub const HELP_DESCRIPTION: &str = "show this help message and exit";
