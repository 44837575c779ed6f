use thiserror::Error;

/// Hard parse failures surfaced on the parse result.
///
/// These never cross the parser boundary as panics or early returns to UI
/// code: [`parse_command_input`](crate::parse_command_input) converts them
/// into the `error` message field of the returned
/// [`ParsedCommand`](crate::ParsedCommand). Individually malformed flag
/// values (bad integers, bad timestamps) are *not* errors — the grammar
/// drops them and keeps the rest of the filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input could not be split into tokens (unterminated quote or
    /// dangling escape). No partial token list is produced.
    #[error("malformed quoting in command input")]
    Tokenize,

    /// A global flag appeared without a value (last token, or immediately
    /// followed by another flag).
    #[error("{flag} requires a value")]
    MissingFlagValue {
        /// The flag that was missing its value.
        flag: String,
    },

    /// The token stream was empty after global-flag extraction.
    #[error("no command provided")]
    EmptyCommand,

    /// The first token(s) did not match any registered command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
