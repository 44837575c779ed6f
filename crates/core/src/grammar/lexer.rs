//! Shell-style tokenization of raw command input.
//!
//! Single and double quotes group whitespace, backslash escapes follow the
//! usual shell conventions. No variable expansion of any kind is performed:
//! the alias sigil `$` (as in `$me`, `$contacts`, `$hashtags`) passes
//! through tokenization untouched, quoted or not.

use crate::error::ParseError;

/// Split a raw command-line string into tokens.
///
/// Malformed quoting (an unterminated quote or a dangling escape) is a
/// hard error with no partial token list.
///
/// ```
/// use nql_toolchain_core::tokenize;
/// let tokens = tokenize(r#"req -k 1 --title "My Feed" -a $me"#).unwrap();
/// assert_eq!(tokens[4], "My Feed");
/// assert_eq!(tokens[6], "$me");
/// ```
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    shlex::split(input).ok_or(ParseError::Tokenize)
}
