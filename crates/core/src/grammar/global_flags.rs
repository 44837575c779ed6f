//! Extraction of flags that apply to any command.
//!
//! Global flags may appear anywhere in the token stream and are removed
//! from it before command resolution. The set is table-driven so new flags
//! are one descriptor, not another branch of an if-chain.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Cross-command options extracted from the token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalFlags {
    /// Window presentation overrides, when any were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_props: Option<WindowProps>,
}

/// Presentation overrides for the window hosting the command's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowProps {
    /// Window title override (`--title`), sanitized and length-capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Longest title stored; anything beyond is cut.
const MAX_TITLE_CHARS: usize = 200;

struct GlobalFlagSpec {
    name: &'static str,
    apply: fn(&mut GlobalFlags, &str),
}

const GLOBAL_FLAGS: &[GlobalFlagSpec] = &[GlobalFlagSpec {
    name: "--title",
    apply: apply_title,
}];

fn apply_title(flags: &mut GlobalFlags, raw: &str) {
    // Last occurrence wins, including one that sanitizes to nothing.
    flags.window_props.get_or_insert_with(Default::default).title = sanitize_title(raw);
}

/// Strip control characters, trim, and cap at [`MAX_TITLE_CHARS`].
/// Unicode text (emoji, CJK, RTL scripts) passes through. A value that
/// sanitizes to nothing yields `None` so the caller default applies.
fn sanitize_title(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_ascii_control()).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_TITLE_CHARS).collect())
}

/// Scan `tokens` for global flags, returning the extracted flags and the
/// remaining tokens with flags and their values removed.
///
/// `remaining` is always a subsequence of `tokens` in the original order.
/// A recognized flag that is the last token, or whose value slot holds
/// another `--flag`, is a hard error.
pub fn extract_global_flags(tokens: &[String]) -> Result<(GlobalFlags, Vec<String>), ParseError> {
    let mut flags = GlobalFlags::default();
    let mut remaining = Vec::with_capacity(tokens.len());
    let mut i = 0usize;
    while i < tokens.len() {
        let Some(spec) = GLOBAL_FLAGS.iter().find(|s| s.name == tokens[i]) else {
            remaining.push(tokens[i].clone());
            i += 1;
            continue;
        };
        match tokens.get(i + 1) {
            None => {
                return Err(ParseError::MissingFlagValue {
                    flag: spec.name.to_string(),
                });
            }
            Some(value) if value.starts_with("--") => {
                return Err(ParseError::MissingFlagValue {
                    flag: spec.name.to_string(),
                });
            }
            Some(value) => {
                (spec.apply)(&mut flags, value);
                i += 2;
            }
        }
    }
    // A window_props record whose every field sanitized away is dropped so
    // the caller's defaults apply.
    if flags.window_props == Some(WindowProps::default()) {
        flags.window_props = None;
    }
    Ok((flags, remaining))
}
