//! Command registry, name resolution, and the synchronous parse entry
//! point.
//!
//! Resolution tries the two-token name first (`relay admin`) and falls
//! back to the single-token name. All failure modes surface as a message
//! on the returned [`ParsedCommand`] — UI code branches on the `error`
//! field, never on exceptions.

use nql_toolchain_relay_url::normalize_relay_url;
use serde::Serialize;

use super::filter_args::{
    ParsedCountCommand, ParsedReqCommand, parse_count_args, parse_req_args,
};
use super::global_flags::{GlobalFlags, extract_global_flags};
use super::lexer::tokenize;
use crate::error::ParseError;

/// Which argument grammar a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Subscribe to events matching a filter.
    Req,
    /// Count events matching a filter.
    Count,
    /// Show or edit the local relay list.
    Relay,
    /// Administer the connected relay (NIP-86).
    RelayAdmin,
}

/// A registered command descriptor.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The full (possibly two-token) lowercase command name.
    pub name: &'static str,
    /// One-line description shown in command palettes.
    pub summary: &'static str,
    /// The argument grammar this command runs.
    pub kind: CommandKind,
}

/// The command registry. Ordering is cosmetic; lookup is by name.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "req",
        summary: "subscribe to events matching a filter",
        kind: CommandKind::Req,
    },
    CommandSpec {
        name: "count",
        summary: "count events matching a filter",
        kind: CommandKind::Count,
    },
    CommandSpec {
        name: "relay",
        summary: "show or edit the relay list",
        kind: CommandKind::Relay,
    },
    CommandSpec {
        name: "relay admin",
        summary: "administer the connected relay",
        kind: CommandKind::RelayAdmin,
    },
];

/// Look up a command descriptor by its full lowercase name.
pub fn lookup_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// The command-specific parsed payload, keyed by command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandProps {
    /// Payload of a `req` command.
    Req(ParsedReqCommand),
    /// Payload of a `count` command.
    Count(ParsedCountCommand),
    /// Payload of a `relay` / `relay admin` command.
    Relay(RelayCommand),
}

/// Parsed payload of the relay commands: the target relay URLs,
/// normalized, with unparseable entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelayCommand {
    /// True for `relay admin`.
    pub admin: bool,
    /// Normalized relay URLs from the arguments.
    pub relays: Vec<String>,
}

/// The result of one parse of raw command input.
///
/// When `error` is set, `command` and `props` must not be trusted.
#[derive(Debug, Serialize)]
pub struct ParsedCommand {
    /// Lowercased resolved (or attempted) command name. Populated even for
    /// unknown commands so UIs can echo it back.
    pub command_name: String,
    /// Tokens after the command name and global flags.
    pub args: Vec<String>,
    /// The raw input string as typed.
    pub full_input: String,
    /// The resolved command descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static CommandSpec>,
    /// The command-specific parsed payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<CommandProps>,
    /// Parse failure message, when the input could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Extracted global flags, when any were present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_flags: Option<GlobalFlags>,
}

impl ParsedCommand {
    fn failed(full_input: &str, command_name: String, args: Vec<String>, err: &ParseError) -> Self {
        ParsedCommand {
            command_name,
            args,
            full_input: full_input.to_string(),
            command: None,
            props: None,
            error: Some(err.to_string()),
            global_flags: None,
        }
    }
}

/// Parse raw command input synchronously.
///
/// Tokenizes, extracts global flags, resolves the command name, and runs
/// the command's argument grammar. This stage performs no I/O and never
/// suspends — it is cheap enough to run on every keystroke. Identifier
/// resolution and alias substitution happen afterwards via
/// [`enrich_req`](crate::enrich_req) /
/// [`resolve_filter_aliases`](crate::resolve_filter_aliases).
pub fn parse_command_input(input: &str) -> ParsedCommand {
    let tokens = match tokenize(input) {
        Ok(tokens) => tokens,
        Err(err) => return ParsedCommand::failed(input, String::new(), Vec::new(), &err),
    };

    let (global_flags, remaining) = match extract_global_flags(&tokens) {
        Ok(extracted) => extracted,
        Err(err) => return ParsedCommand::failed(input, String::new(), Vec::new(), &err),
    };

    if remaining.is_empty() {
        return ParsedCommand::failed(input, String::new(), Vec::new(), &ParseError::EmptyCommand);
    }

    let first = remaining[0].to_lowercase();
    let (spec, command_name, args) = if remaining.len() >= 2 {
        let two_token = format!("{first} {}", remaining[1].to_lowercase());
        if let Some(spec) = lookup_command(&two_token) {
            (Some(spec), two_token, remaining[2..].to_vec())
        } else {
            (lookup_command(&first), first, remaining[1..].to_vec())
        }
    } else {
        (lookup_command(&first), first, Vec::new())
    };

    let Some(spec) = spec else {
        return ParsedCommand::failed(
            input,
            command_name.clone(),
            args,
            &ParseError::UnknownCommand(command_name),
        );
    };

    let props = match spec.kind {
        CommandKind::Req => CommandProps::Req(parse_req_args(&args)),
        CommandKind::Count => CommandProps::Count(parse_count_args(&args)),
        CommandKind::Relay => CommandProps::Relay(parse_relay_args(&args, false)),
        CommandKind::RelayAdmin => CommandProps::Relay(parse_relay_args(&args, true)),
    };

    ParsedCommand {
        command_name,
        args,
        full_input: input.to_string(),
        command: Some(spec),
        props: Some(props),
        error: None,
        global_flags: (global_flags != GlobalFlags::default()).then_some(global_flags),
    }
}

fn parse_relay_args(args: &[String], admin: bool) -> RelayCommand {
    let relays = args
        .iter()
        .filter_map(|arg| normalize_relay_url(arg).ok())
        .collect();
    RelayCommand { admin, relays }
}
