//! Output rendering: human-readable summaries for terminals, JSON
//! envelopes for pipes and tooling.

use std::io::{self, IsTerminal};

use nql_toolchain_core::{CommandProps, ParsedCommand, to_pretty_json};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` value, defaulting to pretty for
    /// interactive terminals and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

/// Print an error envelope. Shape matches the success envelope so
/// consumers can always parse stdout as JSON in json mode.
pub(crate) fn render_error(format: Format, message: &str) {
    match format {
        Format::Json => println!("{}", serde_json::json!({ "error": message })),
        Format::Pretty => eprintln!("error: {message}"),
    }
}

/// Print a full parse result.
pub(crate) fn render_parsed(format: Format, parsed: &ParsedCommand) {
    match format {
        Format::Json => println!("{}", to_pretty_json(parsed)),
        Format::Pretty => print_summary(parsed),
    }
}

fn print_summary(parsed: &ParsedCommand) {
    println!("command: {}", parsed.command_name);
    if let Some(spec) = parsed.command {
        println!("  {}", spec.summary);
    }
    if let Some(title) = parsed
        .global_flags
        .as_ref()
        .and_then(|f| f.window_props.as_ref())
        .and_then(|wp| wp.title.as_deref())
    {
        println!("title: {title}");
    }
    match &parsed.props {
        Some(CommandProps::Req(req)) => {
            println!("filter: {}", to_pretty_json(&req.filter));
            print_list("relays", &req.relays);
            if req.needs_account {
                println!("needs account context for alias resolution");
            }
        }
        Some(CommandProps::Count(count)) => {
            println!("filter: {}", to_pretty_json(&count.filter));
            print_list("relays", &count.relays);
        }
        Some(CommandProps::Relay(relay)) => {
            print_list(if relay.admin { "admin relays" } else { "relays" }, &relay.relays);
        }
        None => {}
    }
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("{label}: {}", items.join(", "));
    }
}
