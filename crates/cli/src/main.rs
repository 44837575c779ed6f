//! `nql` — parse and resolve Nostr query-language commands.

mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nql_toolchain_core::{
    AliasContext, CommandProps, parse_command_input, resolve_filter_aliases, to_pretty_json,
};
use nql_toolchain_relay_url::normalize_relay_url;

use crate::render::{Format, render_error, render_parsed};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "nql",
    version,
    about = "nql toolchain — parse, inspect, and resolve Nostr query-language commands"
)]
struct Cli {
    /// Output mode: "pretty" for terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a command string and print the structured result.
    Parse {
        /// The raw command input, e.g. "req -k 1 -a $me".
        input: String,
    },

    /// Parse a command string and resolve its aliases against the given
    /// account context, printing the final filter.
    Resolve {
        /// The raw command input.
        input: String,
        /// Account pubkey substituted for `$me`.
        #[arg(long)]
        me: Option<String>,
        /// Contact pubkey substituted for `$contacts` (repeatable).
        #[arg(long = "contact")]
        contacts: Vec<String>,
        /// Hashtag substituted for `$hashtags` (repeatable).
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
        /// JSON file with `account_pubkey`, `contacts`, `hashtags`;
        /// command-line flags extend and override it.
        #[arg(long)]
        context: Option<String>,
    },

    /// Normalize a relay URL to canonical form.
    RelayUrl {
        /// The relay URL or bare host.
        url: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let outcome = match cli.cmd {
        Cmd::Parse { input } => run_parse(format, &input),
        Cmd::Resolve {
            input,
            me,
            contacts,
            hashtags,
            context,
        } => run_resolve(format, &input, me, contacts, hashtags, context.as_deref()),
        Cmd::RelayUrl { url } => run_relay_url(format, &url),
    };

    match outcome {
        Ok(()) => {}
        Err(err) => {
            render_error(format, &format!("{err:#}"));
            process::exit(1);
        }
    }
}

// ── Subcommands ─────────────────────────────────────────────────────────

fn run_parse(format: Format, input: &str) -> Result<()> {
    let parsed = parse_command_input(input);
    if let Some(message) = &parsed.error {
        render_error(format, message);
        process::exit(1);
    }
    render_parsed(format, &parsed);
    Ok(())
}

fn run_resolve(
    format: Format,
    input: &str,
    me: Option<String>,
    contacts: Vec<String>,
    hashtags: Vec<String>,
    context_path: Option<&str>,
) -> Result<()> {
    let mut context = match context_path {
        Some(path) => load_context(path)?,
        None => AliasContext::default(),
    };
    if me.is_some() {
        context.account_pubkey = me;
    }
    context.contacts.extend(contacts);
    context.hashtags.extend(hashtags);

    let parsed = parse_command_input(input);
    if let Some(message) = &parsed.error {
        render_error(format, message);
        process::exit(1);
    }

    let filter = match &parsed.props {
        Some(CommandProps::Req(req)) => &req.filter,
        Some(CommandProps::Count(count)) => &count.filter,
        _ => {
            render_error(
                format,
                &format!("command '{}' produces no filter", parsed.command_name),
            );
            process::exit(1);
        }
    };

    let resolved = resolve_filter_aliases(filter, &context);
    // A filter is JSON either way; pretty mode just prints it unwrapped.
    println!("{}", to_pretty_json(&resolved));
    Ok(())
}

fn run_relay_url(format: Format, url: &str) -> Result<()> {
    match normalize_relay_url(url) {
        Ok(normalized) => {
            match format {
                Format::Json => println!("{}", serde_json::json!({ "url": normalized })),
                Format::Pretty => println!("{normalized}"),
            }
            Ok(())
        }
        Err(err) => {
            render_error(format, &err.to_string());
            process::exit(1);
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn load_context(path: &str) -> Result<AliasContext> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading context file {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing context file {path}"))
}
