//! nql toolchain core library.
//!
//! Provides the typed command language used to build Nostr relay queries:
//! tokenization, global-flag extraction, command resolution, the REQ/COUNT
//! filter grammar, NIP-19 entity decoding, and alias resolution against
//! account context.  The main entry points are [`parse_command_input`] for
//! the synchronous parse phase, [`enrich_req`]/[`enrich_count`] for the
//! asynchronous identifier-resolution phase, and [`resolve_filter_aliases`]
//! for substituting `$me`/`$contacts`/`$hashtags` once account state is
//! available.

#![warn(missing_docs)]

/// Alias substitution (`$me`, `$contacts`, `$hashtags`) against account context.
pub mod alias;
/// Classification of author/pubkey-like and event-like argument values.
pub mod classify;
/// Asynchronous NIP-05 / domain-directory identity enrichment.
pub mod enrich;
/// Parse error taxonomy.
pub mod error;
/// The Nostr protocol filter structure produced by the grammar.
pub mod filter;
/// Command grammar: lexer, global flags, command resolver, filter arguments.
pub mod grammar;
/// NIP-19 bech32 entity decoding (npub, note, nprofile, nevent, naddr).
pub mod nip19;
/// Timestamp grammar for `--since`/`--until` (absolute, relative, `now`).
pub mod time;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Synchronous parse phase
pub use grammar::lexer::tokenize;
pub use grammar::global_flags::{GlobalFlags, WindowProps, extract_global_flags};
pub use grammar::resolver::{
    CommandKind, CommandProps, CommandSpec, ParsedCommand, lookup_command, parse_command_input,
};
pub use grammar::filter_args::{
    IdentityChannels, ParsedCountCommand, ParsedReqCommand, ViewMode, parse_count_args,
    parse_count_args_at, parse_req_args, parse_req_args_at,
};

// Filter and alias resolution
pub use alias::{AliasContext, resolve_filter_aliases};
pub use filter::NostrFilter;

// Asynchronous enrichment phase
pub use enrich::{
    IdentityBatch, IdentityResolver, ResolveError, ResolvedIdentities, enrich_count, enrich_req,
};

// Errors and entities
pub use error::ParseError;
pub use nip19::Nip19;

/// Serialize a parse result (or any other serializable value) to a
/// pretty-printed JSON string.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("parse results serialize infallibly")
}
