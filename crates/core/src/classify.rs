//! Classification of the value forms accepted by the filter grammar.
//!
//! Author-like flags (`-a`, `-p`, `-P`) and event-like flags (`-i`, `-e`)
//! accept several spellings for the same thing. Classification is purely
//! syntactic — anything needing a network lookup (NIP-05 addresses, bare
//! domain directories) is deferred to the async enrichment phase.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::nip19::{self, Nip19};

static BARE_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$")
        .expect("static pattern compiles")
});

static COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+:[0-9a-fA-F]{64}:").expect("static pattern compiles")
});

/// A symbolic alias resolved later against account context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alias {
    /// The active account's pubkey.
    Me,
    /// The active account's contact-list pubkeys.
    Contacts,
    /// The configured hashtag set.
    Hashtags,
}

impl Alias {
    /// Case-insensitive parse of an alias token.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("$me") {
            Some(Alias::Me)
        } else if raw.eq_ignore_ascii_case("$contacts") {
            Some(Alias::Contacts)
        } else if raw.eq_ignore_ascii_case("$hashtags") {
            Some(Alias::Hashtags)
        } else {
            None
        }
    }

    /// The canonical literal stored in the filter until resolution.
    pub fn literal(self) -> &'static str {
        match self {
            Alias::Me => "$me",
            Alias::Contacts => "$contacts",
            Alias::Hashtags => "$hashtags",
        }
    }
}

/// A classified author/pubkey-like value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubkeyValue {
    /// A concrete pubkey, lowercase hex. Goes straight into the filter.
    Hex(String),
    /// A decoded `nprofile` — pubkey plus relay hints.
    Profile {
        /// Lowercase hex pubkey.
        pubkey: String,
        /// Relay hints carried by the nprofile.
        relays: Vec<String>,
    },
    /// `$me` or `$contacts`, kept literal until account context exists.
    Alias(Alias),
    /// A `name@domain` NIP-05 address, deferred to async resolution.
    Nip05(String),
    /// A bare domain directory, deferred to async resolution.
    Domain(String),
}

/// Classify one author/pubkey-like value per the grammar's rules.
///
/// Returns `None` for values matching no known form; the grammar drops
/// those silently (best-effort filters).
pub fn classify_pubkey_value(raw: &str) -> Option<PubkeyValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_hex_key(trimmed) {
        return Some(PubkeyValue::Hex(trimmed.to_ascii_lowercase()));
    }
    if let Some(alias) = Alias::parse(trimmed) {
        // $hashtags never stands for a pubkey.
        if alias != Alias::Hashtags {
            return Some(PubkeyValue::Alias(alias));
        }
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("npub1") || lower.starts_with("nprofile1") {
        return match nip19::decode(trimmed).ok()? {
            Nip19::Npub { pubkey } => Some(PubkeyValue::Hex(pubkey)),
            Nip19::Nprofile { pubkey, relays } => Some(PubkeyValue::Profile { pubkey, relays }),
            _ => None,
        };
    }
    if trimmed.contains('@') {
        return Some(PubkeyValue::Nip05(lower));
    }
    if is_bare_domain(trimmed) {
        return Some(PubkeyValue::Domain(lower));
    }
    None
}

/// A classified event-like value for `-e` (and, id forms only, `-i`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValue {
    /// An event id, lowercase hex. Routes to `#e` (or `ids`).
    Id {
        /// Lowercase hex event id.
        id: String,
        /// Relay hints from an `nevent`, empty otherwise.
        relays: Vec<String>,
    },
    /// A replaceable-event address coordinate. Routes to `#a`.
    Address {
        /// The `kind:pubkey:identifier` coordinate.
        coordinate: String,
        /// Relay hints from an `naddr`, empty otherwise.
        relays: Vec<String>,
    },
}

/// Classify one event-like value: hex id, `note1`, `nevent1`, `naddr1`,
/// or a raw `kind:pubkey:identifier` coordinate.
pub fn classify_event_value(raw: &str) -> Option<EventValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_hex_key(trimmed) {
        return Some(EventValue::Id {
            id: trimmed.to_ascii_lowercase(),
            relays: Vec::new(),
        });
    }
    if COORDINATE.is_match(trimmed) {
        return Some(EventValue::Address {
            coordinate: trimmed.to_string(),
            relays: Vec::new(),
        });
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("note1") || lower.starts_with("nevent1") || lower.starts_with("naddr1") {
        return match nip19::decode(trimmed).ok()? {
            Nip19::Note { id } => Some(EventValue::Id {
                id,
                relays: Vec::new(),
            }),
            Nip19::Nevent { id, relays, .. } => Some(EventValue::Id { id, relays }),
            Nip19::Naddr {
                identifier,
                pubkey,
                kind,
                relays,
            } => Some(EventValue::Address {
                coordinate: format!("{kind}:{pubkey}:{identifier}"),
                relays,
            }),
            _ => None,
        };
    }
    None
}

/// A 64-character hex string (pubkey or event id).
pub fn is_hex_key(raw: &str) -> bool {
    raw.len() == 64 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A bare domain name (`relay.example.com`): dotted labels, no `@`,
/// no scheme.
pub fn is_bare_domain(raw: &str) -> bool {
    BARE_DOMAIN.is_match(raw)
}
