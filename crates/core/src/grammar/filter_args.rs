//! The REQ/COUNT filter argument grammar.
//!
//! A single forward scan over the argument tokens, accepting flags in any
//! order and any mixture of short and long forms. Malformed individual
//! values (a non-numeric kind, a bad timestamp, an undecodable npub) are
//! dropped silently and the rest of the filter is kept — users build these
//! commands incrementally and a best-effort filter beats all-or-nothing
//! rejection. Values needing network resolution (NIP-05 addresses, bare
//! domain directories) never enter the filter here; they are parked in
//! side-channel arrays for the asynchronous enrichment phase.

use nql_toolchain_relay_url::normalize_relay_url;
use serde::Serialize;

use crate::classify::{
    Alias, EventValue, PubkeyValue, classify_event_value, classify_pubkey_value, is_bare_domain,
};
use crate::filter::{NostrFilter, dedup_strings};
use crate::time::{now_unix, parse_timestamp};

/// How query results should be presented (REQ only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One event per row.
    List,
    /// Condensed multi-column rendering.
    Compact,
}

impl ViewMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "list" => Some(ViewMode::List),
            "compact" => Some(ViewMode::Compact),
            _ => None,
        }
    }
}

/// Identifiers deferred to asynchronous NIP-05 / domain-directory
/// resolution, grouped by the filter field they will feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityChannels {
    /// `name@domain` values from `-a`, destined for `authors`.
    pub nip05_authors: Vec<String>,
    /// `name@domain` values from `-p`, destined for `#p`.
    pub nip05_p_tags: Vec<String>,
    /// `name@domain` values from `-P`, destined for `#P`.
    pub nip05_p_tags_uppercase: Vec<String>,
    /// Bare domains from `-a`, destined for `authors`.
    pub domain_authors: Vec<String>,
    /// Bare domains from `-p`, destined for `#p`.
    pub domain_p_tags: Vec<String>,
    /// Bare domains from `-P`, destined for `#P`.
    pub domain_p_tags_uppercase: Vec<String>,
}

impl IdentityChannels {
    /// True when nothing was deferred and the enrichment phase can be
    /// skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.nip05_authors.is_empty()
            && self.nip05_p_tags.is_empty()
            && self.nip05_p_tags_uppercase.is_empty()
            && self.domain_authors.is_empty()
            && self.domain_p_tags.is_empty()
            && self.domain_p_tags_uppercase.is_empty()
    }

    fn dedup(&mut self) {
        for channel in [
            &mut self.nip05_authors,
            &mut self.nip05_p_tags,
            &mut self.nip05_p_tags_uppercase,
            &mut self.domain_authors,
            &mut self.domain_p_tags,
            &mut self.domain_p_tags_uppercase,
        ] {
            dedup_strings(channel);
        }
    }
}

/// A parsed `req` command: the filter, its side channels, and the
/// REQ-only presentation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedReqCommand {
    /// The filter built from the arguments.
    pub filter: NostrFilter,
    /// Explicit relays the query should go to, normalized.
    pub relays: Vec<String>,
    /// Identifiers awaiting async resolution.
    #[serde(flatten)]
    pub identities: IdentityChannels,
    /// True when `$me` or `$contacts` appears in `authors`, `#p`, or `#P`
    /// and alias resolution will need account context.
    pub needs_account: bool,
    /// Close the subscription at end-of-stored-events.
    pub close_on_eose: bool,
    /// Requested view mode, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewMode>,
    /// Keep following the queried authors as the contact list changes.
    pub follow: bool,
}

/// A parsed `count` command: identical grammar to `req` minus the
/// presentation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedCountCommand {
    /// The filter built from the arguments.
    pub filter: NostrFilter,
    /// Explicit relays the query should go to, normalized.
    pub relays: Vec<String>,
    /// Identifiers awaiting async resolution.
    #[serde(flatten)]
    pub identities: IdentityChannels,
    /// True when alias resolution will need account context.
    pub needs_account: bool,
}

/// Parse `req` arguments against the current wall clock.
pub fn parse_req_args(args: &[String]) -> ParsedReqCommand {
    parse_req_args_at(args, now_unix())
}

/// Parse `req` arguments with an injected `now` (unix seconds) for the
/// relative-timestamp grammar.
pub fn parse_req_args_at(args: &[String], now: u64) -> ParsedReqCommand {
    let scan = FilterScan::run(args, Grammar::Req, now);
    ParsedReqCommand {
        filter: scan.filter,
        relays: scan.relays,
        identities: scan.identities,
        needs_account: scan.needs_account,
        close_on_eose: scan.close_on_eose,
        view: scan.view,
        follow: scan.follow,
    }
}

/// Parse `count` arguments against the current wall clock.
pub fn parse_count_args(args: &[String]) -> ParsedCountCommand {
    parse_count_args_at(args, now_unix())
}

/// Parse `count` arguments with an injected `now` (unix seconds).
pub fn parse_count_args_at(args: &[String], now: u64) -> ParsedCountCommand {
    let scan = FilterScan::run(args, Grammar::Count, now);
    ParsedCountCommand {
        filter: scan.filter,
        relays: scan.relays,
        identities: scan.identities,
        needs_account: scan.needs_account,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Grammar {
    Req,
    Count,
}

/// Which filter field a pubkey-like flag feeds.
#[derive(Clone, Copy)]
enum PubkeyTarget {
    Authors,
    PTag,
    UppercasePTag,
}

#[derive(Default)]
struct FilterScan {
    filter: NostrFilter,
    relays: Vec<String>,
    identities: IdentityChannels,
    needs_account: bool,
    close_on_eose: bool,
    view: Option<ViewMode>,
    follow: bool,
}

impl FilterScan {
    fn run(args: &[String], grammar: Grammar, now: u64) -> Self {
        let mut scan = FilterScan::default();
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "-k" | "--kind" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_kinds(value);
                    }
                }
                "-a" | "--author" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_pubkeys(value, PubkeyTarget::Authors);
                    }
                }
                "-i" | "--id" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_ids(value);
                    }
                }
                "-e" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_event_refs(value);
                    }
                }
                "-p" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_pubkeys(value, PubkeyTarget::PTag);
                    }
                }
                "-P" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_pubkeys(value, PubkeyTarget::UppercasePTag);
                    }
                }
                "-t" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_hashtags(value);
                    }
                }
                "-d" => {
                    if let Some(value) = value_of(args, &mut i) {
                        scan.push_identifiers(value);
                    }
                }
                "-T" | "--tag" => match (args.get(i + 1), args.get(i + 2)) {
                    (Some(letter), Some(values)) => {
                        scan.push_generic_tag(letter, values);
                        i += 3;
                    }
                    (Some(_), None) => i += 2,
                    _ => i += 1,
                },
                "--since" => {
                    if let Some(value) = value_of(args, &mut i) {
                        if let Some(ts) = parse_timestamp(value, now) {
                            scan.filter.since = Some(ts);
                        }
                    }
                }
                "--until" => {
                    if let Some(value) = value_of(args, &mut i) {
                        if let Some(ts) = parse_timestamp(value, now) {
                            scan.filter.until = Some(ts);
                        }
                    }
                }
                "-l" | "--limit" => {
                    if let Some(value) = value_of(args, &mut i) {
                        if let Ok(limit) = value.trim().parse::<u32>() {
                            scan.filter.limit = Some(limit);
                        }
                    }
                }
                "--search" => {
                    // Consumes the remainder as one free-text value.
                    let text = args[i + 1..].join(" ");
                    if !text.is_empty() {
                        scan.filter.search = Some(text);
                    }
                    i = args.len();
                }
                "--close-on-eose" => {
                    if grammar == Grammar::Req {
                        scan.close_on_eose = true;
                    }
                    i += 1;
                }
                "-v" | "--view" => {
                    if let Some(value) = value_of(args, &mut i) {
                        if grammar == Grammar::Req {
                            scan.view = ViewMode::parse(value);
                        }
                    }
                }
                "-f" | "--follow" => {
                    if grammar == Grammar::Req {
                        scan.follow = true;
                    }
                    i += 1;
                }
                bare => {
                    scan.push_bare_token(bare);
                    i += 1;
                }
            }
        }
        scan.filter.dedup();
        scan.identities.dedup();
        dedup_strings(&mut scan.relays);
        scan
    }

    fn push_kinds(&mut self, value: &str) {
        let kinds = self.filter.kinds.get_or_insert_with(Vec::new);
        for part in value.split(',') {
            if let Ok(kind) = part.trim().parse::<u32>() {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            self.filter.kinds = None;
        }
    }

    fn push_pubkeys(&mut self, value: &str, target: PubkeyTarget) {
        for part in value.split(',') {
            let Some(classified) = classify_pubkey_value(part) else {
                continue;
            };
            match classified {
                PubkeyValue::Hex(pubkey) => self.push_pubkey_field(target, pubkey),
                PubkeyValue::Profile { pubkey, relays } => {
                    self.push_pubkey_field(target, pubkey);
                    for relay in relays {
                        self.push_relay(&relay);
                    }
                }
                PubkeyValue::Alias(alias) => {
                    self.needs_account = true;
                    self.push_pubkey_field(target, alias.literal().to_string());
                }
                PubkeyValue::Nip05(address) => {
                    let channel = match target {
                        PubkeyTarget::Authors => &mut self.identities.nip05_authors,
                        PubkeyTarget::PTag => &mut self.identities.nip05_p_tags,
                        PubkeyTarget::UppercasePTag => {
                            &mut self.identities.nip05_p_tags_uppercase
                        }
                    };
                    channel.push(address);
                }
                PubkeyValue::Domain(domain) => {
                    let channel = match target {
                        PubkeyTarget::Authors => &mut self.identities.domain_authors,
                        PubkeyTarget::PTag => &mut self.identities.domain_p_tags,
                        PubkeyTarget::UppercasePTag => {
                            &mut self.identities.domain_p_tags_uppercase
                        }
                    };
                    channel.push(domain);
                }
            }
        }
    }

    fn push_pubkey_field(&mut self, target: PubkeyTarget, pubkey: String) {
        match target {
            PubkeyTarget::Authors => self
                .filter
                .authors
                .get_or_insert_with(Vec::new)
                .push(pubkey),
            PubkeyTarget::PTag => self.filter.push_tag("#p", [pubkey]),
            PubkeyTarget::UppercasePTag => self.filter.push_tag("#P", [pubkey]),
        }
    }

    fn push_ids(&mut self, value: &str) {
        for part in value.split(',') {
            if let Some(EventValue::Id { id, relays }) = classify_event_value(part) {
                self.filter.ids.get_or_insert_with(Vec::new).push(id);
                for relay in relays {
                    self.push_relay(&relay);
                }
            }
        }
    }

    fn push_event_refs(&mut self, value: &str) {
        for part in value.split(',') {
            match classify_event_value(part) {
                Some(EventValue::Id { id, relays }) => {
                    self.filter.push_tag("#e", [id]);
                    for relay in relays {
                        self.push_relay(&relay);
                    }
                }
                Some(EventValue::Address { coordinate, relays }) => {
                    self.filter.push_tag("#a", [coordinate]);
                    for relay in relays {
                        self.push_relay(&relay);
                    }
                }
                None => {}
            }
        }
    }

    fn push_hashtags(&mut self, value: &str) {
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if part.eq_ignore_ascii_case("$hashtags") {
                self.filter.push_tag("#t", [Alias::Hashtags.literal().to_string()]);
            } else {
                // Users type "#topic"; the protocol tag value carries no '#'.
                let hashtag = part.strip_prefix('#').unwrap_or(part);
                if !hashtag.is_empty() {
                    self.filter.push_tag("#t", [hashtag.to_string()]);
                }
            }
        }
    }

    fn push_identifiers(&mut self, value: &str) {
        let identifiers: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        if !identifiers.is_empty() {
            self.filter.push_tag("#d", identifiers);
        }
    }

    fn push_generic_tag(&mut self, letter: &str, values: &str) {
        let mut chars = letter.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return;
        };
        if !c.is_ascii_alphabetic() {
            return;
        }
        let key = format!("#{c}");
        let parts: Vec<String> = values
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        if !parts.is_empty() {
            self.filter.push_tag(&key, parts);
        }
    }

    /// A bare (non-flag) token is a relay candidate: `wss://…`, `ws://…`,
    /// or a bare domain not claimed by any flag. Anything else is dropped.
    fn push_bare_token(&mut self, token: &str) {
        let lower = token.to_ascii_lowercase();
        if lower.starts_with("wss://") || lower.starts_with("ws://") || is_bare_domain(token) {
            self.push_relay(token);
        }
    }

    fn push_relay(&mut self, raw: &str) {
        if let Ok(url) = normalize_relay_url(raw) {
            self.relays.push(url);
        }
    }
}

/// Consume a flag's value token, advancing past the flag either way.
fn value_of<'a>(args: &'a [String], i: &mut usize) -> Option<&'a str> {
    let value = args.get(*i + 1).map(String::as_str);
    *i += if value.is_some() { 2 } else { 1 };
    value
}
