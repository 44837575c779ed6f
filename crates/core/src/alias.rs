//! Alias resolution: substituting `$me`, `$contacts`, and `$hashtags`
//! inside a filter once account context is available.
//!
//! Resolution is pure: the input filter is never mutated, no I/O happens,
//! and no state is retained across calls. Contact lists of several
//! thousand entries resolve in O(n) via set-based dedup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::filter::NostrFilter;

/// The runtime context aliases resolve against.
///
/// Supplied by the account/contacts and hashtag-configuration providers;
/// this crate never sources it itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasContext {
    /// The active account's pubkey, if an account is active.
    #[serde(default)]
    pub account_pubkey: Option<String>,
    /// The active account's contact-list pubkeys.
    #[serde(default)]
    pub contacts: Vec<String>,
    /// The configured hashtag set for `$hashtags`.
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Fields that accept `$me`/`$contacts`.
const PUBKEY_TAGS: [&str; 2] = ["#p", "#P"];

/// Replace every alias in `filter` with concrete values from `ctx`.
///
/// Returns a new filter; the input is untouched. After substitution each
/// affected array is deduplicated (first-seen order), and any array that
/// ended up empty is removed from the filter entirely — `authors` and tag
/// fields alike — rather than kept as `[]`. An undefined `account_pubkey`
/// makes `$me` contribute nothing; literal non-alias values always
/// survive.
pub fn resolve_filter_aliases(filter: &NostrFilter, ctx: &AliasContext) -> NostrFilter {
    let mut resolved = filter.clone();

    if let Some(authors) = &filter.authors {
        let values = substitute_pubkey_aliases(authors, ctx);
        resolved.authors = (!values.is_empty()).then_some(values);
    }

    for key in PUBKEY_TAGS {
        if let Some(values) = filter.tags.get(key) {
            let values = substitute_pubkey_aliases(values, ctx);
            if values.is_empty() {
                resolved.tags.remove(key);
            } else {
                resolved.tags.insert(key.to_string(), values);
            }
        }
    }

    if let Some(values) = filter.tags.get("#t") {
        let values = substitute_hashtag_alias(values, ctx);
        if values.is_empty() {
            resolved.tags.remove("#t");
        } else {
            resolved.tags.insert("#t".to_string(), values);
        }
    }

    resolved
}

fn substitute_pubkey_aliases(values: &[String], ctx: &AliasContext) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len() + ctx.contacts.len());
    let mut out = Vec::new();
    for value in values {
        if value.eq_ignore_ascii_case("$me") {
            if let Some(pubkey) = &ctx.account_pubkey {
                push_unique(&mut out, &mut seen, pubkey);
            }
        } else if value.eq_ignore_ascii_case("$contacts") {
            for contact in &ctx.contacts {
                push_unique(&mut out, &mut seen, contact);
            }
        } else {
            push_unique(&mut out, &mut seen, value);
        }
    }
    out
}

fn substitute_hashtag_alias(values: &[String], ctx: &AliasContext) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len() + ctx.hashtags.len());
    let mut out = Vec::new();
    for value in values {
        if value.eq_ignore_ascii_case("$hashtags") {
            for hashtag in &ctx.hashtags {
                push_unique(&mut out, &mut seen, hashtag);
            }
        } else {
            push_unique(&mut out, &mut seen, value);
        }
    }
    out
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
    if seen.insert(value.to_string()) {
        out.push(value.to_string());
    }
}
