//! Filter grammar tests: flag families, classification routing, dedup,
//! soft failures, and the REQ/COUNT split.

mod common;

use common::{KEY_A, KEY_B, args};
use nql_toolchain_core::{
    ViewMode, parse_count_args, parse_count_args_at, parse_req_args, parse_req_args_at,
};

const NOW: u64 = 1_700_000_000;

// Entities encoded from the NIP-19 published-vector keys (see nip19 tests).
const NPUB: &str = "npub180cvv07tjdrrgpa0j7j7tmnyl2yr6yr7l8j4s3evf6u64th6gkwsyjh6w6";
const NPUB_HEX: &str = "3bf0c63fcb93463407af97a5e5ee64fa883d107ef9e558472c4eb9aaaefa459d";
const NOTE: &str = "note1h865g8j9egu30yequqp3e7ccudq8seeaeu2dyy4wnftesw97xp2q6pagr5";
const NOTE_HEX: &str = "b9f5441e45ca39179320e0031cfb18e34078673dcf14d212ae9a579838be3054";
const NADDR: &str = "naddr1qq98yetxv4ex2mnrv4esygyhcu9ygdn2v56uz3dnx0uh865xmlwz675emfsccsxxguz6mx8rygpsgqqqw4rs4says3";
const NADDR_AUTHOR: &str = "97c70a44366a6535c145b333f973ea86dfdc2d7a99da618c40c64705ad98e322";

// ─── Kinds, ids, limit ──────────────────────────────────────────────────────

#[test]
fn kinds_are_deduped_first_seen_order() {
    let parsed = parse_count_args(&args(&["-k", "1,3,1,3"]));
    assert_eq!(parsed.filter.kinds, Some(vec![1, 3]));
}

#[test]
fn kinds_accumulate_across_flags_and_drop_junk() {
    let parsed = parse_req_args(&args(&["-k", "1,x,3", "--kind", "7,1"]));
    assert_eq!(parsed.filter.kinds, Some(vec![1, 3, 7]));
}

#[test]
fn all_invalid_kinds_leave_field_unset() {
    let parsed = parse_req_args(&args(&["-k", "x,y"]));
    assert_eq!(parsed.filter.kinds, None);
}

#[test]
fn ids_accept_hex_and_bech32() {
    let parsed = parse_req_args(&args(&["-i", &format!("{NOTE_HEX},{NOTE}")]));
    assert_eq!(parsed.filter.ids, Some(vec![NOTE_HEX.to_string()]));
}

#[test]
fn malformed_limit_is_dropped() {
    let parsed = parse_req_args(&args(&["-k", "1", "--limit", "abc"]));
    assert_eq!(parsed.filter.limit, None);
    let parsed = parse_req_args(&args(&["-k", "1", "-l", "50"]));
    assert_eq!(parsed.filter.limit, Some(50));
}

// ─── Author classification ──────────────────────────────────────────────────

#[test]
fn authors_mix_hex_bech32_and_aliases() {
    let parsed = parse_req_args(&args(&["-a", &format!("{KEY_A},{NPUB},$me")]));
    assert_eq!(
        parsed.filter.authors,
        Some(vec![
            KEY_A.to_string(),
            NPUB_HEX.to_string(),
            "$me".to_string()
        ])
    );
    assert!(parsed.needs_account);
}

#[test]
fn uppercase_hex_is_lowercased() {
    let parsed = parse_req_args(&args(&["-a", &NPUB_HEX.to_ascii_uppercase()]));
    assert_eq!(parsed.filter.authors, Some(vec![NPUB_HEX.to_string()]));
}

#[test]
fn nip05_and_domain_values_are_deferred_not_inlined() {
    let parsed = parse_req_args(&args(&["-a", "alice@example.com,nostr.example.com"]));
    assert_eq!(parsed.filter.authors, None);
    assert_eq!(parsed.identities.nip05_authors, vec!["alice@example.com"]);
    assert_eq!(parsed.identities.domain_authors, vec!["nostr.example.com"]);
    assert!(!parsed.needs_account);
}

#[test]
fn p_and_uppercase_p_use_separate_channels() {
    let parsed = parse_req_args(&args(&[
        "-p",
        "alice@example.com",
        "-P",
        "bob@example.com",
    ]));
    assert_eq!(parsed.identities.nip05_p_tags, vec!["alice@example.com"]);
    assert_eq!(
        parsed.identities.nip05_p_tags_uppercase,
        vec!["bob@example.com"]
    );
}

#[test]
fn alias_in_p_tag_sets_needs_account() {
    let parsed = parse_req_args(&args(&["-p", "$contacts"]));
    assert_eq!(
        parsed.filter.tag("#p"),
        Some(&["$contacts".to_string()][..])
    );
    assert!(parsed.needs_account);
}

#[test]
fn junk_author_values_are_dropped_silently() {
    let parsed = parse_req_args(&args(&["-a", "not a key", "-k", "1"]));
    assert_eq!(parsed.filter.authors, None);
    assert_eq!(parsed.filter.kinds, Some(vec![1]));
}

// ─── Event references ───────────────────────────────────────────────────────

#[test]
fn event_refs_route_ids_to_e_and_addresses_to_a() {
    let coord = format!("30023:{KEY_B}:post");
    let parsed = parse_req_args(&args(&["-e", &format!("{NOTE},{coord}")]));
    assert_eq!(parsed.filter.tag("#e"), Some(&[NOTE_HEX.to_string()][..]));
    assert_eq!(parsed.filter.tag("#a"), Some(&[coord][..]));
}

#[test]
fn naddr_decodes_to_address_coordinate() {
    let parsed = parse_req_args(&args(&["-e", NADDR]));
    assert_eq!(
        parsed.filter.tag("#a"),
        Some(&[format!("30023:{NADDR_AUTHOR}:references")][..])
    );
}

// ─── Hashtags, identifiers, generic tags ────────────────────────────────────

#[test]
fn hashtags_strip_leading_hash_and_keep_alias() {
    let parsed = parse_req_args(&args(&["-t", "#nostr,rust,$hashtags"]));
    assert_eq!(
        parsed.filter.tag("#t"),
        Some(
            &[
                "nostr".to_string(),
                "rust".to_string(),
                "$hashtags".to_string()
            ][..]
        )
    );
}

#[test]
fn d_identifiers_pass_through() {
    let parsed = parse_req_args(&args(&["-d", "post-1,post-2"]));
    assert_eq!(
        parsed.filter.tag("#d"),
        Some(&["post-1".to_string(), "post-2".to_string()][..])
    );
}

#[test]
fn generic_tag_takes_letter_and_values() {
    let parsed = parse_req_args(&args(&["-T", "r", "wss://a.com,wss://b.com"]));
    assert_eq!(
        parsed.filter.tag("#r"),
        Some(&["wss://a.com".to_string(), "wss://b.com".to_string()][..])
    );
}

#[test]
fn generic_tag_rejects_multi_char_letters() {
    let parsed = parse_req_args(&args(&["-T", "xyz", "value"]));
    assert!(parsed.filter.tags.is_empty());
}

// ─── Timestamps and search ──────────────────────────────────────────────────

#[test]
fn since_and_until_resolve_at_parse_time() {
    let parsed = parse_req_args_at(&args(&["--since", "7d", "--until", "now"]), NOW);
    assert_eq!(parsed.filter.since, Some(NOW - 7 * 86_400));
    assert_eq!(parsed.filter.until, Some(NOW));
}

#[test]
fn absolute_timestamps_pass_through() {
    let parsed = parse_req_args_at(&args(&["--since", "1650000000"]), NOW);
    assert_eq!(parsed.filter.since, Some(1_650_000_000));
}

#[test]
fn bad_timestamp_is_dropped() {
    let parsed = parse_req_args_at(&args(&["--since", "yesterday", "-k", "1"]), NOW);
    assert_eq!(parsed.filter.since, None);
    assert_eq!(parsed.filter.kinds, Some(vec![1]));
}

#[test]
fn search_consumes_the_remainder() {
    let parsed = parse_req_args(&args(&["-k", "1", "--search", "hello", "world", "-k", "3"]));
    assert_eq!(parsed.filter.search.as_deref(), Some("hello world -k 3"));
    assert_eq!(parsed.filter.kinds, Some(vec![1]));
}

// ─── Relays ─────────────────────────────────────────────────────────────────

#[test]
fn bare_relay_tokens_are_normalized() {
    let parsed = parse_req_args(&args(&["-k", "1", "wss://Relay.Example.COM", "relay.other.net"]));
    assert_eq!(
        parsed.relays,
        vec!["wss://relay.example.com/", "wss://relay.other.net/"]
    );
}

#[test]
fn duplicate_relays_collapse_after_normalization() {
    let parsed = parse_req_args(&args(&["wss://relay.example.com", "RELAY.EXAMPLE.COM"]));
    assert_eq!(parsed.relays, vec!["wss://relay.example.com/"]);
}

#[test]
fn unclassifiable_bare_tokens_are_dropped() {
    let parsed = parse_req_args(&args(&["-k", "1", "???"]));
    assert!(parsed.relays.is_empty());
}

// ─── REQ-only options and the COUNT split ───────────────────────────────────

#[test]
fn req_only_flags_parse() {
    let parsed = parse_req_args(&args(&[
        "-k",
        "1",
        "--close-on-eose",
        "-v",
        "compact",
        "--follow",
    ]));
    assert!(parsed.close_on_eose);
    assert_eq!(parsed.view, Some(ViewMode::Compact));
    assert!(parsed.follow);
}

#[test]
fn invalid_view_mode_is_dropped() {
    let parsed = parse_req_args(&args(&["-v", "mosaic"]));
    assert_eq!(parsed.view, None);
}

#[test]
fn count_shares_the_grammar_and_ignores_req_only_flags() {
    let parsed = parse_count_args_at(
        &args(&["-k", "1,3", "--close-on-eose", "-v", "list", "-f", "--since", "1d"]),
        NOW,
    );
    assert_eq!(parsed.filter.kinds, Some(vec![1, 3]));
    assert_eq!(parsed.filter.since, Some(NOW - 86_400));
}

#[test]
fn flag_missing_its_value_at_end_is_ignored() {
    let parsed = parse_req_args(&args(&["-k", "1", "-a"]));
    assert_eq!(parsed.filter.kinds, Some(vec![1]));
    assert_eq!(parsed.filter.authors, None);
}
