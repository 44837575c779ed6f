//! The asynchronous enrichment phase.
//!
//! The grammar parks NIP-05 addresses and bare domain directories in side
//! channels because turning them into pubkeys needs network lookups. This
//! module gathers every deferred identifier from a parsed command into a
//! single batch, hands it to an external [`IdentityResolver`] once, and
//! merges whatever resolved back into the filter. Identifiers that fail to
//! resolve simply contribute nothing; a resolver error leaves the filter
//! as parsed. Cancellation and timeouts belong to the resolver
//! implementation, not this contract.

use std::collections::HashMap;

use thiserror::Error;

use crate::filter::{NostrFilter, dedup_strings};
use crate::grammar::filter_args::{IdentityChannels, ParsedCountCommand, ParsedReqCommand};

/// All identifiers deferred by one parse, batched for a single round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityBatch {
    /// `name@domain` NIP-05 addresses.
    pub nip05: Vec<String>,
    /// Bare domain directories.
    pub domains: Vec<String>,
}

impl IdentityBatch {
    fn from_channels(channels: &IdentityChannels) -> Self {
        let mut batch = IdentityBatch::default();
        batch.nip05.extend_from_slice(&channels.nip05_authors);
        batch.nip05.extend_from_slice(&channels.nip05_p_tags);
        batch
            .nip05
            .extend_from_slice(&channels.nip05_p_tags_uppercase);
        batch.domains.extend_from_slice(&channels.domain_authors);
        batch.domains.extend_from_slice(&channels.domain_p_tags);
        batch
            .domains
            .extend_from_slice(&channels.domain_p_tags_uppercase);
        dedup_strings(&mut batch.nip05);
        dedup_strings(&mut batch.domains);
        batch
    }

    /// True when there is nothing to resolve.
    pub fn is_empty(&self) -> bool {
        self.nip05.is_empty() && self.domains.is_empty()
    }
}

/// What the external resolver managed to resolve.
///
/// Identifiers absent from the maps are treated as unresolved and
/// contribute nothing to the filter.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIdentities {
    /// NIP-05 address → pubkey (lowercase hex).
    pub nip05: HashMap<String, String>,
    /// Domain → directory of pubkeys (lowercase hex).
    pub domains: HashMap<String, Vec<String>>,
}

/// Failure of the external batch resolution call.
#[derive(Debug, Error)]
#[error("identity resolution failed: {0}")]
pub struct ResolveError(pub String);

/// The external NIP-05 / domain-directory batch resolver.
///
/// Implementations perform the network I/O this crate deliberately does
/// not; they are called at most once per parsed command, with every
/// deferred identifier batched.
pub trait IdentityResolver {
    /// Resolve a batch of identifiers to pubkeys.
    fn resolve(
        &self,
        batch: &IdentityBatch,
    ) -> impl Future<Output = Result<ResolvedIdentities, ResolveError>> + Send;
}

/// Enrich a parsed `req` command with resolved identities.
pub async fn enrich_req<R: IdentityResolver>(
    mut parsed: ParsedReqCommand,
    resolver: &R,
) -> ParsedReqCommand {
    let batch = IdentityBatch::from_channels(&parsed.identities);
    if batch.is_empty() {
        return parsed;
    }
    if let Ok(resolved) = resolver.resolve(&batch).await {
        merge_resolved(&mut parsed.filter, &parsed.identities, &resolved);
    }
    parsed
}

/// Enrich a parsed `count` command with resolved identities.
pub async fn enrich_count<R: IdentityResolver>(
    mut parsed: ParsedCountCommand,
    resolver: &R,
) -> ParsedCountCommand {
    let batch = IdentityBatch::from_channels(&parsed.identities);
    if batch.is_empty() {
        return parsed;
    }
    if let Ok(resolved) = resolver.resolve(&batch).await {
        merge_resolved(&mut parsed.filter, &parsed.identities, &resolved);
    }
    parsed
}

/// Merge resolved pubkeys into the filter fields their identifiers were
/// deferred from, then dedup.
fn merge_resolved(
    filter: &mut NostrFilter,
    channels: &IdentityChannels,
    resolved: &ResolvedIdentities,
) {
    let mut authors = Vec::new();
    collect(&mut authors, &channels.nip05_authors, &resolved.nip05);
    collect_multi(&mut authors, &channels.domain_authors, &resolved.domains);
    if !authors.is_empty() {
        filter.authors.get_or_insert_with(Vec::new).extend(authors);
    }

    let mut p_tags = Vec::new();
    collect(&mut p_tags, &channels.nip05_p_tags, &resolved.nip05);
    collect_multi(&mut p_tags, &channels.domain_p_tags, &resolved.domains);
    if !p_tags.is_empty() {
        filter.push_tag("#p", p_tags);
    }

    let mut upper = Vec::new();
    collect(&mut upper, &channels.nip05_p_tags_uppercase, &resolved.nip05);
    collect_multi(
        &mut upper,
        &channels.domain_p_tags_uppercase,
        &resolved.domains,
    );
    if !upper.is_empty() {
        filter.push_tag("#P", upper);
    }

    filter.dedup();
}

fn collect(out: &mut Vec<String>, identifiers: &[String], map: &HashMap<String, String>) {
    for id in identifiers {
        if let Some(pubkey) = map.get(id) {
            out.push(pubkey.clone());
        }
    }
}

fn collect_multi(out: &mut Vec<String>, identifiers: &[String], map: &HashMap<String, Vec<String>>) {
    for id in identifiers {
        if let Some(pubkeys) = map.get(id) {
            out.extend(pubkeys.iter().cloned());
        }
    }
}
