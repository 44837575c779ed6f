use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// A Nostr protocol filter: the query object sent to relays.
///
/// Tag filters (`#e`, `#p`, `#t`, …) live in the flattened [`tags`] map so
/// arbitrary single-letter tag keys serialize exactly as the protocol
/// expects. Array-valued fields are `None`/absent rather than empty: the
/// grammar and the alias resolver both remove a field instead of leaving
/// `[]` behind.
///
/// [`tags`]: NostrFilter::tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NostrFilter {
    /// Event kind numbers to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u32>>,
    /// Author pubkeys (lowercase hex, or unresolved alias literals prior to
    /// alias resolution).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    /// Event ids (lowercase hex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    /// Earliest creation timestamp, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,
    /// Latest creation timestamp, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<u64>,
    /// Maximum number of events requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// NIP-50 free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Tag filters keyed by full protocol key (`"#e"`, `"#p"`, `"#P"`, …).
    /// An empty map flattens to nothing.
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl NostrFilter {
    /// Values of the tag filter for `key` (full form, e.g. `"#p"`).
    pub fn tag(&self, key: &str) -> Option<&[String]> {
        self.tags.get(key).map(Vec::as_slice)
    }

    /// Append values to a tag filter, creating it if absent.
    pub fn push_tag<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.tags.entry(key.to_string()).or_default().extend(values);
    }

    /// Remove duplicates from every array-valued field, keeping first-seen
    /// order, and drop tag filters that ended up empty.
    pub fn dedup(&mut self) {
        if let Some(kinds) = &mut self.kinds {
            let mut seen = HashSet::new();
            kinds.retain(|k| seen.insert(*k));
        }
        for field in [&mut self.authors, &mut self.ids] {
            if let Some(values) = field {
                dedup_strings(values);
            }
        }
        for values in self.tags.values_mut() {
            dedup_strings(values);
        }
        self.tags.retain(|_, v| !v.is_empty());
    }
}

/// Remove duplicate strings in place, preserving first-seen order.
///
/// Set-based membership so large inputs (multi-thousand contact lists)
/// stay O(n).
pub fn dedup_strings(values: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(values.len());
    values.retain(|v| seen.insert(v.clone()));
}
