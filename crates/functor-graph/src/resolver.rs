//! Entity resolution: map a free-text mention onto a graph node id.
//!
//! Matching is a case-insensitive substring test in either direction. Node
//! ids are scanned in insertion order and the first hit wins, so a world
//! that lists `king` before `kingdom` resolves "King" to `king`. Short ids
//! produce false positives; this is a placeholder until ranking exists.

use crate::store::GraphStore;

/// Resolve `mention` to the id of the first node it matches.
///
/// A node matches when the lowercased mention contains the lowercased id,
/// or the lowercased id contains the lowercased mention.
///
/// Blank or whitespace-only mentions resolve to `None`. A plain substring
/// test would let them match every id (the empty string is contained in
/// all of them) or any id with a space in it.
pub fn resolve_mention<'a>(store: &'a GraphStore, mention: &str) -> Option<&'a str> {
    if mention.trim().is_empty() {
        return None;
    }
    let needle = mention.to_lowercase();
    store.node_ids().find(|id| {
        let id = id.to_lowercase();
        needle.contains(&id) || id.contains(&needle)
    })
}
