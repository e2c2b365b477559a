//! Request id deduplication.

use std::collections::HashMap;

/// Collapses a request id list into its unique ids (first-seen order) plus
/// a map from each id to every position it occupied in the original list.
///
/// Fetch paths resolve the unique ids once, then fan the records back out
/// over the recorded positions so the result stays positionally aligned
/// with the caller's list.
pub fn dedupe(ids: &[i64]) -> (Vec<i64>, HashMap<i64, Vec<usize>>) {
    let mut unique = Vec::new();
    let mut positions: HashMap<i64, Vec<usize>> = HashMap::with_capacity(ids.len());

    for (pos, id) in ids.iter().enumerate() {
        let entry = positions.entry(*id).or_default();
        if entry.is_empty() {
            unique.push(*id);
        }
        entry.push(pos);
    }

    (unique, positions)
}
