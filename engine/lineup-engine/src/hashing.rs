use crate::models::{SlotKind, WeeklyLineup};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Stable fingerprint of a lineup's slot assignments
///
/// Covers the `slots` mapping only: bench order, notes, and scores are
/// excluded so trivial recomputation of the same starters hashes
/// identically. Iteration is slot-kind order, then placement order, which
/// makes the hash deterministic across runs.
pub fn slot_hash(slots: &BTreeMap<SlotKind, Vec<String>>) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (kind, players) in slots {
        kind.as_str().hash(&mut hasher);
        players.len().hash(&mut hasher);
        for player in players {
            player.hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Whether a freshly computed lineup warrants a notification
///
/// True only when the slot fingerprint changed; a first-ever lineup always
/// notifies. Guarantees at most one notification per materially different
/// lineup no matter how often the recompute runs.
pub fn should_notify(new: &WeeklyLineup, previous: Option<&WeeklyLineup>) -> bool {
    match previous {
        Some(prev) => new.content_hash != prev.content_hash,
        None => true,
    }
}
