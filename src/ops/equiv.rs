//! Equivalence lookup and deferred `better` resolution.

use crate::hash::state_hash;
use crate::position::PosId;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Equivalence lookup
// ---------------------------------------------------------------------------

/// Finds a live position holding the same comparing prefix as `state`.
///
/// The index (when present) vetoes most misses without a scan. Deferred
/// positions are skipped: their own `better` is unresolved, and the gate
/// also keeps a position from matching itself during the resolution pass.
/// The first match's `better` chain is followed to its end, so the caller
/// always sees the shortest route currently known.
pub(crate) fn check_for_equiv(session: &Session, state: &[u8]) -> Option<PosId> {
    let cmp = session.cmpsize;
    let hash = state_hash(&state[..cmp]);
    if let Some(index) = &session.index {
        if !index.contains(hash) {
            return None;
        }
    }
    for (id, pos) in session.positions.iter_live() {
        if pos.deferred || pos.hash != hash {
            continue;
        }
        if session.positions.state(id)[..cmp] != state[..cmp] {
            continue;
        }
        let mut equiv = id;
        while let Some(better) = session.positions.get(equiv).better {
            equiv = better;
        }
        return Some(equiv);
    }
    None
}

// ---------------------------------------------------------------------------
// Deferred resolution
// ---------------------------------------------------------------------------

/// Re-initialises the `better` field of every deferred position.
///
/// Lets a deserialiser insert positions without per-insert equivalence
/// scans, then recreate all links in one pass. Returns the number of
/// `better` links the pass set.
pub(crate) fn resolve_deferred_betters(session: &mut Session) -> usize {
    let mut count = 0;
    for raw in 0..session.positions.capacity() {
        let id = PosId(raw);
        match session.positions.get_used(id) {
            Some(pos) if pos.deferred => {}
            _ => continue,
        }
        let other = check_for_equiv(session, session.positions.state(id));
        let move_count = session.positions.get(id).move_count;
        let mut better = other;
        if let Some(found) = other {
            if session.positions.get(found).move_count > move_count {
                // The found position is the deeper one; link the other way.
                better = None;
                if session.positions.get(found).better.is_none() {
                    let found_pos = session.positions.get_mut(found);
                    found_pos.better = Some(id);
                    found_pos.deferred = false;
                    count += 1;
                }
            }
        }
        let pos = session.positions.get_mut(id);
        pos.better = better;
        pos.deferred = false;
        if better.is_some() {
            count += 1;
        }
    }
    count
}
