//! Adding positions: allocation, endpoint propagation, equivalence
//! linking, grafting-policy dispatch.

use crate::hash::state_hash;
use crate::ops::equiv::check_for_equiv;
use crate::ops::graft::{graft_branch, recalc_solution, wins};
use crate::ops::path::duplicate_path;
use crate::position::{Branch, EquivCheck, Grafting, Move, PosId};
use crate::session::Session;

// ---------------------------------------------------------------------------
// Add position
// ---------------------------------------------------------------------------

/// Adds (or finds) the position reached from `prev` via `mov`.
///
/// When `prev` already has a branch labelled `mov`, its target is returned
/// untouched (and promoted to the head of the branch list); nothing else
/// happens, and the change flag is left alone. Otherwise a new position is
/// allocated, linked, and — depending on `check` — matched against
/// equivalent states already in the session. `None` means allocation
/// failed; a position taken before a failed branch allocation is returned
/// to its free list.
pub(crate) fn add_position(
    session: &mut Session,
    prev: Option<PosId>,
    mov: Move,
    state: &[u8],
    endpoint: i16,
    check: EquivCheck,
) -> Option<PosId> {
    if let Some(from) = prev {
        if let Some(existing) = session.next_position(from, mov) {
            return Some(existing);
        }
    }

    // Endpoint states are never looked up: a terminal state is its own
    // destination, not a waypoint worth rerouting.
    let equiv = if check == EquivCheck::Now && endpoint == 0 {
        check_for_equiv(session, state)
    } else {
        None
    };

    let move_count = match prev {
        Some(from) => session.positions.get(from).move_count.checked_add(1)?,
        None => 0,
    };

    let hash = state_hash(&state[..session.cmpsize]);
    let id = session.positions.alloc()?;
    session.positions.state_mut(id).copy_from_slice(state);

    if let Some(from) = prev {
        let head = session.positions.get(from).next;
        let Some(branch_id) = session.branches.alloc(Branch {
            mov,
            p: id,
            cdr: head,
        }) else {
            session.positions.release(id);
            return None;
        };
        let from_pos = session.positions.get_mut(from);
        from_pos.next = Some(branch_id);
        from_pos.next_count += 1;
    }

    {
        let pos = session.positions.get_mut(id);
        pos.prev = prev;
        pos.move_count = move_count;
        pos.endpoint = endpoint;
        pos.hash = hash;
        pos.deferred = check == EquivCheck::Later;
    }
    if let Some(index) = &mut session.index {
        index.insert(hash);
    }

    if endpoint != 0 {
        let pos = session.positions.get_mut(id);
        pos.solution_end = endpoint;
        pos.solution_size = move_count;
        propagate_endpoint(session, prev, endpoint, move_count);
    }

    if let Some(equiv) = equiv {
        link_equiv(session, id, equiv);
    }

    session.changed = true;
    Some(id)
}

// ---------------------------------------------------------------------------
// Endpoint propagation
// ---------------------------------------------------------------------------

/// Records a newly discovered solution along the ancestor chain, stopping
/// at the first ancestor already holding a better-or-equal record.
fn propagate_endpoint(session: &mut Session, start: Option<PosId>, end: i16, size: u16) {
    let mut current = start;
    while let Some(id) = current {
        let pos = session.positions.get_mut(id);
        if !wins(end, size, pos.solution_end, pos.solution_size) {
            break;
        }
        pos.solution_end = end;
        pos.solution_size = size;
        current = pos.prev;
    }
}

// ---------------------------------------------------------------------------
// Equivalence linking
// ---------------------------------------------------------------------------

/// Links a freshly added position with its equivalent; when the new route
/// is the shorter one, applies the session's grafting policy.
fn link_equiv(session: &mut Session, new: PosId, equiv: PosId) {
    let new_count = session.positions.get(new).move_count;
    let equiv_count = session.positions.get(equiv).move_count;
    if new_count >= equiv_count {
        session.positions.get_mut(new).better = Some(equiv);
        return;
    }
    session.positions.get_mut(equiv).better = Some(new);
    match session.grafting {
        Grafting::None => {}
        Grafting::CopyPath => {
            duplicate_path(session, new, equiv);
        }
        Grafting::Graft | Grafting::GraftAndCopy => {
            graft_branch(session, new, equiv);
            recalc_solution(session, Some(equiv));
            recalc_solution(session, Some(new));
            if session.grafting == Grafting::GraftAndCopy {
                duplicate_path(session, equiv, new);
            }
        }
    }
}
