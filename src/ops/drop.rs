//! Deleting positions: leaf drops, cycle suppression, chain pruning.

use crate::ops::graft::recalc_solution;
use crate::position::PosId;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Drop position
// ---------------------------------------------------------------------------

/// Deletes a leaf position and returns its parent.
///
/// The root, and any position with outgoing branches, is returned
/// unchanged with the session untouched.
pub(crate) fn drop_position(session: &mut Session, pos: PosId) -> PosId {
    let (prev, next) = {
        let position = session.positions.get(pos);
        (position.prev, position.next)
    };
    let Some(parent) = prev else { return pos };
    if next.is_some() {
        return pos;
    }
    if !detach_branch(session, parent, pos) {
        return pos;
    }
    let better = session.positions.get(pos).better;
    redirect_betters(session, pos, better);
    session.positions.release(pos);
    recalc_solution(session, Some(parent));
    session.rebuild_index();
    session.changed = true;
    parent
}

// ---------------------------------------------------------------------------
// Unlink helpers
// ---------------------------------------------------------------------------

/// Unlinks and releases the branch from `from` to `to`, if present.
pub(crate) fn detach_branch(session: &mut Session, from: PosId, to: PosId) -> bool {
    let Some(head) = session.positions.get(from).next else {
        return false;
    };
    let found = if session.branches.get(head).p == to {
        let after = session.branches.get(head).cdr;
        session.positions.get_mut(from).next = after;
        Some(head)
    } else {
        let mut prev = head;
        loop {
            let Some(current) = session.branches.get(prev).cdr else {
                break None;
            };
            if session.branches.get(current).p == to {
                let after = session.branches.get(current).cdr;
                session.branches.get_mut(prev).cdr = after;
                break Some(current);
            }
            prev = current;
        }
    };
    let Some(branch_id) = found else { return false };
    session.branches.release(branch_id);
    session.positions.get_mut(from).next_count -= 1;
    true
}

/// Rewrites every live `better` reference aimed at `target` so it points
/// at `replacement` instead. Run before a position is released so no live
/// position retains a reference into a freed slot.
fn redirect_betters(session: &mut Session, target: PosId, replacement: Option<PosId>) {
    for raw in 0..session.positions.capacity() {
        if let Some(pos) = session.positions.get_used_mut(PosId(raw)) {
            if pos.better == Some(target) {
                pos.better = replacement;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle suppression and pruning
// ---------------------------------------------------------------------------

/// Checks whether `state` revisits a state already seen on the path of
/// moves leading to `*current`.
///
/// On a match, `*current` is redirected to the matching ancestor and
/// `true` is returned; when the hop distance is under `prune_limit`, the
/// intervening chain is also deleted (provided no other moves branch out
/// of it). With no match the session is left untouched.
pub(crate) fn suppress_cycle(
    session: &mut Session,
    current: &mut PosId,
    state: &[u8],
    prune_limit: usize,
) -> bool {
    let cmp = session.cmpsize;
    let mut cursor = Some(*current);
    let mut hops = 0_usize;
    while let Some(id) = cursor {
        if session.positions.state(id)[..cmp] == state[..cmp] {
            if hops < prune_limit {
                prune_branch(session, *current, id);
            }
            *current = id;
            return true;
        }
        cursor = session.positions.get(id).prev;
        hops += 1;
    }
    false
}

/// Deletes the unbranched chain running from `leaf` up to (but excluding)
/// `branch_point`, leaf first, stopping early at the first position with
/// other outgoing moves. Returns whether anything was deleted.
pub(crate) fn prune_branch(session: &mut Session, leaf: PosId, branch_point: PosId) -> bool {
    let mut removed = false;
    let mut pos = leaf;
    while pos != branch_point {
        if session.positions.get(pos).next.is_some() {
            break;
        }
        let Some(parent) = session.positions.get(pos).prev else {
            break;
        };
        detach_branch(session, parent, pos);
        let better = session.positions.get(pos).better;
        redirect_betters(session, pos, better);
        session.positions.release(pos);
        removed = true;
        pos = parent;
    }
    if removed {
        recalc_solution(session, Some(pos));
        session.rebuild_index();
        session.changed = true;
    }
    removed
}
