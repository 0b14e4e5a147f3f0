//! Reproducing a solution path at an equivalent position.

use crate::ops::add::add_position;
use crate::position::{EquivCheck, PosId};
use crate::session::Session;

// ---------------------------------------------------------------------------
// Path duplication
// ---------------------------------------------------------------------------

/// Copies the move sequence of the best solution below `src` underneath
/// `dest`, one add at a time.
///
/// `dest` is assumed equivalent to `src`; each copied position carries the
/// source position's full state bytes and endpoint value. While copying,
/// once the destination's depth has caught up with the source's, the
/// destination is linked to the source (or the source's own `better`) so
/// the copies join the equivalence chains.
///
/// Returns `false` when `src` has no solution, or when an allocation fails
/// partway; positions copied before a failure are kept.
pub(crate) fn duplicate_path(session: &mut Session, mut dest: PosId, mut src: PosId) -> bool {
    if session.positions.get(src).solution_size == 0 {
        return false;
    }
    loop {
        let (src_end, src_size, src_moves, src_better) = {
            let src_pos = session.positions.get(src);
            (
                src_pos.solution_end,
                src_pos.solution_size,
                src_pos.move_count,
                src_pos.better,
            )
        };
        if src_size == 0 {
            break;
        }
        let mut step = None;
        let mut cursor = session.positions.get(src).next;
        while let Some(branch_id) = cursor {
            let branch = session.branches.get(branch_id);
            let child = session.positions.get(branch.p);
            if child.solution_size == src_size && child.solution_end == src_end {
                step = Some((branch.mov, branch.p));
                break;
            }
            cursor = branch.cdr;
        }
        let Some((mov, next_src)) = step else { break };
        let state = session.positions.state(next_src).to_vec();
        let endpoint = session.positions.get(next_src).endpoint;
        let Some(next_dest) =
            add_position(session, Some(dest), mov, &state, endpoint, EquivCheck::Skip)
        else {
            return false;
        };
        let dest_pos = session.positions.get(dest);
        if dest_pos.better.is_none() && dest_pos.move_count >= src_moves {
            session.positions.get_mut(dest).better = Some(src_better.unwrap_or(src));
        }
        src = next_src;
        dest = next_dest;
    }
    true
}
