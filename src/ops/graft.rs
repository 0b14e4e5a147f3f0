//! Subtree grafting and solution accounting.

use crate::position::PosId;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Solution selection
// ---------------------------------------------------------------------------

/// Selection rule for competing solutions: a larger endpoint value always
/// wins; among equal endpoint values the shorter path wins. An incumbent
/// of size zero means "no solution recorded yet".
pub(crate) fn wins(end: i16, size: u16, incumbent_end: i16, incumbent_size: u16) -> bool {
    if incumbent_size == 0 {
        return true;
    }
    if end != incumbent_end {
        return end > incumbent_end;
    }
    size < incumbent_size
}

// ---------------------------------------------------------------------------
// Grafting and movecount adjustment
// ---------------------------------------------------------------------------

/// Moves the entire subtree under `src` to `dest`, leaving `src` a leaf.
///
/// `dest` holds the same comparing state as `src` at a strictly smaller
/// depth, so every transplanted descendant shifts by one fixed delta. No
/// records are allocated or freed. Solution fields along both former and
/// new ancestor chains are left to [`recalc_solution`].
pub(crate) fn graft_branch(session: &mut Session, dest: PosId, src: PosId) {
    let (src_next, src_count, src_moves, src_end, src_size) = {
        let src_pos = session.positions.get_mut(src);
        let next = src_pos.next.take();
        let count = std::mem::replace(&mut src_pos.next_count, 0);
        (
            next,
            count,
            src_pos.move_count,
            src_pos.solution_end,
            src_pos.solution_size,
        )
    };
    let delta = {
        let dest_pos = session.positions.get_mut(dest);
        let delta = i32::from(dest_pos.move_count) - i32::from(src_moves);
        dest_pos.next = src_next;
        dest_pos.next_count = src_count;
        // Adopt src's depth so the uniform shift below restores dest's own
        // depth while moving every descendant by the same delta.
        dest_pos.move_count = src_moves;
        dest_pos.solution_end = src_end;
        dest_pos.solution_size = src_size;
        delta
    };
    let mut cursor = src_next;
    while let Some(branch_id) = cursor {
        let branch = session.branches.get(branch_id);
        let (child, cdr) = (branch.p, branch.cdr);
        session.positions.get_mut(child).prev = Some(dest);
        cursor = cdr;
    }
    adjust_move_count(session, dest, delta);
}

/// Shifts `move_count` (and any non-zero `solution_size`) of the whole
/// subtree rooted at `root` by `delta`.
///
/// A `better` link whose target the shift has made deeper than its owner
/// is inverted: the target now has the longer route.
pub(crate) fn adjust_move_count(session: &mut Session, root: PosId, delta: i32) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let (better, move_count) = {
            let pos = session.positions.get_mut(id);
            pos.move_count = shifted(pos.move_count, delta);
            if pos.solution_size != 0 {
                pos.solution_size = shifted(pos.solution_size, delta);
            }
            (pos.better, pos.move_count)
        };
        if let Some(target) = better {
            if session.positions.get(target).move_count > move_count {
                session.positions.get_mut(target).better = Some(id);
                session.positions.get_mut(id).better = None;
            }
        }
        let mut cursor = session.positions.get(id).next;
        while let Some(branch_id) = cursor {
            let branch = session.branches.get(branch_id);
            stack.push(branch.p);
            cursor = branch.cdr;
        }
    }
}

fn shifted(value: u16, delta: i32) -> u16 {
    (i32::from(value) + delta) as u16
}

// ---------------------------------------------------------------------------
// Solution recalculation
// ---------------------------------------------------------------------------

/// Recomputes `(solution_end, solution_size)` at every position from
/// `start` up to the root.
///
/// Each node takes the best of its own endpoint record and its children's
/// solution records under [`wins`]; a node with neither resets to zero.
pub(crate) fn recalc_solution(session: &mut Session, start: Option<PosId>) {
    let mut current = start;
    while let Some(id) = current {
        let mut end = 0_i16;
        let mut size = 0_u16;
        {
            let pos = session.positions.get(id);
            if pos.endpoint != 0 {
                end = pos.endpoint;
                size = pos.move_count;
            }
            let mut cursor = pos.next;
            while let Some(branch_id) = cursor {
                let branch = session.branches.get(branch_id);
                let child = session.positions.get(branch.p);
                if child.solution_size != 0 && wins(child.solution_end, child.solution_size, end, size)
                {
                    end = child.solution_end;
                    size = child.solution_size;
                }
                cursor = branch.cdr;
            }
        }
        let pos = session.positions.get_mut(id);
        pos.solution_end = end;
        pos.solution_size = size;
        current = pos.prev;
    }
}
