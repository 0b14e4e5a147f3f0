mod drop;
mod path;

use crate::hash::state_hash;
use crate::ops::graft::wins;
use crate::{PosId, Session};

/// State size used across the suite: deliberately odd, with one byte kept
/// outside the comparing prefix.
pub(crate) const STATE_LEN: usize = 33;
pub(crate) const CMP_LEN: usize = 32;

/// A session over 33-byte states comparing the leading 32 bytes; the root
/// state is all `'0'`, distinct from everything [`state`] produces.
pub(crate) fn session() -> Session {
    Session::new(&[b'0'; STATE_LEN], CMP_LEN).expect("session")
}

/// A state buffer whose comparing prefix starts with `tag`.
pub(crate) fn state(tag: &[u8]) -> Vec<u8> {
    let mut buf = vec![b'_'; STATE_LEN];
    buf[..tag.len()].copy_from_slice(tag);
    buf
}

/// Checks the structural invariants over every live position: tree links,
/// branch-list caches, move-label uniqueness, `better` consistency,
/// cached hashes, solution accounting, and index coverage.
pub(crate) fn check_invariants(session: &Session) {
    let live: Vec<PosId> = session.positions.iter_live().map(|(id, _)| id).collect();
    let cmp = session.cmpsize;
    let mut roots = 0;
    for &id in &live {
        let pos = session.position(id);
        match pos.prev() {
            None => {
                roots += 1;
                assert_eq!(pos.move_count(), 0, "root depth");
            }
            Some(parent) => {
                assert_eq!(
                    pos.move_count(),
                    session.position(parent).move_count() + 1,
                    "depth of {id:?}"
                );
                let owning = session.moves(parent).filter(|&(_, p)| p == id).count();
                assert_eq!(owning, 1, "parent of {id:?} must list it exactly once");
            }
        }
        let branches: Vec<_> = session.moves(id).collect();
        assert_eq!(
            branches.len(),
            usize::from(pos.branch_count()),
            "cached branch count of {id:?}"
        );
        for (i, &(mov, child)) in branches.iter().enumerate() {
            assert_eq!(session.position(child).prev(), Some(id));
            assert!(
                branches[i + 1..].iter().all(|&(m, _)| m != mov),
                "duplicate move {mov} at {id:?}"
            );
        }
        if let Some(better) = pos.better() {
            let target = session.position(better);
            assert!(
                target.move_count() <= pos.move_count(),
                "better of {id:?} is deeper"
            );
            assert_eq!(
                &session.state(better)[..cmp],
                &session.state(id)[..cmp],
                "better of {id:?} holds a different state"
            );
        }
        assert_eq!(
            session.positions.get(id).hash,
            state_hash(&session.state(id)[..cmp]),
            "cached hash of {id:?}"
        );
        let (end, size) = best_solution(session, id);
        assert_eq!(pos.solution_end(), end, "solution end of {id:?}");
        assert_eq!(pos.solution_size(), size, "solution size of {id:?}");
        if let Some(index) = &session.index {
            assert!(
                index.contains(session.positions.get(id).hash),
                "index bit clear for {id:?}"
            );
        }
    }
    assert_eq!(roots, 1, "exactly one root");
    assert_eq!(live.len(), session.position_count());
}

/// Ground truth for the solution fields: the best endpoint record among
/// `id` and its descendants under the selection rule.
fn best_solution(session: &Session, id: PosId) -> (i16, u16) {
    let mut end = 0_i16;
    let mut size = 0_u16;
    let mut stack = vec![id];
    while let Some(p) = stack.pop() {
        let pos = session.position(p);
        if pos.endpoint() != 0 && wins(pos.endpoint(), pos.move_count(), end, size) {
            end = pos.endpoint();
            size = pos.move_count();
        }
        for (_, child) in session.moves(p) {
            stack.push(child);
        }
    }
    (end, size)
}
