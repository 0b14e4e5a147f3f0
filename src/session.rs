//! The session: owner of all storage, configuration, and the root.

use std::fmt;
use std::mem;

use crate::arena::{BranchStore, PositionStore};
use crate::error::SessionError;
use crate::hash::EquivIndex;
use crate::iter::Moves;
use crate::ops;
use crate::position::{EquivCheck, Grafting, Move, PosId, Position};

/// A branching history of visited states.
///
/// Every state the caller reports is kept as a [`Position`] in a tree
/// rooted at the initial state, so abandoned lines of play survive an
/// ordinary undo. Two action sequences converging on the same state are
/// linked through `better` pointers, and — depending on the [`Grafting`]
/// policy — the longer route's subtree is transplanted onto the shorter
/// one. Endpoint (solution) markers propagate to every ancestor, so any
/// position can report the best solution reachable below it.
///
/// States are opaque byte buffers of a fixed per-session length; only the
/// leading comparing prefix takes part in hashing and equality.
///
/// ```
/// use undotree::{EquivCheck, Session};
///
/// let mut session = Session::new(b"start---", 0)?;
/// let root = session.root();
/// let a = session
///     .add_position(Some(root), 1, b"state-a-", 0, EquivCheck::Now)
///     .expect("fresh session");
/// assert_eq!(session.position(a).move_count(), 1);
/// assert_eq!(session.next_position(root, 1), Some(a));
/// # Ok::<(), undotree::SessionError>(())
/// ```
pub struct Session {
    pub(crate) positions: PositionStore,
    pub(crate) branches: BranchStore,
    /// Advisory: lookups fall back to a plain full scan when absent.
    pub(crate) index: Option<EquivIndex>,
    pub(crate) root: PosId,
    pub(crate) statesize: usize,
    pub(crate) cmpsize: usize,
    pub(crate) grafting: Grafting,
    pub(crate) changed: bool,
}

// ---------------------------------------------------------------------------
// Construction & accessors
// ---------------------------------------------------------------------------

impl Session {
    /// Creates a session whose root position holds `initial_state`.
    ///
    /// The state length is fixed for the session's lifetime. `cmpsize` is
    /// the length of the comparing prefix — the leading bytes used for
    /// hashing and equality; zero means the whole state. Bytes past the
    /// prefix ride along uncompared (see
    /// [`update_extra_state`](Self::update_extra_state)).
    ///
    /// # Errors
    ///
    /// Rejects an empty state, a state too large for the 16-bit record
    /// stride, and a `cmpsize` exceeding the state length.
    pub fn new(initial_state: &[u8], cmpsize: usize) -> Result<Self, SessionError> {
        let statesize = initial_state.len();
        if statesize == 0 {
            return Err(SessionError::EmptyState);
        }
        let align = mem::align_of::<usize>();
        let stride = (mem::size_of::<Position>() + statesize).div_ceil(align) * align;
        if stride > usize::from(u16::MAX) {
            return Err(SessionError::StateTooLarge(statesize));
        }
        if cmpsize > statesize {
            return Err(SessionError::CompareTooLarge { cmpsize, statesize });
        }
        let mut session = Self {
            positions: PositionStore::new(statesize),
            branches: BranchStore::new(),
            index: Some(EquivIndex::new()),
            root: PosId(0),
            statesize,
            cmpsize: if cmpsize == 0 { statesize } else { cmpsize },
            grafting: Grafting::Graft,
            changed: false,
        };
        let root = ops::add::add_position(&mut session, None, 0, initial_state, 0, EquivCheck::Skip)
            .expect("fresh stores cannot be exhausted");
        session.root = root;
        session.changed = false;
        Ok(session)
    }

    /// The root position, holding the initial state.
    #[must_use]
    pub const fn root(&self) -> PosId {
        self.root
    }

    /// Number of live positions in the session.
    #[must_use]
    pub const fn position_count(&self) -> usize {
        self.positions.live()
    }

    /// Read access to a position's bookkeeping.
    ///
    /// # Panics
    ///
    /// Panics if `pos` was dropped.
    #[must_use]
    pub fn position(&self, pos: PosId) -> &Position {
        self.positions.get(pos)
    }

    /// Read-only view of the state bytes saved at `pos`, valid until the
    /// position is dropped.
    #[must_use]
    pub fn state(&self, pos: PosId) -> &[u8] {
        self.positions.state(pos)
    }

    /// Iterates the `(move, target)` branches of `pos`, most recently
    /// used first.
    #[must_use]
    pub fn moves(&self, pos: PosId) -> Moves<'_> {
        let position = self.positions.get(pos);
        Moves::new(&self.branches, position.next, position.next_count)
    }

    /// Replaces the grafting policy, returning the previous one.
    pub fn set_grafting(&mut self, grafting: Grafting) -> Grafting {
        mem::replace(&mut self.grafting, grafting)
    }

    /// Whether positions have been added or removed since creation or
    /// since the last [`clear_changed`](Self::clear_changed).
    #[must_use]
    pub const fn has_changed(&self) -> bool {
        self.changed
    }

    /// Clears the change flag, returning its prior value.
    pub fn clear_changed(&mut self) -> bool {
        mem::take(&mut self.changed)
    }

    /// Overwrites the bytes past the comparing prefix of `pos` with the
    /// corresponding bytes of `state`. A silent no-op when the whole state
    /// is compared.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not exactly the session's state length.
    pub fn update_extra_state(&mut self, pos: PosId, state: &[u8]) {
        self.check_state_len(state);
        if self.cmpsize == self.statesize {
            return;
        }
        let cmpsize = self.cmpsize;
        self.positions.state_mut(pos)[cmpsize..].copy_from_slice(&state[cmpsize..]);
    }

    fn check_state_len(&self, state: &[u8]) {
        assert_eq!(
            state.len(),
            self.statesize,
            "state length {} does not match the session state size {}",
            state.len(),
            self.statesize,
        );
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

impl Session {
    /// Returns the position reached by making `mov` from `pos`, splicing
    /// the matching branch to the head of the branch list so it becomes
    /// the most recently used move there. `None` if no such branch exists.
    pub fn next_position(&mut self, pos: PosId, mov: Move) -> Option<PosId> {
        let head = self.positions.get(pos).next?;
        {
            let head_branch = self.branches.get(head);
            if head_branch.mov == mov {
                return Some(head_branch.p);
            }
        }
        let mut prev = head;
        loop {
            let current = self.branches.get(prev).cdr?;
            let found = {
                let branch = self.branches.get(current);
                (branch.mov == mov).then_some((branch.p, branch.cdr))
            };
            if let Some((target, after)) = found {
                self.branches.get_mut(prev).cdr = after;
                self.branches.get_mut(current).cdr = Some(head);
                self.positions.get_mut(pos).next = Some(current);
                return Some(target);
            }
            prev = current;
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

impl Session {
    /// Adds (or finds) the position reached from `prev` via `mov`; see
    /// [`EquivCheck`] for the equivalence-search modes and [`Grafting`]
    /// for what happens when the new route is a shortcut.
    ///
    /// `endpoint` marks a solution state when non-zero; larger values
    /// denote preferred solution kinds, and the record propagates to every
    /// ancestor it beats. `None` means allocation failed and the session
    /// is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not exactly the session's state length.
    pub fn add_position(
        &mut self,
        prev: Option<PosId>,
        mov: Move,
        state: &[u8],
        endpoint: i16,
        check: EquivCheck,
    ) -> Option<PosId> {
        self.check_state_len(state);
        ops::add::add_position(self, prev, mov, state, endpoint, check)
    }

    /// Deletes `pos` if it is a leaf with a parent, returning the parent;
    /// otherwise returns `pos` unchanged. Any `better` references to the
    /// deleted position are redirected to its own `better`.
    pub fn drop_position(&mut self, pos: PosId) -> PosId {
        ops::drop::drop_position(self, pos)
    }

    /// Checks whether `state` revisits a state already on the path of
    /// moves leading to `*current`. On a match, `*current` moves to the
    /// earlier position and `true` is returned; the intervening chain is
    /// also deleted when it is shorter than `prune_limit` hops and carries
    /// no side branches. With no match the session is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not exactly the session's state length.
    pub fn suppress_cycle(
        &mut self,
        current: &mut PosId,
        state: &[u8],
        prune_limit: usize,
    ) -> bool {
        self.check_state_len(state);
        ops::drop::suppress_cycle(self, current, state, prune_limit)
    }

    /// Copies the best solution path below `src` underneath `dest`, which
    /// the caller asserts holds an equivalent state. Returns `false` when
    /// `src` has no solution or allocation fails partway (already-copied
    /// positions are kept).
    pub fn duplicate_path(&mut self, dest: PosId, src: PosId) -> bool {
        ops::path::duplicate_path(self, dest, src)
    }

    /// Runs the postponed equivalence search for every position added
    /// with [`EquivCheck::Later`], returning the number of `better` links
    /// set. A second call right after is a no-op returning zero.
    pub fn resolve_deferred_betters(&mut self) -> usize {
        ops::equiv::resolve_deferred_betters(self)
    }

    /// Clears and re-populates the equivalence index from the live tree.
    /// Called after deletions, which may leave stale bits behind.
    pub(crate) fn rebuild_index(&mut self) {
        let Some(index) = &mut self.index else { return };
        index.clear();
        for (_, pos) in self.positions.iter_live() {
            index.insert(pos.hash);
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("positions", &self.positions.live())
            .field("statesize", &self.statesize)
            .field("cmpsize", &self.cmpsize)
            .field("grafting", &self.grafting)
            .field("changed", &self.changed)
            .finish_non_exhaustive()
    }
}
