//! History-tree node and edge types, and their typed arena ids.

/// Caller-chosen integer label for a user action.
pub type Move = i32;

// ---------------------------------------------------------------------------
// Typed arena ids
// ---------------------------------------------------------------------------

/// Handle to a position owned by a [`Session`](crate::Session).
///
/// Ids stay valid until the position is dropped or the session is torn
/// down; using a dropped id panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PosId(pub(crate) u32);

impl PosId {
    /// Returns the id as a plain integer token.
    ///
    /// Stable for as long as the position lives, which makes it usable as
    /// a key in an external save format.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a branch record in the branch store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BranchId(pub(crate) u32);

impl BranchId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A node of the history tree: one visited state and its bookkeeping.
///
/// The state bytes themselves live in the position store, in lockstep with
/// this header; fetch them with [`Session::state`](crate::Session::state).
#[derive(Debug)]
pub struct Position {
    /// Parent position; `None` only for the root.
    pub(crate) prev: Option<PosId>,
    /// Head of the outgoing branch list, most recently used first.
    pub(crate) next: Option<BranchId>,
    /// Equivalent position reached in fewer moves, if one is known.
    pub(crate) better: Option<PosId>,
    /// Cached length of the branch list.
    pub(crate) next_count: u16,
    /// Depth from the root (root = 0).
    pub(crate) move_count: u16,
    /// Endpoint marker; zero for ordinary states.
    pub(crate) endpoint: i16,
    /// Endpoint value of the best solution in this subtree, or zero.
    pub(crate) solution_end: i16,
    /// Root-relative length of that solution, or zero.
    pub(crate) solution_size: u16,
    /// Equivalence check postponed to the deferred-resolution pass.
    pub(crate) deferred: bool,
    /// Cached 16-bit hash of the comparing prefix.
    pub(crate) hash: u16,
}

impl Position {
    pub(crate) const fn new() -> Self {
        Self {
            prev: None,
            next: None,
            better: None,
            next_count: 0,
            move_count: 0,
            endpoint: 0,
            solution_end: 0,
            solution_size: 0,
            deferred: false,
            hash: 0,
        }
    }

    /// Parent position, or `None` for the root.
    #[must_use]
    pub const fn prev(&self) -> Option<PosId> {
        self.prev
    }

    /// A position holding the same comparing state in no more moves, if
    /// one is known.
    #[must_use]
    pub const fn better(&self) -> Option<PosId> {
        self.better
    }

    /// Number of moves from the root.
    #[must_use]
    pub const fn move_count(&self) -> u16 {
        self.move_count
    }

    /// Number of outgoing branches.
    #[must_use]
    pub const fn branch_count(&self) -> u16 {
        self.next_count
    }

    /// Endpoint marker: zero for ordinary states, non-zero for solution
    /// states. Larger values denote preferred solution kinds.
    #[must_use]
    pub const fn endpoint(&self) -> i16 {
        self.endpoint
    }

    /// Endpoint value of the best solution reachable in this subtree, or
    /// zero when the subtree holds none.
    #[must_use]
    pub const fn solution_end(&self) -> i16 {
        self.solution_end
    }

    /// Length, counted from the root, of the best solution reachable in
    /// this subtree, or zero when the subtree holds none.
    #[must_use]
    pub const fn solution_size(&self) -> u16 {
        self.solution_size
    }

    /// Whether this position's equivalence check is still waiting on
    /// [`resolve_deferred_betters`](crate::Session::resolve_deferred_betters).
    #[must_use]
    pub const fn deferred(&self) -> bool {
        self.deferred
    }
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// A labelled edge from a position to one of its successors.
#[derive(Debug)]
pub(crate) struct Branch {
    /// The move this branch represents.
    pub(crate) mov: Move,
    /// The position the move leads to.
    pub(crate) p: PosId,
    /// Next sibling in the parent's branch list.
    pub(crate) cdr: Option<BranchId>,
}

// ---------------------------------------------------------------------------
// Session options
// ---------------------------------------------------------------------------

/// What [`add_position`](crate::Session::add_position) does on discovering
/// a shorter route to an already-known state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grafting {
    /// Only link the `better` pointers; no structural change.
    None,
    /// Transplant the older position's subtree onto the shorter route.
    #[default]
    Graft,
    /// Leave the subtree in place, but reproduce the best solution at the
    /// shorter route.
    CopyPath,
    /// Transplant, then copy the best solution back to the older site so
    /// it is not left bare.
    GraftAndCopy,
}

/// When [`add_position`](crate::Session::add_position) searches the
/// session for a state equivalent to the one being added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquivCheck {
    /// Do not search.
    Skip,
    /// Search immediately.
    Now,
    /// Flag the position and search during
    /// [`resolve_deferred_betters`](crate::Session::resolve_deferred_betters).
    Later,
}
