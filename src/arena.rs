//! Chunked free-list stores for positions and branches.
//!
//! Both stores allocate slots in fixed chunks of [`CHUNK_LEN`] elements
//! and thread reclaimed slots on an explicit index-valued free list. A new
//! chunk is linked in only when the free list runs dry, so live ids are
//! never invalidated by growth. Position chunks carry a parallel byte
//! buffer holding each slot's inline state copy: a [`PosId`] addresses a
//! header and its state bytes in lockstep.

use crate::position::{Branch, BranchId, PosId, Position};

/// Elements per chunk in both stores.
pub(crate) const CHUNK_LEN: usize = 1024;

// ---------------------------------------------------------------------------
// Position store
// ---------------------------------------------------------------------------

enum PosSlot {
    Free { next: Option<PosId> },
    Used(Position),
}

struct PosChunk {
    slots: Box<[PosSlot]>,
    states: Box<[u8]>,
}

/// Arena of position headers plus their inline state bytes.
pub(crate) struct PositionStore {
    chunks: Vec<PosChunk>,
    free: Option<PosId>,
    statesize: usize,
    live: usize,
}

impl PositionStore {
    pub(crate) const fn new(statesize: usize) -> Self {
        Self {
            chunks: Vec::new(),
            free: None,
            statesize,
            live: 0,
        }
    }

    /// Number of live positions.
    pub(crate) const fn live(&self) -> usize {
        self.live
    }

    /// Total slot count across all chunks, live or free.
    pub(crate) fn capacity(&self) -> u32 {
        (self.chunks.len() * CHUNK_LEN) as u32
    }

    fn grow(&mut self) -> Option<()> {
        let base = self.chunks.len() * CHUNK_LEN;
        u32::try_from(base + CHUNK_LEN - 1).ok()?;
        let mut slots = Vec::with_capacity(CHUNK_LEN);
        for i in 0..CHUNK_LEN {
            let next = if i + 1 < CHUNK_LEN {
                Some(PosId((base + i + 1) as u32))
            } else {
                None
            };
            slots.push(PosSlot::Free { next });
        }
        self.chunks.push(PosChunk {
            slots: slots.into_boxed_slice(),
            states: vec![0; CHUNK_LEN * self.statesize].into_boxed_slice(),
        });
        self.free = Some(PosId(base as u32));
        Some(())
    }

    /// Takes a slot off the free list, growing by one chunk when dry.
    /// `None` means the id space is exhausted.
    pub(crate) fn alloc(&mut self) -> Option<PosId> {
        if self.free.is_none() {
            self.grow()?;
        }
        let id = self.free?;
        let slot = self.slot_mut(id);
        let next = match slot {
            PosSlot::Free { next } => *next,
            PosSlot::Used(_) => unreachable!("free-list head points at a used slot"),
        };
        *slot = PosSlot::Used(Position::new());
        self.free = next;
        self.live += 1;
        Some(id)
    }

    /// Returns a used slot to the free list. The state bytes are left in
    /// place; the next occupant overwrites them.
    pub(crate) fn release(&mut self, id: PosId) {
        let head = self.free;
        let slot = self.slot_mut(id);
        debug_assert!(matches!(slot, PosSlot::Used(_)));
        *slot = PosSlot::Free { next: head };
        self.free = Some(id);
        self.live -= 1;
    }

    fn slot(&self, id: PosId) -> &PosSlot {
        &self.chunks[id.index() / CHUNK_LEN].slots[id.index() % CHUNK_LEN]
    }

    fn slot_mut(&mut self, id: PosId) -> &mut PosSlot {
        &mut self.chunks[id.index() / CHUNK_LEN].slots[id.index() % CHUNK_LEN]
    }

    /// Returns the header at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a freed slot.
    pub(crate) fn get(&self, id: PosId) -> &Position {
        match self.slot(id) {
            PosSlot::Used(pos) => pos,
            PosSlot::Free { .. } => panic!("position {} is not in use", id.index()),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub(crate) fn get_mut(&mut self, id: PosId) -> &mut Position {
        match self.slot_mut(id) {
            PosSlot::Used(pos) => pos,
            PosSlot::Free { .. } => panic!("position {} is not in use", id.index()),
        }
    }

    /// Returns the header at `id`, or `None` for a freed slot. Used by
    /// full-arena scans that step over raw slot indices.
    pub(crate) fn get_used(&self, id: PosId) -> Option<&Position> {
        match self.slot(id) {
            PosSlot::Used(pos) => Some(pos),
            PosSlot::Free { .. } => None,
        }
    }

    /// Mutable counterpart of [`get_used`](Self::get_used).
    pub(crate) fn get_used_mut(&mut self, id: PosId) -> Option<&mut Position> {
        match self.slot_mut(id) {
            PosSlot::Used(pos) => Some(pos),
            PosSlot::Free { .. } => None,
        }
    }

    /// State bytes of the position at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a freed slot.
    pub(crate) fn state(&self, id: PosId) -> &[u8] {
        if let PosSlot::Free { .. } = self.slot(id) {
            panic!("position {} is not in use", id.index());
        }
        let chunk = &self.chunks[id.index() / CHUNK_LEN];
        let offset = (id.index() % CHUNK_LEN) * self.statesize;
        &chunk.states[offset..offset + self.statesize]
    }

    /// Mutable state bytes of the position at `id`.
    pub(crate) fn state_mut(&mut self, id: PosId) -> &mut [u8] {
        if let PosSlot::Free { .. } = self.slot(id) {
            panic!("position {} is not in use", id.index());
        }
        let statesize = self.statesize;
        let chunk = &mut self.chunks[id.index() / CHUNK_LEN];
        let offset = (id.index() % CHUNK_LEN) * statesize;
        &mut chunk.states[offset..offset + statesize]
    }

    /// Visits every live position, in slot order, in O(capacity).
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (PosId, &Position)> {
        self.chunks.iter().enumerate().flat_map(|(ci, chunk)| {
            chunk
                .slots
                .iter()
                .enumerate()
                .filter_map(move |(si, slot)| match slot {
                    PosSlot::Used(pos) => Some((PosId((ci * CHUNK_LEN + si) as u32), pos)),
                    PosSlot::Free { .. } => None,
                })
        })
    }
}

// ---------------------------------------------------------------------------
// Branch store
// ---------------------------------------------------------------------------

enum BranchSlot {
    Free { next: Option<BranchId> },
    Used(Branch),
}

/// Arena of branch records.
pub(crate) struct BranchStore {
    chunks: Vec<Box<[BranchSlot]>>,
    free: Option<BranchId>,
}

impl BranchStore {
    pub(crate) const fn new() -> Self {
        Self {
            chunks: Vec::new(),
            free: None,
        }
    }

    fn grow(&mut self) -> Option<()> {
        let base = self.chunks.len() * CHUNK_LEN;
        u32::try_from(base + CHUNK_LEN - 1).ok()?;
        let mut slots = Vec::with_capacity(CHUNK_LEN);
        for i in 0..CHUNK_LEN {
            let next = if i + 1 < CHUNK_LEN {
                Some(BranchId((base + i + 1) as u32))
            } else {
                None
            };
            slots.push(BranchSlot::Free { next });
        }
        self.chunks.push(slots.into_boxed_slice());
        self.free = Some(BranchId(base as u32));
        Some(())
    }

    /// Stores `branch` in a free slot, growing by one chunk when dry.
    pub(crate) fn alloc(&mut self, branch: Branch) -> Option<BranchId> {
        if self.free.is_none() {
            self.grow()?;
        }
        let id = self.free?;
        let slot = self.slot_mut(id);
        let next = match slot {
            BranchSlot::Free { next } => *next,
            BranchSlot::Used(_) => unreachable!("free-list head points at a used slot"),
        };
        *slot = BranchSlot::Used(branch);
        self.free = next;
        Some(id)
    }

    /// Returns a used slot to the free list.
    pub(crate) fn release(&mut self, id: BranchId) {
        let head = self.free;
        let slot = self.slot_mut(id);
        debug_assert!(matches!(slot, BranchSlot::Used(_)));
        *slot = BranchSlot::Free { next: head };
        self.free = Some(id);
    }

    fn slot(&self, id: BranchId) -> &BranchSlot {
        &self.chunks[id.index() / CHUNK_LEN][id.index() % CHUNK_LEN]
    }

    fn slot_mut(&mut self, id: BranchId) -> &mut BranchSlot {
        &mut self.chunks[id.index() / CHUNK_LEN][id.index() % CHUNK_LEN]
    }

    /// Returns the branch at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a freed slot.
    pub(crate) fn get(&self, id: BranchId) -> &Branch {
        match self.slot(id) {
            BranchSlot::Used(branch) => branch,
            BranchSlot::Free { .. } => panic!("branch {} is not in use", id.index()),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub(crate) fn get_mut(&mut self, id: BranchId) -> &mut Branch {
        match self.slot_mut(id) {
            BranchSlot::Used(branch) => branch,
            BranchSlot::Free { .. } => panic!("branch {} is not in use", id.index()),
        }
    }
}
