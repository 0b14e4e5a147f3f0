//! Session construction errors.

use thiserror::Error;

/// Reasons [`Session::new`](crate::Session::new) rejects its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The initial state buffer was empty.
    #[error("state buffer is empty")]
    EmptyState,
    /// The per-position record (header plus state bytes, rounded to
    /// pointer alignment) would overflow the 16-bit stride bound.
    #[error("state size {0} exceeds the per-position limit")]
    StateTooLarge(usize),
    /// The comparing prefix was longer than the state itself.
    #[error("compare size {cmpsize} exceeds state size {statesize}")]
    CompareTooLarge {
        /// Requested comparing-prefix length.
        cmpsize: usize,
        /// Total state length.
        statesize: usize,
    },
}
