//! Branching history of visited states.
//!
//! A linear undo list forgets every line of play the user abandons. This
//! crate keeps the whole exploration instead: each state the caller
//! reports becomes a node in a tree rooted at the initial state, so
//! undoing and trying something else grows a new branch rather than
//! erasing the old one.
//!
//! # Key properties
//!
//! - **Convergence detection**: two move sequences reaching the same
//!   state are linked, and the longer route can be grafted onto the
//!   shorter one (see [`Grafting`])
//! - **Solution accounting**: endpoint markers propagate to every
//!   ancestor, so any position reports the best solution below it
//! - **Opaque states**: states are fixed-size byte buffers; the engine
//!   hashes and compares a leading prefix and never interprets the rest
//! - **Stable handles**: positions live in chunked arenas with free-list
//!   reuse; a [`PosId`] stays valid until its position is dropped
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! The engine is strictly single-threaded, performs no I/O, and never
//! logs; every failure is an ordinary return value. Persistence is the
//! caller's job — branch iteration order, `better` links, and the
//! deferred-check flag are all exposed so an external save format can
//! round-trip a session through [`EquivCheck::Later`] and
//! [`Session::resolve_deferred_betters`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod hash;
pub mod position;

mod arena;
mod error;
mod iter;
mod ops;
mod session;

#[cfg(test)]
mod tests;

pub use error::SessionError;
pub use iter::Moves;
pub use position::{EquivCheck, Grafting, Move, PosId, Position};
pub use session::Session;
