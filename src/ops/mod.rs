//! Tree mutation and query algorithms, as free functions over the session
//! internals.

pub(crate) mod add;
pub(crate) mod drop;
pub(crate) mod equiv;
pub(crate) mod graft;
pub(crate) mod path;
