//! Per-backend [`TermBuilder`](crate::translate::TermBuilder)
//! implementations.
//!
//! Each builder borrows its engine's term store and maps the bridge's
//! primitive constructors onto that engine's API, overriding exactly the
//! provided methods its backend has native support for.

pub(crate) mod boreal;
pub(crate) mod cirrus;
pub(crate) mod quill;
