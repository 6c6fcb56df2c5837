//! Registry engine.
//!
//! Storage of bound hooks per tag and priority, and the bind, trigger and
//! removal operations on top of it.

/// Process-wide shared instance.
pub mod global;
/// The registry and its trigger operations.
pub mod hooks;
/// Per-kind tag/priority index.
pub mod index;

pub use hooks::{Hooks, RunOutcome};
pub use index::TagIndex;
