//! Callback normalization.
//!
//! Closures, named functions, object methods, static class methods and
//! dispatchers with pre-bound parameters all normalize into one
//! `CallbackDescriptor` that the registry stores and fires.

/// Hook entries and target classification.
pub mod descriptor;
/// Named functions and classes.
pub mod scope;
/// Target shapes and the positional argument type.
pub mod target;

pub use descriptor::{CallbackDescriptor, HookId, HookKind, DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY};
pub use scope::{ClassDef, Scope};
pub use target::{Arg, Callback, CallbackTarget, HookObject};
