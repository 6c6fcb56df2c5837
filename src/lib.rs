//! # hookline - in-process action and filter hooks
//!
//! hookline is a publish/subscribe registry for a single process. Callbacks
//! subscribe to named tags; triggering a tag runs them in priority order,
//! either for side effects (actions and dispatchers) or as a value pipeline
//! (filters).
//!
//! ## Core Concepts
//!
//! - **Tag syntax**: `tag[.name][?args][::priority]` declares everything about
//!   a hook in one token
//! - **Action**: fired by `run`, receives the leading trigger arguments
//! - **Filter**: fired by `apply`, receives the running value and returns the
//!   next one
//! - **Dispatcher**: fired by `run`, receives the parameters bound at
//!   registration instead of the trigger arguments
//! - **Targets**: closures, named functions, object methods and static class
//!   methods, all resolved when the hook is bound
//!
//! ## Usage
//!
//! ```rust
//! use hookline::{Arg, Callback, Hooks, Value};
//!
//! fn num(v: &Value) -> f64 {
//!     v.as_float().unwrap_or(0.0)
//! }
//!
//! let hooks = Hooks::default();
//! hooks.define_function("fsum", Callback::new(|a| Value::from(num(&a[0]) + 15.0)));
//! hooks.define_function("fmul", Callback::new(|a| Value::from(num(&a[0]) * 3.0)));
//!
//! hooks.filter("calc.sum", [Arg::from("fsum")])?;
//! hooks.filter("calc.mul", [Arg::from("fmul")])?;
//!
//! assert_eq!(hooks.apply("calc", 10, &[]), Value::Float(75.0));
//! assert_eq!(hooks.apply_by_name("calc", "sum", 10, &[]), Value::Float(25.0));
//! # Ok::<(), hookline::HookError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod callback;
pub mod config;
pub mod error;
pub mod registry;
pub mod syntax;
pub mod value;

// Re-export primary types at crate root for convenience
pub use callback::{
    Arg, Callback, CallbackDescriptor, CallbackTarget, ClassDef, HookId, HookKind, HookObject,
    Scope,
};
pub use config::HooksConfig;
pub use error::{HookError, HookResult};
pub use registry::{Hooks, RunOutcome};
pub use syntax::{decode, encode, IntoTagSpec, TagSpec};
pub use value::Value;
