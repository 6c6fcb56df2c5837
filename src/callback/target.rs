//! Callback targets.
//!
//! Every registered hook normalizes to one `CallbackTarget`. Resolution
//! (does the function exist, does the object expose the method) happens once
//! when the hook is bound; invoking a target never re-resolves it.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

type CallbackFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A shareable callable taking positional values.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    /// Wraps a closure returning a value (filters).
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a side-effect-only closure (actions and dispatchers).
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Self(Arc::new(move |args: &[Value]| {
            f(args);
            Value::Null
        }))
    }

    /// Invokes the callback.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// True if both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// An object whose methods can be bound as hooks.
///
/// Implementors expose their callable methods by name. `has_method` is
/// consulted when the hook is bound; `call_method` is only ever invoked with
/// names for which `has_method` returned true.
///
/// ```
/// use std::sync::Mutex;
/// use hookline::{HookObject, Value};
///
/// struct Counter {
///     hits: Mutex<u32>,
/// }
///
/// impl HookObject for Counter {
///     fn class_name(&self) -> &str {
///         "Counter"
///     }
///
///     fn has_method(&self, method: &str) -> bool {
///         method == "hit"
///     }
///
///     fn call_method(&self, _method: &str, _args: &[Value]) -> Value {
///         let mut hits = self.hits.lock().unwrap();
///         *hits += 1;
///         Value::from(i64::from(*hits))
///     }
/// }
/// ```
pub trait HookObject: Send + Sync {
    /// Name used in error messages.
    fn class_name(&self) -> &str;

    /// Whether `method` can be called on this instance.
    fn has_method(&self, method: &str) -> bool;

    /// Invokes `method` with the forwarded arguments.
    fn call_method(&self, method: &str, args: &[Value]) -> Value;
}

/// A resolved, invocable hook target.
#[derive(Clone)]
pub enum CallbackTarget {
    /// A named function from the scope.
    Function {
        /// Function name.
        name: String,
        /// Resolved function body.
        callback: Callback,
    },
    /// A method on a caller-owned object instance.
    Method {
        /// Shared instance.
        object: Arc<dyn HookObject>,
        /// Method name, checked with `has_method` at bind time.
        method: String,
    },
    /// A static method on a class from the scope.
    StaticMethod {
        /// Class name.
        class: String,
        /// Method name.
        method: String,
        /// Resolved method body.
        callback: Callback,
    },
    /// An anonymous closure.
    Closure(Callback),
}

impl CallbackTarget {
    /// Invokes the target.
    pub fn invoke(&self, args: &[Value]) -> Value {
        match self {
            Self::Function { callback, .. }
            | Self::StaticMethod { callback, .. }
            | Self::Closure(callback) => callback.call(args),
            Self::Method { object, method } => object.call_method(method, args),
        }
    }

    /// Short label of the target shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Function { .. } => "function",
            Self::Method { .. } => "method",
            Self::StaticMethod { .. } => "static_method",
            Self::Closure(_) => "closure",
        }
    }
}

impl fmt::Display for CallbackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function { name, .. } => write!(f, "{name}"),
            Self::Method { object, method } => write!(f, "{}->{method}", object.class_name()),
            Self::StaticMethod { class, method, .. } => write!(f, "{class}::{method}"),
            Self::Closure(_) => write!(f, "{{closure}}"),
        }
    }
}

impl fmt::Debug for CallbackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackTarget::{}({self})", self.shape())
    }
}

/// One positional element of a bind call.
///
/// The leading one or two elements designate the target; the rest are bound
/// parameters.
#[derive(Clone)]
pub enum Arg {
    /// An anonymous closure.
    Callback(Callback),
    /// An object instance.
    Object(Arc<dyn HookObject>),
    /// A plain value: a function name, class name, method name or parameter.
    Value(Value),
}

impl Arg {
    /// Wraps a value-returning closure.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Callback(Callback::new(f))
    }

    /// Wraps a side-effect-only closure.
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Self::Callback(Callback::action(f))
    }

    /// Wraps an object instance.
    pub fn object<T: HookObject + 'static>(object: Arc<T>) -> Self {
        Self::Object(object)
    }

    /// Short label of the element kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Callback(_) => "closure",
            Self::Object(_) => "object",
            Self::Value(_) => "value",
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Arg::Callback(..)"),
            Self::Object(o) => write!(f, "Arg::Object({})", o.class_name()),
            Self::Value(v) => write!(f, "Arg::Value({v})"),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("{closure}"),
            Self::Object(o) => f.write_str(o.class_name()),
            Self::Value(Value::String(s)) => f.write_str(s),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

impl From<Callback> for Arg {
    fn from(v: Callback) -> Self {
        Self::Callback(v)
    }
}

impl From<Arc<dyn HookObject>> for Arg {
    fn from(v: Arc<dyn HookObject>) -> Self {
        Self::Object(v)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Self::Value(Value::String(v))
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Self::Value(Value::Int(v))
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Self::Value(Value::Float(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Self::Value(Value::Bool(v))
    }
}
