//! Normalized hook entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HookError, HookResult};
use crate::value::Value;

use super::scope::Scope;
use super::target::{Arg, CallbackTarget};

/// Priority used when a declaration carries none.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Accepted argument count used when a declaration carries none.
pub const DEFAULT_ACCEPTED_ARGS: usize = 1;

/// Unique identifier of a bound hook.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookId(Uuid);

impl HookId {
    /// Create a new random hook id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for HookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a hook does when its tag is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Side effects only, receives a slice of the trigger arguments.
    Action,
    /// Receives and returns the running value of an `apply` pipeline.
    Filter,
    /// Side effects only, receives its own bound parameters.
    Dispatch,
}

impl HookKind {
    /// True for kinds stored in the action index (actions and dispatchers).
    #[must_use]
    pub const fn uses_action_index(self) -> bool {
        matches!(self, Self::Action | Self::Dispatch)
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => write!(f, "action"),
            Self::Filter => write!(f, "filter"),
            Self::Dispatch => write!(f, "dispatch"),
        }
    }
}

/// A bound hook: resolved target, bound parameters and scheduling data.
///
/// Built once by the registry at bind time and immutable afterwards.
#[derive(Debug, Clone)]
pub struct CallbackDescriptor {
    id: HookId,
    target: CallbackTarget,
    params: Vec<Value>,
    name: Option<String>,
    priority: i32,
    accepted_args: usize,
    kind: HookKind,
}

impl CallbackDescriptor {
    /// Wraps an already resolved target.
    #[must_use]
    pub fn new(target: CallbackTarget, params: Vec<Value>) -> Self {
        Self {
            id: HookId::new(),
            target,
            params,
            name: None,
            priority: DEFAULT_PRIORITY,
            accepted_args: DEFAULT_ACCEPTED_ARGS,
            kind: HookKind::Action,
        }
    }

    /// Classifies a positional argument list into a target and bound
    /// parameters.
    ///
    /// Resolution order: closure, object instance, class name in `scope`,
    /// function name in `scope`. A class name shadows a function of the same
    /// name.
    ///
    /// # Errors
    ///
    /// - `TargetNotResolvable` when the first element resolves to nothing.
    /// - `MethodNotFound` when an object or class target has no such method,
    ///   or no method name follows it (reported as `"(not set)"`).
    /// - `InvalidBoundParam` when a bound parameter is not a plain value.
    pub fn from_args(scope: &Scope, args: Vec<Arg>) -> HookResult<Self> {
        let mut rest = args.into_iter();

        let Some(head) = rest.next() else {
            return Err(HookError::TargetNotResolvable {
                target: "(empty)".to_string(),
            });
        };

        let target = match head {
            Arg::Callback(callback) => CallbackTarget::Closure(callback),
            Arg::Object(object) => {
                let method = take_method_name(&mut rest, object.class_name())?;
                if !object.has_method(&method) {
                    return Err(HookError::method_not_found(method, object.class_name()));
                }
                CallbackTarget::Method { object, method }
            }
            Arg::Value(Value::String(ident)) => {
                if let Some(class) = scope.class(&ident) {
                    let method = take_method_name(&mut rest, &ident)?;
                    let Some(callback) = class.get_method(&method) else {
                        return Err(HookError::method_not_found(method, ident));
                    };
                    CallbackTarget::StaticMethod {
                        callback: callback.clone(),
                        class: ident,
                        method,
                    }
                } else if let Some(callback) = scope.function(&ident) {
                    CallbackTarget::Function {
                        callback: callback.clone(),
                        name: ident,
                    }
                } else {
                    return Err(HookError::TargetNotResolvable { target: ident });
                }
            }
            Arg::Value(other) => {
                return Err(HookError::TargetNotResolvable {
                    target: other.to_string(),
                });
            }
        };

        let consumed = match target {
            CallbackTarget::Method { .. } | CallbackTarget::StaticMethod { .. } => 2,
            _ => 1,
        };

        let params = rest
            .enumerate()
            .map(|(i, arg)| match arg {
                Arg::Value(v) => Ok(v),
                other => Err(HookError::InvalidBoundParam {
                    position: consumed + i,
                    found: other.kind(),
                }),
            })
            .collect::<HookResult<Vec<_>>>()?;

        Ok(Self::new(target, params))
    }

    /// Sets the hook name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets how many trigger arguments are forwarded.
    #[must_use]
    pub const fn accept_args(mut self, accepted_args: usize) -> Self {
        self.accepted_args = accepted_args;
        self
    }

    /// Sets the hook kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: HookKind) -> Self {
        self.kind = kind;
        self
    }

    /// Registry-assigned identity.
    #[must_use]
    pub const fn id(&self) -> HookId {
        self.id
    }

    /// Resolved callback target.
    #[must_use]
    pub const fn target(&self) -> &CallbackTarget {
        &self.target
    }

    /// Parameters bound at registration (used verbatim by dispatchers).
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Hook name, if one was declared.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Execution priority, lower runs first.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Leading trigger arguments forwarded to the callback.
    #[must_use]
    pub const fn accepted_args(&self) -> usize {
        self.accepted_args
    }

    /// Action, filter or dispatcher.
    #[must_use]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// True if the hook carries exactly this name.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Invokes the hook for a trigger.
    ///
    /// Dispatchers receive their bound parameters and ignore `trigger_args`.
    /// Actions and filters receive at most `accepted_args` leading trigger
    /// arguments; missing ones are not padded.
    pub fn fire(&self, trigger_args: &[Value]) -> Value {
        match self.kind {
            HookKind::Dispatch => self.target.invoke(&self.params),
            HookKind::Action | HookKind::Filter => {
                let end = self.accepted_args.min(trigger_args.len());
                self.target.invoke(&trigger_args[..end])
            }
        }
    }
}

fn take_method_name(rest: &mut impl Iterator<Item = Arg>, target: &str) -> HookResult<String> {
    match rest.next() {
        None => Err(HookError::method_not_found("(not set)", target)),
        Some(Arg::Value(Value::String(method))) => Ok(method),
        Some(other) => Err(HookError::method_not_found(other.to_string(), target)),
    }
}
