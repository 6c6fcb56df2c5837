//! Error types for hookline.
//!
//! Every error is raised synchronously at registration time (bind, remove,
//! configuration loading). Trigger-time misses such as an unknown tag or name
//! are not errors: `run` reports them through `RunOutcome::NotFound` and
//! `apply` hands the input value back unchanged.

use thiserror::Error;

/// Errors raised while declaring, binding or removing hooks.
#[derive(Debug, Error)]
pub enum HookError {
    /// The tag string does not match `tag[.name][?args][::priority]`.
    #[error("Invalid tag syntax: \"{syntax}\"")]
    MalformedSyntax {
        syntax: String,
    },

    /// The first target element is neither a closure, an object, a known
    /// class nor a known function.
    #[error("Callback target \"{target}\" cannot be resolved")]
    TargetNotResolvable {
        target: String,
    },

    /// The method is missing on the resolved object or class, or was not
    /// supplied at all.
    #[error("The method \"{method}\" doesn't exist inside \"{target}\"")]
    MethodNotFound {
        method: String,
        target: String,
    },

    /// Another hook under the same tag already carries this name.
    #[error("Tag \"{tag}\" already has a hook named \"{name}\"")]
    DuplicateName {
        tag: String,
        name: String,
    },

    /// A bound parameter is a callback or object instead of a plain value.
    #[error("Bound parameter at position {position} must be a value, got {found}")]
    InvalidBoundParam {
        position: usize,
        found: &'static str,
    },

    /// A configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

#[allow(missing_docs)]
impl HookError {
    pub(crate) fn malformed(syntax: impl Into<String>) -> Self {
        Self::MalformedSyntax {
            syntax: syntax.into(),
        }
    }

    pub(crate) fn method_not_found(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub const fn is_malformed_syntax(&self) -> bool {
        matches!(self, Self::MalformedSyntax { .. })
    }

    #[must_use]
    pub const fn is_target_not_resolvable(&self) -> bool {
        matches!(self, Self::TargetNotResolvable { .. })
    }

    #[must_use]
    pub const fn is_method_not_found(&self) -> bool {
        matches!(self, Self::MethodNotFound { .. })
    }

    #[must_use]
    pub const fn is_duplicate_name(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }

    #[must_use]
    pub const fn is_invalid_bound_param(&self) -> bool {
        matches!(self, Self::InvalidBoundParam { .. })
    }

    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}

/// Result type alias for hookline operations.
pub type HookResult<T> = Result<T, HookError>;
