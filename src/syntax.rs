//! Compact tag syntax.
//!
//! A hook is declared with a single token of the form
//! `tag[.name][?args][::priority]`:
//!
//! - `header` binds to the `header` tag;
//! - `header.greet` names the hook `greet`;
//! - `calc?2` forwards two trigger arguments;
//! - `calc::5` runs at priority 5;
//! - `calc.pow?2::1` combines all of the above.
//!
//! Decoding only reports what the token carries. Defaults for absent
//! priority and argument count are applied by the registry at bind time.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{HookError, HookResult};

static SYNTAX_RE: OnceLock<Regex> = OnceLock::new();

fn syntax_regex() -> &'static Regex {
    SYNTAX_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<tag>[^.:?]+)",
            r"(?:\.(?P<name>[^:?]+))?",
            r"(?:\?(?P<args>[0-9]+))?",
            r"(?:::(?P<priority>[0-9]+))?$",
        ))
        .unwrap_or_else(|e| unreachable!("tag syntax regex is static and valid: {e}"))
    })
}

/// Structured form of a tag declaration.
///
/// Optional fields are `None` when the declaration did not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSpec {
    /// Tag the hook subscribes to.
    pub tag: String,
    /// Unique (per tag) hook name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of leading trigger arguments forwarded to the callback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<usize>,
    /// Execution priority, lower runs first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl TagSpec {
    /// Creates a spec carrying only a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            args: None,
            priority: None,
        }
    }

    /// Sets the hook name. An empty name is treated as absent.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Sets the accepted argument count.
    #[must_use]
    pub const fn with_args(mut self, args: usize) -> Self {
        self.args = Some(args);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether the compact syntax can carry every field: a non-empty tag
    /// without `.`, `:` or `?`, a name without `:` or `?`, and a
    /// non-negative priority.
    #[must_use]
    pub fn is_expressible(&self) -> bool {
        let tag_ok = !self.tag.is_empty() && !self.tag.contains(['.', ':', '?']);
        let name_bad = self
            .name
            .as_deref()
            .is_some_and(|name| name.is_empty() || name.contains([':', '?']));
        let priority_bad = self.priority.is_some_and(|p| p < 0);
        tag_ok && !name_bad && !priority_bad
    }

    /// Renders the spec back to its compact syntax.
    ///
    /// # Errors
    ///
    /// Returns `HookError::MalformedSyntax` when a field cannot be written in
    /// the syntax (see [`TagSpec::is_expressible`]). Such a spec can still be
    /// bound directly.
    pub fn to_syntax(&self) -> HookResult<String> {
        if self.is_expressible() {
            Ok(self.to_string())
        } else {
            Err(HookError::malformed(self.to_string()))
        }
    }
}

/// Writes the fields in syntax order without checking them; use
/// [`TagSpec::to_syntax`] for a token that is guaranteed to decode.
impl fmt::Display for TagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(name) = &self.name {
            write!(f, ".{name}")?;
        }
        if let Some(args) = self.args {
            write!(f, "?{args}")?;
        }
        if let Some(priority) = self.priority {
            write!(f, "::{priority}")?;
        }
        Ok(())
    }
}

impl FromStr for TagSpec {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Builds a `TagSpec` from its parts.
///
/// An empty `name` is omitted, matching what `decode` would produce for the
/// rendered token.
///
/// # Errors
///
/// Returns `HookError::MalformedSyntax` when the parts cannot be written as a
/// token that decodes back to them: an empty tag, a tag containing `.`, `:`
/// or `?`, a name containing `:` or `?`, or a negative priority.
pub fn encode(
    tag: &str,
    name: Option<&str>,
    priority: Option<i32>,
    args: Option<usize>,
) -> HookResult<TagSpec> {
    let mut spec = TagSpec::new(tag);
    if let Some(name) = name {
        spec = spec.with_name(name);
    }
    spec.args = args;
    spec.priority = priority;

    if spec.is_expressible() {
        Ok(spec)
    } else {
        Err(HookError::malformed(spec.to_string()))
    }
}

/// Parses `tag[.name][?args][::priority]`.
///
/// # Errors
///
/// Returns `HookError::MalformedSyntax` carrying the raw input when the whole
/// string does not match the grammar, or when a numeric field overflows.
pub fn decode(syntax: &str) -> HookResult<TagSpec> {
    let caps = syntax_regex()
        .captures(syntax)
        .ok_or_else(|| HookError::malformed(syntax))?;

    let tag = caps
        .name("tag")
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| HookError::malformed(syntax))?;

    let name = caps
        .name("name")
        .map(|m| m.as_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let args = caps
        .name("args")
        .map(|m| m.as_str().parse::<usize>())
        .transpose()
        .map_err(|_| HookError::malformed(syntax))?;

    let priority = caps
        .name("priority")
        .map(|m| m.as_str().parse::<i32>())
        .transpose()
        .map_err(|_| HookError::malformed(syntax))?;

    Ok(TagSpec {
        tag,
        name,
        args,
        priority,
    })
}

/// Anything accepted where a tag declaration is expected.
///
/// Strings are decoded with [`decode`]; a `TagSpec` is used as-is.
pub trait IntoTagSpec {
    /// Converts into a structured spec.
    ///
    /// # Errors
    ///
    /// Returns `HookError::MalformedSyntax` for strings that fail to decode.
    fn into_tag_spec(self) -> HookResult<TagSpec>;
}

impl IntoTagSpec for TagSpec {
    fn into_tag_spec(self) -> HookResult<TagSpec> {
        Ok(self)
    }
}

impl IntoTagSpec for &TagSpec {
    fn into_tag_spec(self) -> HookResult<TagSpec> {
        Ok(self.clone())
    }
}

impl IntoTagSpec for &str {
    fn into_tag_spec(self) -> HookResult<TagSpec> {
        decode(self)
    }
}

impl IntoTagSpec for String {
    fn into_tag_spec(self) -> HookResult<TagSpec> {
        decode(&self)
    }
}

impl IntoTagSpec for &String {
    fn into_tag_spec(self) -> HookResult<TagSpec> {
        decode(self)
    }
}
