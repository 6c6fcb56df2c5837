//! The hook registry.
//!
//! `Hooks` owns two independent indexes: one for actions and dispatchers
//! (they share tag space), one for filters. Binding is fail-fast: every
//! target is resolved and every name checked before anything is inserted.
//!
//! Triggers snapshot the ordered hook list under a read lock and release it
//! before invoking anything, so callbacks may bind, remove or trigger hooks
//! re-entrantly. Changes made during a pass are not seen by that pass, and
//! the `*_once` variants only consume the hooks that were in the snapshot.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::callback::{Arg, CallbackDescriptor, Callback, ClassDef, HookId, HookKind, Scope};
use crate::config::HooksConfig;
use crate::error::{HookError, HookResult};
use crate::syntax::IntoTagSpec;
use crate::value::Value;

use super::index::TagIndex;

/// Result of an action trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tag (and name, for by-name triggers) was found.
    Ran {
        /// Number of hooks invoked.
        invoked: usize,
    },
    /// Nothing is bound to the tag, or no hook carries the name.
    NotFound,
}

impl RunOutcome {
    /// True unless the trigger missed.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Ran { .. })
    }

    /// Number of hooks invoked (zero on a miss).
    #[must_use]
    pub const fn invoked(&self) -> usize {
        match self {
            Self::Ran { invoked } => *invoked,
            Self::NotFound => 0,
        }
    }
}

#[derive(Debug, Default)]
struct HookState {
    actions: TagIndex,
    filters: TagIndex,
}

impl HookState {
    const fn index(&self, kind: HookKind) -> &TagIndex {
        if kind.uses_action_index() {
            &self.actions
        } else {
            &self.filters
        }
    }

    fn index_mut(&mut self, kind: HookKind) -> &mut TagIndex {
        if kind.uses_action_index() {
            &mut self.actions
        } else {
            &mut self.filters
        }
    }
}

// Locks are never held while user callbacks run, so a poisoned lock still
// guards consistent data.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Action/filter/dispatch registry.
///
/// # Examples
///
/// ```
/// use hookline::{Arg, Hooks, Value};
///
/// let hooks = Hooks::default();
/// let price = |a: &[Value]| a[0].as_float().unwrap_or(0.0);
/// hooks
///     .filter("price.double", [Arg::closure(move |a| Value::from(price(a) * 2.0))])
///     .unwrap();
/// hooks
///     .filter("price.discount::1", [Arg::closure(move |a| Value::from(price(a) - 5.0))])
///     .unwrap();
///
/// // discount (priority 1) runs before double (default priority 10)
/// assert_eq!(hooks.apply("price", 105.0, &[]), Value::Float(200.0));
/// assert_eq!(hooks.apply("unknown", 105.0, &[]), Value::Float(105.0));
/// ```
#[derive(Debug, Default)]
pub struct Hooks {
    config: HooksConfig,
    scope: RwLock<Scope>,
    state: RwLock<HookState>,
}

impl Hooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: HooksConfig) -> Self {
        Self::with_scope(config, Scope::new())
    }

    /// Creates an empty registry resolving names against `scope`.
    #[must_use]
    pub fn with_scope(config: HooksConfig, scope: Scope) -> Self {
        Self {
            config,
            scope: RwLock::new(scope),
            state: RwLock::new(HookState::default()),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HooksConfig {
        &self.config
    }

    /// Makes `name` resolvable as a function target.
    pub fn define_function(&self, name: impl Into<String>, callback: Callback) {
        write(&self.scope).define_function(name, callback);
    }

    /// Makes `class` resolvable as a static-method target.
    pub fn define_class(&self, class: ClassDef) {
        write(&self.scope).define_class(class);
    }

    /// Forgets every defined function and class. Bound hooks keep working.
    pub fn clear_scope(&self) {
        write(&self.scope).clear();
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Binds an action.
    ///
    /// # Errors
    ///
    /// See [`Hooks::bind`].
    pub fn action(
        &self,
        tag: impl IntoTagSpec,
        args: impl IntoIterator<Item = Arg>,
    ) -> HookResult<Arc<CallbackDescriptor>> {
        self.bind(HookKind::Action, tag, args)
    }

    /// Binds a filter.
    ///
    /// # Errors
    ///
    /// See [`Hooks::bind`].
    pub fn filter(
        &self,
        tag: impl IntoTagSpec,
        args: impl IntoIterator<Item = Arg>,
    ) -> HookResult<Arc<CallbackDescriptor>> {
        self.bind(HookKind::Filter, tag, args)
    }

    /// Binds a dispatcher: the trailing `args` are stored and passed to the
    /// target on every `run`, whatever the trigger supplies.
    ///
    /// # Errors
    ///
    /// See [`Hooks::bind`].
    pub fn dispatch(
        &self,
        tag: impl IntoTagSpec,
        args: impl IntoIterator<Item = Arg>,
    ) -> HookResult<Arc<CallbackDescriptor>> {
        self.bind(HookKind::Dispatch, tag, args)
    }

    /// Resolves `args` into a hook of `kind` and inserts it under `tag`.
    ///
    /// Absent priority and argument count take the configured defaults; the
    /// argument count is not applied to dispatchers.
    ///
    /// # Errors
    ///
    /// - `MalformedSyntax` if `tag` is a string that does not decode.
    /// - `TargetNotResolvable`, `MethodNotFound`, `InvalidBoundParam` if the
    ///   target cannot be built.
    /// - `DuplicateName` if the name is already used under the tag in the
    ///   same index. Nothing is inserted in that case.
    pub fn bind(
        &self,
        kind: HookKind,
        tag: impl IntoTagSpec,
        args: impl IntoIterator<Item = Arg>,
    ) -> HookResult<Arc<CallbackDescriptor>> {
        let spec = tag.into_tag_spec()?;
        let priority = spec.priority.unwrap_or(self.config.default_priority);

        let mut hook = {
            let scope = read(&self.scope);
            CallbackDescriptor::from_args(&scope, args.into_iter().collect())?
        }
        .with_kind(kind)
        .with_priority(priority);

        if kind != HookKind::Dispatch {
            hook = hook.accept_args(spec.args.unwrap_or(self.config.default_accepted_args));
        }
        if let Some(name) = &spec.name {
            hook = hook.with_name(name.clone());
        }
        let hook = Arc::new(hook);

        let mut state = write(&self.state);
        let index = state.index_mut(kind);
        if let Some(name) = &spec.name {
            if index.name_exists(&spec.tag, name) {
                return Err(HookError::DuplicateName {
                    tag: spec.tag,
                    name: name.clone(),
                });
            }
        }
        index.insert(&spec.tag, Arc::clone(&hook));

        debug!(
            tag = %spec.tag,
            name = ?spec.name,
            %kind,
            priority,
            target = %hook.target(),
            "hook bound"
        );
        Ok(hook)
    }

    // ---------------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------------

    /// Removes actions (and dispatchers, which share the index).
    ///
    /// # Errors
    ///
    /// `MalformedSyntax` if `tag` does not decode.
    pub fn remove_action(&self, tag: impl IntoTagSpec) -> HookResult<bool> {
        self.remove(HookKind::Action, tag)
    }

    /// Removes filters.
    ///
    /// # Errors
    ///
    /// `MalformedSyntax` if `tag` does not decode.
    pub fn remove_filter(&self, tag: impl IntoTagSpec) -> HookResult<bool> {
        self.remove(HookKind::Filter, tag)
    }

    /// Removes dispatchers (and actions, which share the index).
    ///
    /// # Errors
    ///
    /// `MalformedSyntax` if `tag` does not decode.
    pub fn remove_dispatcher(&self, tag: impl IntoTagSpec) -> HookResult<bool> {
        self.remove(HookKind::Dispatch, tag)
    }

    /// Removes the whole tag, or only the hooks carrying the spec's name.
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// `MalformedSyntax` if `tag` does not decode.
    pub fn remove(&self, kind: HookKind, tag: impl IntoTagSpec) -> HookResult<bool> {
        let spec = tag.into_tag_spec()?;
        let mut state = write(&self.state);
        let index = state.index_mut(kind);

        let removed = match &spec.name {
            None => usize::from(index.remove_tag(&spec.tag)),
            Some(name) => index.remove_named(&spec.tag, name),
        };

        debug!(tag = %spec.tag, name = ?spec.name, %kind, removed, "hooks removed");
        Ok(removed > 0)
    }

    /// Clears both indexes. Defined functions and classes are kept.
    pub fn reset(&self) {
        let mut state = write(&self.state);
        state.actions.clear();
        state.filters.clear();
        debug!("hook registry reset");
    }

    // ---------------------------------------------------------------------
    // Triggers
    // ---------------------------------------------------------------------

    /// Fires every action and dispatcher bound to `tag`.
    ///
    /// Actions get at most their accepted count of leading `args`;
    /// dispatchers get their bound parameters. Return values are discarded.
    pub fn run(&self, tag: &str, args: &[Value]) -> RunOutcome {
        let Some(hooks) = self.snapshot(HookKind::Action, tag) else {
            debug!(tag, "run: no hooks bound");
            return RunOutcome::NotFound;
        };
        fire_all(tag, &hooks, args)
    }

    /// Like [`Hooks::run`], then unbinds every hook that was bound to `tag`
    /// when the trigger started, fired or not.
    pub fn run_once(&self, tag: &str, args: &[Value]) -> RunOutcome {
        let Some(hooks) = self.snapshot(HookKind::Action, tag) else {
            debug!(tag, "run_once: no hooks bound");
            return RunOutcome::NotFound;
        };
        let outcome = fire_all(tag, &hooks, args);
        self.consume(HookKind::Action, tag, &hooks);
        outcome
    }

    /// Fires only the action or dispatcher named `name` under `tag`.
    pub fn run_by_name(&self, tag: &str, name: &str, args: &[Value]) -> RunOutcome {
        let Some(hook) = read(&self.state).actions.find_by_name(tag, name) else {
            debug!(tag, name, "run_by_name: no matching hook");
            return RunOutcome::NotFound;
        };
        trace!(tag, name, target = %hook.target(), "firing hook");
        hook.fire(args);
        RunOutcome::Ran { invoked: 1 }
    }

    /// Threads `value` through every filter bound to `tag`.
    ///
    /// Each filter receives the running value followed by as many of `args`
    /// as its accepted count allows, and returns the next running value. An
    /// unknown tag returns `value` unchanged.
    pub fn apply(&self, tag: &str, value: impl Into<Value>, args: &[Value]) -> Value {
        let value = value.into();
        let Some(hooks) = self.snapshot(HookKind::Filter, tag) else {
            return value;
        };
        fold(tag, &hooks, value, args)
    }

    /// Like [`Hooks::apply`], then unbinds every filter that was bound to
    /// `tag` when the trigger started.
    pub fn apply_once(&self, tag: &str, value: impl Into<Value>, args: &[Value]) -> Value {
        let value = value.into();
        let Some(hooks) = self.snapshot(HookKind::Filter, tag) else {
            return value;
        };
        let result = fold(tag, &hooks, value, args);
        self.consume(HookKind::Filter, tag, &hooks);
        result
    }

    /// Applies only the filter named `name` under `tag`. Returns `value`
    /// unchanged if there is no such filter.
    pub fn apply_by_name(
        &self,
        tag: &str,
        name: &str,
        value: impl Into<Value>,
        args: &[Value],
    ) -> Value {
        let value = value.into();
        let Some(hook) = read(&self.state).filters.find_by_name(tag, name) else {
            return value;
        };
        trace!(tag, name, target = %hook.target(), "applying filter");
        hook.fire(&prepend(value, args))
    }

    // ---------------------------------------------------------------------
    // Introspection
    // ---------------------------------------------------------------------

    /// Whether any action or dispatcher is bound to `tag`.
    #[must_use]
    pub fn has_action(&self, tag: &str) -> bool {
        read(&self.state).actions.contains_tag(tag)
    }

    /// Whether any filter is bound to `tag`.
    #[must_use]
    pub fn has_filter(&self, tag: &str) -> bool {
        read(&self.state).filters.contains_tag(tag)
    }

    /// Number of hooks bound to `tag` in the index used by `kind`.
    #[must_use]
    pub fn count(&self, kind: HookKind, tag: &str) -> usize {
        read(&self.state).index(kind).count(tag)
    }

    /// Sorted tags of the index used by `kind`.
    #[must_use]
    pub fn tags(&self, kind: HookKind) -> Vec<String> {
        read(&self.state).index(kind).tags()
    }

    fn snapshot(&self, kind: HookKind, tag: &str) -> Option<Vec<Arc<CallbackDescriptor>>> {
        read(&self.state).index(kind).snapshot(tag)
    }

    fn consume(&self, kind: HookKind, tag: &str, hooks: &[Arc<CallbackDescriptor>]) {
        let ids: HashSet<HookId> = hooks.iter().map(|hook| hook.id()).collect();
        let removed = write(&self.state).index_mut(kind).remove_ids(tag, &ids);
        debug!(tag, %kind, removed, "one-shot hooks consumed");
    }
}

fn fire_all(tag: &str, hooks: &[Arc<CallbackDescriptor>], args: &[Value]) -> RunOutcome {
    for hook in hooks {
        trace!(
            tag,
            name = ?hook.name(),
            priority = hook.priority(),
            target = %hook.target(),
            "firing hook"
        );
        hook.fire(args);
    }
    RunOutcome::Ran { invoked: hooks.len() }
}

fn fold(tag: &str, hooks: &[Arc<CallbackDescriptor>], value: Value, args: &[Value]) -> Value {
    let mut slots = prepend(value, args);
    for hook in hooks {
        trace!(
            tag,
            name = ?hook.name(),
            priority = hook.priority(),
            target = %hook.target(),
            "applying filter"
        );
        slots[0] = hook.fire(&slots);
    }
    slots.swap_remove(0)
}

fn prepend(value: Value, args: &[Value]) -> Vec<Value> {
    let mut slots = Vec::with_capacity(args.len() + 1);
    slots.push(value);
    slots.extend_from_slice(args);
    slots
}
