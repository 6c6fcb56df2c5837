//! Tag → priority → insertion-ordered hooks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::callback::{CallbackDescriptor, HookId};

type Bucket = Vec<Arc<CallbackDescriptor>>;

/// One kind-group index (actions+dispatchers, or filters).
///
/// Tags never hold empty buckets: emptied buckets and tags are pruned, so
/// an absent tag and an empty tag are the same state.
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: HashMap<String, BTreeMap<i32, Bucket>>,
}

impl TagIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `hook` to its priority bucket under `tag`.
    pub fn insert(&mut self, tag: &str, hook: Arc<CallbackDescriptor>) {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .entry(hook.priority())
            .or_default()
            .push(hook);
    }

    /// Whether any hook is bound to `tag`.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Whether `name` is used anywhere under `tag`.
    #[must_use]
    pub fn name_exists(&self, tag: &str, name: &str) -> bool {
        self.find_by_name(tag, name).is_some()
    }

    /// Hooks under `tag` in firing order: ascending priority, then
    /// insertion order. `None` if the tag is absent.
    #[must_use]
    pub fn snapshot(&self, tag: &str) -> Option<Vec<Arc<CallbackDescriptor>>> {
        self.tags
            .get(tag)
            .map(|buckets| buckets.values().flatten().cloned().collect())
    }

    /// First hook under `tag` named `name`, scanning priorities ascending.
    #[must_use]
    pub fn find_by_name(&self, tag: &str, name: &str) -> Option<Arc<CallbackDescriptor>> {
        self.tags
            .get(tag)?
            .values()
            .flatten()
            .find(|hook| hook.is_named(name))
            .cloned()
    }

    /// Drops the whole tag. Returns whether it existed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag).is_some()
    }

    /// Drops every hook named `name` under `tag`, sweeping all priorities.
    /// Returns the number removed.
    pub fn remove_named(&mut self, tag: &str, name: &str) -> usize {
        self.remove_where(tag, |hook| hook.is_named(name))
    }

    /// Drops the hooks under `tag` whose id is in `ids`. Returns the number
    /// removed.
    pub fn remove_ids(&mut self, tag: &str, ids: &HashSet<HookId>) -> usize {
        self.remove_where(tag, |hook| ids.contains(&hook.id()))
    }

    fn remove_where(&mut self, tag: &str, pred: impl Fn(&CallbackDescriptor) -> bool) -> usize {
        let Some(buckets) = self.tags.get_mut(tag) else {
            return 0;
        };

        let mut removed = 0;
        buckets.retain(|_, bucket| {
            let before = bucket.len();
            bucket.retain(|hook| !pred(&**hook));
            removed += before - bucket.len();
            !bucket.is_empty()
        });

        if buckets.is_empty() {
            self.tags.remove(tag);
        }
        removed
    }

    /// Number of hooks under `tag`.
    #[must_use]
    pub fn count(&self, tag: &str) -> usize {
        self.tags
            .get(tag)
            .map_or(0, |buckets| buckets.values().map(Vec::len).sum())
    }

    /// All tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Whether the index holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}
