//! Observable unordered container.

use std::collections::HashSet;
use std::hash::Hash;

use parking_lot::RwLock;

use super::delta::SetDelta;
use crate::logging::targets;
use crate::signal::Signal;

/// An unordered collection of unique elements that reports added/removed
/// changes on [`changed`](ObservableSet::changed).
///
/// Inserting a present element or removing an absent one emits nothing.
pub struct ObservableSet<T: Eq + Hash> {
    items: RwLock<HashSet<T>>,
    changed: Signal<SetDelta<T>>,
}

impl<T> Default for ObservableSet<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableSet<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::from_set(HashSet::new())
    }

    /// Creates a set holding `items`.
    pub fn from_set(items: HashSet<T>) -> Self {
        Self {
            items: RwLock::new(items),
            changed: Signal::new(),
        }
    }

    /// Signal emitted once per committed change.
    pub fn changed(&self) -> &Signal<SetDelta<T>> {
        &self.changed
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns `true` if `element` is present.
    pub fn contains(&self, element: &T) -> bool {
        self.items.read().contains(element)
    }

    /// Clones the current contents.
    pub fn to_set(&self) -> HashSet<T> {
        self.items.read().clone()
    }

    /// Adds `element`; returns `false` if it was already present.
    pub fn insert(&self, element: T) -> bool {
        if !self.items.write().insert(element.clone()) {
            return false;
        }
        let mut delta = SetDelta::default();
        delta.added.insert(element);
        self.commit(delta);
        true
    }

    /// Removes `element`; returns `false` if it was absent.
    pub fn remove(&self, element: &T) -> bool {
        let Some(removed) = self.items.write().take(element) else {
            return false;
        };
        let mut delta = SetDelta::default();
        delta.removed.insert(removed);
        self.commit(delta);
        true
    }

    /// Removes every element.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.items.write());
        self.commit(SetDelta {
            removed,
            added: HashSet::new(),
        });
    }

    /// Applies `block` with notification suppressed, then emits the symmetric
    /// difference between the pre- and post-batch contents.
    ///
    /// `block` must not access this set directly.
    pub fn batch<R>(&self, block: impl FnOnce(&mut HashSet<T>) -> R) -> R {
        if !self.changed.has_connections() {
            return block(&mut self.items.write());
        }

        let (result, delta) = {
            let mut items = self.items.write();
            let old = items.clone();
            let result = block(&mut items);
            (result, SetDelta::between(&old, &items))
        };
        self.commit(delta);
        result
    }

    /// Adds every element as one change.
    pub fn extend(&self, elements: impl IntoIterator<Item = T>) {
        self.batch(|items| items.extend(elements));
    }

    /// Removes every listed element as one change.
    pub fn remove_all<'a>(&self, elements: impl IntoIterator<Item = &'a T>)
    where
        T: 'a,
    {
        self.batch(|items| {
            for element in elements {
                items.remove(element);
            }
        });
    }

    /// Keeps only the elements for which `keep` returns `true`, as one change.
    pub fn retain(&self, keep: impl FnMut(&T) -> bool) {
        self.batch(|items| items.retain(keep));
    }

    /// Replaces the whole contents as one change.
    pub fn replace_all(&self, elements: impl IntoIterator<Item = T>) {
        self.batch(|items| {
            items.clear();
            items.extend(elements);
        });
    }

    fn commit(&self, delta: SetDelta<T>) {
        if delta.is_empty() {
            return;
        }
        tracing::trace!(target: targets::OBSERVABLE, changes = %delta.summary(), "set changed");
        self.changed.emit(delta);
    }
}

static_assertions::assert_impl_all!(ObservableSet<String>: Send, Sync);
