//! Observable ordered container.
//!
//! [`ObservableList<T>`] owns a sequence (insertion order significant,
//! duplicates allowed) and reports every committed change as one
//! [`ListDelta`] on its [`changed`](ObservableList::changed) signal.
//!
//! Single-element operations emit a one-entry delta immediately. Batches run
//! against a [`BatchList`] with notification suppressed and emit a single
//! delta computed by diffing the pre- and post-batch snapshots.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::observable::ObservableList;
//!
//! let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
//! list.changed().connect(|delta| {
//!     println!("list changed: {}", delta.summary());
//! });
//!
//! list.batch(|items| {
//!     items.remove(&'B');
//!     items.push('D');
//! });
//! assert_eq!(list.to_vec(), vec!['A', 'C', 'D']);
//! ```

use std::ops::Deref;

use parking_lot::RwLock;

use super::delta::ListDelta;
use super::diff::diff;
use crate::logging::targets;
use crate::signal::Signal;

/// Mutable view of an [`ObservableList`]'s storage used inside a batch.
///
/// Offers the same primitives as the list itself but never notifies. Read
/// access goes through `Deref<Target = [T]>`.
pub struct BatchList<'a, T> {
    items: &'a mut Vec<T>,
}

impl<'a, T: PartialEq> BatchList<'a, T> {
    fn new(items: &'a mut Vec<T>) -> Self {
        Self { items }
    }

    /// Appends an element.
    pub fn push(&mut self, element: T) {
        self.items.push(element);
    }

    /// Inserts at `index`; returns `false` if `index > len`.
    pub fn insert(&mut self, index: usize, element: T) -> bool {
        if index > self.items.len() {
            return false;
        }
        self.items.insert(index, element);
        true
    }

    /// Removes the first element equal to `element`.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.items.iter().position(|item| item == element) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, element: T) -> Option<T> {
        let slot = self.items.get_mut(index)?;
        Some(std::mem::replace(slot, element))
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Moves the first element equal to `element` to `to`.
    ///
    /// Returns `false` (and changes nothing) if `to` is out of range, the
    /// element is absent, or it already sits at `to`.
    pub fn move_to(&mut self, element: &T, to: usize) -> bool {
        move_within(self.items, element, to).is_some()
    }

    /// Appends every element of `elements`.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = T>) {
        self.items.extend(elements);
    }

    /// Keeps only the elements for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}

impl<T> Deref for BatchList<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

/// Returns the old index of the moved element.
fn move_within<T: PartialEq>(items: &mut Vec<T>, element: &T, to: usize) -> Option<usize> {
    let from = items.iter().position(|item| item == element)?;
    if to >= items.len() || from == to {
        return None;
    }
    let element = items.remove(from);
    items.insert(to, element);
    Some(from)
}

/// An ordered container that reports minimal deltas to its observers.
pub struct ObservableList<T> {
    items: RwLock<Vec<T>>,
    changed: Signal<ListDelta<T>>,
}

impl<T> Default for ObservableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a list holding `items`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            changed: Signal::new(),
        }
    }

    /// Signal emitted once per committed change.
    pub fn changed(&self) -> &Signal<ListDelta<T>> {
        &self.changed
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Returns `true` if an equal element is present.
    pub fn contains(&self, element: &T) -> bool {
        self.items.read().contains(element)
    }

    /// Index of the first element equal to `element`.
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.items.read().iter().position(|item| item == element)
    }

    /// Clones the current contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Clones the elements in `start..=end`, clamped to the list bounds.
    pub fn section(&self, start: usize, end: usize) -> Vec<T> {
        let items = self.items.read();
        if start >= items.len() || start > end {
            return Vec::new();
        }
        items[start..=end.min(items.len() - 1)].to_vec()
    }

    /// Runs `f` with read access to the contents.
    ///
    /// `f` must not mutate this list.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    // =========================================================================
    // Single-element mutation
    // =========================================================================

    /// Appends an element.
    pub fn push(&self, element: T) {
        let delta = {
            let mut items = self.items.write();
            items.push(element);
            self.changed
                .has_connections()
                .then(|| ListDelta::inserted(items.len() - 1, items[items.len() - 1].clone()))
        };
        self.commit(delta);
    }

    /// Inserts `element` at `index`.
    ///
    /// Returns `false` if `index > len`; nothing is emitted in that case.
    pub fn insert(&self, index: usize, element: T) -> bool {
        let delta = {
            let mut items = self.items.write();
            if index > items.len() {
                tracing::debug!(target: targets::OBSERVABLE, index, len = items.len(), "insert out of range");
                return false;
            }
            items.insert(index, element);
            self.changed
                .has_connections()
                .then(|| ListDelta::inserted(index, items[index].clone()))
        };
        self.commit(delta);
        true
    }

    /// Removes the first element equal to `element`.
    pub fn remove(&self, element: &T) -> bool {
        let delta = {
            let mut items = self.items.write();
            let Some(index) = items.iter().position(|item| item == element) else {
                return false;
            };
            ListDelta::removed(index, items.remove(index))
        };
        self.commit(Some(delta));
        true
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                tracing::debug!(target: targets::OBSERVABLE, index, len = items.len(), "remove_at out of range");
                return None;
            }
            items.remove(index)
        };
        self.commit(Some(ListDelta::removed(index, removed.clone())));
        Some(removed)
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// Replacing an element with an equal one emits nothing.
    pub fn set(&self, index: usize, element: T) -> Option<T> {
        let (previous, delta) = {
            let mut items = self.items.write();
            let slot = items.get_mut(index)?;
            let previous = std::mem::replace(slot, element);
            let delta = (previous != *slot)
                .then(|| ListDelta::replaced(index, previous.clone(), slot.clone()));
            (previous, delta)
        };
        self.commit(delta);
        Some(previous)
    }

    /// Removes every element.
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.items.write());
        let delta = ListDelta {
            removed: old.into_iter().enumerate().collect(),
            ..ListDelta::new()
        };
        self.commit(Some(delta));
    }

    /// Moves the first element equal to `element` to index `to`.
    ///
    /// Returns `false` without emitting if `to` is out of range, the element
    /// is absent, or it already sits at `to`.
    pub fn move_to(&self, element: &T, to: usize) -> bool {
        let delta = {
            let mut items = self.items.write();
            match move_within(&mut items, element, to) {
                Some(from) => ListDelta::relocated(from, to, items[to].clone()),
                None => {
                    tracing::debug!(target: targets::OBSERVABLE, to, "move_to rejected");
                    return false;
                }
            }
        };
        self.commit(Some(delta));
        true
    }

    // =========================================================================
    // Batched mutation
    // =========================================================================

    /// Applies `block` with notification suppressed, then emits one delta
    /// describing the net change.
    ///
    /// Nothing is emitted when the net change is empty. When no observer is
    /// connected the diff is skipped entirely. `block` must not access this
    /// list directly; it receives the storage through a [`BatchList`].
    pub fn batch<R>(&self, block: impl FnOnce(&mut BatchList<'_, T>) -> R) -> R {
        if !self.changed.has_connections() {
            let mut items = self.items.write();
            return block(&mut BatchList::new(&mut items));
        }

        let (result, delta) = {
            let mut items = self.items.write();
            let old = items.clone();
            let result = block(&mut BatchList::new(&mut items));
            let delta = diff(&old, &items);
            (result, delta)
        };
        self.commit(Some(delta));
        result
    }

    /// Appends every element as one change.
    pub fn extend(&self, elements: impl IntoIterator<Item = T>) {
        self.batch(|items| items.extend(elements));
    }

    /// Inserts `elements` starting at `index` as one change.
    ///
    /// Returns `false` if `index > len`.
    pub fn insert_all(&self, index: usize, elements: impl IntoIterator<Item = T>) -> bool {
        self.batch(|items| {
            if index > items.len() {
                return false;
            }
            for (offset, element) in elements.into_iter().enumerate() {
                items.insert(index + offset, element);
            }
            true
        })
    }

    /// Removes the first occurrence of each element as one change.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_all(&self, elements: &[T]) -> bool {
        self.batch(|items| {
            let mut removed = false;
            for element in elements {
                removed |= items.remove(element);
            }
            removed
        })
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

    fn commit(&self, delta: Option<ListDelta<T>>) {
        let Some(delta) = delta else {
            return;
        };
        if delta.is_empty() {
            tracing::trace!(target: targets::OBSERVABLE, "net change empty, nothing emitted");
            return;
        }
        tracing::trace!(target: targets::OBSERVABLE, changes = %delta.summary(), "list changed");
        self.changed.emit(delta);
    }
}

static_assertions::assert_impl_all!(ObservableList<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn record(list: &ObservableList<char>) -> Arc<Mutex<Vec<ListDelta<char>>>> {
        let deltas = Arc::new(Mutex::new(Vec::new()));
        let deltas_clone = deltas.clone();
        list.changed().connect(move |delta| {
            deltas_clone.lock().push(delta.clone());
        });
        deltas
    }

    #[test]
    fn test_single_operations_emit_immediately() {
        let list = ObservableList::from_vec(vec!['A', 'B']);
        let deltas = record(&list);

        list.push('C');
        assert!(list.insert(0, 'Z'));
        assert!(list.remove(&'B'));
        assert_eq!(list.remove_at(0), Some('Z'));
        assert_eq!(list.set(0, 'a'), Some('A'));

        let deltas = deltas.lock();
        assert_eq!(deltas.len(), 5);
        assert_eq!(deltas[0], ListDelta::inserted(2, 'C'));
        assert_eq!(deltas[1], ListDelta::inserted(0, 'Z'));
        assert_eq!(deltas[2], ListDelta::removed(2, 'B'));
        assert_eq!(deltas[3], ListDelta::removed(0, 'Z'));
        assert_eq!(deltas[4], ListDelta::replaced(0, 'A', 'a'));
        assert_eq!(list.to_vec(), vec!['a', 'C']);
    }

    #[test]
    fn test_invalid_operations_are_noops() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
        let deltas = record(&list);

        assert!(!list.insert(9, 'X'));
        assert!(!list.remove(&'X'));
        assert_eq!(list.remove_at(3), None);
        assert_eq!(list.set(3, 'X'), None);
        assert!(!list.move_to(&'C', 3));
        assert!(!list.move_to(&'C', 2));
        assert!(!list.move_to(&'X', 0));
        assert_eq!(list.set(1, 'B'), Some('B'));

        assert!(deltas.lock().is_empty());
        assert_eq!(list.to_vec(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_move_to_emits_one_move() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
        let deltas = record(&list);

        assert!(list.move_to(&'C', 0));

        assert_eq!(list.to_vec(), vec!['C', 'A', 'B']);
        assert_eq!(*deltas.lock(), vec![ListDelta::relocated(2, 0, 'C')]);
    }

    #[test]
    fn test_clear_reports_every_index() {
        let list = ObservableList::from_vec(vec!['A', 'B']);
        let deltas = record(&list);

        list.clear();
        list.clear();

        let deltas = deltas.lock();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].removed.len(), 2);
    }

    #[test]
    fn test_batch_remove_and_append() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
        let deltas = record(&list);

        list.batch(|items| {
            items.remove(&'B');
            items.push('D');
        });

        assert_eq!(list.to_vec(), vec!['A', 'C', 'D']);
        let deltas = deltas.lock();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].removed.clone().into_iter().collect::<Vec<_>>(), vec![(1, 'B')]);
        assert_eq!(deltas[0].added.clone().into_iter().collect::<Vec<_>>(), vec![(2, 'D')]);
        assert!(deltas[0].moved.is_empty());
    }

    #[test]
    fn test_batch_move_to_front() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
        let deltas = record(&list);

        list.batch(|items| {
            items.move_to(&'C', 0);
        });

        assert_eq!(list.to_vec(), vec!['C', 'A', 'B']);
        assert_eq!(*deltas.lock(), vec![ListDelta::relocated(2, 0, 'C')]);
    }

    #[test]
    fn test_identity_batches_emit_nothing() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
        let deltas = record(&list);

        list.batch(|_| {});
        list.batch(|items| {
            items.push('D');
            items.remove(&'D');
        });
        list.replace_all(vec!['A', 'B', 'C']);

        assert!(deltas.lock().is_empty());
    }

    #[test]
    fn test_batch_without_observers_passes_through() {
        let list = ObservableList::from_vec(vec![1, 2, 3]);
        let total = list.batch(|items| {
            items.push(4);
            items.iter().sum::<i32>()
        });
        assert_eq!(total, 10);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_bulk_helpers_emit_once() {
        let list = ObservableList::from_vec(vec!['A', 'B', 'C', 'D']);
        let deltas = record(&list);

        list.extend(vec!['E', 'F']);
        assert!(list.insert_all(1, vec!['x', 'y']));
        assert!(list.remove_all(&['x', 'y', 'q']));
        list.retain(|c| *c != 'A');

        assert_eq!(deltas.lock().len(), 4);
        assert_eq!(list.to_vec(), vec!['B', 'C', 'D', 'E', 'F']);
        assert!(!list.insert_all(10, vec!['z']));
    }

    #[test]
    fn test_observer_may_mutate_list_during_notification() {
        let list = Arc::new(ObservableList::from_vec(vec![1]));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&list);
        let seen_clone = seen.clone();
        list.changed().connect(move |delta: &ListDelta<i32>| {
            seen_clone.lock().push(delta.clone());
            if let Some(list) = weak.upgrade() {
                if list.len() < 3 {
                    list.push(99);
                }
            }
        });

        list.push(2);

        assert_eq!(list.to_vec(), vec![1, 2, 99]);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_section_is_clamped() {
        let list = ObservableList::from_vec(vec![0, 1, 2, 3]);
        assert_eq!(list.section(1, 2), vec![1, 2]);
        assert_eq!(list.section(2, 10), vec![2, 3]);
        assert!(list.section(5, 6).is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u8),
        Insert(usize, u8),
        Remove(u8),
        RemoveAt(usize),
        Set(usize, u8),
        MoveTo(u8, usize),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5).prop_map(Op::Push),
            (0usize..8, 0u8..5).prop_map(|(i, v)| Op::Insert(i, v)),
            (0u8..5).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::RemoveAt),
            (0usize..8, 0u8..5).prop_map(|(i, v)| Op::Set(i, v)),
            (0u8..5, 0usize..8).prop_map(|(v, i)| Op::MoveTo(v, i)),
            Just(Op::Clear),
        ]
    }

    fn apply_single(list: &ObservableList<u8>, op: &Op) {
        match *op {
            Op::Push(v) => list.push(v),
            Op::Insert(i, v) => {
                list.insert(i, v);
            }
            Op::Remove(v) => {
                list.remove(&v);
            }
            Op::RemoveAt(i) => {
                list.remove_at(i);
            }
            Op::Set(i, v) => {
                list.set(i, v);
            }
            Op::MoveTo(v, i) => {
                list.move_to(&v, i);
            }
            Op::Clear => list.clear(),
        }
    }

    fn apply_batched(items: &mut BatchList<'_, u8>, op: &Op) {
        match *op {
            Op::Push(v) => items.push(v),
            Op::Insert(i, v) => {
                items.insert(i, v);
            }
            Op::Remove(v) => {
                items.remove(&v);
            }
            Op::RemoveAt(i) => {
                items.remove_at(i);
            }
            Op::Set(i, v) => {
                items.set(i, v);
            }
            Op::MoveTo(v, i) => {
                items.move_to(&v, i);
            }
            Op::Clear => items.clear(),
        }
    }

    proptest! {
        #[test]
        fn prop_batch_matches_individual_ops(
            initial in proptest::collection::vec(0u8..5, 0..8),
            ops in proptest::collection::vec(op(), 0..12),
        ) {
            let single = ObservableList::from_vec(initial.clone());
            for op in &ops {
                apply_single(&single, op);
            }

            let batched = ObservableList::from_vec(initial.clone());
            let emitted = Arc::new(Mutex::new(Vec::new()));
            let emitted_clone = emitted.clone();
            batched.changed().connect(move |delta: &ListDelta<u8>| {
                emitted_clone.lock().push(delta.clone());
            });
            batched.batch(|items| {
                for op in &ops {
                    apply_batched(items, op);
                }
            });

            let final_items = batched.to_vec();
            prop_assert_eq!(&single.to_vec(), &final_items);

            let emitted = emitted.lock();
            prop_assert!(emitted.len() <= 1);
            match emitted.first() {
                Some(delta) => prop_assert_eq!(delta.apply_to(&initial), Some(final_items)),
                None => prop_assert_eq!(initial, final_items),
            }
        }
    }
}
