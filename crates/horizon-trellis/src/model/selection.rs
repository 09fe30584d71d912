//! Selection model for item views.
//!
//! [`SelectionModel<K>`] tracks a set of selected keys (row indices for lists,
//! [`Path`]s for trees), the most recently touched key (the *last selection*)
//! and the pivot for range selection (the *anchor*).
//!
//! Adjacency is never stored in the model. Operations that need it take a
//! [`SelectionOrdering`] describing the keys of the current backing model.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::model::{IndexOrdering, SelectionMode, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.set_selection_mode(SelectionMode::ExtendedSelection);
//! let rows = IndexOrdering::new(10);
//!
//! selection.set_selection([2]);
//! selection.extend_next(&rows);
//! assert_eq!(selection.selected(), vec![2, 3]);
//! assert_eq!(selection.anchor(), Some(&2));
//! ```

use std::collections::BTreeSet;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ListDelta, Signal};

use super::tree::Path;
use crate::event::KeyboardModifiers;

/// Selection behavior mode for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No items can be selected.
    NoSelection,
    /// Only one item can be selected at a time (default).
    #[default]
    SingleSelection,
    /// Multiple items can be selected with Ctrl+click.
    MultiSelection,
    /// Range selection with Shift+click, extended by Ctrl+click.
    ExtendedSelection,
}

impl SelectionMode {
    fn allows_many(self) -> bool {
        matches!(self, Self::MultiSelection | Self::ExtendedSelection)
    }
}

/// Ordering of the valid keys of a backing model.
pub trait SelectionOrdering<K> {
    /// The first key, if the model is non-empty.
    fn first(&self) -> Option<K>;

    /// The last key, if the model is non-empty.
    fn last(&self) -> Option<K>;

    /// The key after `key`.
    fn next(&self, key: &K) -> Option<K>;

    /// The key before `key`.
    fn previous(&self, key: &K) -> Option<K>;

    /// Keys from `from` to `to` inclusive, walking in the direction of `to`.
    fn range(&self, from: &K, to: &K) -> Vec<K>;

    /// Every valid key in order.
    fn all(&self) -> Vec<K>;
}

/// [`SelectionOrdering`] over the row indices `0..len` of a flat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOrdering {
    len: usize,
}

impl IndexOrdering {
    /// Ordering over `0..len`.
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl SelectionOrdering<usize> for IndexOrdering {
    fn first(&self) -> Option<usize> {
        (self.len > 0).then_some(0)
    }

    fn last(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    fn next(&self, key: &usize) -> Option<usize> {
        let next = key + 1;
        (next < self.len).then_some(next)
    }

    fn previous(&self, key: &usize) -> Option<usize> {
        key.checked_sub(1).filter(|k| *k < self.len)
    }

    fn range(&self, from: &usize, to: &usize) -> Vec<usize> {
        let (from, to) = (*from, *to);
        if from >= self.len || to >= self.len {
            return Vec::new();
        }
        if from <= to {
            (from..=to).collect()
        } else {
            (to..=from).rev().collect()
        }
    }

    fn all(&self) -> Vec<usize> {
        (0..self.len).collect()
    }
}

/// Manages selection state for item views.
///
/// # Signals
///
/// - `selection_changed`: Emitted when the selected set changes, with
///   `(selected, deselected)` keys in ascending order.
pub struct SelectionModel<K> {
    mode: SelectionMode,
    selected: BTreeSet<K>,
    anchor: Option<K>,
    last_selection: Option<K>,

    /// Emitted when selection changes. Args: (selected, deselected)
    pub selection_changed: Signal<(Vec<K>, Vec<K>)>,
}

impl<K> Default for SelectionModel<K>
where
    K: Ord + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SelectionModel<K>
where
    K: Ord + Clone + Send + Sync + 'static,
{
    /// Creates an empty selection in single-selection mode.
    pub fn new() -> Self {
        Self {
            mode: SelectionMode::default(),
            selected: BTreeSet::new(),
            anchor: None,
            last_selection: None,
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Selection Mode
    // =========================================================================

    /// Gets the current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// Switching to a more restrictive mode trims the current selection:
    /// `NoSelection` clears it, `SingleSelection` keeps only the last
    /// selection (or the first key if there is none).
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::NoSelection => {
                self.clear();
            }
            SelectionMode::SingleSelection if self.selected.len() > 1 => {
                let keep = self
                    .last_selection
                    .clone()
                    .filter(|k| self.selected.contains(k))
                    .or_else(|| self.selected.first().cloned());
                if let Some(keep) = keep {
                    self.set_selection([keep]);
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks if `key` is selected.
    pub fn contains(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Returns the selected keys in ascending order.
    pub fn selected(&self) -> Vec<K> {
        self.selected.iter().cloned().collect()
    }

    /// Iterates the selected keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }

    /// Returns the number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The range-selection pivot.
    pub fn anchor(&self) -> Option<&K> {
        self.anchor.as_ref()
    }

    /// The most recently touched key.
    pub fn last_selection(&self) -> Option<&K> {
        self.last_selection.as_ref()
    }

    /// The smallest selected key.
    pub fn first_selected(&self) -> Option<&K> {
        self.selected.first()
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Adds `keys` to the selection.
    ///
    /// The last key becomes the last selection. The anchor is only set if
    /// there was none. Returns true if the selection changed.
    pub fn select(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        if self.mode == SelectionMode::NoSelection {
            return false;
        }
        let keys: Vec<K> = keys.into_iter().collect();
        let Some(last) = keys.last().cloned() else {
            return false;
        };
        if !self.mode.allows_many() {
            return self.set_selection([last]);
        }

        let mut next = self.selected.clone();
        next.extend(keys);
        let anchor = self.anchor.clone().or_else(|| Some(last.clone()));
        self.commit(next, anchor, Some(last))
    }

    /// Toggles the membership of each key without touching the anchor.
    pub fn toggle(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        if self.mode == SelectionMode::NoSelection {
            return false;
        }
        let mut next = self.selected.clone();
        let mut last = None;
        for key in keys {
            if !next.remove(&key) {
                if !self.mode.allows_many() {
                    next.clear();
                }
                next.insert(key.clone());
            }
            last = Some(key);
        }
        if last.is_none() {
            return false;
        }
        self.commit(next, self.anchor.clone(), last)
    }

    /// Replaces the whole selection with `keys`.
    ///
    /// The first key becomes the anchor and the last key the last selection,
    /// so a range passed from anchor to target keeps its pivot. An empty
    /// `keys` clears the selection.
    pub fn set_selection(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        if self.mode == SelectionMode::NoSelection {
            return false;
        }
        let keys: Vec<K> = keys.into_iter().collect();
        let (Some(first), Some(last)) = (keys.first().cloned(), keys.last().cloned()) else {
            return self.clear();
        };
        if !self.mode.allows_many() {
            return self.commit(BTreeSet::from([last.clone()]), Some(last.clone()), Some(last));
        }
        self.commit(keys.into_iter().collect(), Some(first), Some(last))
    }

    /// Removes `keys` from the selection.
    pub fn remove(&mut self, keys: impl IntoIterator<Item = K>) -> bool {
        let mut next = self.selected.clone();
        for key in keys {
            next.remove(&key);
        }
        self.commit(next, self.anchor.clone(), self.last_selection.clone())
    }

    /// Selects every key of `ordering`.
    ///
    /// Ignored outside multi and extended modes.
    pub fn select_all(&mut self, ordering: &impl SelectionOrdering<K>) -> bool {
        if !self.mode.allows_many() {
            tracing::debug!(target: targets::SELECTION, mode = ?self.mode, "select_all ignored");
            return false;
        }
        let all = ordering.all();
        let anchor = self.anchor.clone().or_else(|| all.first().cloned());
        let last = self.last_selection.clone().or_else(|| all.last().cloned());
        self.commit(all.into_iter().collect(), anchor, last)
    }

    /// Clears the selection, the anchor and the last selection.
    pub fn clear(&mut self) -> bool {
        self.commit(BTreeSet::new(), None, None)
    }

    // =========================================================================
    // Range and Keyboard Navigation
    // =========================================================================

    /// Selects the range from the anchor to `target`, replacing the selection.
    ///
    /// Without an anchor (or outside extended mode) this selects `target`
    /// alone. Returns false if nothing changed.
    pub fn extend_to(&mut self, target: K, ordering: &impl SelectionOrdering<K>) -> bool {
        let anchor = match (&self.anchor, self.mode) {
            (Some(anchor), SelectionMode::ExtendedSelection) => anchor.clone(),
            _ => return self.set_selection([target]),
        };
        let range = ordering.range(&anchor, &target);
        if range.is_empty() {
            tracing::debug!(target: targets::SELECTION, "anchor or target outside ordering");
            return false;
        }
        self.set_selection(range)
    }

    /// Shift+Down: extends the range from the anchor to the key after the
    /// last selection.
    ///
    /// Returns false without an anchor or at the end of the ordering.
    pub fn extend_next(&mut self, ordering: &impl SelectionOrdering<K>) -> bool {
        self.extend_by(ordering, |ordering, key| ordering.next(key))
    }

    /// Shift+Up: extends the range from the anchor to the key before the
    /// last selection.
    pub fn extend_previous(&mut self, ordering: &impl SelectionOrdering<K>) -> bool {
        self.extend_by(ordering, |ordering, key| ordering.previous(key))
    }

    fn extend_by<O: SelectionOrdering<K>>(
        &mut self,
        ordering: &O,
        step: impl Fn(&O, &K) -> Option<K>,
    ) -> bool {
        if self.anchor.is_none() {
            return false;
        }
        let Some(target) = self.last_selection.as_ref().and_then(|last| step(ordering, last)) else {
            return false;
        };
        self.extend_to(target, ordering)
    }

    /// Down: selects the key after the last selection (or the first key).
    pub fn move_next(&mut self, ordering: &impl SelectionOrdering<K>) -> bool {
        let target = match &self.last_selection {
            Some(last) => ordering.next(last),
            None => ordering.first(),
        };
        target.is_some_and(|target| self.set_selection([target]))
    }

    /// Up: selects the key before the last selection (or the last key).
    pub fn move_previous(&mut self, ordering: &impl SelectionOrdering<K>) -> bool {
        let target = match &self.last_selection {
            Some(last) => ordering.previous(last),
            None => ordering.last(),
        };
        target.is_some_and(|target| self.set_selection([target]))
    }

    /// Applies a pointer click on `key`.
    ///
    /// - Ctrl or Meta toggles `key` (multi and extended modes).
    /// - Shift, when there is a last selection, selects the range from the
    ///   anchor to `key` (extended mode).
    /// - Anything else replaces the selection with `key`.
    pub fn apply_click(
        &mut self,
        key: K,
        modifiers: KeyboardModifiers,
        ordering: &impl SelectionOrdering<K>,
    ) -> bool {
        if modifiers.toggles() && self.mode.allows_many() {
            self.toggle([key])
        } else if modifiers.shift
            && self.mode == SelectionMode::ExtendedSelection
            && self.last_selection.is_some()
        {
            self.extend_to(key, ordering)
        } else {
            self.set_selection([key])
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Re-keys the selection after a model change.
    ///
    /// `remap` returns the new key for an old one, or `None` if the keyed
    /// item no longer exists. Keys for which `valid` returns false are
    /// dropped as well. Anchor and last selection follow the same mapping.
    pub fn reconcile_with(
        &mut self,
        remap: impl Fn(&K) -> Option<K>,
        valid: impl Fn(&K) -> bool,
    ) -> bool {
        let map = |key: &K| remap(key).filter(|k| valid(k));
        let next: BTreeSet<K> = self.selected.iter().filter_map(&map).collect();
        let anchor = self.anchor.as_ref().and_then(&map);
        let last = self.last_selection.as_ref().and_then(&map);
        self.commit(next, anchor, last)
    }

    fn commit(&mut self, next: BTreeSet<K>, anchor: Option<K>, last: Option<K>) -> bool {
        self.anchor = anchor;
        self.last_selection = last;

        if next == self.selected {
            return false;
        }

        let selected: Vec<K> = next.difference(&self.selected).cloned().collect();
        let deselected: Vec<K> = self.selected.difference(&next).cloned().collect();
        self.selected = next;

        tracing::trace!(
            target: targets::SELECTION,
            selected = selected.len(),
            deselected = deselected.len(),
            "selection changed"
        );
        self.selection_changed.emit((selected, deselected));
        true
    }
}

impl SelectionModel<usize> {
    /// Reconciles row-index keys against a list delta.
    ///
    /// Each key follows [`ListDelta::map_index`]; removed rows are dropped,
    /// as is anything at or beyond `new_len`.
    pub fn reconcile<T>(&mut self, delta: &ListDelta<T>, new_len: usize) -> bool {
        self.reconcile_with(|row| delta.map_index(*row), |row| *row < new_len)
    }
}

impl SelectionModel<Path> {
    /// Reconciles path keys after the children of `parent` changed.
    ///
    /// Paths outside `parent` are untouched. Paths through a removed child
    /// are dropped together with their descendants.
    pub fn reconcile_children<T>(&mut self, parent: &Path, delta: &ListDelta<T>) -> bool {
        self.reconcile_with(|path| path.remapped(parent, delta), |_| true)
    }
}

static_assertions::assert_impl_all!(SelectionModel<usize>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn extended() -> SelectionModel<usize> {
        let mut model = SelectionModel::new();
        model.set_selection_mode(SelectionMode::ExtendedSelection);
        model
    }

    #[test]
    fn test_selection_model_creation() {
        let model = SelectionModel::<usize>::new();
        assert_eq!(model.selection_mode(), SelectionMode::SingleSelection);
        assert!(model.is_empty());
        assert_eq!(model.anchor(), None);
    }

    #[test]
    fn test_single_selection_keeps_last() {
        let mut model = SelectionModel::new();
        model.select([1, 4]);
        assert_eq!(model.selected(), vec![4]);

        model.toggle([2]);
        assert_eq!(model.selected(), vec![2]);
        assert_eq!(model.last_selection(), Some(&2));
    }

    #[test]
    fn test_no_selection_mode() {
        let mut model = SelectionModel::new();
        model.set_selection_mode(SelectionMode::NoSelection);
        assert!(!model.select([0]));
        assert!(!model.set_selection([0]));
        assert!(model.is_empty());
    }

    #[test]
    fn test_switching_to_no_selection_clears() {
        let mut model = extended();
        model.set_selection([1, 2, 3]);

        model.set_selection_mode(SelectionMode::NoSelection);
        assert!(model.is_empty());
        assert_eq!(model.anchor(), None);
    }

    #[test]
    fn test_switching_to_single_keeps_last_selection() {
        let mut model = extended();
        model.set_selection([1, 2]);
        model.select([5]);

        model.set_selection_mode(SelectionMode::SingleSelection);
        assert_eq!(model.selected(), vec![5]);
    }

    #[test]
    fn test_select_sets_anchor_only_once() {
        let mut model = extended();
        model.select([3]);
        model.select([5]);
        assert_eq!(model.selected(), vec![3, 5]);
        assert_eq!(model.anchor(), Some(&3));
        assert_eq!(model.last_selection(), Some(&5));
    }

    #[test]
    fn test_toggle_leaves_anchor() {
        let mut model = extended();
        model.set_selection([2]);
        model.toggle([7]);
        model.toggle([2]);
        assert_eq!(model.selected(), vec![7]);
        assert_eq!(model.anchor(), Some(&2));
        assert_eq!(model.last_selection(), Some(&2));
    }

    #[test]
    fn test_shift_extend_next() {
        let rows = IndexOrdering::new(10);
        let mut model = extended();
        model.set_selection([2]);
        assert_eq!(model.anchor(), Some(&2));

        assert!(model.extend_next(&rows));
        assert_eq!(model.selected(), vec![2, 3]);
        assert_eq!(model.anchor(), Some(&2));
        assert_eq!(model.last_selection(), Some(&3));
    }

    #[test]
    fn test_extend_recomputes_from_anchor() {
        let rows = IndexOrdering::new(10);
        let mut model = extended();
        model.set_selection([5]);

        model.extend_next(&rows);
        model.extend_next(&rows);
        assert_eq!(model.selected(), vec![5, 6, 7]);

        model.extend_previous(&rows);
        model.extend_previous(&rows);
        model.extend_previous(&rows);
        assert_eq!(model.selected(), vec![4, 5]);
        assert_eq!(model.last_selection(), Some(&4));
        assert_eq!(model.anchor(), Some(&5));
    }

    #[test]
    fn test_extend_without_anchor_or_at_edge() {
        let rows = IndexOrdering::new(3);
        let mut model = extended();
        assert!(!model.extend_next(&rows));

        model.set_selection([2]);
        assert!(!model.extend_next(&rows));
        assert_eq!(model.selected(), vec![2]);
    }

    #[test]
    fn test_move_next_and_previous() {
        let rows = IndexOrdering::new(3);
        let mut model = extended();

        assert!(model.move_next(&rows));
        assert_eq!(model.selected(), vec![0]);
        assert!(model.move_next(&rows));
        assert!(model.move_next(&rows));
        assert!(!model.move_next(&rows));
        assert_eq!(model.selected(), vec![2]);
        assert_eq!(model.anchor(), Some(&2));

        assert!(model.move_previous(&rows));
        assert_eq!(model.selected(), vec![1]);
    }

    #[test]
    fn test_click_semantics() {
        let rows = IndexOrdering::new(10);
        let mut model = extended();

        model.apply_click(6, KeyboardModifiers::NONE, &rows);
        assert_eq!(model.selected(), vec![6]);

        model.apply_click(3, KeyboardModifiers::SHIFT, &rows);
        assert_eq!(model.selected(), vec![3, 4, 5, 6]);
        assert_eq!(model.anchor(), Some(&6));
        assert_eq!(model.last_selection(), Some(&3));

        model.apply_click(8, KeyboardModifiers::CTRL, &rows);
        assert_eq!(model.selected(), vec![3, 4, 5, 6, 8]);

        model.apply_click(4, KeyboardModifiers::META, &rows);
        assert_eq!(model.selected(), vec![3, 5, 6, 8]);
        assert_eq!(model.anchor(), Some(&6));

        model.apply_click(1, KeyboardModifiers::NONE, &rows);
        assert_eq!(model.selected(), vec![1]);
        assert_eq!(model.anchor(), Some(&1));
    }

    #[test]
    fn test_shift_click_without_last_selection_selects_target() {
        let rows = IndexOrdering::new(5);
        let mut model = extended();
        model.apply_click(3, KeyboardModifiers::SHIFT, &rows);
        assert_eq!(model.selected(), vec![3]);
        assert_eq!(model.anchor(), Some(&3));
    }

    #[test]
    fn test_select_all_respects_mode() {
        let rows = IndexOrdering::new(4);
        let mut model = SelectionModel::new();
        assert!(!model.select_all(&rows));

        model.set_selection_mode(SelectionMode::MultiSelection);
        assert!(model.select_all(&rows));
        assert_eq!(model.len(), 4);

        model.set_selection_mode(SelectionMode::SingleSelection);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_clear_resets_anchor() {
        let mut model = extended();
        model.set_selection([1, 2]);
        assert!(model.clear());
        assert_eq!(model.anchor(), None);
        assert_eq!(model.last_selection(), None);
        assert!(!model.clear());
    }

    #[test]
    fn test_selection_signal() {
        let mut model = extended();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let changes_clone = changes.clone();
        model.selection_changed.connect(move |(selected, deselected)| {
            changes_clone.lock().push((selected.clone(), deselected.clone()));
        });

        model.set_selection([1, 2]);
        model.set_selection([2, 3]);
        model.set_selection([3, 2]);

        assert_eq!(
            *changes.lock(),
            vec![(vec![1, 2], vec![]), (vec![3], vec![1])]
        );
    }

    #[test]
    fn test_reconcile_drops_removed_and_shifts() {
        let mut model = extended();
        model.set_selection([1, 3]);

        let delta = ListDelta::removed(1, 'X');
        assert!(model.reconcile(&delta, 4));

        assert_eq!(model.selected(), vec![2]);
        assert_eq!(model.anchor(), None);
        assert_eq!(model.last_selection(), Some(&2));
    }

    #[test]
    fn test_reconcile_insert_and_move() {
        let mut model = extended();
        model.set_selection([0, 2]);

        model.reconcile(&ListDelta::inserted(1, 'X'), 5);
        assert_eq!(model.selected(), vec![0, 3]);

        // [a, x, b, c] -> [c, a, x, b]
        model.reconcile(&ListDelta::relocated(3, 0, 'c'), 4);
        assert_eq!(model.selected(), vec![0, 1]);
        assert_eq!(model.last_selection(), Some(&0));
    }

    #[test]
    fn test_reconcile_tree_paths() {
        let mut model = SelectionModel::new();
        model.set_selection_mode(SelectionMode::MultiSelection);
        model.set_selection([
            Path::from([0]),
            Path::from([0, 1]),
            Path::from([0, 1, 4]),
            Path::from([0, 2]),
            Path::from([1, 0]),
        ]);

        let delta = ListDelta::removed(1, "gone");
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        model.selection_changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        model.reconcile_children(&Path::from([0]), &delta);

        assert_eq!(
            model.selected(),
            vec![Path::from([0]), Path::from([0, 1]), Path::from([1, 0])]
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    proptest! {
        #[test]
        fn prop_selection_stays_within_model(
            initial_len in 0usize..12,
            picks in proptest::collection::vec(0usize..12, 0..6),
            edits in proptest::collection::vec((any::<bool>(), 0usize..12), 0..8),
        ) {
            use horizon_trellis_core::ObservableList;

            let list = ObservableList::from_vec((0..initial_len).collect::<Vec<_>>());
            let deltas = Arc::new(Mutex::new(Vec::new()));
            let deltas_clone = deltas.clone();
            list.changed().connect(move |delta: &ListDelta<usize>| {
                deltas_clone.lock().push(delta.clone());
            });

            let mut model = SelectionModel::new();
            model.set_selection_mode(SelectionMode::MultiSelection);
            model.select(picks.into_iter().filter(|p| *p < initial_len));

            let mut next_value = 100;
            for (insert, index) in edits {
                let before = list.to_vec();
                if insert {
                    list.insert(index.min(list.len()), next_value);
                    next_value += 1;
                } else {
                    list.remove_at(index);
                }

                let mut selected_values: Vec<usize> =
                    model.iter().map(|row| before[*row]).collect();
                for delta in deltas.lock().drain(..) {
                    model.reconcile(&delta, list.len());
                }

                let after = list.to_vec();
                for row in model.iter() {
                    prop_assert!(*row < after.len());
                }
                let mut remapped: Vec<usize> = model.iter().map(|row| after[*row]).collect();
                selected_values.retain(|value| after.contains(value));
                selected_values.sort_unstable();
                remapped.sort_unstable();
                prop_assert_eq!(remapped, selected_values);
            }
        }
    }
}
