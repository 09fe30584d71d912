//! Change descriptions emitted by observable containers.
//!
//! # Index spaces
//!
//! A [`ListDelta`] relates two snapshots of a sequence, `old` and `new`:
//!
//! - `removed` is keyed by **old** index.
//! - `added` is keyed by **new** index.
//! - `moved` is keyed by **new** index and carries the **old** index.
//!
//! Elements that appear in none of the maps kept their relative order. They
//! fill the new positions not claimed by `added` or `moved`, in ascending old
//! index order. [`ListDelta::apply_to`] and [`ListDelta::map_index`] follow
//! exactly this rule.
//!
//! A key present in both `removed` and `added` describes an element replaced
//! in place. `added` and `moved` never share a key, and a `moved` source index
//! never appears in `removed`.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use crate::logging::ChangeSummary;

/// Added/removed/moved changes between two snapshots of an ordered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDelta<T> {
    /// Removed elements, keyed by their old index.
    pub removed: BTreeMap<usize, T>,
    /// Added elements, keyed by their new index.
    pub added: BTreeMap<usize, T>,
    /// Relocated elements: new index -> (old index, element).
    pub moved: BTreeMap<usize, (usize, T)>,
}

impl<T> Default for ListDelta<T> {
    fn default() -> Self {
        Self {
            removed: BTreeMap::new(),
            added: BTreeMap::new(),
            moved: BTreeMap::new(),
        }
    }
}

impl<T> ListDelta<T> {
    /// Creates an empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// A delta describing a single insertion.
    pub fn inserted(index: usize, element: T) -> Self {
        let mut delta = Self::new();
        delta.added.insert(index, element);
        delta
    }

    /// A delta describing a single removal.
    pub fn removed(index: usize, element: T) -> Self {
        let mut delta = Self::new();
        delta.removed.insert(index, element);
        delta
    }

    /// A delta describing an in-place replacement.
    pub fn replaced(index: usize, old: T, new: T) -> Self {
        let mut delta = Self::new();
        delta.removed.insert(index, old);
        delta.added.insert(index, new);
        delta
    }

    /// A delta describing a single relocation.
    pub fn relocated(from: usize, to: usize, element: T) -> Self {
        let mut delta = Self::new();
        delta.moved.insert(to, (from, element));
        delta
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.moved.is_empty()
    }

    /// Counts used in log lines.
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            removed: self.removed.len(),
            added: self.added.len(),
            moved: self.moved.len(),
        }
    }

    /// Size of the new snapshot given the size of the old one.
    pub fn new_len(&self, old_len: usize) -> usize {
        (old_len + self.added.len()).saturating_sub(self.removed.len())
    }

    /// Removed keys that were not re-added at the same position.
    pub fn true_removed(&self) -> BTreeSet<usize> {
        self.removed
            .keys()
            .filter(|index| !self.added.contains_key(index))
            .copied()
            .collect()
    }

    /// Added keys that do not replace a removed element at the same position.
    pub fn true_added(&self) -> BTreeSet<usize> {
        self.added
            .keys()
            .filter(|index| !self.removed.contains_key(index))
            .copied()
            .collect()
    }

    /// Positions whose content was replaced in place.
    pub fn edited(&self) -> BTreeSet<usize> {
        self.added
            .keys()
            .filter(|index| self.removed.contains_key(index))
            .copied()
            .collect()
    }

    /// Maps an index in the old snapshot to its index in the new one.
    ///
    /// Returns `None` if the element at `old_index` was removed.
    pub fn map_index(&self, old_index: usize) -> Option<usize> {
        if self.removed.contains_key(&old_index) {
            return None;
        }

        let sources: BTreeSet<usize> = self.moved.values().map(|(from, _)| *from).collect();

        if let Some((&to, _)) = self.moved.iter().find(|(_, (from, _))| *from == old_index) {
            return Some(to);
        }

        // Rank among the elements that kept their relative order.
        let rank = old_index
            - self.removed.range(..old_index).count()
            - sources.range(..old_index).count();

        // The rank-th new position not claimed by an addition or a move.
        let claimed: BTreeSet<usize> = self.added.keys().chain(self.moved.keys()).copied().collect();
        let mut position = rank;
        for &index in &claimed {
            if index <= position {
                position += 1;
            } else {
                break;
            }
        }
        Some(position)
    }
}

impl<T: Clone> ListDelta<T> {
    /// Replays this delta against `old`, producing the new snapshot.
    ///
    /// Returns `None` if the delta does not describe a change of `old`.
    pub fn apply_to(&self, old: &[T]) -> Option<Vec<T>> {
        if self.removed.keys().any(|&index| index >= old.len()) {
            return None;
        }

        let sources: BTreeSet<usize> = self.moved.values().map(|(from, _)| *from).collect();
        if sources.iter().any(|&from| from >= old.len() || self.removed.contains_key(&from)) {
            return None;
        }

        let mut survivors = old
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.removed.contains_key(index) && !sources.contains(index))
            .map(|(_, element)| element);

        let new_len = self.new_len(old.len());
        let mut result = Vec::with_capacity(new_len);
        for index in 0..new_len {
            let element = if let Some(element) = self.added.get(&index) {
                element
            } else if let Some((_, element)) = self.moved.get(&index) {
                element
            } else {
                survivors.next()?
            };
            result.push(element.clone());
        }

        if survivors.next().is_some() {
            return None;
        }
        Some(result)
    }
}

/// Added/removed changes between two snapshots of an unordered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDelta<T: Eq + Hash> {
    /// Elements no longer present.
    pub removed: HashSet<T>,
    /// Newly present elements.
    pub added: HashSet<T>,
}

impl<T: Eq + Hash> Default for SetDelta<T> {
    fn default() -> Self {
        Self {
            removed: HashSet::new(),
            added: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> SetDelta<T> {
    /// Symmetric difference of two snapshots.
    pub fn between(old: &HashSet<T>, new: &HashSet<T>) -> Self {
        Self {
            removed: old.difference(new).cloned().collect(),
            added: new.difference(old).cloned().collect(),
        }
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    /// Counts used in log lines.
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            removed: self.removed.len(),
            added: self.added.len(),
            moved: 0,
        }
    }

    /// Replays this delta against `old`.
    pub fn apply_to(&self, old: &HashSet<T>) -> HashSet<T> {
        old.iter()
            .filter(|element| !self.removed.contains(*element))
            .chain(self.added.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_index_after_removal() {
        let delta = ListDelta::removed(1, 'X');
        assert_eq!(delta.map_index(0), Some(0));
        assert_eq!(delta.map_index(1), None);
        assert_eq!(delta.map_index(3), Some(2));
    }

    #[test]
    fn test_map_index_after_insertion() {
        let delta = ListDelta::inserted(2, 'X');
        assert_eq!(delta.map_index(1), Some(1));
        assert_eq!(delta.map_index(2), Some(3));
        assert_eq!(delta.map_index(5), Some(6));
    }

    #[test]
    fn test_map_index_follows_moves() {
        // [A, B, C] -> [C, A, B]
        let delta = ListDelta::relocated(2, 0, 'C');
        assert_eq!(delta.map_index(0), Some(1));
        assert_eq!(delta.map_index(1), Some(2));
        assert_eq!(delta.map_index(2), Some(0));
    }

    #[test]
    fn test_apply_replays_mixed_delta() {
        let old = vec!['A', 'B', 'C'];
        let mut delta = ListDelta::removed(1, 'B');
        delta.added.insert(2, 'D');
        assert_eq!(delta.apply_to(&old), Some(vec!['A', 'C', 'D']));
    }

    #[test]
    fn test_apply_rejects_foreign_delta() {
        let old = vec!['A'];
        assert_eq!(ListDelta::removed(3, 'Z').apply_to(&old), None);
        assert_eq!(ListDelta::relocated(4, 0, 'Z').apply_to(&old), None);
    }

    #[test]
    fn test_edited_and_true_changes() {
        let mut delta = ListDelta::replaced(0, 'A', 'a');
        delta.removed.insert(3, 'D');
        delta.added.insert(5, 'F');

        assert_eq!(delta.edited().into_iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(delta.true_removed().into_iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!(delta.true_added().into_iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_set_delta_between() {
        let old: HashSet<_> = [1, 2, 3].into_iter().collect();
        let new: HashSet<_> = [2, 3, 4].into_iter().collect();
        let delta = SetDelta::between(&old, &new);

        assert_eq!(delta.removed, [1].into_iter().collect());
        assert_eq!(delta.added, [4].into_iter().collect());
        assert_eq!(delta.apply_to(&old), new);
    }
}
