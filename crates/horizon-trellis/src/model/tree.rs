//! Hierarchical tree model and its flattened row view.
//!
//! Nodes are addressed by [`Path`]: the sequence of child indices leading
//! from the root. The root itself is the empty path. Paths order in
//! pre-order, so sorting paths sorts them the way a tree view lists rows.
//!
//! [`TreeModel`] owns the nodes and reports each change to a node's children
//! as `(parent path, ListDelta)`. [`TreeRows`] holds the per-view state
//! (root visibility, expanded nodes) and maps between rows and paths.

use std::collections::BTreeSet;
use std::fmt;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ListDelta, Signal, diff};
use parking_lot::RwLock;

use super::selection::SelectionOrdering;

// =============================================================================
// Path
// =============================================================================

/// Structural key of a tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The child indices, outermost first.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Index of this node within its parent.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Child index taken at `depth`.
    pub fn index_at(&self, depth: usize) -> Option<usize> {
        self.0.get(depth).copied()
    }

    /// A copy of this path with the index at `depth` replaced.
    pub fn with_index_at(&self, depth: usize, index: usize) -> Self {
        let mut indices = self.0.clone();
        if let Some(slot) = indices.get_mut(depth) {
            *slot = index;
        }
        Self(indices)
    }

    /// Returns true if `other` is a strict descendant of this path.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// Where this path points after the children of `parent` changed by
    /// `delta`.
    ///
    /// Paths outside `parent` are returned unchanged. `None` means the path
    /// ran through a removed child.
    pub fn remapped<T>(&self, parent: &Path, delta: &ListDelta<T>) -> Option<Path> {
        if !parent.is_ancestor_of(self) {
            return Some(self.clone());
        }
        let depth = parent.depth();
        let index = self.index_at(depth)?;
        let mapped = delta.map_index(index)?;
        Some(self.with_index_at(depth, mapped))
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// A value with ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    /// The node's value.
    pub value: T,
    /// Child nodes in order.
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// A node without children.
    pub fn leaf(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// Builder-style: appends a child.
    pub fn with_child(mut self, child: TreeNode<T>) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style: appends several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode<T>>) -> Self {
        self.children.extend(children);
        self
    }

    fn node(&self, path: &Path) -> Option<&TreeNode<T>> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    fn node_mut(&mut self, path: &Path) -> Option<&mut TreeNode<T>> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    fn collect_paths(&self, path: Path, out: &mut Vec<Path>) {
        for (index, child) in self.children.iter().enumerate() {
            let child_path = path.child(index);
            out.push(child_path.clone());
            child.collect_paths(child_path, out);
        }
    }
}

// =============================================================================
// TreeModel
// =============================================================================

/// A hierarchical model with per-parent change notification.
///
/// # Signals
///
/// - `children_changed`: `(parent, delta)` after the children of `parent`
///   changed. Delta keys are child indices under `parent`.
pub struct TreeModel<T> {
    root: RwLock<TreeNode<T>>,

    /// Emitted when a node's children change. Args: (parent path, delta)
    pub children_changed: Signal<(Path, ListDelta<T>)>,
}

impl<T> TreeModel<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a model holding `root`.
    pub fn new(root: TreeNode<T>) -> Self {
        Self {
            root: RwLock::new(root),
            children_changed: Signal::new(),
        }
    }

    /// Value at `path`.
    pub fn get(&self, path: &Path) -> Option<T> {
        self.root.read().node(path).map(|node| node.value.clone())
    }

    /// Returns true if `path` addresses a node.
    pub fn contains(&self, path: &Path) -> bool {
        self.root.read().node(path).is_some()
    }

    /// Number of children under `path`, or `None` if it addresses nothing.
    pub fn child_count(&self, path: &Path) -> Option<usize> {
        self.root.read().node(path).map(|node| node.children.len())
    }

    /// Returns true if the node at `path` has no children.
    pub fn is_leaf(&self, path: &Path) -> bool {
        self.child_count(path) == Some(0)
    }

    /// Paths of every node below the root, in pre-order.
    pub fn descendants(&self) -> Vec<Path> {
        let mut out = Vec::new();
        self.root.read().collect_paths(Path::root(), &mut out);
        out
    }

    /// Runs `f` with read access to the node at `path`.
    pub fn with_node<R>(&self, path: &Path, f: impl FnOnce(&TreeNode<T>) -> R) -> Option<R> {
        self.root.read().node(path).map(f)
    }

    /// Inserts `node` as the `index`-th child of `parent`.
    pub fn insert(&self, parent: &Path, index: usize, node: TreeNode<T>) -> bool {
        let value = {
            let mut root = self.root.write();
            let Some(parent_node) = root.node_mut(parent) else {
                return false;
            };
            if index > parent_node.children.len() {
                tracing::debug!(target: targets::LIST, %parent, index, "tree insert out of range");
                return false;
            }
            let value = node.value.clone();
            parent_node.children.insert(index, node);
            value
        };
        self.notify(parent.clone(), ListDelta::inserted(index, value));
        true
    }

    /// Appends `node` as the last child of `parent`.
    pub fn push(&self, parent: &Path, node: TreeNode<T>) -> bool {
        match self.child_count(parent) {
            Some(count) => self.insert(parent, count, node),
            None => false,
        }
    }

    /// Removes the node at `path` with its subtree.
    ///
    /// The root cannot be removed.
    pub fn remove(&self, path: &Path) -> Option<TreeNode<T>> {
        let (parent, index) = (path.parent()?, path.last()?);
        let removed = {
            let mut root = self.root.write();
            let parent_node = root.node_mut(&parent)?;
            if index >= parent_node.children.len() {
                return None;
            }
            parent_node.children.remove(index)
        };
        self.notify(parent, ListDelta::removed(index, removed.value.clone()));
        Some(removed)
    }

    /// Replaces the value at `path`, keeping its children.
    ///
    /// Returns the previous value. The root value cannot be replaced; build a
    /// new model instead.
    pub fn set(&self, path: &Path, value: T) -> Option<T> {
        let (parent, index) = (path.parent()?, path.last()?);
        let (previous, changed) = {
            let mut root = self.root.write();
            let node = root.node_mut(path)?;
            let previous = std::mem::replace(&mut node.value, value.clone());
            let changed = previous != value;
            (previous, changed)
        };
        if changed {
            self.notify(parent, ListDelta::replaced(index, previous.clone(), value));
        }
        Some(previous)
    }

    /// Replaces all children of `parent`, reporting the net change as one
    /// delta over the child values.
    ///
    /// Children are compared with their subtrees, so a child whose value is
    /// unchanged but whose descendants differ is reported as replaced in
    /// place.
    pub fn replace_children(&self, parent: &Path, children: Vec<TreeNode<T>>) -> bool {
        let delta = {
            let mut root = self.root.write();
            let Some(parent_node) = root.node_mut(parent) else {
                return false;
            };
            let old = std::mem::replace(&mut parent_node.children, children);
            node_values(diff(&old, &parent_node.children))
        };
        if !delta.is_empty() {
            self.notify(parent.clone(), delta);
        }
        true
    }

    fn notify(&self, parent: Path, delta: ListDelta<T>) {
        tracing::trace!(target: targets::LIST, %parent, changes = %delta.summary(), "tree children changed");
        self.children_changed.emit((parent, delta));
    }
}

fn node_values<T>(delta: ListDelta<TreeNode<T>>) -> ListDelta<T> {
    ListDelta {
        removed: delta.removed.into_iter().map(|(i, node)| (i, node.value)).collect(),
        added: delta.added.into_iter().map(|(i, node)| (i, node.value)).collect(),
        moved: delta
            .moved
            .into_iter()
            .map(|(i, (from, node))| (i, (from, node.value)))
            .collect(),
    }
}

static_assertions::assert_impl_all!(TreeModel<String>: Send, Sync);

// =============================================================================
// TreeRows
// =============================================================================

/// Row flattening state for a tree view.
///
/// The root is hidden by default and is always treated as expanded, so its
/// children are the top-level rows.
#[derive(Debug, Clone, Default)]
pub struct TreeRows {
    root_visible: bool,
    expanded: BTreeSet<Path>,
}

impl TreeRows {
    /// Rows with a hidden root and nothing expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the root occupies row 0.
    pub fn root_visible(&self) -> bool {
        self.root_visible
    }

    /// Shows or hides the root row.
    pub fn set_root_visible(&mut self, visible: bool) {
        self.root_visible = visible;
    }

    /// Returns true if the node at `path` shows its children.
    pub fn is_expanded(&self, path: &Path) -> bool {
        path.is_root() || self.expanded.contains(path)
    }

    /// Expands `path`. Returns false if it was already expanded.
    pub fn expand(&mut self, path: Path) -> bool {
        !path.is_root() && self.expanded.insert(path)
    }

    /// Collapses `path`. Returns false if it was not expanded.
    pub fn collapse(&mut self, path: &Path) -> bool {
        self.expanded.remove(path)
    }

    /// Expands the node shown at `row`.
    pub fn expand_row<T>(&mut self, model: &TreeModel<T>, row: usize) -> bool
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        match self.path_for_row(model, row) {
            Some(path) => self.expand(path),
            None => false,
        }
    }

    /// Collapses the node shown at `row`.
    pub fn collapse_row<T>(&mut self, model: &TreeModel<T>, row: usize) -> bool
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        match self.path_for_row(model, row) {
            Some(path) => self.collapse(&path),
            None => false,
        }
    }

    /// Expands every node that has children.
    pub fn expand_all<T>(&mut self, model: &TreeModel<T>)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        for path in model.descendants() {
            if !model.is_leaf(&path) {
                self.expanded.insert(path);
            }
        }
    }

    /// Collapses everything.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Paths of the visible rows, in row order.
    pub fn visible_paths<T>(&self, model: &TreeModel<T>) -> Vec<Path>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let mut rows = Vec::new();
        if self.root_visible {
            rows.push(Path::root());
        }
        model.with_node(&Path::root(), |root| {
            self.collect_visible(root, Path::root(), &mut rows);
        });
        rows
    }

    fn collect_visible<T>(&self, node: &TreeNode<T>, path: Path, rows: &mut Vec<Path>) {
        if !self.is_expanded(&path) {
            return;
        }
        for (index, child) in node.children.iter().enumerate() {
            let child_path = path.child(index);
            rows.push(child_path.clone());
            self.collect_visible(child, child_path, rows);
        }
    }

    /// Number of visible rows.
    pub fn row_count<T>(&self, model: &TreeModel<T>) -> usize
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.visible_paths(model).len()
    }

    /// Path shown at `row`.
    pub fn path_for_row<T>(&self, model: &TreeModel<T>, row: usize) -> Option<Path>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.visible_paths(model).into_iter().nth(row)
    }

    /// Row showing `path`, or `None` if it is hidden under a collapsed node.
    pub fn row_for_path<T>(&self, model: &TreeModel<T>, path: &Path) -> Option<usize>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.visible_paths(model).binary_search(path).ok()
    }

    /// Value shown at `row`.
    pub fn value_at_row<T>(&self, model: &TreeModel<T>, row: usize) -> Option<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        model.get(&self.path_for_row(model, row)?)
    }

    /// Snapshot of the visible rows usable as a selection ordering.
    pub fn ordering<T>(&self, model: &TreeModel<T>) -> TreeOrdering
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        TreeOrdering {
            paths: self.visible_paths(model),
        }
    }

    /// Re-keys expanded paths after the children of `parent` changed.
    ///
    /// Expanded nodes under a removed child are forgotten.
    pub fn reconcile_children<T>(&mut self, parent: &Path, delta: &ListDelta<T>) {
        self.expanded = std::mem::take(&mut self.expanded)
            .into_iter()
            .filter_map(|path| path.remapped(parent, delta))
            .collect();
    }
}

/// Visible tree rows in order, as a [`SelectionOrdering`] over paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOrdering {
    paths: Vec<Path>,
}

impl TreeOrdering {
    fn position(&self, path: &Path) -> Option<usize> {
        self.paths.binary_search(path).ok()
    }
}

impl SelectionOrdering<Path> for TreeOrdering {
    fn first(&self) -> Option<Path> {
        self.paths.first().cloned()
    }

    fn last(&self) -> Option<Path> {
        self.paths.last().cloned()
    }

    fn next(&self, key: &Path) -> Option<Path> {
        self.paths.get(self.position(key)? + 1).cloned()
    }

    fn previous(&self, key: &Path) -> Option<Path> {
        let row = self.position(key)?.checked_sub(1)?;
        self.paths.get(row).cloned()
    }

    fn range(&self, from: &Path, to: &Path) -> Vec<Path> {
        let (Some(from), Some(to)) = (self.position(from), self.position(to)) else {
            return Vec::new();
        };
        if from <= to {
            self.paths[from..=to].to_vec()
        } else {
            self.paths[to..=from].iter().rev().cloned().collect()
        }
    }

    fn all(&self) -> Vec<Path> {
        self.paths.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SelectionMode, SelectionModel};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn numbers() -> TreeModel<i32> {
        TreeModel::new(
            TreeNode::leaf(11)
                .with_child(TreeNode::leaf(105))
                .with_child(TreeNode::leaf(-24).with_child(TreeNode::leaf(33)))
                .with_child(TreeNode::leaf(0)),
        )
    }

    fn names() -> TreeModel<&'static str> {
        TreeModel::new(TreeNode::leaf("root").with_children([
            TreeNode::leaf("child1")
                .with_child(TreeNode::leaf("child1_1"))
                .with_child(TreeNode::leaf("child1_2")),
            TreeNode::leaf("child2").with_child(TreeNode::leaf("child2_1")),
            TreeNode::leaf("child3"),
        ]))
    }

    #[test]
    fn test_path_ordering_is_pre_order() {
        let mut paths = vec![
            Path::from([1]),
            Path::from([0, 1]),
            Path::root(),
            Path::from([0]),
            Path::from([0, 0]),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![
                Path::root(),
                Path::from([0]),
                Path::from([0, 0]),
                Path::from([0, 1]),
                Path::from([1]),
            ]
        );
        assert_eq!(Path::from([2, 0]).to_string(), "/2/0");
        assert!(Path::from([2]).is_ancestor_of(&Path::from([2, 0])));
        assert!(!Path::from([2]).is_ancestor_of(&Path::from([2])));
    }

    #[test]
    fn test_path_remapped_through_delta() {
        let parent = Path::from([1]);
        let inserted = ListDelta::inserted(0, 'x');
        assert_eq!(Path::from([1, 0, 2]).remapped(&parent, &inserted), Some(Path::from([1, 1, 2])));
        assert_eq!(Path::from([1]).remapped(&parent, &inserted), Some(Path::from([1])));
        assert_eq!(Path::from([0, 5]).remapped(&parent, &inserted), Some(Path::from([0, 5])));

        let removed = ListDelta::removed(0, 'x');
        assert_eq!(Path::from([1, 0, 2]).remapped(&parent, &removed), None);
    }

    #[test]
    fn test_root_defaults_to_hidden() {
        let rows = TreeRows::new();
        assert!(!rows.root_visible());
    }

    #[test]
    fn test_row_count_with_and_without_root() {
        let model = TreeModel::new(
            TreeNode::leaf(0).with_children([TreeNode::leaf(1), TreeNode::leaf(2), TreeNode::leaf(3)]),
        );
        let mut rows = TreeRows::new();
        assert_eq!(rows.row_count(&model), 3);
        assert_eq!(rows.path_for_row(&model, 2), Some(Path::from([2])));

        rows.set_root_visible(true);
        assert_eq!(rows.row_count(&model), 4);
        assert_eq!(rows.path_for_row(&model, 0), Some(Path::root()));
        assert_eq!(rows.path_for_row(&model, 3), Some(Path::from([2])));
    }

    #[test]
    fn test_expand_row_reveals_children() {
        let model = names();
        let mut rows = TreeRows::new();
        assert!(rows.expand_row(&model, 0));

        assert_eq!(rows.row_count(&model), 5);
        let values: Vec<_> = (0..5).filter_map(|row| rows.value_at_row(&model, row)).collect();
        assert_eq!(values, vec!["child1", "child1_1", "child1_2", "child2", "child3"]);
        assert_eq!(rows.row_for_path(&model, &Path::from([1])), Some(3));
        assert_eq!(rows.row_for_path(&model, &Path::from([1, 0])), None);

        assert!(rows.collapse_row(&model, 0));
        assert_eq!(rows.row_count(&model), 3);
    }

    #[test]
    fn test_get_path() {
        let model = numbers();
        assert_eq!(model.get(&Path::root()), Some(11));
        assert_eq!(model.get(&Path::from([0])), Some(105));
        assert_eq!(model.get(&Path::from([1])), Some(-24));
        assert_eq!(model.get(&Path::from([1, 0])), Some(33));
        assert_eq!(model.get(&Path::from([2])), Some(0));
        assert_eq!(model.get(&Path::from([3])), None);
    }

    #[test]
    fn test_get_row() {
        let model = numbers();
        let mut rows = TreeRows::new();
        let values = |rows: &TreeRows| -> Vec<i32> {
            (0..rows.row_count(&model))
                .filter_map(|row| rows.value_at_row(&model, row))
                .collect()
        };

        assert_eq!(values(&rows), vec![105, -24, 0]);

        rows.expand_all(&model);
        assert_eq!(values(&rows), vec![105, -24, 33, 0]);

        rows.set_root_visible(true);
        assert_eq!(values(&rows), vec![11, 105, -24, 33, 0]);
    }

    #[test]
    fn test_children_changed_signal() {
        let model = numbers();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        model.children_changed.connect(move |(parent, delta): &(Path, ListDelta<i32>)| {
            events_clone.lock().push((parent.clone(), delta.clone()));
        });

        assert!(model.insert(&Path::from([1]), 0, TreeNode::leaf(7)));
        assert!(model.remove(&Path::from([0])).is_some());
        assert_eq!(model.set(&Path::from([0, 1]), 34), Some(33));
        assert!(!model.insert(&Path::from([9]), 0, TreeNode::leaf(1)));
        assert!(model.remove(&Path::root()).is_none());

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], (Path::from([1]), ListDelta::inserted(0, 7)));
        assert_eq!(events[1], (Path::root(), ListDelta::removed(0, 105)));
        assert_eq!(events[2], (Path::from([0]), ListDelta::replaced(1, 33, 34)));
    }

    #[test]
    fn test_replace_children_emits_one_delta() {
        let model = names();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        model.children_changed.connect(move |(parent, delta): &(Path, ListDelta<&'static str>)| {
            events_clone.lock().push((parent.clone(), delta.clone()));
        });

        let mut children = model
            .with_node(&Path::root(), |root| root.children.clone())
            .unwrap();
        children.rotate_right(1);
        assert!(model.replace_children(&Path::root(), children));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, ListDelta::relocated(2, 0, "child3"));
        assert_eq!(model.get(&Path::from([1, 1])), Some("child1_2"));
    }

    #[test]
    fn test_replace_children_reports_changed_subtree() {
        let model = names();
        let selection = Arc::new(Mutex::new(SelectionModel::new()));
        selection.lock().set_selection([Path::from([0, 1])]);
        let events = Arc::new(Mutex::new(0));

        let selection_clone = selection.clone();
        let events_clone = events.clone();
        model.children_changed.connect(move |(parent, delta): &(Path, ListDelta<&'static str>)| {
            *events_clone.lock() += 1;
            selection_clone.lock().reconcile_children(parent, delta);
        });

        model.replace_children(
            &Path::root(),
            vec![TreeNode::leaf("child1"), TreeNode::leaf("child2")],
        );

        assert_eq!(*events.lock(), 1);
        assert!(!model.contains(&Path::from([0, 1])));
        assert!(selection.lock().is_empty());
    }

    #[test]
    fn test_replace_children_with_identical_nodes_is_silent() {
        let model = names();
        let events = Arc::new(Mutex::new(0));
        let events_clone = events.clone();
        model.children_changed.connect(move |_| *events_clone.lock() += 1);

        let children = model
            .with_node(&Path::root(), |root| root.children.clone())
            .unwrap();
        assert!(model.replace_children(&Path::root(), children));
        assert_eq!(*events.lock(), 0);
    }

    #[test]
    fn test_expanded_paths_follow_structure_changes() {
        let model = names();
        let mut rows = TreeRows::new();
        rows.expand(Path::from([0]));
        rows.expand(Path::from([1]));

        let removed = model.remove(&Path::from([0]));
        assert!(removed.is_some());
        rows.reconcile_children(&Path::root(), &ListDelta::removed(0, "child1"));

        assert!(rows.is_expanded(&Path::from([0])));
        assert!(!rows.is_expanded(&Path::from([1])));
        assert_eq!(rows.row_count(&model), 3);
    }

    #[test]
    fn test_tree_selection_navigation() {
        let model = names();
        let mut rows = TreeRows::new();
        rows.expand_all(&model);
        let ordering = rows.ordering(&model);

        let mut selection = SelectionModel::new();
        selection.set_selection_mode(SelectionMode::ExtendedSelection);
        selection.set_selection([Path::from([0, 1])]);
        selection.extend_next(&ordering);
        selection.extend_next(&ordering);

        assert_eq!(
            selection.selected(),
            vec![Path::from([0, 1]), Path::from([1]), Path::from([1, 0])]
        );
    }
}
