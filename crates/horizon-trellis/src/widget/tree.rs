//! Virtualized tree over a [`TreeModel`].
//!
//! [`TreeList`] flattens the expanded part of a tree into rows and keeps
//! rendered rows only for its window, like [`VirtualList`](super::VirtualList).
//! Each `children_changed` notification is queued; [`TreeList::sync`]
//! re-keys expansion state and the path selection through every queued
//! delta, then:
//!
//! - re-binds the whole window if any row in it now shows a different path,
//! - otherwise re-binds only the rows whose node was edited in place.
//!
//! Changes under collapsed nodes re-bind nothing.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ConnectionGuard, ListDelta};
use parking_lot::Mutex;

use super::ListOptions;
use crate::event::{Key, KeyEventKind, KeyState, KeyboardModifiers};
use crate::model::{Path, SelectionModel, TreeModel, TreeRows};

/// Per-row information handed to a [`TreeRowBinder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowContext {
    /// Row number among the visible rows.
    pub row: usize,
    /// The node shown by the row.
    pub path: Path,
    /// Whether the node shows its children.
    pub expanded: bool,
    /// Whether the node has no children.
    pub leaf: bool,
    /// Whether the row is selected.
    pub selected: bool,
}

impl TreeRowContext {
    /// Indentation level; top-level nodes are at depth 1.
    pub fn depth(&self) -> usize {
        self.path.depth()
    }
}

/// Produces rendered rows for tree nodes.
///
/// As with [`RowBinder`](super::RowBinder), `previous` carries the row
/// already bound to the slot so it can be updated in place.
pub trait TreeRowBinder<T>: Send + Sync {
    type Row: Send;

    fn bind(&self, value: &T, context: &TreeRowContext, previous: Option<Self::Row>) -> Self::Row;
}

type PendingChanges<T> = Arc<Mutex<Vec<(Path, ListDelta<T>)>>>;

/// A tree view that keeps rows bound only for its visible window.
pub struct TreeList<T, B: TreeRowBinder<T>> {
    model: Arc<TreeModel<T>>,
    binder: B,
    options: ListOptions,
    tree_rows: TreeRows,
    selection: SelectionModel<Path>,
    paths: Vec<Path>,
    rows: Vec<B::Row>,
    first_visible: usize,
    pending: PendingChanges<T>,
    connection: Option<ConnectionGuard<(Path, ListDelta<T>)>>,
}

impl<T, B> TreeList<T, B>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    B: TreeRowBinder<T>,
{
    /// Creates a tree over `model` with a hidden root and nothing expanded.
    pub fn new(model: Arc<TreeModel<T>>, binder: B, options: ListOptions) -> Self {
        Self::with_rows(model, binder, options, TreeRows::new())
    }

    /// Creates a tree with initial expansion state.
    pub fn with_rows(
        model: Arc<TreeModel<T>>,
        binder: B,
        options: ListOptions,
        tree_rows: TreeRows,
    ) -> Self {
        let pending: PendingChanges<T> = Arc::new(Mutex::new(Vec::new()));
        let queue = pending.clone();
        let connection = model
            .children_changed
            .connect_scoped(move |change: &(Path, ListDelta<T>)| {
                queue.lock().push(change.clone());
            });

        let mut tree = Self {
            paths: tree_rows.visible_paths(&model),
            model,
            binder,
            options,
            tree_rows,
            selection: SelectionModel::new(),
            rows: Vec::new(),
            first_visible: 0,
            pending,
            connection: Some(connection),
        };
        tree.rebind_window();
        tree
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn model(&self) -> &Arc<TreeModel<T>> {
        &self.model
    }

    /// Bound rows, first visible row first.
    pub fn rows(&self) -> &[B::Row] {
        &self.rows
    }

    /// Row bound at visible row `row`, if it is in the window.
    pub fn row(&self, row: usize) -> Option<&B::Row> {
        self.rows.get(row.checked_sub(self.first_visible)?)
    }

    /// Paths of every visible row as of the last sync.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Visible row showing `path`.
    pub fn row_for_path(&self, path: &Path) -> Option<usize> {
        self.paths.binary_search(path).ok()
    }

    /// Row numbers in the window.
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.window()
    }

    /// Number of visible rows as of the last sync.
    pub fn row_count(&self) -> usize {
        self.paths.len()
    }

    /// Expansion and root visibility.
    pub fn tree_rows(&self) -> &TreeRows {
        &self.tree_rows
    }

    pub fn selection(&self) -> &SelectionModel<Path> {
        &self.selection
    }

    /// Mutable access to the selection model.
    ///
    /// Rows are not re-bound for changes made through this reference; call
    /// [`refresh`](Self::refresh) afterwards.
    pub fn selection_mut(&mut self) -> &mut SelectionModel<Path> {
        &mut self.selection
    }

    pub fn is_attached(&self) -> bool {
        self.connection.is_some()
    }

    // =========================================================================
    // Model changes
    // =========================================================================

    /// Applies every queued model change. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let changes = std::mem::take(&mut *self.pending.lock());
        if changes.is_empty() {
            return 0;
        }

        let old_paths = std::mem::take(&mut self.paths);
        let old_window = self.window_for(old_paths.len());
        let mut remapped: Vec<Option<Path>> = old_paths.iter().cloned().map(Some).collect();
        let mut edited: BTreeSet<Path> = BTreeSet::new();

        for (parent, delta) in &changes {
            self.tree_rows.reconcile_children(parent, delta);
            self.selection.reconcile_children(parent, delta);

            for path in remapped.iter_mut() {
                *path = path.take().and_then(|p| follow(&p, parent, delta));
            }
            edited = edited
                .into_iter()
                .filter_map(|p| follow(&p, parent, delta))
                .collect();
            edited.extend(delta.edited().into_iter().map(|index| parent.child(index)));
        }

        self.paths = self.tree_rows.visible_paths(&self.model);
        let new_window = self.window();

        let shifted = old_window.as_ref().is_some_and(|window| {
            window.clone().any(|row| {
                let kept = remapped[row].as_ref() == Some(&old_paths[row]);
                !kept || self.paths.get(row) != Some(&old_paths[row])
            })
        });
        let resized = new_window.as_ref().map_or(0, |w| w.end() - w.start() + 1) != self.rows.len();

        if shifted || resized {
            tracing::trace!(
                target: targets::LIST,
                changes = changes.len(),
                rows = self.paths.len(),
                "refreshing tree window"
            );
            self.rebind_window();
        } else {
            let rows: Vec<usize> = edited
                .iter()
                .filter_map(|path| self.row_for_path(path))
                .filter(|row| new_window.as_ref().is_some_and(|w| w.contains(row)))
                .collect();
            tracing::trace!(target: targets::LIST, edited = rows.len(), "re-binding edited tree rows");
            for row in rows {
                self.rebind(row);
            }
        }
        changes.len()
    }

    /// Stops observing the model. Queued changes are discarded.
    pub fn detach(&mut self) {
        self.connection = None;
        self.pending.lock().clear();
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Expands `path` and shows its children.
    pub fn expand(&mut self, path: Path) -> bool {
        if self.model.is_leaf(&path) || !self.tree_rows.expand(path) {
            return false;
        }
        self.refresh();
        true
    }

    /// Collapses `path`, hiding its descendants.
    pub fn collapse(&mut self, path: &Path) -> bool {
        if !self.tree_rows.collapse(path) {
            return false;
        }
        self.refresh();
        true
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self) {
        self.tree_rows.expand_all(&self.model);
        self.refresh();
    }

    /// Shows or hides the root row.
    pub fn set_root_visible(&mut self, visible: bool) {
        if self.tree_rows.root_visible() != visible {
            self.tree_rows.set_root_visible(visible);
            self.refresh();
        }
    }

    // =========================================================================
    // Scrolling and selection
    // =========================================================================

    /// Scrolls so that `first` is the first visible row.
    ///
    /// Ignored while the tree fits its content.
    pub fn scroll_to(&mut self, first: usize) -> bool {
        if self.options.fit_content {
            return false;
        }
        let first = first.min(self.paths.len().saturating_sub(1));
        if first == self.first_visible {
            return false;
        }
        self.first_visible = first;
        self.rebind_window();
        true
    }

    /// Applies a pointer click on visible row `row`.
    pub fn click(&mut self, row: usize, modifiers: KeyboardModifiers) -> bool {
        let Some(path) = self.paths.get(row).cloned() else {
            return false;
        };
        let before: BTreeSet<Path> = self.selection.iter().cloned().collect();
        let ordering = self.tree_rows.ordering(&self.model);
        let changed = self.selection.apply_click(path, modifiers, &ordering);
        self.refresh_selection(&before);
        changed
    }

    /// Handles selection and expansion keys.
    ///
    /// Up/Down move the selection and Shift+Up/Down extend it. Right expands
    /// and Left collapses the last selected node. Ctrl+A selects every row.
    pub fn handle_key(&mut self, state: KeyState) -> bool {
        if state.kind != KeyEventKind::Pressed {
            return false;
        }
        let before: BTreeSet<Path> = self.selection.iter().cloned().collect();
        let ordering = self.tree_rows.ordering(&self.model);
        let modifiers = state.modifiers;
        let current = self.selection.last_selection().cloned();
        let handled = match state.key {
            Key::ArrowDown if modifiers.shift => self.selection.extend_next(&ordering),
            Key::ArrowUp if modifiers.shift => self.selection.extend_previous(&ordering),
            Key::ArrowDown => self.selection.move_next(&ordering),
            Key::ArrowUp => self.selection.move_previous(&ordering),
            Key::ArrowRight => return current.is_some_and(|path| self.expand(path)),
            Key::ArrowLeft => return current.is_some_and(|path| self.collapse(&path)),
            Key::A if modifiers.toggles() => self.selection.select_all(&ordering),
            _ => return false,
        };
        self.refresh_selection(&before);
        handled
    }

    /// Recomputes the visible rows and re-binds the window.
    pub fn refresh(&mut self) {
        self.paths = self.tree_rows.visible_paths(&self.model);
        self.rebind_window();
    }

    fn refresh_selection(&mut self, before: &BTreeSet<Path>) {
        let after: BTreeSet<Path> = self.selection.iter().cloned().collect();
        let rows: Vec<usize> = before
            .symmetric_difference(&after)
            .filter_map(|path| self.row_for_path(path))
            .collect();
        for row in rows {
            if self.row(row).is_some() {
                self.rebind(row);
            }
        }
    }

    // =========================================================================
    // Binding
    // =========================================================================

    fn window(&self) -> Option<RangeInclusive<usize>> {
        self.window_for(self.paths.len())
    }

    fn window_for(&self, len: usize) -> Option<RangeInclusive<usize>> {
        self.options.window(self.first_visible, len)
    }

    fn rebind_window(&mut self) {
        let Some(window) = self.window() else {
            self.rows.clear();
            return;
        };
        self.first_visible = *window.start();
        let size = window.end() - window.start() + 1;
        if size < self.rows.len() {
            tracing::trace!(
                target: targets::LIST,
                evicted = self.rows.len() - size,
                "evicting trailing tree rows"
            );
            self.rows.truncate(size);
        }
        for row in window {
            self.rebind(row);
        }
    }

    fn rebind(&mut self, row: usize) {
        let Some(slot) = row.checked_sub(self.first_visible) else {
            return;
        };
        let Some(path) = self.paths.get(row).cloned() else {
            return;
        };
        let Some((value, leaf)) = self
            .model
            .with_node(&path, |node| (node.value.clone(), node.children.is_empty()))
        else {
            tracing::debug!(target: targets::LIST, %path, "tree row outside model, not bound");
            return;
        };
        let context = TreeRowContext {
            row,
            expanded: self.tree_rows.is_expanded(&path),
            leaf,
            selected: self.selection.contains(&path),
            path,
        };

        if slot < self.rows.len() {
            let previous = self.rows.remove(slot);
            let bound = self.binder.bind(&value, &context, Some(previous));
            self.rows.insert(slot, bound);
        } else if slot == self.rows.len() {
            let bound = self.binder.bind(&value, &context, None);
            self.rows.push(bound);
        }
    }
}

/// Like [`Path::remapped`], but a child edited in place keeps its path.
fn follow<T>(path: &Path, parent: &Path, delta: &ListDelta<T>) -> Option<Path> {
    path.remapped(parent, delta).or_else(|| {
        let edited = path.parent().as_ref() == Some(parent)
            && path.last().is_some_and(|index| delta.edited().contains(&index));
        edited.then(|| path.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SelectionMode, TreeNode};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        text: String,
        depth: usize,
        selected: bool,
    }

    #[derive(Default, Clone)]
    struct Recorder {
        bound: Arc<Mutex<Vec<usize>>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<usize> {
            std::mem::take(&mut *self.bound.lock())
        }
    }

    impl TreeRowBinder<&'static str> for Recorder {
        type Row = Row;

        fn bind(&self, value: &&'static str, context: &TreeRowContext, _previous: Option<Row>) -> Row {
            self.bound.lock().push(context.row);
            Row {
                text: value.to_string(),
                depth: context.depth(),
                selected: context.selected,
            }
        }
    }

    fn names() -> Arc<TreeModel<&'static str>> {
        Arc::new(TreeModel::new(TreeNode::leaf("root").with_children([
            TreeNode::leaf("child1")
                .with_child(TreeNode::leaf("child1_1"))
                .with_child(TreeNode::leaf("child1_2")),
            TreeNode::leaf("child2").with_child(TreeNode::leaf("child2_1")),
            TreeNode::leaf("child3"),
        ])))
    }

    fn expanded_first(
        model: &Arc<TreeModel<&'static str>>,
        recorder: &Recorder,
    ) -> TreeList<&'static str, Recorder> {
        let mut tree_rows = TreeRows::new();
        tree_rows.expand(Path::from([0]));
        let tree = TreeList::with_rows(model.clone(), recorder.clone(), ListOptions::default(), tree_rows);
        recorder.take();
        tree
    }

    fn texts(tree: &TreeList<&'static str, Recorder>) -> Vec<String> {
        tree.rows().iter().map(|row| row.text.clone()).collect()
    }

    #[test]
    fn test_initial_rows_follow_expansion() {
        let model = names();
        let recorder = Recorder::default();
        let tree = TreeList::new(model.clone(), recorder.clone(), ListOptions::default());
        assert_eq!(texts(&tree), vec!["child1", "child2", "child3"]);
        assert_eq!(recorder.take(), vec![0, 1, 2]);

        let tree = expanded_first(&model, &recorder);
        assert_eq!(
            texts(&tree),
            vec!["child1", "child1_1", "child1_2", "child2", "child3"]
        );
        assert_eq!(tree.rows()[1].depth, 2);
    }

    #[test]
    fn test_insert_shifts_expansion_and_selection() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);
        tree.click(3, KeyboardModifiers::NONE);
        assert_eq!(tree.selection().selected(), vec![Path::from([1])]);

        model.insert(&Path::root(), 0, TreeNode::leaf("child0"));
        assert_eq!(tree.sync(), 1);

        assert_eq!(
            texts(&tree),
            vec!["child0", "child1", "child1_1", "child1_2", "child2", "child3"]
        );
        assert!(tree.tree_rows().is_expanded(&Path::from([1])));
        assert_eq!(tree.selection().selected(), vec![Path::from([2])]);
        assert!(tree.rows()[4].selected);
    }

    #[test]
    fn test_insert_under_expanded_parent_refreshes() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);

        model.insert(&Path::from([0]), 1, TreeNode::leaf("child1_x"));
        tree.sync();

        assert_eq!(
            texts(&tree),
            vec!["child1", "child1_1", "child1_x", "child1_2", "child2", "child3"]
        );
        assert_eq!(recorder.take(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_change_under_collapsed_parent_binds_nothing() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);

        model.push(&Path::from([1]), TreeNode::leaf("child2_2"));
        assert_eq!(tree.sync(), 1);

        assert!(recorder.take().is_empty());
        assert_eq!(tree.row_count(), 5);
    }

    #[test]
    fn test_remove_drops_descendant_state() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);
        tree.click(2, KeyboardModifiers::NONE);
        assert_eq!(tree.selection().selected(), vec![Path::from([0, 1])]);

        model.remove(&Path::from([0]));
        tree.sync();

        assert_eq!(texts(&tree), vec!["child2", "child3"]);
        assert!(tree.selection().is_empty());
        assert!(!tree.tree_rows().is_expanded(&Path::from([0])));
        assert_eq!(tree.rows().len(), 2);
    }

    #[test]
    fn test_move_carries_expansion_and_selection() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);
        tree.click(1, KeyboardModifiers::NONE);

        let mut children = model
            .with_node(&Path::root(), |root| root.children.clone())
            .unwrap();
        children.rotate_right(1);
        model.replace_children(&Path::root(), children);
        tree.sync();

        assert_eq!(
            texts(&tree),
            vec!["child3", "child1", "child1_1", "child1_2", "child2"]
        );
        assert_eq!(tree.selection().selected(), vec![Path::from([1, 0])]);
        assert!(tree.rows()[2].selected);
    }

    #[test]
    fn test_edit_rebinds_only_edited_row() {
        let model = names();
        let recorder = Recorder::default();
        let mut tree = expanded_first(&model, &recorder);

        model.set(&Path::from([0, 1]), "CHILD1_2");
        tree.sync();

        assert_eq!(recorder.take(), vec![2]);
        assert_eq!(tree.rows()[2].text, "CHILD1_2");
    }

    #[test]
    fn test_keys_expand_collapse_and_navigate() {
        let model = names();
        let mut tree = TreeList::new(model, Recorder::default(), ListOptions::default());
        tree.selection_mut().set_selection_mode(SelectionMode::ExtendedSelection);

        assert!(tree.handle_key(KeyState::key_only(Key::ArrowDown)));
        assert_eq!(tree.selection().selected(), vec![Path::from([0])]);

        assert!(tree.handle_key(KeyState::key_only(Key::ArrowRight)));
        assert_eq!(tree.row_count(), 5);
        assert!(!tree.handle_key(KeyState::key_only(Key::ArrowRight)));

        assert!(tree.handle_key(KeyState::pressed(Key::ArrowDown, KeyboardModifiers::SHIFT)));
        assert_eq!(
            tree.selection().selected(),
            vec![Path::from([0]), Path::from([0, 0])]
        );

        assert!(tree.handle_key(KeyState::key_only(Key::ArrowUp)));
        assert_eq!(tree.selection().selected(), vec![Path::from([0])]);
        assert!(tree.handle_key(KeyState::key_only(Key::ArrowLeft)));
        assert_eq!(tree.row_count(), 3);
    }

    #[test]
    fn test_detach_stops_updates() {
        let model = names();
        let mut tree = TreeList::new(model.clone(), Recorder::default(), ListOptions::default());
        tree.detach();
        assert!(!tree.is_attached());
        assert_eq!(model.children_changed.connection_count(), 0);

        model.push(&Path::root(), TreeNode::leaf("child4"));
        assert_eq!(tree.sync(), 0);
        assert_eq!(tree.row_count(), 3);
    }
}
