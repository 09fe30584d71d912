//! Virtualized list over an observable model.
//!
//! [`VirtualList`] keeps rendered rows only for a window of the model (the
//! visible rows plus a scroll cache). When the model reports a delta the list
//! remaps its selection, adjusts the window, and re-binds as few rows as it
//! can:
//!
//! - Keys reported both removed and added are edits in place, not structural
//!   changes.
//! - If structural removals at or above the old last visible row outnumber
//!   additions and the window shrank, the excess trailing rows are evicted.
//! - A structural change or move inside the old window re-binds the whole new
//!   window; otherwise only edited rows inside the window are re-bound.
//!
//! Model notifications are queued and applied by [`VirtualList::sync`], so
//! the list never runs inside the model's notification.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path as FsPath;
use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ConnectionGuard, ListDelta, ObservableList};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::event::{Key, KeyEventKind, KeyState, KeyboardModifiers};
use crate::model::{IndexOrdering, SelectionModel};

/// Tuning for a [`VirtualList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Rows that fit in the viewport.
    pub viewport_rows: usize,
    /// Extra rows kept bound past the viewport.
    pub scroll_cache: usize,
    /// Size the list to its content: every row is in the window.
    pub fit_content: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            viewport_rows: 20,
            scroll_cache: 10,
            fit_content: true,
        }
    }
}

impl ListOptions {
    /// Parses options from TOML; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads options from a TOML file.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Rows bound for `len` rows when scrolled to `first_visible`.
    pub(crate) fn window(&self, first_visible: usize, len: usize) -> Option<RangeInclusive<usize>> {
        if len == 0 {
            return None;
        }
        if self.fit_content {
            return Some(0..=len - 1);
        }
        let first = first_visible.min(len - 1);
        let size = (self.viewport_rows + self.scroll_cache).min(len - first).max(1);
        Some(first..=first + size - 1)
    }
}

/// Per-row information handed to a [`RowBinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    /// Model index of the row.
    pub index: usize,
    /// Whether the row is selected.
    pub selected: bool,
}

/// Produces rendered rows for model items.
///
/// `bind` may be called repeatedly for the same index. When a row already
/// exists for the slot it is passed back as `previous` so it can be updated
/// in place.
pub trait RowBinder<T>: Send + Sync {
    /// The rendered row.
    type Row: Send;

    /// Binds `item` into a row.
    fn bind(&self, item: &T, context: RowContext, previous: Option<Self::Row>) -> Self::Row;
}

/// A list view that keeps rows bound only for its visible window.
pub struct VirtualList<T, B: RowBinder<T>> {
    model: Arc<ObservableList<T>>,
    binder: B,
    options: ListOptions,
    selection: SelectionModel<usize>,
    rows: Vec<B::Row>,
    first_visible: usize,
    model_len: usize,
    pending: Arc<Mutex<Vec<ListDelta<T>>>>,
    connection: Option<ConnectionGuard<ListDelta<T>>>,
}

impl<T, B> VirtualList<T, B>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    B: RowBinder<T>,
{
    /// Creates a list over `model` and binds its initial window.
    pub fn new(model: Arc<ObservableList<T>>, binder: B, options: ListOptions) -> Self {
        let pending = Arc::new(Mutex::new(Vec::new()));
        let queue = pending.clone();
        let connection = model.changed().connect_scoped(move |delta: &ListDelta<T>| {
            queue.lock().push(delta.clone());
        });

        let mut list = Self {
            model_len: model.len(),
            model,
            binder,
            options,
            selection: SelectionModel::new(),
            rows: Vec::new(),
            first_visible: 0,
            pending,
            connection: Some(connection),
        };
        list.rebind_window();
        list
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The backing model.
    pub fn model(&self) -> &Arc<ObservableList<T>> {
        &self.model
    }

    /// Bound rows, first visible row first.
    pub fn rows(&self) -> &[B::Row] {
        &self.rows
    }

    /// Row bound to model index `index`, if it is in the window.
    pub fn row(&self, index: usize) -> Option<&B::Row> {
        self.rows.get(index.checked_sub(self.first_visible)?)
    }

    /// Model indices in the window.
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.window(self.model_len)
    }

    /// Number of rows in the model as of the last sync.
    pub fn len(&self) -> usize {
        self.model_len
    }

    /// Returns true if the model was empty as of the last sync.
    pub fn is_empty(&self) -> bool {
        self.model_len == 0
    }

    /// The list's options.
    pub fn options(&self) -> ListOptions {
        self.options
    }

    /// The selection model.
    pub fn selection(&self) -> &SelectionModel<usize> {
        &self.selection
    }

    /// Mutable access to the selection model.
    ///
    /// Rows are not re-bound for changes made through this reference; call
    /// [`refresh`](Self::refresh) afterwards.
    pub fn selection_mut(&mut self) -> &mut SelectionModel<usize> {
        &mut self.selection
    }

    /// Returns true while the list is attached to its model.
    pub fn is_attached(&self) -> bool {
        self.connection.is_some()
    }

    // =========================================================================
    // Model changes
    // =========================================================================

    /// Applies every queued model delta. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let deltas = std::mem::take(&mut *self.pending.lock());
        let count = deltas.len();
        for delta in &deltas {
            self.handle_model_change(delta);
        }
        count
    }

    /// Stops observing the model. Queued deltas are discarded.
    pub fn detach(&mut self) {
        self.connection = None;
        self.pending.lock().clear();
    }

    fn handle_model_change(&mut self, delta: &ListDelta<T>) {
        let true_removed = delta.true_removed();
        let true_added = delta.true_added();

        let new_len = delta.new_len(self.model_len);
        self.selection.reconcile(delta, new_len);

        let old_window = self.window(self.model_len);
        let old_size = self.rows.len();
        let in_old_window = |index: &usize| old_window.as_ref().is_some_and(|w| *index <= *w.end());

        let removed_in_view = true_removed.iter().filter(|i| in_old_window(i)).count();
        let added_in_view = true_added.iter().filter(|i| in_old_window(i)).count();
        let moved_in_view = delta
            .moved
            .iter()
            .any(|(to, (from, _))| in_old_window(to) || in_old_window(from));

        self.model_len = new_len;
        let new_window = self.window(new_len);
        let new_size = new_window.as_ref().map_or(0, |w| w.end() - w.start() + 1);

        if removed_in_view > added_in_view && new_size < old_size {
            tracing::trace!(
                target: targets::LIST,
                evicted = old_size - new_size,
                "evicting trailing rows"
            );
            self.rows.truncate(new_size);
        }

        if removed_in_view > 0 || added_in_view > 0 || moved_in_view || new_size != self.rows.len() {
            tracing::trace!(target: targets::LIST, changes = %delta.summary(), "refreshing window");
            self.rebind_window();
        } else {
            let edited: Vec<usize> = delta
                .edited()
                .into_iter()
                .filter(|index| new_window.as_ref().is_some_and(|w| w.contains(index)))
                .collect();
            tracing::trace!(target: targets::LIST, edited = edited.len(), "re-binding edited rows");
            for index in edited {
                self.rebind(index);
            }
        }
    }

    // =========================================================================
    // Scrolling and selection
    // =========================================================================

    /// Scrolls so that `first` is the first visible row.
    ///
    /// Ignored while the list fits its content.
    pub fn scroll_to(&mut self, first: usize) -> bool {
        if self.options.fit_content {
            return false;
        }
        let first = first.min(self.model_len.saturating_sub(1));
        if first == self.first_visible {
            return false;
        }
        self.first_visible = first;
        self.rebind_window();
        true
    }

    /// Applies a pointer click on model row `index`.
    pub fn click(&mut self, index: usize, modifiers: KeyboardModifiers) -> bool {
        if index >= self.model_len {
            return false;
        }
        let before: BTreeSet<usize> = self.selection.iter().copied().collect();
        let ordering = IndexOrdering::new(self.model_len);
        let changed = self.selection.apply_click(index, modifiers, &ordering);
        self.refresh_selection(&before);
        changed
    }

    /// Handles selection keys: Up/Down move the selection, Shift+Up/Down
    /// extend it from the anchor, Ctrl+A selects everything.
    ///
    /// Returns true if the key was handled.
    pub fn handle_key(&mut self, state: KeyState) -> bool {
        if state.kind != KeyEventKind::Pressed {
            return false;
        }
        let before: BTreeSet<usize> = self.selection.iter().copied().collect();
        let ordering = IndexOrdering::new(self.model_len);
        let modifiers = state.modifiers;
        let handled = match state.key {
            Key::ArrowDown if modifiers.shift => self.selection.extend_next(&ordering),
            Key::ArrowUp if modifiers.shift => self.selection.extend_previous(&ordering),
            Key::ArrowDown => self.selection.move_next(&ordering),
            Key::ArrowUp => self.selection.move_previous(&ordering),
            Key::A if modifiers.toggles() => self.selection.select_all(&ordering),
            _ => return false,
        };
        self.refresh_selection(&before);
        handled
    }

    /// Re-binds every row in the window.
    pub fn refresh(&mut self) {
        self.rebind_window();
    }

    fn refresh_selection(&mut self, before: &BTreeSet<usize>) {
        let after: BTreeSet<usize> = self.selection.iter().copied().collect();
        let changed: Vec<usize> = before.symmetric_difference(&after).copied().collect();
        for index in changed {
            if self.row(index).is_some() {
                self.rebind(index);
            }
        }
    }

    // =========================================================================
    // Binding
    // =========================================================================

    fn window(&self, len: usize) -> Option<RangeInclusive<usize>> {
        self.options.window(self.first_visible, len)
    }

    fn rebind_window(&mut self) {
        let Some(window) = self.window(self.model_len) else {
            self.rows.clear();
            return;
        };
        self.first_visible = *window.start();
        let size = window.end() - window.start() + 1;
        self.rows.truncate(size);
        for index in window {
            self.rebind(index);
        }
    }

    fn rebind(&mut self, index: usize) {
        let Some(slot) = index.checked_sub(self.first_visible) else {
            return;
        };
        let Some(item) = self.model.get(index) else {
            tracing::debug!(target: targets::LIST, index, "row outside model, not bound");
            return;
        };
        let context = RowContext {
            index,
            selected: self.selection.contains(&index),
        };

        if slot < self.rows.len() {
            let previous = self.rows.remove(slot);
            let row = self.binder.bind(&item, context, Some(previous));
            self.rows.insert(slot, row);
        } else if slot == self.rows.len() {
            let row = self.binder.bind(&item, context, None);
            self.rows.push(row);
        }
    }
}
