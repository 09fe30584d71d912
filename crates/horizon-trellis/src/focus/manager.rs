//! Focus management over a view tree.
//!
//! [`TabOrderFocusManager`] tracks the focus owner of a [`ViewTree`] and
//! moves focus in tab order.
//!
//! # Tab Order
//!
//! Tab order is depth-first pre-order within a focus cycle. The cycle of a
//! view is the subtree of its nearest ancestor that is a focus cycle root,
//! or of its topmost ancestor if there is none. Nested cycle roots take part
//! in the outer cycle, but their descendants do not. Hidden views and their
//! subtrees are skipped.
//!
//! - Forward and Backward move through the cycle with wrap-around.
//! - Upward focuses the cycle root enclosing the focused view.
//! - Downward enters the cycle rooted at the focused view, focusing its first
//!   view in tab order.

use std::sync::Arc;

use horizon_trellis_core::Signal;
use horizon_trellis_core::logging::targets;
use parking_lot::RwLock;

use super::{FocusManager, TraversalType};
use crate::view::{SharedViewTree, View, ViewId, ViewTree};

/// A [`FocusManager`] that moves focus in tab order through a [`ViewTree`].
///
/// # Signals
///
/// - `focus_changed`: Emitted after the focus owner changes, with
///   `(old, new)` owners.
pub struct TabOrderFocusManager {
    tree: SharedViewTree,
    focus_owner: RwLock<Option<ViewId>>,

    /// Emitted when focus changes. Args: (old, new)
    pub focus_changed: Signal<(Option<ViewId>, Option<ViewId>)>,
}

impl TabOrderFocusManager {
    /// Create a focus manager for `tree`. Nothing has focus initially.
    pub fn new(tree: SharedViewTree) -> Self {
        Self {
            tree,
            focus_owner: RwLock::new(None),
            focus_changed: Signal::new(),
        }
    }

    /// The managed tree.
    pub fn tree(&self) -> &SharedViewTree {
        &self.tree
    }

    /// Gives focus to `id`.
    ///
    /// Returns false, leaving focus unchanged, if `id` is not in the tree,
    /// is not focusable, is hidden, or already has focus.
    pub fn set_focus(&self, id: ViewId) -> bool {
        let view = {
            let tree = self.tree.read();
            if !can_focus(&tree, id) {
                tracing::debug!(target: targets::FOCUS, ?id, "view cannot take focus");
                return false;
            }
            tree.view(id)
        };
        let Some(view) = view else {
            return false;
        };
        self.change_owner(Some((id, view)))
    }

    /// Removes focus from the focus owner.
    pub fn clear_focus(&self) -> bool {
        self.change_owner(None)
    }

    /// Focus-taking views in the tab order of the cycle containing `id`.
    pub fn tab_order(&self, id: ViewId) -> Vec<ViewId> {
        let tree = self.tree.read();
        tab_order(&tree, cycle_root(&tree, id))
    }

    fn change_owner(&self, next: Option<(ViewId, Arc<dyn View>)>) -> bool {
        let next_id = next.as_ref().map(|(id, _)| *id);
        let previous = {
            let mut owner = self.focus_owner.write();
            if *owner == next_id {
                return false;
            }
            std::mem::replace(&mut *owner, next_id)
        };

        if let Some(view) = previous.and_then(|id| self.tree.read().view(id)) {
            view.focus_changed(false);
        }
        if let Some((_, view)) = next {
            view.focus_changed(true);
        }

        tracing::trace!(target: targets::FOCUS, ?previous, next = ?next_id, "focus changed");
        self.focus_changed.emit((previous, next_id));
        true
    }

    fn traversal_target(&self, from: ViewId, traversal: TraversalType) -> Option<ViewId> {
        let tree = self.tree.read();
        if !tree.contains(from) {
            return None;
        }

        match traversal {
            TraversalType::Forward | TraversalType::Backward => {
                let order = tab_order(&tree, cycle_root(&tree, from));
                let last = order.len().checked_sub(1)?;
                let target = match order.iter().position(|id| *id == from) {
                    Some(pos) if traversal == TraversalType::Forward => {
                        order[if pos == last { 0 } else { pos + 1 }]
                    }
                    Some(pos) => order[if pos == 0 { last } else { pos - 1 }],
                    None if traversal == TraversalType::Forward => order[0],
                    None => order[last],
                };
                (target != from).then_some(target)
            }
            TraversalType::Upward => enclosing_cycle_root(&tree, from)
                .filter(|root| can_focus(&tree, *root)),
            TraversalType::Downward => {
                let view = tree.view(from)?;
                if !view.is_focus_cycle_root() {
                    return None;
                }
                tab_order(&tree, from).into_iter().find(|id| *id != from)
            }
        }
    }
}

impl FocusManager for TabOrderFocusManager {
    fn focus_owner(&self) -> Option<ViewId> {
        let owner = (*self.focus_owner.read())?;
        self.tree.read().contains(owner).then_some(owner)
    }

    fn view(&self, id: ViewId) -> Option<Arc<dyn View>> {
        self.tree.read().view(id)
    }

    fn move_focus(&self, from: ViewId, traversal: TraversalType) -> bool {
        match self.traversal_target(from, traversal) {
            Some(target) => {
                tracing::trace!(target: targets::FOCUS, %traversal, ?from, to = ?target, "moving focus");
                self.set_focus(target)
            }
            None => {
                tracing::debug!(target: targets::FOCUS, %traversal, ?from, "no focus target");
                false
            }
        }
    }
}

// =========================================================================
// Tree Queries
// =========================================================================

fn is_shown(tree: &ViewTree, id: ViewId) -> bool {
    let visible = |id: ViewId| tree.view(id).is_some_and(|view| view.is_visible());
    visible(id) && tree.ancestors(id).into_iter().all(visible)
}

fn can_focus(tree: &ViewTree, id: ViewId) -> bool {
    tree.view(id).is_some_and(|view| view.is_focusable()) && is_shown(tree, id)
}

fn enclosing_cycle_root(tree: &ViewTree, id: ViewId) -> Option<ViewId> {
    tree.ancestors(id)
        .into_iter()
        .find(|ancestor| tree.view(*ancestor).is_some_and(|view| view.is_focus_cycle_root()))
}

fn cycle_root(tree: &ViewTree, id: ViewId) -> ViewId {
    enclosing_cycle_root(tree, id)
        .or_else(|| tree.ancestors(id).last().copied())
        .unwrap_or(id)
}

fn tab_order(tree: &ViewTree, root: ViewId) -> Vec<ViewId> {
    let mut order = Vec::new();
    if is_shown(tree, root) {
        collect_tab_order(tree, root, true, &mut order);
    }
    order
}

fn collect_tab_order(tree: &ViewTree, id: ViewId, is_root: bool, order: &mut Vec<ViewId>) {
    let Some(view) = tree.view(id) else {
        return;
    };
    if !view.is_visible() {
        return;
    }
    if view.is_focusable() {
        order.push(id);
    }
    if view.is_focus_cycle_root() && !is_root {
        return;
    }
    for child in tree.children(id) {
        collect_tab_order(tree, *child, false, order);
    }
}

static_assertions::assert_impl_all!(TabOrderFocusManager: Send, Sync);
