//! Views and the tree that holds them.
//!
//! A [`View`] is anything that can take focus, handle key events and render
//! onto a [`Canvas`]. Views are shared as `Arc<dyn View>` and take `&self`,
//! keeping whatever mutable state they need behind their own locks, so
//! managers can call into them without holding the tree lock.
//!
//! [`ViewTree`] owns parent/child structure by [`ViewId`]. Views themselves
//! never point at their parent; callers look the parent up by id.

mod behavior;

pub use behavior::{Behavior, BehaviorSlot, StyleSnapshot, Styled, ViewStyle};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::event::{KeyEvent, KeyState};
use crate::focus::TraversalType;
use crate::render::{Canvas, Rect};

slotmap::new_key_type! {
    /// Identifier of a view in a [`ViewTree`].
    pub struct ViewId;
}

/// A node of the UI tree.
pub trait View: Send + Sync {
    /// Whether the view can take keyboard focus.
    fn is_focusable(&self) -> bool {
        true
    }

    /// Hidden views and their descendants are skipped by focus traversal.
    fn is_visible(&self) -> bool {
        true
    }

    /// Whether focus traversal is confined to this view's subtree.
    fn is_focus_cycle_root(&self) -> bool {
        false
    }

    /// Key combinations that trigger `traversal` while this view has focus.
    ///
    /// `None` means the view uses the manager's defaults.
    fn traversal_keys(&self, _traversal: TraversalType) -> Option<HashSet<KeyState>> {
        None
    }

    /// Called with key events the focus machinery did not consume.
    fn handle_key_event(&self, _event: &mut KeyEvent) {}

    /// Called when the view gains or loses focus.
    fn focus_changed(&self, _focused: bool) {}

    fn render(&self, _canvas: &mut dyn Canvas) {}

    fn bounds(&self) -> Rect {
        Rect::ZERO
    }
}

// =========================================================================
// Panel
// =========================================================================

type KeyHandler = Box<dyn Fn(&mut KeyEvent) + Send + Sync>;

/// A plain container view with configurable focus behavior.
pub struct Panel {
    focusable: bool,
    cycle_root: bool,
    visible: AtomicBool,
    focused: AtomicBool,
    bounds: Rect,
    traversal_keys: HashMap<TraversalType, HashSet<KeyState>>,
    on_key: Option<KeyHandler>,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    /// A visible, focusable panel.
    pub fn new() -> Self {
        Self {
            focusable: true,
            cycle_root: false,
            visible: AtomicBool::new(true),
            focused: AtomicBool::new(false),
            bounds: Rect::ZERO,
            traversal_keys: HashMap::new(),
            on_key: None,
        }
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn focus_cycle_root(mut self, cycle_root: bool) -> Self {
        self.cycle_root = cycle_root;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Overrides the keys for one traversal type.
    pub fn with_traversal_keys(
        mut self,
        traversal: TraversalType,
        keys: impl IntoIterator<Item = KeyState>,
    ) -> Self {
        self.traversal_keys.insert(traversal, keys.into_iter().collect());
        self
    }

    /// Sets the handler for key events that reach the panel.
    pub fn on_key<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut KeyEvent) + Send + Sync + 'static,
    {
        self.on_key = Some(Box::new(handler));
        self
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }

    /// Whether the panel currently has focus.
    pub fn has_focus(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }
}

impl View for Panel {
    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    fn is_focus_cycle_root(&self) -> bool {
        self.cycle_root
    }

    fn traversal_keys(&self, traversal: TraversalType) -> Option<HashSet<KeyState>> {
        self.traversal_keys.get(&traversal).cloned()
    }

    fn handle_key_event(&self, event: &mut KeyEvent) {
        if let Some(handler) = &self.on_key {
            handler(event);
        }
    }

    fn focus_changed(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

// =========================================================================
// ViewTree
// =========================================================================

struct ViewNode {
    view: Arc<dyn View>,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
}

/// Parent/child structure of views, keyed by [`ViewId`].
///
/// Children keep their insertion order, which is also their traversal order.
#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
    roots: Vec<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level view.
    pub fn insert_root(&mut self, view: Arc<dyn View>) -> ViewId {
        let id = self.nodes.insert(ViewNode {
            view,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    /// Adds `view` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is not in the tree.
    pub fn insert_child(&mut self, parent: ViewId, view: Arc<dyn View>) -> Option<ViewId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(ViewNode {
            view,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// Removes `id` and its whole subtree. Returns the removed ids.
    pub fn remove(&mut self, id: ViewId) -> Vec<ViewId> {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent) else {
            return Vec::new();
        };
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let removed = self.pre_order(id);
        for view in &removed {
            self.nodes.remove(*view);
        }
        removed
    }

    pub fn view(&self, id: ViewId) -> Option<Arc<dyn View>> {
        self.nodes.get(id).map(|node| node.view.clone())
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.parent
    }

    /// Children of `id` in order; empty if `id` is unknown.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ViewId] {
        &self.roots
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = self.parent(ancestor);
        }
        ancestors
    }

    /// Returns true if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// `id` followed by all its descendants, depth-first pre-order.
    pub fn pre_order(&self, id: ViewId) -> Vec<ViewId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }
}

/// A view tree shared between a focus manager and its owner.
pub type SharedViewTree = Arc<RwLock<ViewTree>>;

static_assertions::assert_impl_all!(ViewTree: Send, Sync);
static_assertions::assert_impl_all!(Panel: Send, Sync);
