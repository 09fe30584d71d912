//! Keyboard focus.
//!
//! - [`FocusManager`]: owns the focus owner and moves focus between views
//! - [`TabOrderFocusManager`]: a [`FocusManager`] over a [`ViewTree`](crate::view::ViewTree)
//! - [`KeyboardFocusManager`]: turns key input into focus traversal, with
//!   pre- and postprocessors around the focused view's own handling
//! - [`TraversalKeys`]: which key presses trigger which traversal

mod bindings;
mod keyboard;
mod manager;

pub use bindings::TraversalKeys;
pub use keyboard::{
    KeyInputRouter, KeyInputService, KeyListener, KeyListenerId, KeyboardFocusManager,
    ProcessorId,
};
pub use manager::TabOrderFocusManager;

use std::fmt;
use std::sync::Arc;

use crate::view::{View, ViewId};

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraversalType {
    /// Next view in traversal order (Tab).
    Forward,
    /// Previous view in traversal order (Shift+Tab).
    Backward,
    /// Out of the current focus cycle, to its root.
    Upward,
    /// Into the focus cycle rooted at the focused view.
    Downward,
}

impl TraversalType {
    pub const ALL: [TraversalType; 4] = [
        TraversalType::Forward,
        TraversalType::Backward,
        TraversalType::Upward,
        TraversalType::Downward,
    ];

    /// Lower-case name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            TraversalType::Forward => "forward",
            TraversalType::Backward => "backward",
            TraversalType::Upward => "upward",
            TraversalType::Downward => "downward",
        }
    }
}

impl fmt::Display for TraversalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks the focus owner and performs focus moves.
pub trait FocusManager: Send + Sync {
    /// The view that currently has focus.
    fn focus_owner(&self) -> Option<ViewId>;

    /// Looks up a view by id.
    fn view(&self, id: ViewId) -> Option<Arc<dyn View>>;

    /// Moves focus from `from` in the direction of `traversal`.
    ///
    /// Returns true if focus changed.
    fn move_focus(&self, from: ViewId, traversal: TraversalType) -> bool;
}
