//! Widgets built on the models and views.
//!
//! - [`VirtualList`]: a list that binds rows only for its visible window
//! - [`TreeList`]: the same for the expanded rows of a tree
//! - [`Button`] and [`ButtonGroup`]: clickable buttons with exclusive groups

mod button;
mod list;
mod tree;

pub use button::{BasicButtonBehavior, Button, ButtonGroup, ButtonModel};
pub use list::{ListOptions, RowBinder, RowContext, VirtualList};
pub use tree::{TreeList, TreeRowBinder, TreeRowContext};
