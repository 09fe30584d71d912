//! Horizon Trellis - the data, selection and focus core of a retained-mode
//! widget toolkit.
//!
//! This is the main umbrella crate. It re-exports the observation primitives
//! of `horizon-trellis-core` and adds:
//!
//! - **Models**: selection with anchor ranges, and tree models addressed by
//!   [`Path`](model::Path)
//! - **Widgets**: virtualized lists and trees that remap rows and selection under
//!   model changes, buttons and button groups
//! - **Views**: the view tree, behaviors and an abstract canvas
//! - **Focus**: tab-order focus management and keyboard traversal with
//!   configurable key bindings
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_trellis::ObservableList;
//! use horizon_trellis::widget::{ListOptions, RowBinder, RowContext, VirtualList};
//!
//! struct Label;
//!
//! impl RowBinder<String> for Label {
//!     type Row = String;
//!
//!     fn bind(&self, item: &String, context: RowContext, _previous: Option<String>) -> String {
//!         format!("{}: {}", context.index, item)
//!     }
//! }
//!
//! let model = Arc::new(ObservableList::from_vec(vec!["a".to_string(), "b".to_string()]));
//! let mut list = VirtualList::new(model.clone(), Label, ListOptions::default());
//!
//! model.set(1, "B".to_string());
//! list.sync();
//! assert_eq!(list.rows(), &["0: a".to_string(), "1: B".to_string()]);
//! ```

pub use horizon_trellis_core::*;

pub mod error;
pub mod event;
pub mod focus;
pub mod model;
pub mod render;
pub mod view;
pub mod widget;

pub use error::{ConfigError, Result};
pub use event::{Key, KeyEvent, KeyEventKind, KeyState, KeyboardModifiers};
pub use focus::{
    FocusManager, KeyInputRouter, KeyInputService, KeyboardFocusManager, TabOrderFocusManager,
    TraversalKeys, TraversalType,
};
pub use model::{SelectionMode, SelectionModel};
pub use view::{View, ViewId, ViewTree};
