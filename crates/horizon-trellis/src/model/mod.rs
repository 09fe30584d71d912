//! Data models for item views.
//!
//! - [`SelectionModel`]: selected keys, anchor and last selection, with
//!   reconciliation against model deltas
//! - [`TreeModel`] and [`TreeRows`]: hierarchical data addressed by [`Path`]
//!
//! Flat lists use [`ObservableList`](horizon_trellis_core::ObservableList)
//! directly as their model.

mod selection;
mod tree;

pub use selection::{IndexOrdering, SelectionMode, SelectionModel, SelectionOrdering};
pub use tree::{Path, TreeModel, TreeNode, TreeOrdering, TreeRows};
