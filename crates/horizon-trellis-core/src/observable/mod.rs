//! Observable containers.
//!
//! - [`ObservableList`]: ordered, duplicates allowed, emits [`ListDelta`]
//! - [`ObservableSet`]: unordered, emits [`SetDelta`]
//!
//! Both support batched mutation that collapses any number of edits into a
//! single notification. The ordered diff lives in [`diff`](diff()).

mod delta;
mod diff;
mod list;
mod set;

pub use delta::{ListDelta, SetDelta};
pub use diff::diff;
pub use list::{BatchList, ObservableList};
pub use set::ObservableSet;
