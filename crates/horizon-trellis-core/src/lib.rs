//! Core observation primitives for Horizon Trellis.
//!
//! This crate provides the change-notification layer the toolkit is built on:
//!
//! - **Signals**: A multi-subscriber observer pool ([`Signal`])
//! - **Observable containers**: [`ObservableList`] and [`ObservableSet`] with
//!   batched, minimal change deltas
//! - **Properties**: Single observable values ([`ObservableProperty`])
//! - **Logging**: `tracing` targets for every subsystem
//!
//! Everything here is synchronous: observers run on the mutating thread,
//! after the mutation has been committed.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::ObservableList;
//!
//! let list = ObservableList::from_vec(vec!['A', 'B', 'C']);
//! list.changed().connect(|delta| {
//!     for (index, element) in &delta.moved {
//!         println!("{} moved from {} to {}", element.1, element.0, index);
//!     }
//! });
//!
//! list.batch(|items| {
//!     items.move_to(&'C', 0);
//! });
//! ```

pub mod logging;
pub mod observable;
pub mod property;
pub mod signal;

pub use logging::ChangeSummary;
pub use observable::{BatchList, ListDelta, ObservableList, ObservableSet, SetDelta, diff};
pub use property::ObservableProperty;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
