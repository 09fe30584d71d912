//! Observable single values.
//!
//! [`ObservableProperty<T>`] wraps one value and emits `(old, new)` on its
//! [`changed`](ObservableProperty::changed) signal whenever `set` stores a
//! value that differs from the current one.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::ObservableProperty;
//!
//! let enabled = ObservableProperty::new(true);
//! enabled.changed().connect(|(old, new)| {
//!     println!("enabled: {} -> {}", old, new);
//! });
//!
//! assert!(enabled.set(false));
//! assert!(!enabled.set(false));
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::Signal;

/// A value with change notification.
pub struct ObservableProperty<T> {
    value: RwLock<T>,
    changed: Signal<(T, T)>,
}

impl<T> ObservableProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Signal::new(),
        }
    }

    /// Signal carrying `(old, new)` after each effective change.
    pub fn changed(&self) -> &Signal<(T, T)> {
        &self.changed
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value, returning `true` if it changed.
    ///
    /// Observers are notified after the lock is released, so they may read
    /// or set this property again.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the previous one if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let old = {
            let mut current = self.value.write();
            if *current == value {
                return None;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        tracing::trace!(target: targets::PROPERTY, "property changed");
        self.changed.emit((old.clone(), value));
        Some(old)
    }

    /// Set the value without change notification.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T> Default for ObservableProperty<T>
where
    T: Clone + PartialEq + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ObservableProperty<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &self.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(ObservableProperty<String>: Send, Sync);
