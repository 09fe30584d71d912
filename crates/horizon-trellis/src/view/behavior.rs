//! Pluggable look and feel for views.
//!
//! A [`Behavior`] paints a view and may adjust its style while installed.
//! [`BehaviorSlot`] owns the installed behavior for one view and guarantees
//! that style changes made by a behavior do not outlive it: the style is
//! captured before `install` and put back after `uninstall`.

use std::sync::Arc;

use horizon_trellis_core::ObservableProperty;
use parking_lot::Mutex;

use super::View;
use crate::render::{Canvas, Color, Point};

/// View-level style that behaviors may change.
#[derive(Debug, Default)]
pub struct ViewStyle {
    pub background: ObservableProperty<Option<Color>>,
    pub foreground: ObservableProperty<Option<Color>>,
}

/// A copy of a [`ViewStyle`]'s values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleSnapshot {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
}

impl ViewStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            background: self.background.get(),
            foreground: self.foreground.get(),
        }
    }

    /// Puts back the values of `snapshot`. Only differing values notify.
    pub fn restore(&self, snapshot: &StyleSnapshot) {
        self.background.set(snapshot.background);
        self.foreground.set(snapshot.foreground);
    }
}

/// Views whose style a behavior may change.
pub trait Styled {
    fn style(&self) -> &ViewStyle;
}

/// Look and feel for views of type `V`.
pub trait Behavior<V: View + ?Sized>: Send + Sync {
    /// Called when the behavior is attached to `view`.
    fn install(&self, _view: &V) {}

    /// Called when the behavior is detached from `view`.
    fn uninstall(&self, _view: &V) {}

    fn render(&self, view: &V, canvas: &mut dyn Canvas);

    /// Hit test in the view's coordinate space.
    fn contains(&self, view: &V, point: Point) -> bool {
        view.bounds().contains(point)
    }
}

struct Installed<V: View + ?Sized> {
    behavior: Arc<dyn Behavior<V>>,
    style: StyleSnapshot,
}

/// The behavior currently installed on one view.
pub struct BehaviorSlot<V: View + ?Sized> {
    installed: Mutex<Option<Installed<V>>>,
}

impl<V: View + ?Sized> Default for BehaviorSlot<V> {
    fn default() -> Self {
        Self {
            installed: Mutex::new(None),
        }
    }
}

impl<V> BehaviorSlot<V>
where
    V: View + Styled + ?Sized,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// The installed behavior.
    pub fn get(&self) -> Option<Arc<dyn Behavior<V>>> {
        self.installed.lock().as_ref().map(|i| i.behavior.clone())
    }

    /// Replaces the behavior of `view`.
    ///
    /// The previous behavior is uninstalled and the style it found restored
    /// before the new one is installed. Setting the behavior that is already
    /// installed does nothing. Returns true if the slot changed.
    pub fn set(&self, view: &V, behavior: Option<Arc<dyn Behavior<V>>>) -> bool {
        let previous = {
            let mut installed = self.installed.lock();
            let same = match (installed.as_ref(), behavior.as_ref()) {
                (Some(current), Some(next)) => Arc::ptr_eq(&current.behavior, next),
                (None, None) => true,
                _ => false,
            };
            if same {
                return false;
            }
            installed.take()
        };

        if let Some(previous) = previous {
            previous.behavior.uninstall(view);
            view.style().restore(&previous.style);
        }

        if let Some(behavior) = behavior {
            let style = view.style().snapshot();
            behavior.install(view);
            *self.installed.lock() = Some(Installed { behavior, style });
        }
        true
    }

    /// Renders `view` through the installed behavior.
    ///
    /// Returns false if no behavior is installed.
    pub fn render(&self, view: &V, canvas: &mut dyn Canvas) -> bool {
        match self.get() {
            Some(behavior) => {
                behavior.render(view, canvas);
                true
            }
            None => false,
        }
    }

    /// Hit test through the installed behavior, falling back to the bounds.
    pub fn contains(&self, view: &V, point: Point) -> bool {
        match self.get() {
            Some(behavior) => behavior.contains(view, point),
            None => view.bounds().contains(point),
        }
    }
}
