//! Key input to focus traversal.
//!
//! A [`KeyInputService`] delivers raw key states to listeners. The
//! [`KeyboardFocusManager`] listens to one, and for every key state:
//!
//! 1. builds a [`KeyEvent`] addressed to the focus owner (and stops, leaving
//!    the key unconsumed, if nothing has focus),
//! 2. runs preprocessors in registration order until one consumes it,
//! 3. matches it against the traversal keys of the focused view (its own
//!    override, else the manager's defaults) for Forward, Backward, Upward,
//!    and Downward if the view is a focus cycle root; a match moves focus and
//!    consumes the event, otherwise the view handles the event itself,
//! 4. runs postprocessors in registration order until one consumes it.
//!
//! Listeners return true when the key was *not* consumed, so the service
//! keeps propagating it.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use horizon_trellis_core::logging::targets;
use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;

use super::{FocusManager, TraversalKeys, TraversalType};
use crate::event::{KeyEvent, KeyState};
use crate::view::View;

slotmap::new_key_type! {
    /// Identifies a listener registered with a [`KeyInputService`].
    pub struct KeyListenerId;

    /// Identifies a key event pre- or postprocessor.
    pub struct ProcessorId;
}

/// Receives key states; returns true if the key was not consumed.
pub type KeyListener = Arc<dyn Fn(KeyState) -> bool + Send + Sync>;

type Processor = Arc<dyn Fn(&mut KeyEvent) + Send + Sync>;

/// Source of raw key input.
pub trait KeyInputService: Send + Sync {
    fn add_listener(&self, listener: KeyListener) -> KeyListenerId;

    /// Returns false if `id` was not registered.
    fn remove_listener(&self, id: KeyListenerId) -> bool;
}

// =========================================================================
// KeyInputRouter
// =========================================================================

/// A [`KeyInputService`] fed by calling [`dispatch`](Self::dispatch).
#[derive(Default)]
pub struct KeyInputRouter {
    listeners: Mutex<SlotMap<KeyListenerId, KeyListener>>,
}

impl KeyInputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Delivers `state` to every listener until one consumes it.
    ///
    /// Returns true if no listener consumed the key. Listeners may register
    /// or remove listeners while being called.
    pub fn dispatch(&self, state: KeyState) -> bool {
        let listeners: Vec<KeyListener> = self.listeners.lock().values().cloned().collect();
        listeners.iter().all(|listener| listener(state))
    }
}

impl KeyInputService for KeyInputRouter {
    fn add_listener(&self, listener: KeyListener) -> KeyListenerId {
        self.listeners.lock().insert(listener)
    }

    fn remove_listener(&self, id: KeyListenerId) -> bool {
        self.listeners.lock().remove(id).is_some()
    }
}

// =========================================================================
// KeyboardFocusManager
// =========================================================================

#[derive(Default)]
struct Processors {
    ids: SlotMap<ProcessorId, ()>,
    pre: Vec<(ProcessorId, Processor)>,
    post: Vec<(ProcessorId, Processor)>,
}

struct Inner {
    focus: Arc<dyn FocusManager>,
    defaults: RwLock<TraversalKeys>,
    processors: Mutex<Processors>,
}

impl Inner {
    fn handle_key(&self, state: KeyState) -> bool {
        let Some(owner) = self.focus.focus_owner() else {
            tracing::trace!(target: targets::FOCUS, key = %state, "no focus owner");
            return false;
        };
        let Some(view) = self.focus.view(owner) else {
            return false;
        };

        let mut event = KeyEvent::new(owner, state);

        let preprocessors = self.preprocessors();
        run_until_consumed(&preprocessors, &mut event);

        if !event.is_consumed() {
            match self.matching_traversal(view.as_ref(), &state) {
                Some(traversal) => {
                    tracing::trace!(target: targets::FOCUS, key = %state, %traversal, "traversal key");
                    self.focus.move_focus(owner, traversal);
                    event.consume();
                }
                None => view.handle_key_event(&mut event),
            }
        }

        if !event.is_consumed() {
            let postprocessors = self.postprocessors();
            run_until_consumed(&postprocessors, &mut event);
        }

        !event.is_consumed()
    }

    fn matching_traversal(&self, view: &dyn View, state: &KeyState) -> Option<TraversalType> {
        let defaults = self.defaults.read();
        let bound = |traversal: TraversalType| -> bool {
            match view.traversal_keys(traversal) {
                Some(keys) => keys.contains(state),
                None => defaults.matches(traversal, state),
            }
        };

        let mut candidates = vec![
            TraversalType::Backward,
            TraversalType::Forward,
            TraversalType::Upward,
        ];
        if view.is_focus_cycle_root() {
            candidates.push(TraversalType::Downward);
        }
        candidates.into_iter().find(|traversal| bound(*traversal))
    }

    fn preprocessors(&self) -> Vec<Processor> {
        self.processors.lock().pre.iter().map(|(_, p)| p.clone()).collect()
    }

    fn postprocessors(&self) -> Vec<Processor> {
        self.processors.lock().post.iter().map(|(_, p)| p.clone()).collect()
    }
}

fn run_until_consumed(processors: &[Processor], event: &mut KeyEvent) {
    for processor in processors {
        processor(event);
        if event.is_consumed() {
            break;
        }
    }
}

/// Routes key input to focus traversal and the focused view.
///
/// The manager registers itself with its [`KeyInputService`] on creation and
/// unregisters on [`shutdown`](Self::shutdown) or drop.
pub struct KeyboardFocusManager {
    inner: Arc<Inner>,
    service: Arc<dyn KeyInputService>,
    listener: Mutex<Option<KeyListenerId>>,
}

impl KeyboardFocusManager {
    /// Create a manager and start listening to `service`.
    pub fn new(
        service: Arc<dyn KeyInputService>,
        focus: Arc<dyn FocusManager>,
        defaults: TraversalKeys,
    ) -> Self {
        let inner = Arc::new(Inner {
            focus,
            defaults: RwLock::new(defaults),
            processors: Mutex::new(Processors::default()),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let listener = service.add_listener(Arc::new(move |state: KeyState| {
            weak.upgrade().is_none_or(|inner| inner.handle_key(state))
        }));
        tracing::debug!(target: targets::FOCUS, "keyboard focus manager listening");

        Self {
            inner,
            service,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Handles one key state.
    ///
    /// Returns true if the key was not consumed, false if it was consumed
    /// or nothing has focus.
    pub fn handle_key(&self, state: KeyState) -> bool {
        self.inner.handle_key(state)
    }

    /// Stops listening to the key input service.
    ///
    /// Returns false if the manager was already shut down.
    pub fn shutdown(&self) -> bool {
        let Some(id) = self.listener.lock().take() else {
            return false;
        };
        tracing::debug!(target: targets::FOCUS, "keyboard focus manager shut down");
        self.service.remove_listener(id)
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Traversal keys used for views without their own.
    pub fn default_traversal_keys(&self) -> TraversalKeys {
        self.inner.defaults.read().clone()
    }

    pub fn set_default_traversal_keys(&self, keys: TraversalKeys) {
        *self.inner.defaults.write() = keys;
    }

    /// Default keys for one traversal type.
    pub fn default_keys_for(&self, traversal: TraversalType) -> HashSet<KeyState> {
        self.inner
            .defaults
            .read()
            .get(traversal)
            .cloned()
            .unwrap_or_default()
    }

    // =========================================================================
    // Processors
    // =========================================================================

    /// Adds a processor that sees key events before traversal handling.
    pub fn add_preprocessor<F>(&self, processor: F) -> ProcessorId
    where
        F: Fn(&mut KeyEvent) + Send + Sync + 'static,
    {
        let mut processors = self.inner.processors.lock();
        let id = processors.ids.insert(());
        processors.pre.push((id, Arc::new(processor)));
        id
    }

    pub fn remove_preprocessor(&self, id: ProcessorId) -> bool {
        let mut processors = self.inner.processors.lock();
        let before = processors.pre.len();
        processors.pre.retain(|(p, _)| *p != id);
        let removed = processors.pre.len() != before;
        if removed {
            processors.ids.remove(id);
        }
        removed
    }

    /// Adds a processor that sees key events nothing else consumed.
    pub fn add_postprocessor<F>(&self, processor: F) -> ProcessorId
    where
        F: Fn(&mut KeyEvent) + Send + Sync + 'static,
    {
        let mut processors = self.inner.processors.lock();
        let id = processors.ids.insert(());
        processors.post.push((id, Arc::new(processor)));
        id
    }

    pub fn remove_postprocessor(&self, id: ProcessorId) -> bool {
        let mut processors = self.inner.processors.lock();
        let before = processors.post.len();
        processors.post.retain(|(p, _)| *p != id);
        let removed = processors.post.len() != before;
        if removed {
            processors.ids.remove(id);
        }
        removed
    }
}

impl Drop for KeyboardFocusManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

static_assertions::assert_impl_all!(KeyboardFocusManager: Send, Sync);
static_assertions::assert_impl_all!(KeyInputRouter: Send, Sync);
