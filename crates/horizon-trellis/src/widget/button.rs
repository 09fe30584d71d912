//! Push and toggle buttons, and exclusive button groups.
//!
//! A [`Button`] is a view over a shared [`ButtonModel`] that renders through
//! its installed [`Behavior`]. A [`ButtonGroup`] keeps at most one of its
//! models selected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ObservableProperty, Signal};
use parking_lot::{Mutex, RwLock};

use crate::event::{Key, KeyEvent, KeyEventKind};
use crate::render::{Canvas, Color, Point, Rect};
use crate::view::{Behavior, BehaviorSlot, Styled, View, ViewStyle};

// =========================================================================
// ButtonModel
// =========================================================================

/// State shared by the buttons that present it.
///
/// # Signals
///
/// - `fired`: Emitted when the button is clicked.
pub struct ButtonModel {
    selected: ObservableProperty<bool>,
    pressed: ObservableProperty<bool>,
    group: Mutex<Option<Weak<GroupInner>>>,

    /// Emitted when the button is clicked.
    pub fired: Signal<()>,
}

impl Default for ButtonModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonModel {
    pub fn new() -> Self {
        Self {
            selected: ObservableProperty::new(false),
            pressed: ObservableProperty::new(false),
            group: Mutex::new(None),
            fired: Signal::new(),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Selects or deselects the model, subject to its group.
    ///
    /// Returns true if the selected state changed.
    pub fn set_selected(&self, selected: bool) -> bool {
        let group = self.group();
        if !selected && group.as_ref().is_some_and(|g| !g.allows_deselect(self)) {
            tracing::debug!(target: targets::SELECTION, "group keeps its selected member");
            return false;
        }

        let before = self.selected.get();
        self.selected.set(selected);
        if let Some(group) = group {
            group.selection_changed(self, selected);
        }
        self.selected.get() != before
    }

    /// Emitted with `(old, new)` when the selected state changes.
    pub fn selected_changed(&self) -> &Signal<(bool, bool)> {
        self.selected.changed()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    pub fn set_pressed(&self, pressed: bool) -> bool {
        self.pressed.set(pressed)
    }

    pub fn pressed_changed(&self) -> &Signal<(bool, bool)> {
        self.pressed.changed()
    }

    /// Emits `fired`.
    pub fn click(&self) {
        self.fired.emit(());
    }

    fn group(&self) -> Option<Arc<GroupInner>> {
        self.group.lock().as_ref().and_then(Weak::upgrade)
    }

    fn set_group(&self, group: Option<Weak<GroupInner>>) {
        *self.group.lock() = group;
    }
}

// =========================================================================
// ButtonGroup
// =========================================================================

#[derive(Default)]
struct GroupState {
    members: Vec<Arc<ButtonModel>>,
    selected: Option<Arc<ButtonModel>>,
}

struct GroupInner {
    allow_deselect_all: AtomicBool,
    state: Mutex<GroupState>,
}

impl GroupInner {
    fn allows_deselect(&self, model: &ButtonModel) -> bool {
        self.allow_deselect_all.load(Ordering::Relaxed)
            || !self
                .state
                .lock()
                .selected
                .as_ref()
                .is_some_and(|current| std::ptr::eq(current.as_ref(), model))
    }

    fn selection_changed(&self, model: &ButtonModel, selected: bool) {
        let allow_deselect_all = self.allow_deselect_all.load(Ordering::Relaxed);
        let (deselect, reselect) = {
            let mut state = self.state.lock();
            let Some(member) = state
                .members
                .iter()
                .find(|m| std::ptr::eq(m.as_ref(), model))
                .cloned()
            else {
                return;
            };
            let is_current = state
                .selected
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &member));

            let mut deselect = None;
            if selected && !is_current {
                deselect = state.selected.replace(member);
            } else if !selected && is_current && allow_deselect_all {
                state.selected = None;
            }

            let reselect = if allow_deselect_all {
                None
            } else {
                state.selected.clone()
            };
            (deselect, reselect)
        };

        if let Some(previous) = deselect {
            previous.selected.set(false);
        }
        if let Some(current) = reselect {
            current.selected.set(true);
        }
    }
}

/// Keeps at most one of its button models selected.
///
/// Selecting a member deselects the previously selected one. Unless
/// `allow_deselect_all` is set, the selected member cannot be deselected
/// directly; only selecting another member moves the selection.
pub struct ButtonGroup {
    inner: Arc<GroupInner>,
}

impl Default for ButtonGroup {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ButtonGroup {
    pub fn new(allow_deselect_all: bool) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                allow_deselect_all: AtomicBool::new(allow_deselect_all),
                state: Mutex::new(GroupState::default()),
            }),
        }
    }

    pub fn allow_deselect_all(&self) -> bool {
        self.inner.allow_deselect_all.load(Ordering::Relaxed)
    }

    pub fn set_allow_deselect_all(&self, allow: bool) {
        self.inner.allow_deselect_all.store(allow, Ordering::Relaxed);
    }

    /// Adds `model` to the group.
    ///
    /// If the model is selected while another member already is, the model
    /// is deselected. Returns false if it was already a member.
    pub fn add(&self, model: &Arc<ButtonModel>) -> bool {
        let deselect = {
            let mut state = self.inner.state.lock();
            if state.members.iter().any(|m| Arc::ptr_eq(m, model)) {
                return false;
            }
            state.members.push(model.clone());
            model.set_group(Some(Arc::downgrade(&self.inner)));

            if model.is_selected() {
                if state.selected.is_none() {
                    state.selected = Some(model.clone());
                    false
                } else {
                    true
                }
            } else {
                false
            }
        };

        if deselect {
            tracing::debug!(target: targets::SELECTION, "group already has a selection, deselecting new member");
            model.selected.set(false);
        }
        true
    }

    /// Removes `model` from the group.
    pub fn remove(&self, model: &Arc<ButtonModel>) -> bool {
        let mut state = self.inner.state.lock();
        let before = state.members.len();
        state.members.retain(|m| !Arc::ptr_eq(m, model));
        if state.members.len() == before {
            return false;
        }
        model.set_group(None);
        if state.selected.as_ref().is_some_and(|s| Arc::ptr_eq(s, model)) {
            state.selected = None;
        }
        true
    }

    /// Removes every member.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        for member in state.members.drain(..) {
            member.set_group(None);
        }
        state.selected = None;
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selected member, if any.
    pub fn selected(&self) -> Option<Arc<ButtonModel>> {
        self.inner.state.lock().selected.clone()
    }
}

// =========================================================================
// Button
// =========================================================================

/// A clickable button view.
///
/// Space or Enter clicks a focused button. Toggle buttons flip their model's
/// selected state on every click.
pub struct Button {
    text: RwLock<String>,
    model: Arc<ButtonModel>,
    toggles: bool,
    enabled: AtomicBool,
    bounds: RwLock<Rect>,
    style: ViewStyle,
    behavior: BehaviorSlot<Button>,
}

impl Button {
    /// A push button with its own model.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_model(text, Arc::new(ButtonModel::new()))
    }

    /// A toggle button with its own model.
    pub fn toggle(text: impl Into<String>) -> Self {
        let mut button = Self::new(text);
        button.toggles = true;
        button
    }

    /// A push button presenting `model`.
    pub fn with_model(text: impl Into<String>, model: Arc<ButtonModel>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            model,
            toggles: false,
            enabled: AtomicBool::new(true),
            bounds: RwLock::new(Rect::ZERO),
            style: ViewStyle::new(),
            behavior: BehaviorSlot::new(),
        }
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
    }

    pub fn model(&self) -> &Arc<ButtonModel> {
        &self.model
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.write() = bounds;
    }

    /// Installs `behavior`, uninstalling the current one.
    pub fn set_behavior(&self, behavior: Option<Arc<dyn Behavior<Button>>>) -> bool {
        self.behavior.set(self, behavior)
    }

    pub fn behavior(&self) -> Option<Arc<dyn Behavior<Button>>> {
        self.behavior.get()
    }

    /// Hit test through the behavior.
    pub fn contains(&self, point: Point) -> bool {
        self.behavior.contains(self, point)
    }

    /// Presses and releases the button. Disabled buttons ignore clicks.
    pub fn click(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.model.set_pressed(true);
        self.model.set_pressed(false);
        if self.toggles {
            self.model.set_selected(!self.model.is_selected());
        }
        self.model.click();
        true
    }
}

impl Styled for Button {
    fn style(&self) -> &ViewStyle {
        &self.style
    }
}

impl View for Button {
    fn is_focusable(&self) -> bool {
        self.is_enabled()
    }

    fn handle_key_event(&self, event: &mut KeyEvent) {
        let state = event.state();
        if state.kind != KeyEventKind::Pressed || state.modifiers.any() {
            return;
        }
        if matches!(state.key, Key::Space | Key::Enter) && self.click() {
            event.consume();
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        self.behavior.render(self, canvas);
    }

    fn bounds(&self) -> Rect {
        *self.bounds.read()
    }
}

/// Flat button look: a filled rectangle with the label at its origin.
///
/// Fills in whichever of the button's background and foreground colors are
/// unset while installed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicButtonBehavior {
    pub background: Color,
    pub foreground: Color,
    pub selected_background: Color,
}

impl Default for BasicButtonBehavior {
    fn default() -> Self {
        Self {
            background: Color::LIGHT_GRAY,
            foreground: Color::BLACK,
            selected_background: Color::GRAY,
        }
    }
}

impl Behavior<Button> for BasicButtonBehavior {
    fn install(&self, view: &Button) {
        let style = view.style();
        if style.background.get().is_none() {
            style.background.set(Some(self.background));
        }
        if style.foreground.get().is_none() {
            style.foreground.set(Some(self.foreground));
        }
    }

    fn render(&self, view: &Button, canvas: &mut dyn Canvas) {
        let style = view.style();
        let background = if view.model().is_selected() {
            self.selected_background
        } else {
            style.background.get().unwrap_or(self.background)
        };
        let bounds = view.bounds();
        canvas.fill_rect(bounds, background);
        canvas.draw_text(
            &view.text(),
            bounds.origin,
            style.foreground.get().unwrap_or(self.foreground),
        );
    }
}

static_assertions::assert_impl_all!(Button: Send, Sync);
static_assertions::assert_impl_all!(ButtonGroup: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyState, KeyboardModifiers};
    use crate::render::{DrawCommand, RecordingCanvas};
    use crate::view::ViewId;
    use std::sync::atomic::AtomicUsize;

    fn selected_model() -> Arc<ButtonModel> {
        let model = Arc::new(ButtonModel::new());
        model.set_selected(true);
        model
    }

    #[test]
    fn test_key_click() {
        let button = Button::new("OK");
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        button.model().fired.connect(move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut space = KeyEvent::new(ViewId::default(), KeyState::key_only(Key::Space));
        button.handle_key_event(&mut space);
        assert!(space.is_consumed());

        let mut ctrl_enter =
            KeyEvent::new(ViewId::default(), KeyState::pressed(Key::Enter, KeyboardModifiers::CTRL));
        button.handle_key_event(&mut ctrl_enter);
        assert!(!ctrl_enter.is_consumed());

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!button.model().is_pressed());
    }

    #[test]
    fn test_disabled_button() {
        let button = Button::new("OK");
        button.set_enabled(false);
        assert!(!button.is_focusable());
        assert!(!button.click());

        let mut enter = KeyEvent::new(ViewId::default(), KeyState::key_only(Key::Enter));
        button.handle_key_event(&mut enter);
        assert!(!enter.is_consumed());
    }

    #[test]
    fn test_toggle_button() {
        let button = Button::toggle("Bold");
        button.click();
        assert!(button.model().is_selected());
        button.click();
        assert!(!button.model().is_selected());
    }

    #[test]
    fn test_group_selection_is_exclusive() {
        let group = ButtonGroup::new(false);
        let first = Arc::new(ButtonModel::new());
        let second = Arc::new(ButtonModel::new());
        group.add(&first);
        group.add(&second);

        first.set_selected(true);
        assert!(group.selected().is_some_and(|s| Arc::ptr_eq(&s, &first)));

        second.set_selected(true);
        assert!(!first.is_selected());
        assert!(second.is_selected());
        assert!(group.selected().is_some_and(|s| Arc::ptr_eq(&s, &second)));
    }

    #[test]
    fn test_group_keeps_selection_without_deselect_all() {
        let group = ButtonGroup::new(false);
        let model = Arc::new(ButtonModel::new());
        group.add(&model);
        model.set_selected(true);

        assert!(!model.set_selected(false));
        assert!(model.is_selected());

        group.set_allow_deselect_all(true);
        assert!(model.set_selected(false));
        assert!(group.selected().is_none());
    }

    #[test]
    fn test_refused_deselect_does_not_notify() {
        let group = ButtonGroup::new(false);
        let model = Arc::new(ButtonModel::new());
        group.add(&model);
        model.set_selected(true);

        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        model.selected_changed().connect(move |change: &(bool, bool)| {
            changes_clone.lock().push(*change);
        });

        assert!(!model.set_selected(false));
        assert!(changes.lock().is_empty());

        group.set_allow_deselect_all(true);
        assert!(model.set_selected(false));
        assert_eq!(*changes.lock(), vec![(true, false)]);
    }

    #[test]
    fn test_adding_second_selected_model_deselects_it() {
        let group = ButtonGroup::default();
        let first = selected_model();
        let second = selected_model();

        assert!(group.add(&first));
        assert!(group.add(&second));
        assert!(!group.add(&second));
        assert!(first.is_selected());
        assert!(!second.is_selected());
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_removed_model_is_independent() {
        let group = ButtonGroup::new(false);
        let first = Arc::new(ButtonModel::new());
        let second = Arc::new(ButtonModel::new());
        group.add(&first);
        group.add(&second);
        first.set_selected(true);

        assert!(group.remove(&first));
        assert!(group.selected().is_none());
        second.set_selected(true);
        assert!(first.is_selected());

        group.clear();
        assert!(group.is_empty());
        assert!(second.set_selected(false));
    }

    #[test]
    fn test_toggle_buttons_in_group() {
        let group = ButtonGroup::new(false);
        let left = Button::toggle("Left");
        let right = Button::toggle("Right");
        group.add(left.model());
        group.add(right.model());

        left.click();
        right.click();
        assert!(!left.model().is_selected());
        assert!(right.model().is_selected());
    }

    #[test]
    fn test_behavior_renders_and_restores_style() {
        let button = Button::new("OK");
        button.set_bounds(Rect::new(0.0, 0.0, 40.0, 20.0));
        let mut canvas = RecordingCanvas::new();

        button.render(&mut canvas);
        assert!(canvas.commands().is_empty());

        let behavior: Arc<dyn Behavior<Button>> = Arc::new(BasicButtonBehavior::default());
        assert!(button.set_behavior(Some(behavior)));
        assert_eq!(button.style().background.get(), Some(Color::LIGHT_GRAY));

        button.render(&mut canvas);
        assert_eq!(canvas.take(), vec![
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 40.0, 20.0),
                color: Color::LIGHT_GRAY,
            },
            DrawCommand::Text {
                text: "OK".to_string(),
                origin: Point::ZERO,
                color: Color::BLACK,
            },
        ]);
        assert!(button.contains(Point::new(39.0, 19.0)));

        assert!(button.set_behavior(None));
        assert_eq!(button.style().background.get(), None);
        assert_eq!(button.style().foreground.get(), None);
    }
}
