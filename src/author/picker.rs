//! Authoring mode: point-and-click step building.
//!
//! The picker shares the overlay machinery with a clickthrough, low-opacity
//! configuration so the page stays interactive. Pointer-up hit-tests the
//! element under the cursor (with overlay capture suspended so the picker
//! never selects itself), resolves the nearest ancestor matching the
//! configured selector, and opens an editable text box anchored to it.

use std::time::Duration;

use kurbo::Point;

use crate::config::options::{Mode, OverlayType, TourOptions};
use crate::overlay::style::{self, PICKED_CLASS};
use crate::overlay::Overlay;
use crate::runtime::clock::{Clock, Debouncer, SystemClock};
use crate::surface::Surface;
use crate::tour::input::{InputEvent, Key};
use crate::tour::lifecycle::{ExitHandle, ExitReason, ExitResult, ExitSignal};
use crate::tour::step::{Sequence, Step, StepId};

/// Placeholder text for a freshly picked element.
const PLACEHOLDER: &str = "Click to Edit\nCtrl+S to save";

/// Quiet window for debounced edits and saves.
const EDIT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Picker lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PickerState {
    /// Not active.
    #[default]
    Idle,
    /// Pointer capture active, waiting for a pick.
    Picking,
    /// Text box focused and editable.
    Editing,
}

/// Authoring configuration.
#[derive(Clone, Debug)]
pub struct AuthorOptions {
    /// Selector pickable elements must match (nearest ancestor wins).
    pub selector: String,
    /// Whether `Escape` ends the session.
    pub escape_to_exit: bool,
}

impl Default for AuthorOptions {
    fn default() -> Self {
        Self {
            selector: "[id]".to_string(),
            escape_to_exit: true,
        }
    }
}

/// Progress callback for authoring: index of the touched step plus the
/// sequence as authored so far.
pub type AuthorProgressFn = Box<dyn FnMut(usize, &Sequence)>;

/// Interactive step-authoring session.
pub struct AuthorSession {
    options: AuthorOptions,
    render_options: TourOptions,
    state: PickerState,
    sequence: Sequence,
    index: usize,
    current_id: Option<StepId>,
    current_text: String,
    current_target: Option<String>,
    overlay: Overlay,
    signal: ExitSignal,
    on_progress: Option<AuthorProgressFn>,
    pending_edit: Debouncer<String>,
    pending_save: Debouncer<()>,
}

impl AuthorSession {
    /// Create a session over the given surface with the system clock.
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self::with_clock(surface, Box::new(SystemClock))
    }

    /// Create a session with an explicit clock.
    pub fn with_clock(surface: Box<dyn Surface>, clock: Box<dyn Clock>) -> Self {
        // The authoring overlay must not eat the clicks it exists to observe.
        let render_options = TourOptions {
            mode: Mode::Single,
            mask_opacity: Some(0.2),
            animation_time_ms: 300,
            escape_to_exit: false,
            overlay_type: OverlayType::Clickthrough,
            shadow_targets: false,
            click_to_progress: false,
            bind_keys: false,
            overlay_id: "waypost-author".to_string(),
            ..TourOptions::default()
        };

        Self {
            options: AuthorOptions::default(),
            render_options,
            state: PickerState::Idle,
            sequence: Vec::new(),
            index: 0,
            current_id: None,
            current_text: String::new(),
            current_target: None,
            overlay: Overlay::new(surface, clock),
            signal: ExitSignal::new(),
            on_progress: None,
            pending_edit: Debouncer::new(EDIT_DEBOUNCE),
            pending_save: Debouncer::new(EDIT_DEBOUNCE),
        }
    }

    /// Replace the authoring options.
    pub fn set_options(&mut self, options: AuthorOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Attach a progress callback.
    pub fn on_progress(&mut self, f: AuthorProgressFn) -> &mut Self {
        self.on_progress = Some(f);
        self
    }

    /// Current picker state.
    pub fn state(&self) -> PickerState {
        self.state
    }

    /// The sequence as authored so far.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Start picking, optionally resuming an existing sequence.
    pub fn begin(&mut self, sequence: Option<Sequence>) -> ExitHandle {
        self.overlay.arm(&self.render_options);
        self.overlay
            .surface_mut()
            .inject_stylesheet(&style::author_stylesheet(&self.options.selector));
        self.overlay.surface_mut().add_class("body", "waypost-picking");
        if self.signal.is_resolved() {
            self.signal.rearm();
        }
        self.state = PickerState::Picking;
        if let Some(sequence) = sequence {
            self.sequence = sequence;
            self.index = 0;
            if !self.sequence.is_empty() {
                self.show_step(self.index);
            }
        }
        self.signal.subscribe()
    }

    /// Dispatch a host input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        if self.state == PickerState::Idle {
            return;
        }
        match event {
            InputEvent::PointerUp { pos, .. } => self.pick(pos),
            InputEvent::Key { key, ctrl } => match key {
                Key::Escape => {
                    if self.options.escape_to_exit {
                        self.finish(ExitReason::Standard);
                    }
                }
                Key::ArrowRight if ctrl => self.next(),
                Key::ArrowLeft if ctrl => self.previous(),
                Key::Char('s') if ctrl => self.save(),
                _ => {}
            },
        }
    }

    /// Hit-test and select the element under the cursor.
    pub fn pick(&mut self, pos: Point) {
        let overlay_id = self.render_options.overlay_id.clone();
        let capture = matches!(
            self.render_options.overlay_type,
            OverlayType::Blocking | OverlayType::Partial
        );
        self.overlay.surface_mut().set_pointer_capture(&overlay_id, false);
        let hit = self.overlay.surface().element_at(pos);
        self.overlay
            .surface_mut()
            .set_pointer_capture(&overlay_id, capture);

        let Some(hit) = hit else {
            return;
        };
        let Some(target) = self
            .overlay
            .surface()
            .closest_matching(&hit, &self.options.selector)
        else {
            return;
        };

        // A target that already has a step is reopened; a fresh one starts
        // from the placeholder.
        let (id, text) = match self
            .sequence
            .iter()
            .find(|s| s.target.as_deref() == Some(target.as_str()))
        {
            Some(step) => (step.id.clone(), step.text.clone()),
            None => (self.generated_id(), PLACEHOLDER.to_string()),
        };
        self.open_editor(id, text, Some(target));
    }

    /// Debounced capture of the text box content while editing.
    pub fn edit_text(&mut self, text: impl Into<String>) {
        if self.state != PickerState::Editing {
            return;
        }
        let now = self.overlay_now();
        self.pending_edit.submit(text.into(), now);
    }

    /// Request a save of the current edit (debounced).
    pub fn save(&mut self) {
        if self.state != PickerState::Editing {
            return;
        }
        if let Some(text) = self.pending_edit.flush() {
            self.current_text = text;
        }
        let now = self.overlay_now();
        self.pending_save.submit((), now);
    }

    /// Run due debounced work; call from the host event loop.
    pub fn pump(&mut self) {
        let now = self.overlay_now();
        if let Some(text) = self.pending_edit.flush_due(now) {
            self.current_text = text;
        }
        if self.pending_save.flush_due(now).is_some() {
            self.apply_save();
        }
    }

    /// Force pending edits and saves through their windows.
    pub fn flush(&mut self) {
        if let Some(text) = self.pending_edit.flush() {
            self.current_text = text;
        }
        if self.pending_save.flush().is_some() {
            self.apply_save();
        }
    }

    /// Show the next authored step.
    pub fn next(&mut self) {
        if self.index + 1 >= self.sequence.len() {
            return;
        }
        self.index += 1;
        self.emit_progress(self.index);
        self.show_step(self.index);
    }

    /// Show the previous authored step.
    pub fn previous(&mut self) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.emit_progress(self.index);
        self.show_step(self.index);
    }

    /// End the session, resolving the lifecycle signal.
    pub fn finish(&mut self, reason: ExitReason) -> Sequence {
        self.flush();
        self.overlay
            .surface_mut()
            .remove_class_everywhere(PICKED_CLASS);
        self.overlay
            .surface_mut()
            .remove_class_everywhere("waypost-picking");
        self.overlay.remove(&self.render_options);
        self.state = PickerState::Idle;
        self.signal.resolve(ExitResult {
            reason,
            progress: self.index,
        });
        tracing::debug!(steps = self.sequence.len(), "authoring session finished");
        self.sequence.clone()
    }

    fn overlay_now(&self) -> std::time::Instant {
        self.overlay.now()
    }

    fn generated_id(&self) -> StepId {
        StepId::new(format!("text{}", self.sequence.len()))
            .expect("generated id matches the id grammar")
    }

    fn open_editor(&mut self, id: StepId, text: String, target: Option<String>) {
        self.overlay
            .surface_mut()
            .remove_class_everywhere(PICKED_CLASS);
        if let Some(target) = target.as_deref() {
            self.overlay.surface_mut().add_class(target, PICKED_CLASS);
        }

        let step = Step {
            id: id.clone(),
            text: text.clone(),
            target: target.clone(),
        };
        self.overlay.draw_editable_step(&step, &self.render_options);

        self.current_id = Some(id);
        self.current_text = text;
        self.current_target = target;
        self.state = PickerState::Editing;
    }

    fn show_step(&mut self, index: usize) {
        let Some(step) = self.sequence.get(index).cloned() else {
            return;
        };
        self.open_editor(step.id, step.text, step.target);
    }

    /// Update the step matching the current id, or append a new one.
    fn apply_save(&mut self) {
        let Some(id) = self.current_id.clone() else {
            return;
        };
        let step = Step {
            id: id.clone(),
            text: self.current_text.clone(),
            target: self.current_target.clone(),
        };
        if let Some(pos) = self.sequence.iter().position(|s| s.id == id) {
            self.sequence[pos] = step;
            self.index = pos;
        } else {
            self.sequence.push(step);
            self.index = self.sequence.len() - 1;
        }
        self.emit_progress(self.index);
    }

    fn emit_progress(&mut self, index: usize) {
        if let Some(f) = self.on_progress.as_mut() {
            f(index, &self.sequence);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/author/picker.rs"]
mod tests;
