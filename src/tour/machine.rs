//! The step-sequence state machine.
//!
//! Three ordered queues — `past`, `current`, `future` — partition the loaded
//! sequence; navigation only moves the partition boundary. Queue mutation is
//! synchronous at call time; only the visual draw is delayed by settle timers.

use std::collections::VecDeque;

use crate::config::options::{ConfigValue, Mode, OverlayType, TourOptions};
use crate::foundation::error::{WaypostError, WaypostResult};
use crate::overlay::Overlay;
use crate::runtime::clock::{Clock, SystemClock};
use crate::surface::Surface;
use crate::tour::input::{InputEvent, Key, PointerZone};
use crate::tour::lifecycle::{ExitHandle, ExitReason, ExitResult, ExitSignal};
use crate::tour::step::{Sequence, Step};

/// Named hooks a host attaches to a tour.
pub trait TourHooks {
    /// Called after a step is rendered, with the index of the just-shown step.
    fn on_progress(&mut self, progress: usize) {
        let _ = progress;
    }

    /// Called exactly once when the run ends.
    fn on_exit(&mut self, result: &ExitResult) {
        let _ = result;
    }

    /// Asked before an `Escape` press ends the run; `false` keeps it showing.
    ///
    /// `progress` is the index of the currently shown step. The prompt may
    /// block on user input; the engine treats it as a suspension point.
    fn confirm_escape(&mut self, progress: usize) -> bool {
        let _ = progress;
        true
    }
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl TourHooks for NoopHooks {}

/// Hooks backed by optional closures.
#[derive(Default)]
pub struct CallbackHooks {
    /// Progress callback.
    pub progress: Option<Box<dyn FnMut(usize)>>,
    /// Exit callback.
    pub exit: Option<Box<dyn FnMut(&ExitResult)>>,
    /// Escape confirmation; absent means always confirmed.
    pub escape: Option<Box<dyn FnMut(usize) -> bool>>,
}

impl TourHooks for CallbackHooks {
    fn on_progress(&mut self, progress: usize) {
        if let Some(f) = self.progress.as_mut() {
            f(progress);
        }
    }

    fn on_exit(&mut self, result: &ExitResult) {
        if let Some(f) = self.exit.as_mut() {
            f(result);
        }
    }

    fn confirm_escape(&mut self, progress: usize) -> bool {
        match self.escape.as_mut() {
            Some(f) => f(progress),
            None => true,
        }
    }
}

/// A guided tour: sequencing state plus the overlay it renders through.
pub struct Tour {
    options: TourOptions,
    hooks: Box<dyn TourHooks>,
    past: Vec<Step>,
    current: Option<Step>,
    future: VecDeque<Step>,
    original: Sequence,
    signal: ExitSignal,
    skip_reset: bool,
    showing: bool,
    overlay: Overlay,
}

impl std::fmt::Debug for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("options", &self.options)
            .field("past", &self.past)
            .field("current", &self.current)
            .field("future", &self.future)
            .field("showing", &self.showing)
            .finish_non_exhaustive()
    }
}

impl Tour {
    /// Create a tour over the given surface with the system clock.
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self::with_clock(surface, Box::new(SystemClock))
    }

    /// Create a tour with an explicit clock (tests use a virtual one).
    pub fn with_clock(surface: Box<dyn Surface>, clock: Box<dyn Clock>) -> Self {
        Self {
            options: TourOptions::default(),
            hooks: Box::new(NoopHooks),
            past: Vec::new(),
            current: None,
            future: VecDeque::new(),
            original: Vec::new(),
            signal: ExitSignal::new(),
            skip_reset: false,
            showing: false,
            overlay: Overlay::new(surface, clock),
        }
    }

    /// Current configuration (read-only).
    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    /// Apply configuration entries; refused while a run is showing.
    pub fn configure<'a, I>(&mut self, entries: I) -> WaypostResult<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, ConfigValue)>,
    {
        if self.showing {
            return Err(WaypostError::config(
                "configuration is read-only during an active run",
            ));
        }
        self.options.configure(entries)?;
        Ok(self)
    }

    /// Replace the attached hooks.
    pub fn set_hooks(&mut self, hooks: Box<dyn TourHooks>) -> &mut Self {
        self.hooks = hooks;
        self
    }

    /// Append a validated step to the future queue.
    pub fn add(&mut self, step: Step) -> &mut Self {
        self.future.push_back(step);
        self
    }

    /// Validate and append a step from parts.
    pub fn add_parts(
        &mut self,
        id: &str,
        text: &str,
        target: Option<&str>,
    ) -> WaypostResult<&mut Self> {
        let step = Step::new(id, text, target)?;
        Ok(self.add(step))
    }

    /// Load a sequence at a resume position.
    ///
    /// `progress` is clamped to `[0, len]` before splitting, so
    /// `past.len() == min(progress, len)` always holds afterwards.
    pub fn load(&mut self, sequence: Sequence, progress: usize) -> &mut Self {
        self.original = sequence.clone();
        self.future = sequence.into_iter().collect();
        let consumed = progress.min(self.future.len());
        self.past = self.future.drain(..consumed).collect();
        self.current = None;
        self.skip_reset = true;
        self
    }

    /// Count of consumed steps: `past` plus the current one if shown.
    pub fn progress(&self) -> usize {
        self.past.len() + usize::from(self.current.is_some())
    }

    /// The currently shown step, if any.
    pub fn current(&self) -> Option<&Step> {
        self.current.as_ref()
    }

    /// The sequence as first loaded (progress denominator).
    pub fn original_sequence(&self) -> &Sequence {
        &self.original
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.future.len()
    }

    /// Whether a run is currently showing.
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Advance the tour.
    ///
    /// Single mode shows the next step; multi mode drains and shows all
    /// remaining steps cumulatively. An exhausted future finishes the run.
    #[tracing::instrument(skip(self))]
    pub fn next(&mut self) {
        if self.future.is_empty() {
            self.exit_with(ExitReason::Finished, self.progress());
            return;
        }
        match self.options.mode {
            Mode::Single => {
                if let Some(step) = self.future.pop_front() {
                    self.show(step);
                }
            }
            Mode::Multi => {
                while let Some(step) = self.future.pop_front() {
                    self.show(step);
                }
            }
        }
        let shown_index = self.progress().saturating_sub(1);
        self.hooks.on_progress(shown_index);
    }

    /// Step back (single mode only; no-op on the very first step).
    pub fn previous(&mut self) {
        if self.options.mode != Mode::Single || self.past.is_empty() {
            return;
        }
        if let Some(current) = self.current.take() {
            self.future.push_front(current);
        }
        if let Some(step) = self.past.pop() {
            self.show(step);
            let shown_index = self.progress().saturating_sub(1);
            self.hooks.on_progress(shown_index);
        }
    }

    /// Clear rendered artifacts and (unless just loaded) rewind the queues.
    ///
    /// With `empty == false` the consumed partition is recombined into
    /// `future`; with `true` everything is discarded. The rewind is skipped
    /// once right after [`Tour::load`].
    pub fn reset(&mut self, empty: bool) {
        if self.options.shadow_targets {
            self.overlay
                .surface_mut()
                .remove_class_everywhere(crate::overlay::style::SHADOW_CLASS);
        }
        self.overlay.arm(&self.options);
        if self.skip_reset {
            self.skip_reset = false;
        } else {
            let mut future = Vec::new();
            if !empty {
                future.append(&mut self.past);
                if let Some(current) = self.current.take() {
                    future.push(current);
                }
                future.extend(self.future.drain(..));
            }
            self.past.clear();
            self.current = None;
            self.future = future.into_iter().collect();
        }
        self.overlay.clear(&self.options);
        if self.signal.is_resolved() {
            self.signal.rearm();
        }
        self.showing = true;
    }

    /// Clear everything rendered and drop all queued steps.
    pub fn clear(&mut self) {
        self.reset(true);
    }

    /// Reset, show the first step, and return the completion handle.
    pub fn fire(&mut self) -> ExitHandle {
        self.reset(false);
        self.next();
        self.signal.subscribe()
    }

    /// Subscribe to the completion signal without starting a run.
    pub fn on_exit_handle(&self) -> ExitHandle {
        self.signal.subscribe()
    }

    /// End the run with `reason`; final progress is the index of the last
    /// shown step (clamped at zero when nothing was shown).
    pub fn exit(&mut self, reason: ExitReason) {
        let progress = self.progress().saturating_sub(1);
        self.exit_with(reason, progress);
    }

    fn exit_with(&mut self, reason: ExitReason, progress: usize) {
        if self.signal.is_resolved() {
            return;
        }
        tracing::debug!(?reason, progress, "tour exiting");
        self.showing = false;
        self.overlay.remove(&self.options);
        let result = ExitResult { reason, progress };
        self.hooks.on_exit(&result);
        self.signal.resolve(result);
    }

    /// Dispatch a host input event per the keyboard/pointer surface contract.
    pub fn handle_event(&mut self, event: InputEvent) {
        if !self.showing {
            return;
        }
        match event {
            InputEvent::Key { key, ctrl: _ } => {
                if !self.options.bind_keys {
                    return;
                }
                match key {
                    Key::Escape => {
                        let shown = self.progress().saturating_sub(1);
                        if self.options.escape_to_exit && self.hooks.confirm_escape(shown) {
                            self.exit(ExitReason::Escape);
                        }
                    }
                    Key::Space | Key::ArrowRight => self.next(),
                    Key::ArrowLeft => self.previous(),
                    Key::Char(_) => {}
                }
            }
            InputEvent::PointerUp { zone, .. } => {
                let clickable = matches!(zone, PointerZone::Overlay | PointerZone::TextBox)
                    && self.options.overlay_type != OverlayType::None;
                if clickable && self.options.click_to_progress {
                    self.next();
                }
            }
        }
    }

    /// Notify the tour of a viewport resize (redraw is debounced).
    pub fn notify_resize(&mut self) {
        self.overlay.notify_resize();
    }

    /// Run due debounced work; call from the host event loop.
    pub fn pump(&mut self) {
        self.overlay.pump(&self.options);
    }

    /// Access the overlay (tests, authoring).
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Mutable access to the overlay.
    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    fn show(&mut self, step: Step) {
        if let Some(previous) = self.current.take() {
            self.past.push(previous);
        }
        self.current = Some(step.clone());
        self.showing = true;
        self.overlay.draw_step(&step, &self.options);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tour/machine.rs"]
mod tests;
