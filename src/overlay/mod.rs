//! The overlay component: mask, focus field, cover tiles, text box, connector.
//!
//! Owns the surface and all drawn artifacts. The step machine decides *what*
//! to show; this module decides *where* (via [`crate::foundation::geometry`])
//! and issues the surface mutations.

pub mod style;

use std::collections::BTreeMap;
use std::time::Duration;

use kurbo::{Point, Rect, Size};

use crate::config::options::{Mode, OverlayType, TourOptions};
use crate::foundation::geometry::{self, Connector, FocusShape};
use crate::runtime::clock::{Clock, Debouncer};
use crate::surface::{MaskStyle, Surface};
use crate::tour::step::Step;

/// Settle delay after smooth-scrolling a target into view.
const SCROLL_SETTLE: Duration = Duration::from_millis(500);

/// Padding kept between the text box and the viewport edge.
const CANVAS_PADDING: f64 = 10.0;

/// Quiet window for coalescing resize bursts.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Mask opacity applied when the host leaves `maskOpacity` unset.
const DEFAULT_MASK_OPACITY: f64 = 0.4;

/// Overlay state: the masking surface plus everything drawn on it.
pub struct Overlay {
    surface: Box<dyn Surface>,
    clock: Box<dyn Clock>,
    drawn: BTreeMap<String, Step>,
    generation: u64,
    armed: bool,
    suppress_animation: bool,
    resize: Debouncer<()>,
}

impl Overlay {
    /// Create an overlay over the given surface and clock.
    pub fn new(surface: Box<dyn Surface>, clock: Box<dyn Clock>) -> Self {
        Self {
            surface,
            clock,
            drawn: BTreeMap::new(),
            generation: 0,
            armed: false,
            suppress_animation: false,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
        }
    }

    /// Access the underlying surface (tests, authoring hit-tests).
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Mutable access to the underlying surface.
    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// Step ids currently drawn.
    pub fn drawn_ids(&self) -> Vec<String> {
        self.drawn.keys().cloned().collect()
    }

    /// Ensure the overlay node, canvas and stylesheet exist.
    ///
    /// Stylesheet injection is idempotent; the surface reports whether a sheet
    /// with identical rules was already present.
    pub fn arm(&mut self, options: &TourOptions) {
        let mask = MaskStyle {
            color: options.mask_color.clone(),
            // Unset opacity defaults per mode: multi shows everything
            // cumulatively, so its mask stays clear.
            opacity: options.mask_opacity.unwrap_or(if options.mode == Mode::Multi {
                0.0
            } else {
                DEFAULT_MASK_OPACITY
            }),
        };
        self.surface
            .ensure_overlay(&options.overlay_id, options.overlay_type, &mask);
        self.surface
            .inject_stylesheet(&style::stylesheet(options));
        self.surface.resize_canvas(&options.overlay_id);
        self.surface.set_pointer_capture(
            &options.overlay_id,
            matches!(
                options.overlay_type,
                OverlayType::Blocking | OverlayType::Partial
            ),
        );
        self.armed = true;
    }

    /// Draw one step: focus, covers, text box, connector.
    ///
    /// Absent targets degrade to a page-centered text box with no connector.
    #[tracing::instrument(skip_all, fields(step = %step.id))]
    pub fn draw_step(&mut self, step: &Step, options: &TourOptions) {
        self.draw_step_with(step, options, false);
    }

    /// Draw one step with an editable text box (authoring mode).
    pub fn draw_editable_step(&mut self, step: &Step, options: &TourOptions) {
        self.draw_step_with(step, options, true);
    }

    fn draw_step_with(&mut self, step: &Step, options: &TourOptions, editable: bool) {
        if !self.armed {
            self.arm(options);
        }
        let generation = self.bump_generation();

        if options.mode == Mode::Single {
            self.clear_drawn(options);
            self.surface.resize_canvas(&options.overlay_id);
        } else {
            // Only a colliding id is replaced; other steps stay visible.
            if self.drawn.remove(step.id.as_str()).is_some() {
                self.surface
                    .remove_text_box(&options.overlay_id, step.id.as_str());
                self.redraw(options);
            }
        }

        let target_rect = self.resolve_target(step, options);

        if options.mode == Mode::Single {
            self.focus_on_target(step, target_rect, options, generation);
        }
        if self.generation != generation {
            // A newer draw or an exit superseded this one while settling.
            tracing::debug!(step = %step.id, "draw superseded, skipping artifacts");
            return;
        }

        self.place_step_artifacts(step, target_rect, options, editable);
        self.drawn.insert(step.id.as_str().to_string(), step.clone());
    }

    /// Current instant from the overlay clock.
    pub fn now(&self) -> std::time::Instant {
        self.clock.now()
    }

    /// Handle a viewport resize notification (debounced).
    pub fn notify_resize(&mut self) {
        let now = self.clock.now();
        self.resize.submit((), now);
    }

    /// Run due debounced work; call from the host event loop.
    pub fn pump(&mut self, options: &TourOptions) {
        let now = self.clock.now();
        if self.resize.flush_due(now).is_some() {
            self.redraw_all(options);
        }
    }

    /// Force any pending resize redraw to run now.
    pub fn flush_resize(&mut self, options: &TourOptions) {
        if self.resize.flush().is_some() {
            self.redraw_all(options);
        }
    }

    /// Remove drawn artifacts but keep the overlay armed.
    pub fn clear(&mut self, options: &TourOptions) {
        self.bump_generation();
        self.clear_drawn(options);
        self.surface.clear_canvas(&options.overlay_id);
        if options.shadow_targets {
            self.surface.remove_class_everywhere(style::SHADOW_CLASS);
        }
    }

    /// Tear the overlay down entirely.
    pub fn remove(&mut self, options: &TourOptions) {
        self.clear(options);
        self.surface.remove_overlay(&options.overlay_id);
        self.armed = false;
    }

    fn bump_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn clear_drawn(&mut self, options: &TourOptions) {
        let ids: Vec<String> = self.drawn.keys().cloned().collect();
        for id in ids {
            self.surface.remove_text_box(&options.overlay_id, &id);
        }
        self.drawn.clear();
    }

    /// Resolve the target bounds, scrolling it into view first if needed.
    fn resolve_target(&mut self, step: &Step, options: &TourOptions) -> Option<Rect> {
        let selector = step.target.as_deref()?;
        if options.scroll_into_view {
            // Covers must not block the visibility hit-test.
            self.surface.set_pointer_capture(&options.overlay_id, false);
            let visible = self.surface.is_element_visible(selector);
            self.surface.set_pointer_capture(
                &options.overlay_id,
                matches!(
                    options.overlay_type,
                    OverlayType::Blocking | OverlayType::Partial
                ),
            );
            if !visible && self.surface.element_rect(selector).is_some() {
                self.surface.scroll_into_view(selector);
                self.clock.sleep(SCROLL_SETTLE);
            }
        }
        let rect = self.surface.element_rect(selector);
        if rect.is_none() {
            tracing::warn!(step = %step.id, selector, "target not found; degrading to centered text");
        }
        rect
    }

    /// Move the focus field to the target and await the transition.
    fn focus_on_target(
        &mut self,
        step: &Step,
        target_rect: Option<Rect>,
        options: &TourOptions,
        generation: u64,
    ) {
        if options.shadow_targets {
            self.surface.remove_class_everywhere(style::SHADOW_CLASS);
        }
        let Some(rect) = target_rect else {
            return;
        };

        let viewport = self.surface.viewport();
        let shape = geometry::focus_shape(rect, viewport);
        self.surface.set_focus_shape(&options.overlay_id, shape);

        if options.overlay_type == OverlayType::Partial {
            self.surface
                .set_cover_rects(&options.overlay_id, geometry::cover_rects(rect, viewport));
        }

        // Zero-sized targets skip the settle delay entirely.
        let max_dimension = rect.width().max(rect.height());
        if !self.suppress_animation && max_dimension > 0.0 && options.animation_time_ms > 0 {
            self.clock
                .sleep(Duration::from_millis(options.animation_time_ms));
        }
        if self.generation != generation {
            return;
        }

        if options.shadow_targets
            && matches!(shape, FocusShape::RoundedRect { .. })
            && let Some(selector) = step.target.as_deref()
        {
            self.surface.add_class(selector, style::SHADOW_CLASS);
        }
    }

    /// Place the text box and paint the connector for one step.
    fn place_step_artifacts(
        &mut self,
        step: &Step,
        target_rect: Option<Rect>,
        options: &TourOptions,
        editable: bool,
    ) {
        let viewport = self.surface.viewport();
        let text_size = self.surface.measure_text_box(&step.text);
        let margin = geometry::margin_for_viewport(viewport.width, options.max_margin);

        let target = target_rect.map(|r| (r.center(), r.size()));
        let text_pos = geometry::text_box_position(
            target,
            text_size,
            viewport,
            margin,
            CANVAS_PADDING,
        );
        self.surface.place_text_box(
            &options.overlay_id,
            step.id.as_str(),
            &step.text,
            text_pos,
            editable,
        );

        if let Some(rect) = target_rect {
            let connector = connector_for(rect, text_pos, text_size);
            self.surface.draw_connector(&options.overlay_id, &connector);
        }
    }

    /// Redraw every drawn step without transitions (resize path).
    fn redraw_all(&mut self, options: &TourOptions) {
        if !self.armed || self.drawn.is_empty() {
            return;
        }
        self.surface
            .set_animations_enabled(&options.overlay_id, false);
        self.suppress_animation = true;
        self.redraw(options);
        self.suppress_animation = false;
        self.surface
            .set_animations_enabled(&options.overlay_id, true);
    }

    fn redraw(&mut self, options: &TourOptions) {
        self.surface.resize_canvas(&options.overlay_id);
        let steps: Vec<Step> = self.drawn.values().cloned().collect();
        let generation = self.generation;
        for step in &steps {
            let target_rect = step
                .target
                .as_deref()
                .and_then(|sel| self.surface.element_rect(sel));
            if options.mode == Mode::Single {
                self.focus_on_target(step, target_rect, options, generation);
            }
            self.place_step_artifacts(step, target_rect, options, false);
        }
    }
}

/// Full connector geometry from a target rect and a placed text box.
fn connector_for(target: Rect, text_pos: Point, text_size: Size) -> Connector {
    let target_mid = target.center();
    let target_size = target.size();
    let text_mid = Point::new(
        text_pos.x + text_size.width / 2.0,
        text_pos.y + text_size.height / 2.0,
    );
    let (start, end) =
        geometry::connector_endpoints(target_mid, target_size, text_mid, text_size);
    let is_wide = target_size.width > target_size.height;
    let positive = geometry::positive_curvature(start, end, is_wide);
    geometry::connector(start, end, positive)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/overlay.rs"]
mod tests;
