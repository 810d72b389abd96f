//! The rendering-surface abstraction.
//!
//! All DOM-ish work — overlay nodes, the focus mask, the connector canvas,
//! text boxes, class toggles — goes through [`Surface`], so the sequencing and
//! geometry logic runs unchanged against a real browser bridge or the
//! in-process [`headless::HeadlessSurface`] used by tests.

pub mod headless;
pub mod remote;

use kurbo::{Point, Rect, Size};

use crate::config::options::OverlayType;
use crate::foundation::geometry::{Connector, CoverRects, FocusShape};

/// Mask paint parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskStyle {
    /// Mask fill color (CSS color string).
    pub color: String,
    /// Mask fill opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Minimal rendering interface the engine needs from its host.
///
/// Implementations own one overlay subtree per overlay id. Only one tour
/// instance may own a given overlay id at a time; instances with distinct ids
/// are independent.
pub trait Surface {
    /// Current viewport dimensions.
    fn viewport(&self) -> Size;

    /// Bounding rect of the element matching `selector`, if present.
    fn element_rect(&self, selector: &str) -> Option<Rect>;

    /// Whether the element is fully visible in the viewport.
    ///
    /// Callers suppress overlay pointer capture around this probe so cover
    /// tiles do not block hit-testing against elements underneath.
    fn is_element_visible(&self, selector: &str) -> bool;

    /// Smooth-scroll the element to the viewport center.
    fn scroll_into_view(&mut self, selector: &str);

    /// Create the overlay node (mask, covers, canvas) if it does not exist.
    fn ensure_overlay(&mut self, overlay_id: &str, overlay_type: OverlayType, mask: &MaskStyle);

    /// Remove the overlay node and everything under it.
    fn remove_overlay(&mut self, overlay_id: &str);

    /// Inject a stylesheet once. Returns `false` when already present.
    fn inject_stylesheet(&mut self, css: &str) -> bool;

    /// Position the mask cut-out over the current target.
    fn set_focus_shape(&mut self, overlay_id: &str, shape: FocusShape);

    /// Resize the four partial-cover tiles.
    fn set_cover_rects(&mut self, overlay_id: &str, cover: CoverRects);

    /// Toggle pointer capture on the overlay and its cover tiles.
    fn set_pointer_capture(&mut self, overlay_id: &str, enabled: bool);

    /// Measure the text box that `text` would produce.
    fn measure_text_box(&self, text: &str) -> Size;

    /// Create or move the text box for `step_id` to `at`.
    fn place_text_box(
        &mut self,
        overlay_id: &str,
        step_id: &str,
        text: &str,
        at: Point,
        editable: bool,
    );

    /// Remove the text box for `step_id`.
    fn remove_text_box(&mut self, overlay_id: &str, step_id: &str);

    /// Paint a connector curve with arrowhead on the canvas.
    fn draw_connector(&mut self, overlay_id: &str, connector: &Connector);

    /// Clear the connector canvas.
    fn clear_canvas(&mut self, overlay_id: &str);

    /// Match the canvas backing store to the current overlay size.
    fn resize_canvas(&mut self, overlay_id: &str);

    /// Add a CSS class to the element matching `selector`.
    fn add_class(&mut self, selector: &str, class: &str);

    /// Remove a CSS class wherever it appears.
    fn remove_class_everywhere(&mut self, class: &str);

    /// Enable or disable transition animations under the overlay.
    fn set_animations_enabled(&mut self, overlay_id: &str, enabled: bool);

    /// Selector of the topmost page element at `pos`, ignoring the overlay.
    fn element_at(&self, pos: Point) -> Option<String>;

    /// Nearest ancestor of `selector` (inclusive) matching `matcher`.
    fn closest_matching(&self, selector: &str, matcher: &str) -> Option<String>;
}

/// Shared-handle surface: the engine owns one clone, the host keeps another
/// for geometry syncing (remote bridges) or inspection (tests).
impl<S: Surface> Surface for std::rc::Rc<std::cell::RefCell<S>> {
    fn viewport(&self) -> Size {
        self.borrow().viewport()
    }

    fn element_rect(&self, selector: &str) -> Option<Rect> {
        self.borrow().element_rect(selector)
    }

    fn is_element_visible(&self, selector: &str) -> bool {
        self.borrow().is_element_visible(selector)
    }

    fn scroll_into_view(&mut self, selector: &str) {
        self.borrow_mut().scroll_into_view(selector);
    }

    fn ensure_overlay(&mut self, overlay_id: &str, overlay_type: OverlayType, mask: &MaskStyle) {
        self.borrow_mut().ensure_overlay(overlay_id, overlay_type, mask);
    }

    fn remove_overlay(&mut self, overlay_id: &str) {
        self.borrow_mut().remove_overlay(overlay_id);
    }

    fn inject_stylesheet(&mut self, css: &str) -> bool {
        self.borrow_mut().inject_stylesheet(css)
    }

    fn set_focus_shape(&mut self, overlay_id: &str, shape: FocusShape) {
        self.borrow_mut().set_focus_shape(overlay_id, shape);
    }

    fn set_cover_rects(&mut self, overlay_id: &str, cover: CoverRects) {
        self.borrow_mut().set_cover_rects(overlay_id, cover);
    }

    fn set_pointer_capture(&mut self, overlay_id: &str, enabled: bool) {
        self.borrow_mut().set_pointer_capture(overlay_id, enabled);
    }

    fn measure_text_box(&self, text: &str) -> Size {
        self.borrow().measure_text_box(text)
    }

    fn place_text_box(
        &mut self,
        overlay_id: &str,
        step_id: &str,
        text: &str,
        at: Point,
        editable: bool,
    ) {
        self.borrow_mut()
            .place_text_box(overlay_id, step_id, text, at, editable);
    }

    fn remove_text_box(&mut self, overlay_id: &str, step_id: &str) {
        self.borrow_mut().remove_text_box(overlay_id, step_id);
    }

    fn draw_connector(&mut self, overlay_id: &str, connector: &Connector) {
        self.borrow_mut().draw_connector(overlay_id, connector);
    }

    fn clear_canvas(&mut self, overlay_id: &str) {
        self.borrow_mut().clear_canvas(overlay_id);
    }

    fn resize_canvas(&mut self, overlay_id: &str) {
        self.borrow_mut().resize_canvas(overlay_id);
    }

    fn add_class(&mut self, selector: &str, class: &str) {
        self.borrow_mut().add_class(selector, class);
    }

    fn remove_class_everywhere(&mut self, class: &str) {
        self.borrow_mut().remove_class_everywhere(class);
    }

    fn set_animations_enabled(&mut self, overlay_id: &str, enabled: bool) {
        self.borrow_mut().set_animations_enabled(overlay_id, enabled);
    }

    fn element_at(&self, pos: Point) -> Option<String> {
        self.borrow().element_at(pos)
    }

    fn closest_matching(&self, selector: &str, matcher: &str) -> Option<String> {
        self.borrow().closest_matching(selector, matcher)
    }
}
