//! In-process surface for tests and headless hosts.
//!
//! Elements are a configurable selector→rect map and every mutation is
//! recorded in an inspectable op log, so tests can assert on exactly what the
//! engine asked the surface to do.

use std::collections::{BTreeMap, HashMap};

use kurbo::{Point, Rect, Size};

use crate::config::options::OverlayType;
use crate::foundation::geometry::{Connector, CoverRects, FocusShape};
use crate::surface::{MaskStyle, Surface};

/// Recorded surface mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// Overlay node created.
    EnsureOverlay(String),
    /// Overlay node removed.
    RemoveOverlay(String),
    /// Stylesheet injected.
    InjectStylesheet,
    /// Focus cut-out moved.
    SetFocusShape(String, FocusShape),
    /// Cover tiles resized.
    SetCoverRects(String, CoverRects),
    /// Pointer capture toggled.
    SetPointerCapture(String, bool),
    /// Text box created or moved.
    PlaceTextBox {
        /// Owning overlay id.
        overlay_id: String,
        /// Step id the box belongs to.
        step_id: String,
        /// Box position.
        at: Point,
        /// Whether the box is contentEditable.
        editable: bool,
    },
    /// Text box removed.
    RemoveTextBox(String, String),
    /// Connector painted.
    DrawConnector(String),
    /// Canvas cleared.
    ClearCanvas(String),
    /// Canvas resized.
    ResizeCanvas(String),
    /// Class added to an element.
    AddClass(String, String),
    /// Class stripped everywhere.
    RemoveClassEverywhere(String),
    /// Animations toggled.
    SetAnimationsEnabled(String, bool),
    /// Element scrolled to viewport center.
    ScrollIntoView(String),
}

#[derive(Clone, Debug, Default)]
struct OverlayState {
    overlay_type: Option<OverlayType>,
    mask: Option<MaskStyle>,
    focus: Option<FocusShape>,
    covers: Option<CoverRects>,
    pointer_capture: bool,
    text_boxes: BTreeMap<String, (String, Point, bool)>,
    connectors: Vec<Connector>,
    animations_enabled: bool,
}

/// A fake element on the headless page.
#[derive(Clone, Debug)]
struct FakeElement {
    rect: Rect,
    parent: Option<String>,
}

/// Headless [`Surface`] implementation.
#[derive(Debug)]
pub struct HeadlessSurface {
    viewport: Size,
    elements: HashMap<String, FakeElement>,
    overlays: HashMap<String, OverlayState>,
    stylesheets: Vec<String>,
    classes: HashMap<String, Vec<String>>,
    ops: Vec<SurfaceOp>,
}

impl HeadlessSurface {
    /// Create a surface with the given viewport size.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: HashMap::new(),
            overlays: HashMap::new(),
            stylesheets: Vec::new(),
            classes: HashMap::new(),
            ops: Vec::new(),
        }
    }

    /// Register an element under `selector` with the given bounds.
    pub fn add_element(&mut self, selector: impl Into<String>, rect: Rect) -> &mut Self {
        self.elements.insert(
            selector.into(),
            FakeElement { rect, parent: None },
        );
        self
    }

    /// Register an element with a parent link (for ancestor resolution).
    pub fn add_child_element(
        &mut self,
        selector: impl Into<String>,
        rect: Rect,
        parent: impl Into<String>,
    ) -> &mut Self {
        self.elements.insert(
            selector.into(),
            FakeElement {
                rect,
                parent: Some(parent.into()),
            },
        );
        self
    }

    /// The recorded op log.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drop all recorded ops.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Focus shape currently set on `overlay_id`.
    pub fn focus_shape(&self, overlay_id: &str) -> Option<FocusShape> {
        self.overlays.get(overlay_id).and_then(|o| o.focus)
    }

    /// Cover tile extents currently set on `overlay_id`.
    pub fn cover_rects(&self, overlay_id: &str) -> Option<CoverRects> {
        self.overlays.get(overlay_id).and_then(|o| o.covers)
    }

    /// Mask paint currently set on `overlay_id`.
    pub fn mask(&self, overlay_id: &str) -> Option<MaskStyle> {
        self.overlays.get(overlay_id).and_then(|o| o.mask.clone())
    }

    /// Text boxes currently placed on `overlay_id`, keyed by step id.
    pub fn text_boxes(&self, overlay_id: &str) -> Vec<(String, String, Point, bool)> {
        self.overlays
            .get(overlay_id)
            .map(|o| {
                o.text_boxes
                    .iter()
                    .map(|(id, (text, at, editable))| (id.clone(), text.clone(), *at, *editable))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Connectors currently painted on `overlay_id`.
    pub fn connectors(&self, overlay_id: &str) -> Vec<Connector> {
        self.overlays
            .get(overlay_id)
            .map(|o| o.connectors.clone())
            .unwrap_or_default()
    }

    /// Whether an overlay node exists for `overlay_id`.
    pub fn has_overlay(&self, overlay_id: &str) -> bool {
        self.overlays.contains_key(overlay_id)
    }

    /// Classes currently on the element at `selector`.
    pub fn classes_of(&self, selector: &str) -> Vec<String> {
        self.classes.get(selector).cloned().unwrap_or_default()
    }

    /// Number of injected stylesheets (idempotence check).
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    fn matches(selector: &str, matcher: &str) -> bool {
        if matcher == "[id]" {
            selector.starts_with('#')
        } else {
            selector == matcher
        }
    }
}

impl Surface for HeadlessSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn element_rect(&self, selector: &str) -> Option<Rect> {
        self.elements.get(selector).map(|e| e.rect)
    }

    fn is_element_visible(&self, selector: &str) -> bool {
        let Some(el) = self.elements.get(selector) else {
            return false;
        };
        let vp = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        el.rect.x0 >= vp.x0 && el.rect.y0 >= vp.y0 && el.rect.x1 <= vp.x1 && el.rect.y1 <= vp.y1
    }

    fn scroll_into_view(&mut self, selector: &str) {
        if let Some(el) = self.elements.get_mut(selector) {
            let size = el.rect.size();
            let cx = self.viewport.width / 2.0;
            let cy = self.viewport.height / 2.0;
            el.rect = Rect::new(
                cx - size.width / 2.0,
                cy - size.height / 2.0,
                cx + size.width / 2.0,
                cy + size.height / 2.0,
            );
        }
        self.ops.push(SurfaceOp::ScrollIntoView(selector.to_string()));
    }

    fn ensure_overlay(&mut self, overlay_id: &str, overlay_type: OverlayType, mask: &MaskStyle) {
        let state = self.overlays.entry(overlay_id.to_string()).or_default();
        state.overlay_type = Some(overlay_type);
        state.mask = Some(mask.clone());
        state.animations_enabled = true;
        self.ops.push(SurfaceOp::EnsureOverlay(overlay_id.to_string()));
    }

    fn remove_overlay(&mut self, overlay_id: &str) {
        self.overlays.remove(overlay_id);
        self.ops.push(SurfaceOp::RemoveOverlay(overlay_id.to_string()));
    }

    fn inject_stylesheet(&mut self, css: &str) -> bool {
        if self.stylesheets.iter().any(|s| s == css) {
            return false;
        }
        self.stylesheets.push(css.to_string());
        self.ops.push(SurfaceOp::InjectStylesheet);
        true
    }

    fn set_focus_shape(&mut self, overlay_id: &str, shape: FocusShape) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.focus = Some(shape);
        }
        self.ops
            .push(SurfaceOp::SetFocusShape(overlay_id.to_string(), shape));
    }

    fn set_cover_rects(&mut self, overlay_id: &str, cover: CoverRects) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.covers = Some(cover);
        }
        self.ops
            .push(SurfaceOp::SetCoverRects(overlay_id.to_string(), cover));
    }

    fn set_pointer_capture(&mut self, overlay_id: &str, enabled: bool) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.pointer_capture = enabled;
        }
        self.ops
            .push(SurfaceOp::SetPointerCapture(overlay_id.to_string(), enabled));
    }

    fn measure_text_box(&self, text: &str) -> Size {
        // Deterministic stand-in for layout: 8px per char, 20px per line,
        // capped at 40% of the viewport width like the real text box rule.
        let longest = text.lines().map(str::len).max().unwrap_or(0) as f64;
        let lines = text.lines().count().max(1) as f64;
        Size::new((longest * 8.0).min(self.viewport.width * 0.4), lines * 20.0)
    }

    fn place_text_box(
        &mut self,
        overlay_id: &str,
        step_id: &str,
        text: &str,
        at: Point,
        editable: bool,
    ) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state
                .text_boxes
                .insert(step_id.to_string(), (text.to_string(), at, editable));
        }
        self.ops.push(SurfaceOp::PlaceTextBox {
            overlay_id: overlay_id.to_string(),
            step_id: step_id.to_string(),
            at,
            editable,
        });
    }

    fn remove_text_box(&mut self, overlay_id: &str, step_id: &str) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.text_boxes.remove(step_id);
        }
        self.ops.push(SurfaceOp::RemoveTextBox(
            overlay_id.to_string(),
            step_id.to_string(),
        ));
    }

    fn draw_connector(&mut self, overlay_id: &str, connector: &Connector) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.connectors.push(*connector);
        }
        self.ops.push(SurfaceOp::DrawConnector(overlay_id.to_string()));
    }

    fn clear_canvas(&mut self, overlay_id: &str) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.connectors.clear();
        }
        self.ops.push(SurfaceOp::ClearCanvas(overlay_id.to_string()));
    }

    fn resize_canvas(&mut self, overlay_id: &str) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.connectors.clear();
        }
        self.ops.push(SurfaceOp::ResizeCanvas(overlay_id.to_string()));
    }

    fn add_class(&mut self, selector: &str, class: &str) {
        let classes = self.classes.entry(selector.to_string()).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        self.ops
            .push(SurfaceOp::AddClass(selector.to_string(), class.to_string()));
    }

    fn remove_class_everywhere(&mut self, class: &str) {
        for classes in self.classes.values_mut() {
            classes.retain(|c| c != class);
        }
        self.ops
            .push(SurfaceOp::RemoveClassEverywhere(class.to_string()));
    }

    fn set_animations_enabled(&mut self, overlay_id: &str, enabled: bool) {
        if let Some(state) = self.overlays.get_mut(overlay_id) {
            state.animations_enabled = enabled;
        }
        self.ops.push(SurfaceOp::SetAnimationsEnabled(
            overlay_id.to_string(),
            enabled,
        ));
    }

    fn element_at(&self, pos: Point) -> Option<String> {
        // Smallest containing element wins, approximating topmost-child
        // hit-testing on a real page.
        self.elements
            .iter()
            .filter(|(_, el)| el.rect.contains(pos))
            .min_by(|(_, a), (_, b)| {
                let area_a = a.rect.area();
                let area_b = b.rect.area();
                area_a.partial_cmp(&area_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(sel, _)| sel.clone())
    }

    fn closest_matching(&self, selector: &str, matcher: &str) -> Option<String> {
        let mut cursor = Some(selector.to_string());
        while let Some(sel) = cursor {
            if Self::matches(&sel, matcher) {
                return Some(sel);
            }
            cursor = self.elements.get(&sel).and_then(|e| e.parent.clone());
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/headless.rs"]
mod tests;
