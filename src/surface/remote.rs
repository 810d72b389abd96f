//! Surface adapter for an out-of-process DOM.
//!
//! Mutations are serialized as JSON commands onto an outbound queue; a thin
//! browser bridge drains the queue and applies each command to the real page.
//! Geometry queries are answered from state the bridge pushes back via
//! [`RemoteSurface::sync_viewport`] / [`RemoteSurface::sync_element`].

use std::collections::HashMap;

use kurbo::{Point, Rect, Size};

use crate::config::options::OverlayType;
use crate::foundation::geometry::{Connector, CoverRects, FocusShape};
use crate::surface::{MaskStyle, Surface};

/// One wire command for the browser bridge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceCommand {
    /// Create the overlay subtree.
    EnsureOverlay {
        /// Overlay node id.
        overlay_id: String,
        /// Pointer behavior.
        overlay_type: OverlayType,
        /// Mask paint.
        mask: MaskStyle,
    },
    /// Remove the overlay subtree.
    RemoveOverlay {
        /// Overlay node id.
        overlay_id: String,
    },
    /// Inject a stylesheet.
    InjectStylesheet {
        /// Full CSS text.
        css: String,
    },
    /// Move the focus cut-out.
    SetFocusShape {
        /// Overlay node id.
        overlay_id: String,
        /// Cut-out geometry.
        shape: FocusShape,
    },
    /// Resize the cover tiles.
    SetCoverRects {
        /// Overlay node id.
        overlay_id: String,
        /// Tile extents.
        cover: CoverRects,
    },
    /// Toggle pointer capture.
    SetPointerCapture {
        /// Overlay node id.
        overlay_id: String,
        /// New capture state.
        enabled: bool,
    },
    /// Create or move a text box.
    PlaceTextBox {
        /// Overlay node id.
        overlay_id: String,
        /// Step id the box belongs to.
        step_id: String,
        /// Markup text content.
        text: String,
        /// Top-left position.
        x: f64,
        /// Top-left position.
        y: f64,
        /// Whether the box is contentEditable.
        editable: bool,
    },
    /// Remove a text box.
    RemoveTextBox {
        /// Overlay node id.
        overlay_id: String,
        /// Step id the box belongs to.
        step_id: String,
    },
    /// Paint a connector.
    DrawConnector {
        /// Overlay node id.
        overlay_id: String,
        /// Curve and arrowhead geometry.
        connector: Connector,
    },
    /// Clear the canvas.
    ClearCanvas {
        /// Overlay node id.
        overlay_id: String,
    },
    /// Resize the canvas backing store.
    ResizeCanvas {
        /// Overlay node id.
        overlay_id: String,
    },
    /// Add a class to an element.
    AddClass {
        /// Element selector.
        selector: String,
        /// Class name.
        class: String,
    },
    /// Strip a class everywhere.
    RemoveClassEverywhere {
        /// Class name.
        class: String,
    },
    /// Toggle transition animations.
    SetAnimationsEnabled {
        /// Overlay node id.
        overlay_id: String,
        /// New animation state.
        enabled: bool,
    },
    /// Smooth-scroll an element to the viewport center.
    ScrollIntoView {
        /// Element selector.
        selector: String,
    },
}

/// [`Surface`] implementation that queues commands for a browser bridge.
#[derive(Debug, Default)]
pub struct RemoteSurface {
    viewport: Size,
    elements: HashMap<String, Rect>,
    visible: HashMap<String, bool>,
    injected: Vec<String>,
    queue: Vec<SurfaceCommand>,
}

impl RemoteSurface {
    /// Create an empty surface; the bridge syncs geometry before first draw.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the viewport dimensions from the bridge.
    pub fn sync_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Update one element's bounds and visibility from the bridge.
    pub fn sync_element(&mut self, selector: impl Into<String>, rect: Rect, visible: bool) {
        let selector = selector.into();
        self.elements.insert(selector.clone(), rect);
        self.visible.insert(selector, visible);
    }

    /// Drain queued commands for transmission.
    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.queue)
    }

    /// Serialize queued commands as a JSON array, draining the queue.
    pub fn drain_commands_json(&mut self) -> serde_json::Result<String> {
        let commands = self.drain_commands();
        serde_json::to_string(&commands)
    }
}

impl Surface for RemoteSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn element_rect(&self, selector: &str) -> Option<Rect> {
        self.elements.get(selector).copied()
    }

    fn is_element_visible(&self, selector: &str) -> bool {
        self.visible.get(selector).copied().unwrap_or(false)
    }

    fn scroll_into_view(&mut self, selector: &str) {
        self.queue.push(SurfaceCommand::ScrollIntoView {
            selector: selector.to_string(),
        });
    }

    fn ensure_overlay(&mut self, overlay_id: &str, overlay_type: OverlayType, mask: &MaskStyle) {
        self.queue.push(SurfaceCommand::EnsureOverlay {
            overlay_id: overlay_id.to_string(),
            overlay_type,
            mask: mask.clone(),
        });
    }

    fn remove_overlay(&mut self, overlay_id: &str) {
        self.queue.push(SurfaceCommand::RemoveOverlay {
            overlay_id: overlay_id.to_string(),
        });
    }

    fn inject_stylesheet(&mut self, css: &str) -> bool {
        if self.injected.iter().any(|s| s == css) {
            return false;
        }
        self.injected.push(css.to_string());
        self.queue.push(SurfaceCommand::InjectStylesheet {
            css: css.to_string(),
        });
        true
    }

    fn set_focus_shape(&mut self, overlay_id: &str, shape: FocusShape) {
        self.queue.push(SurfaceCommand::SetFocusShape {
            overlay_id: overlay_id.to_string(),
            shape,
        });
    }

    fn set_cover_rects(&mut self, overlay_id: &str, cover: CoverRects) {
        self.queue.push(SurfaceCommand::SetCoverRects {
            overlay_id: overlay_id.to_string(),
            cover,
        });
    }

    fn set_pointer_capture(&mut self, overlay_id: &str, enabled: bool) {
        self.queue.push(SurfaceCommand::SetPointerCapture {
            overlay_id: overlay_id.to_string(),
            enabled,
        });
    }

    fn measure_text_box(&self, text: &str) -> Size {
        // The bridge cannot be consulted synchronously, so estimate the same
        // way the headless surface does; the bridge corrects on next sync.
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
        self.queue.push(SurfaceCommand::PlaceTextBox {
            overlay_id: overlay_id.to_string(),
            step_id: step_id.to_string(),
            text: text.to_string(),
            x: at.x,
            y: at.y,
            editable,
        });
    }

    fn remove_text_box(&mut self, overlay_id: &str, step_id: &str) {
        self.queue.push(SurfaceCommand::RemoveTextBox {
            overlay_id: overlay_id.to_string(),
            step_id: step_id.to_string(),
        });
    }

    fn draw_connector(&mut self, overlay_id: &str, connector: &Connector) {
        self.queue.push(SurfaceCommand::DrawConnector {
            overlay_id: overlay_id.to_string(),
            connector: *connector,
        });
    }

    fn clear_canvas(&mut self, overlay_id: &str) {
        self.queue.push(SurfaceCommand::ClearCanvas {
            overlay_id: overlay_id.to_string(),
        });
    }

    fn resize_canvas(&mut self, overlay_id: &str) {
        self.queue.push(SurfaceCommand::ResizeCanvas {
            overlay_id: overlay_id.to_string(),
        });
    }

    fn add_class(&mut self, selector: &str, class: &str) {
        self.queue.push(SurfaceCommand::AddClass {
            selector: selector.to_string(),
            class: class.to_string(),
        });
    }

    fn remove_class_everywhere(&mut self, class: &str) {
        self.queue.push(SurfaceCommand::RemoveClassEverywhere {
            class: class.to_string(),
        });
    }

    fn set_animations_enabled(&mut self, overlay_id: &str, enabled: bool) {
        self.queue.push(SurfaceCommand::SetAnimationsEnabled {
            overlay_id: overlay_id.to_string(),
            enabled,
        });
    }

    fn element_at(&self, pos: Point) -> Option<String> {
        self.elements
            .iter()
            .filter(|(_, rect)| rect.contains(pos))
            .min_by(|(_, a), (_, b)| {
                a.area()
                    .partial_cmp(&b.area())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(sel, _)| sel.clone())
    }

    fn closest_matching(&self, selector: &str, matcher: &str) -> Option<String> {
        // No ancestor information on this side of the bridge; only a direct
        // match can be resolved locally.
        let direct = matcher == "[id]" && selector.starts_with('#') || selector == matcher;
        direct.then(|| selector.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/remote.rs"]
mod tests;
