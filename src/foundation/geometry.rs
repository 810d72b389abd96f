//! Pure placement geometry for the overlay.
//!
//! Everything here is a function of rectangles and the viewport; no surface
//! state is touched. The overlay feeds the results straight into its
//! [`crate::surface::Surface`].

pub use kurbo::{Point, QuadBez, Rect, Size, Vec2};

/// Fixed displacement magnitude for the connector control point.
const CURVATURE: f64 = 20.0;

/// Arrowhead edge length in surface pixels.
const ARROWHEAD_LEN: f64 = 10.0;

/// Corner radius used for rounded-rect focus fields.
const FOCUS_CORNER_RADIUS: f64 = 8.0;

/// Scale factor applied to the target's max dimension for circular focus.
const FOCUS_CIRCLE_SCALE: f64 = 1.4;

/// Fraction of the smaller viewport axis a circle may occupy.
const FOCUS_CIRCLE_VIEWPORT_FRACTION: f64 = 0.4;

/// Cut-out shape exposing the current target through the mask.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FocusShape {
    /// Circular cut-out for targets small relative to the viewport.
    Circle {
        /// Circle center (the target midpoint).
        center: Point,
        /// Circle radius.
        radius: f64,
    },
    /// Rounded rectangle matching the target bounds.
    RoundedRect {
        /// Target bounding rectangle.
        rect: Rect,
        /// Corner radius.
        radius: f64,
    },
}

/// Heights/widths of the four partial-cover tiles framing a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoverRects {
    /// Height of the top tile.
    pub top_height: f64,
    /// Width of the left tile.
    pub left_width: f64,
    /// Width of the right tile.
    pub right_width: f64,
    /// Height of the bottom tile.
    pub bottom_height: f64,
}

/// A connector curve plus its arrowhead triangle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Connector {
    /// Quadratic curve from the text box edge to the target edge.
    pub curve: QuadBez,
    /// Filled arrowhead triangle at the target end.
    pub arrowhead: [Point; 3],
}

/// Margin between text box and target, derived from the viewport width.
pub fn margin_for_viewport(viewport_width: f64, max_margin: f64) -> f64 {
    max_margin.min((viewport_width / 10.0).max(10.0))
}

/// Top-left position for the text box.
///
/// With a target, the box goes to whichever side of the target has more room,
/// decided per axis by comparing the target midpoint against the viewport
/// center. The result is clamped inside the viewport minus `padding`. Without
/// a target the box is viewport-centered (degraded mode).
pub fn text_box_position(
    target: Option<(Point, Size)>,
    text_size: Size,
    viewport: Size,
    margin: f64,
    padding: f64,
) -> Point {
    let Some((target_mid, target_size)) = target else {
        return Point::new(
            viewport.width / 2.0 - text_size.width / 2.0,
            viewport.height / 2.0 - text_size.height / 2.0,
        );
    };

    let x = if target_mid.x < viewport.width / 2.0 {
        target_mid.x + target_size.width / 2.0 + margin
    } else {
        target_mid.x - target_size.width / 2.0 - text_size.width - margin
    };
    let y = if target_mid.y < viewport.height / 2.0 {
        target_mid.y + target_size.height / 2.0 + margin
    } else {
        target_mid.y - target_size.height / 2.0 - text_size.height - margin
    };

    Point::new(
        x.max(padding).min(viewport.width - text_size.width - padding),
        y.max(padding)
            .min(viewport.height - text_size.height - padding),
    )
}

/// Start (text edge) and end (target edge) points for the connector.
///
/// Wide targets are approached from above/below, tall targets from the side,
/// so the arrow meets the longer edge.
pub fn connector_endpoints(
    target_mid: Point,
    target_size: Size,
    text_mid: Point,
    text_size: Size,
) -> (Point, Point) {
    let target_on_left = target_mid.x < text_mid.x;
    let target_on_top = target_mid.y < text_mid.y;
    let is_wide = target_size.width > target_size.height;

    let target = if is_wide {
        Point::new(
            target_mid.x,
            target_mid.y
                + if target_on_top {
                    target_size.height / 2.0
                } else {
                    -target_size.height / 2.0
                },
        )
    } else {
        Point::new(
            target_mid.x
                + if target_on_left {
                    target_size.width / 2.0
                } else {
                    -target_size.width / 2.0
                },
            target_mid.y,
        )
    };

    let start = if is_wide {
        Point::new(
            text_mid.x
                + if target_on_left {
                    -text_size.width / 2.0
                } else {
                    text_size.width / 2.0
                },
            text_mid.y,
        )
    } else {
        Point::new(
            text_mid.x,
            text_mid.y
                + if target_on_top {
                    -text_size.height / 2.0
                } else {
                    text_size.height / 2.0
                },
        )
    };

    (start, target)
}

/// Curvature sign for the connector.
///
/// Chosen from the relative quadrant of start vs target and the target
/// orientation so the curve arcs away from the mask edge instead of through it.
pub fn positive_curvature(start: Point, target: Point, is_wide: bool) -> bool {
    let from_left = start.x < target.x;
    let from_above = start.y < target.y;
    !((from_above && from_left && is_wide)
        || (from_above && !from_left && !is_wide)
        || (!from_above && from_left && !is_wide)
        || (!from_above && !from_left && is_wide))
}

/// Control point for the quadratic connector curve.
///
/// The segment midpoint displaced perpendicular to the line, with magnitude
/// normalized by point distance. Coincident points get no displacement.
pub fn quad_control_point(start: Point, target: Point, positive: bool) -> Point {
    let d = target - start;
    let distance = d.hypot();
    let mid = start.midpoint(target);
    if distance == 0.0 {
        return mid;
    }
    let sign = if positive { 1.0 } else { -1.0 };
    Point::new(
        mid.x + sign * CURVATURE * (start.y - target.y) / distance,
        mid.y + sign * CURVATURE * (target.x - start.x) / distance,
    )
}

/// Full connector: quadratic curve plus arrowhead at the target end.
pub fn connector(start: Point, target: Point, positive: bool) -> Connector {
    let ctrl = quad_control_point(start, target, positive);
    let angle = (target.y - ctrl.y).atan2(target.x - ctrl.x);
    let wing = |offset: f64| {
        Point::new(
            target.x - ARROWHEAD_LEN * (angle + offset).cos(),
            target.y - ARROWHEAD_LEN * (angle + offset).sin(),
        )
    };
    Connector {
        curve: QuadBez::new(start, ctrl, target),
        arrowhead: [
            target,
            wing(-std::f64::consts::FRAC_PI_6),
            wing(std::f64::consts::FRAC_PI_6),
        ],
    }
}

/// Select the focus cut-out shape for a target.
///
/// Small targets get a circle of radius `1.4 * max_dim / 2`; targets whose
/// scaled max dimension would rival the smaller viewport axis get a rounded
/// rect matching their bounds, avoiding disproportionately large circles.
pub fn focus_shape(target: Rect, viewport: Size) -> FocusShape {
    let size = target.size();
    let max_dimension = size.width.max(size.height);
    let max_space = viewport.width.min(viewport.height);
    if max_dimension * FOCUS_CIRCLE_SCALE < max_space * FOCUS_CIRCLE_VIEWPORT_FRACTION {
        FocusShape::Circle {
            center: target.center(),
            radius: max_dimension / 2.0 * FOCUS_CIRCLE_SCALE,
        }
    } else {
        FocusShape::RoundedRect {
            rect: target,
            radius: FOCUS_CORNER_RADIUS,
        }
    }
}

/// Partial-cover tile extents framing `target` inside `viewport`.
pub fn cover_rects(target: Rect, viewport: Size) -> CoverRects {
    CoverRects {
        top_height: target.y0.max(0.0),
        left_width: target.x0.max(0.0),
        right_width: (viewport.width - target.x1).max(0.0),
        bottom_height: (viewport.height - target.y1).max(0.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
