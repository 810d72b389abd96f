use super::*;

fn surface() -> HeadlessSurface {
    let mut s = HeadlessSurface::new(Size::new(1000.0, 600.0));
    s.add_element("#page", Rect::new(0.0, 0.0, 1000.0, 600.0));
    s.add_element("#panel", Rect::new(100.0, 100.0, 500.0, 400.0));
    s.add_child_element("span.label", Rect::new(120.0, 120.0, 200.0, 140.0), "#panel");
    s
}

#[test]
fn visibility_requires_full_containment() {
    let mut s = surface();
    assert!(s.is_element_visible("#panel"));
    s.add_element("#below", Rect::new(0.0, 550.0, 100.0, 700.0));
    assert!(!s.is_element_visible("#below"));
    assert!(!s.is_element_visible("#missing"));
}

#[test]
fn scrolling_centers_the_element() {
    let mut s = surface();
    s.add_element("#below", Rect::new(0.0, 900.0, 100.0, 1000.0));
    s.scroll_into_view("#below");
    let rect = s.element_rect("#below").unwrap();
    assert_eq!(rect.center(), Point::new(500.0, 300.0));
    assert_eq!(rect.size(), Size::new(100.0, 100.0));
    assert!(s.ops().contains(&SurfaceOp::ScrollIntoView("#below".into())));
}

#[test]
fn stylesheet_injection_is_idempotent() {
    let mut s = surface();
    assert!(s.inject_stylesheet(".a {}"));
    assert!(!s.inject_stylesheet(".a {}"));
    assert!(s.inject_stylesheet(".b {}"));
    assert_eq!(s.stylesheet_count(), 2);
}

#[test]
fn overlay_state_tracks_mutations() {
    let mut s = surface();
    let mask = MaskStyle {
        color: "#000000".into(),
        opacity: 0.4,
    };
    s.ensure_overlay("ov", OverlayType::Partial, &mask);
    assert!(s.has_overlay("ov"));

    let shape = FocusShape::Circle {
        center: Point::new(10.0, 10.0),
        radius: 5.0,
    };
    s.set_focus_shape("ov", shape);
    assert_eq!(s.focus_shape("ov"), Some(shape));

    s.place_text_box("ov", "intro", "hi", Point::new(1.0, 2.0), false);
    assert_eq!(s.text_boxes("ov").len(), 1);
    s.remove_text_box("ov", "intro");
    assert!(s.text_boxes("ov").is_empty());

    s.remove_overlay("ov");
    assert!(!s.has_overlay("ov"));
    assert_eq!(s.focus_shape("ov"), None);
}

#[test]
fn canvas_operations_manage_connectors() {
    let mut s = surface();
    s.ensure_overlay("ov", OverlayType::Partial, &MaskStyle {
        color: "#000".into(),
        opacity: 0.4,
    });
    let conn = crate::foundation::geometry::connector(
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        true,
    );
    s.draw_connector("ov", &conn);
    s.draw_connector("ov", &conn);
    assert_eq!(s.connectors("ov").len(), 2);
    s.clear_canvas("ov");
    assert!(s.connectors("ov").is_empty());
}

#[test]
fn class_toggles_are_tracked_per_element() {
    let mut s = surface();
    s.add_class("#panel", "waypost-shadowed");
    s.add_class("#panel", "waypost-shadowed");
    s.add_class("span.label", "waypost-shadowed");
    assert_eq!(s.classes_of("#panel"), vec!["waypost-shadowed"]);

    s.remove_class_everywhere("waypost-shadowed");
    assert!(s.classes_of("#panel").is_empty());
    assert!(s.classes_of("span.label").is_empty());
}

#[test]
fn hit_testing_prefers_the_smallest_element() {
    let s = surface();
    // The label, panel and page all contain this point.
    assert_eq!(s.element_at(Point::new(130.0, 130.0)).as_deref(), Some("span.label"));
    assert_eq!(s.element_at(Point::new(300.0, 300.0)).as_deref(), Some("#panel"));
    assert_eq!(s.element_at(Point::new(900.0, 50.0)).as_deref(), Some("#page"));
    assert_eq!(s.element_at(Point::new(2000.0, 50.0)), None);
}

#[test]
fn closest_matching_walks_parent_links() {
    let s = surface();
    assert_eq!(
        s.closest_matching("span.label", "[id]").as_deref(),
        Some("#panel")
    );
    assert_eq!(
        s.closest_matching("#panel", "[id]").as_deref(),
        Some("#panel")
    );
    assert_eq!(s.closest_matching("span.label", "#page"), None);
}

#[test]
fn text_measurement_caps_at_the_viewport_fraction() {
    let s = surface();
    let small = s.measure_text_box("hi");
    assert_eq!(small, Size::new(16.0, 20.0));

    let two_lines = s.measure_text_box("hello\nhi");
    assert_eq!(two_lines, Size::new(40.0, 40.0));

    let long = s.measure_text_box(&"x".repeat(200));
    assert_eq!(long.width, 400.0);
}
