use super::*;

#[test]
fn geometry_queries_answer_from_synced_state() {
    let mut s = RemoteSurface::new();
    s.sync_viewport(Size::new(800.0, 600.0));
    s.sync_element("#a", Rect::new(10.0, 10.0, 50.0, 30.0), true);
    s.sync_element("#b", Rect::new(0.0, 700.0, 50.0, 750.0), false);

    assert_eq!(s.viewport(), Size::new(800.0, 600.0));
    assert_eq!(s.element_rect("#a"), Some(Rect::new(10.0, 10.0, 50.0, 30.0)));
    assert!(s.is_element_visible("#a"));
    assert!(!s.is_element_visible("#b"));
    assert!(!s.is_element_visible("#missing"));
}

#[test]
fn mutations_queue_commands_in_order() {
    let mut s = RemoteSurface::new();
    s.ensure_overlay(
        "ov",
        OverlayType::Blocking,
        &MaskStyle {
            color: "#000000".into(),
            opacity: 0.4,
        },
    );
    s.set_pointer_capture("ov", true);
    s.remove_overlay("ov");

    let commands = s.drain_commands();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], SurfaceCommand::EnsureOverlay { .. }));
    assert!(matches!(
        commands[1],
        SurfaceCommand::SetPointerCapture { enabled: true, .. }
    ));
    assert!(matches!(commands[2], SurfaceCommand::RemoveOverlay { .. }));
    // Draining empties the queue.
    assert!(s.drain_commands().is_empty());
}

#[test]
fn commands_serialize_with_an_op_tag() {
    let mut s = RemoteSurface::new();
    s.place_text_box("ov", "intro", "hello", Point::new(3.0, 4.0), false);
    let json = s.drain_commands_json().unwrap();
    assert!(json.contains(r#""op":"place_text_box""#));
    assert!(json.contains(r#""step_id":"intro""#));

    let back: Vec<SurfaceCommand> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        back,
        vec![SurfaceCommand::PlaceTextBox {
            overlay_id: "ov".into(),
            step_id: "intro".into(),
            text: "hello".into(),
            x: 3.0,
            y: 4.0,
            editable: false,
        }]
    );
}

#[test]
fn stylesheet_injection_is_idempotent_across_drains() {
    let mut s = RemoteSurface::new();
    assert!(s.inject_stylesheet(".a {}"));
    s.drain_commands();
    assert!(!s.inject_stylesheet(".a {}"));
    assert!(s.drain_commands().is_empty());
}

#[test]
fn local_ancestor_resolution_only_matches_directly() {
    let mut s = RemoteSurface::new();
    s.sync_element("#a", Rect::new(0.0, 0.0, 10.0, 10.0), true);
    assert_eq!(s.closest_matching("#a", "[id]").as_deref(), Some("#a"));
    assert_eq!(s.closest_matching("div", "div").as_deref(), Some("div"));
    assert_eq!(s.closest_matching("div", "[id]"), None);
}
