use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::clock::TestClock;
use crate::surface::headless::{HeadlessSurface, SurfaceOp};
use crate::tour::step::Step;

const OVERLAY: &str = "waypost-overlay";

fn setup() -> (Rc<RefCell<HeadlessSurface>>, TestClock, Overlay) {
    let surface = Rc::new(RefCell::new(HeadlessSurface::new(Size::new(1000.0, 600.0))));
    let clock = TestClock::new();
    let overlay = Overlay::new(Box::new(Rc::clone(&surface)), Box::new(clock.clone()));
    (surface, clock, overlay)
}

fn step(id: &str, target: Option<&str>) -> Step {
    Step::new(id, "Some explanatory text", target).unwrap()
}

#[test]
fn small_targets_get_a_circular_focus_and_covers() {
    let (surface, _, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#btn", Rect::new(100.0, 100.0, 140.0, 120.0));
    let options = TourOptions::default();

    overlay.draw_step(&step("intro", Some("#btn")), &options);

    let s = surface.borrow();
    match s.focus_shape(OVERLAY) {
        Some(FocusShape::Circle { center, radius }) => {
            assert_eq!(center, Point::new(120.0, 110.0));
            assert!((radius - 28.0).abs() < 1e-9);
        }
        other => panic!("expected circle, got {other:?}"),
    }
    let cover = s.cover_rects(OVERLAY).unwrap();
    assert_eq!(cover.top_height, 100.0);
    assert_eq!(cover.left_width, 100.0);
    assert_eq!(s.text_boxes(OVERLAY).len(), 1);
    assert_eq!(s.connectors(OVERLAY).len(), 1);
    // Circular focus never shadows the target.
    assert!(s.classes_of("#btn").is_empty());
}

#[test]
fn rect_focused_targets_get_a_shadow_class() {
    let (surface, _, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#wide", Rect::new(0.0, 0.0, 500.0, 80.0));
    let options = TourOptions::default();

    overlay.draw_step(&step("intro", Some("#wide")), &options);

    let s = surface.borrow();
    assert!(matches!(
        s.focus_shape(OVERLAY),
        Some(FocusShape::RoundedRect { .. })
    ));
    assert_eq!(s.classes_of("#wide"), vec!["waypost-shadowed"]);
}

#[test]
fn missing_targets_degrade_to_a_centered_text_box() {
    let (surface, _, mut overlay) = setup();
    let options = TourOptions::default();

    overlay.draw_step(&step("intro", None), &options);

    let s = surface.borrow();
    assert_eq!(s.focus_shape(OVERLAY), None);
    assert!(s.connectors(OVERLAY).is_empty());
    let boxes = s.text_boxes(OVERLAY);
    assert_eq!(boxes.len(), 1);
    let (_, _, at, _) = &boxes[0];
    // Centered: (1000 - width) / 2, (600 - height) / 2.
    let measured = s.measure_text_box("Some explanatory text");
    assert_eq!(at.x, (1000.0 - measured.width) / 2.0);
    assert_eq!(at.y, (600.0 - measured.height) / 2.0);
}

#[test]
fn offscreen_targets_are_scrolled_into_view_first() {
    let (surface, clock, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#down", Rect::new(450.0, 900.0, 550.0, 950.0));
    let options = TourOptions::default();

    overlay.draw_step(&step("intro", Some("#down")), &options);

    let s = surface.borrow();
    assert!(s.ops().contains(&SurfaceOp::ScrollIntoView("#down".into())));
    // Scroll settle plus the focus transition settle.
    let sleeps = clock.sleeps();
    assert!(sleeps.contains(&Duration::from_millis(500)));
    assert!(sleeps.contains(&Duration::from_millis(700)));
    // The scrolled element is now centered, so the focus follows it there.
    assert!(matches!(
        s.focus_shape(OVERLAY),
        Some(FocusShape::Circle { center, .. }) if center == Point::new(500.0, 300.0)
    ));
}

#[test]
fn single_mode_replaces_the_previous_step() {
    let (surface, _, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#a", Rect::new(100.0, 100.0, 140.0, 120.0))
        .add_element("#b", Rect::new(700.0, 400.0, 740.0, 420.0));
    let options = TourOptions::default();

    overlay.draw_step(&step("one", Some("#a")), &options);
    overlay.draw_step(&step("two", Some("#b")), &options);

    let s = surface.borrow();
    let boxes = s.text_boxes(OVERLAY);
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].0, "two");
    assert_eq!(overlay.drawn_ids(), vec!["two".to_string()]);
}

#[test]
fn multi_mode_accumulates_steps() {
    let (surface, _, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#a", Rect::new(100.0, 100.0, 140.0, 120.0));
    let options = TourOptions {
        mode: Mode::Multi,
        ..TourOptions::default()
    };

    overlay.draw_step(&step("one", Some("#a")), &options);
    overlay.draw_step(&step("two", None), &options);

    assert_eq!(surface.borrow().text_boxes(OVERLAY).len(), 2);
    assert_eq!(
        overlay.drawn_ids(),
        vec!["one".to_string(), "two".to_string()]
    );
}

#[test]
fn resize_redraw_is_debounced_and_animation_free() {
    let (surface, clock, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#a", Rect::new(100.0, 100.0, 140.0, 120.0));
    let options = TourOptions::default();
    overlay.draw_step(&step("one", Some("#a")), &options);
    surface.borrow_mut().clear_ops();

    overlay.notify_resize();
    overlay.pump(&options);
    assert!(surface.borrow().ops().is_empty());

    clock.advance(Duration::from_millis(100));
    overlay.pump(&options);

    let s = surface.borrow();
    let ops = s.ops();
    assert!(ops.contains(&SurfaceOp::SetAnimationsEnabled(OVERLAY.into(), false)));
    assert!(ops.contains(&SurfaceOp::SetAnimationsEnabled(OVERLAY.into(), true)));
    assert!(ops.iter().any(|op| matches!(op, SurfaceOp::PlaceTextBox { .. })));
    // Suppressed transition: no new settle sleep was requested.
    assert_eq!(clock.sleeps().len(), 1);
}

#[test]
fn resize_without_drawn_steps_does_nothing() {
    let (surface, clock, mut overlay) = setup();
    let options = TourOptions::default();
    overlay.arm(&options);
    surface.borrow_mut().clear_ops();

    overlay.notify_resize();
    clock.advance(Duration::from_millis(100));
    overlay.pump(&options);
    assert!(surface.borrow().ops().is_empty());
}

#[test]
fn clear_keeps_the_overlay_but_drops_artifacts() {
    let (surface, _, mut overlay) = setup();
    surface
        .borrow_mut()
        .add_element("#wide", Rect::new(0.0, 0.0, 500.0, 80.0));
    let options = TourOptions::default();
    overlay.draw_step(&step("one", Some("#wide")), &options);

    overlay.clear(&options);

    let s = surface.borrow();
    assert!(s.has_overlay(OVERLAY));
    assert!(s.text_boxes(OVERLAY).is_empty());
    assert!(s.connectors(OVERLAY).is_empty());
    assert!(s.classes_of("#wide").is_empty());
}

#[test]
fn remove_tears_the_overlay_down() {
    let (surface, _, mut overlay) = setup();
    let options = TourOptions::default();
    overlay.draw_step(&step("one", None), &options);

    overlay.remove(&options);
    assert!(!surface.borrow().has_overlay(OVERLAY));
}

#[test]
fn mask_opacity_defaults_per_mode_and_explicit_values_survive() {
    let (surface, _, mut overlay) = setup();

    overlay.arm(&TourOptions::default());
    assert_eq!(surface.borrow().mask(OVERLAY).unwrap().opacity, 0.4);

    let multi = TourOptions {
        mode: Mode::Multi,
        ..TourOptions::default()
    };
    overlay.arm(&multi);
    assert_eq!(surface.borrow().mask(OVERLAY).unwrap().opacity, 0.0);

    // A host-configured opacity is honored even in multi mode.
    let multi_set = TourOptions {
        mode: Mode::Multi,
        mask_opacity: Some(0.7),
        ..TourOptions::default()
    };
    overlay.arm(&multi_set);
    assert_eq!(surface.borrow().mask(OVERLAY).unwrap().opacity, 0.7);
}

#[test]
fn arm_injects_the_stylesheet_once() {
    let (surface, _, mut overlay) = setup();
    let options = TourOptions::default();
    overlay.arm(&options);
    overlay.arm(&options);
    assert_eq!(surface.borrow().stylesheet_count(), 1);
}
