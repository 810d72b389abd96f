use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;

use crate::runtime::clock::TestClock;
use crate::surface::headless::HeadlessSurface;
use crate::tour::input::PointerZone;

const AUTHOR_OVERLAY: &str = "waypost-author";

fn setup() -> (Rc<RefCell<HeadlessSurface>>, TestClock, AuthorSession) {
    let surface = Rc::new(RefCell::new(HeadlessSurface::new(kurbo::Size::new(
        1000.0, 600.0,
    ))));
    surface
        .borrow_mut()
        .add_element("#panel", Rect::new(100.0, 100.0, 500.0, 400.0))
        .add_child_element("span.x", Rect::new(120.0, 120.0, 200.0, 140.0), "#panel");
    let clock = TestClock::new();
    let session = AuthorSession::with_clock(Box::new(Rc::clone(&surface)), Box::new(clock.clone()));
    (surface, clock, session)
}

fn click(pos: Point) -> InputEvent {
    InputEvent::PointerUp {
        pos,
        zone: PointerZone::Page,
    }
}

#[test]
fn begin_arms_a_clickthrough_overlay() {
    let (surface, _, mut session) = setup();
    let handle = session.begin(None);

    assert_eq!(session.state(), PickerState::Picking);
    assert!(!handle.is_resolved());
    assert!(surface.borrow().has_overlay(AUTHOR_OVERLAY));
    assert!(
        surface
            .borrow()
            .classes_of("body")
            .contains(&"waypost-picking".to_string())
    );
}

#[test]
fn picking_resolves_the_nearest_identified_ancestor() {
    let (surface, _, mut session) = setup();
    session.begin(None);

    // The click lands on the span; the pick walks up to its id'd parent.
    session.handle_event(click(Point::new(130.0, 130.0)));

    assert_eq!(session.state(), PickerState::Editing);
    let s = surface.borrow();
    assert_eq!(s.classes_of("#panel"), vec![PICKED_CLASS]);
    let boxes = s.text_boxes(AUTHOR_OVERLAY);
    assert_eq!(boxes.len(), 1);
    let (id, text, _, editable) = &boxes[0];
    assert_eq!(id, "text0");
    assert!(text.contains("Click to Edit"));
    assert!(editable);
    // Nothing is committed until a save.
    assert!(session.sequence().is_empty());
}

#[test]
fn a_click_outside_every_element_is_ignored() {
    let (_, _, mut session) = setup();
    session.begin(None);
    session.handle_event(click(Point::new(950.0, 550.0)));
    assert_eq!(session.state(), PickerState::Picking);
}

#[test]
fn save_is_debounced_through_virtual_time() {
    let (_, clock, mut session) = setup();
    let progressed = Rc::new(RefCell::new(Vec::new()));
    let progressed_in = Rc::clone(&progressed);
    session.on_progress(Box::new(move |index, seq| {
        progressed_in.borrow_mut().push((index, seq.len()));
    }));
    session.begin(None);
    session.handle_event(click(Point::new(130.0, 130.0)));

    session.edit_text("Press this to open the panel.");
    session.save();
    session.pump();
    assert!(session.sequence().is_empty());

    clock.advance(Duration::from_millis(150));
    session.pump();

    let seq = session.sequence();
    assert_eq!(seq.len(), 1);
    assert_eq!(seq[0].id.as_str(), "text0");
    assert_eq!(seq[0].text, "Press this to open the panel.");
    assert_eq!(seq[0].target.as_deref(), Some("#panel"));
    assert_eq!(*progressed.borrow(), vec![(0, 1)]);
}

#[test]
fn ctrl_s_saves_and_escape_finishes() {
    let (surface, _, mut session) = setup();
    let handle = session.begin(None);
    session.handle_event(click(Point::new(130.0, 130.0)));
    session.edit_text("Saved text");
    session.handle_event(InputEvent::Key {
        key: Key::Char('s'),
        ctrl: true,
    });

    // Escape flushes pending work before resolving.
    session.handle_event(InputEvent::Key {
        key: Key::Escape,
        ctrl: false,
    });

    assert_eq!(session.state(), PickerState::Idle);
    let result = handle.result().unwrap();
    assert_eq!(result.reason, ExitReason::Standard);
    assert_eq!(session.sequence().len(), 1);
    assert_eq!(session.sequence()[0].text, "Saved text");
    assert!(!surface.borrow().has_overlay(AUTHOR_OVERLAY));
    assert!(surface.borrow().classes_of("#panel").is_empty());
}

#[test]
fn repicking_the_same_target_reuses_its_step() {
    let (_, clock, mut session) = setup();
    session.begin(None);

    session.handle_event(click(Point::new(130.0, 130.0)));
    session.edit_text("First version");
    session.save();
    clock.advance(Duration::from_millis(150));
    session.pump();

    session.handle_event(click(Point::new(300.0, 300.0)));
    session.edit_text("Second version");
    session.save();
    clock.advance(Duration::from_millis(150));
    session.pump();

    // Both clicks resolved to #panel, so the step was updated in place.
    let seq = session.sequence();
    assert_eq!(seq.len(), 1);
    assert_eq!(seq[0].id.as_str(), "text0");
    assert_eq!(seq[0].text, "Second version");
}

#[test]
fn resumed_sequences_navigate_with_ctrl_arrows() {
    let (surface, _, mut session) = setup();
    let existing = vec![
        Step::new("text0", "First", Some("#panel")).unwrap(),
        Step::new("text1", "Second", None).unwrap(),
    ];
    session.begin(Some(existing));
    assert_eq!(session.state(), PickerState::Editing);
    assert_eq!(
        surface.borrow().text_boxes(AUTHOR_OVERLAY)[0].0,
        "text0".to_string()
    );

    session.handle_event(InputEvent::Key {
        key: Key::ArrowRight,
        ctrl: true,
    });
    assert_eq!(
        surface.borrow().text_boxes(AUTHOR_OVERLAY)[0].0,
        "text1".to_string()
    );

    session.handle_event(InputEvent::Key {
        key: Key::ArrowLeft,
        ctrl: true,
    });
    assert_eq!(
        surface.borrow().text_boxes(AUTHOR_OVERLAY)[0].0,
        "text0".to_string()
    );

    // Plain arrows without ctrl do nothing in authoring mode.
    session.handle_event(InputEvent::Key {
        key: Key::ArrowRight,
        ctrl: false,
    });
    assert_eq!(
        surface.borrow().text_boxes(AUTHOR_OVERLAY)[0].0,
        "text0".to_string()
    );
}
