use super::*;

#[test]
fn test_clock_advances_on_sleep_and_records_it() {
    let mut clock = TestClock::new();
    let start = clock.now();
    clock.sleep(Duration::from_millis(700));
    assert_eq!(clock.now() - start, Duration::from_millis(700));
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(700)]);
}

#[test]
fn test_clock_clones_share_time() {
    let clock = TestClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_secs(1));
    assert_eq!(other.now(), clock.now());
    assert!(other.sleeps().is_empty());
}

#[test]
fn debouncer_delivers_after_the_quiet_window() {
    let clock = TestClock::new();
    let mut debouncer = Debouncer::new(Duration::from_millis(100));

    debouncer.submit(1, clock.now());
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.flush_due(clock.now()), None);

    clock.advance(Duration::from_millis(99));
    assert_eq!(debouncer.flush_due(clock.now()), None);

    clock.advance(Duration::from_millis(1));
    assert_eq!(debouncer.flush_due(clock.now()), Some(1));
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.flush_due(clock.now()), None);
}

#[test]
fn resubmission_restarts_the_window_and_keeps_the_last_value() {
    let clock = TestClock::new();
    let mut debouncer = Debouncer::new(Duration::from_millis(100));

    debouncer.submit("a", clock.now());
    clock.advance(Duration::from_millis(80));
    debouncer.submit("b", clock.now());

    // The first window would have elapsed here; the resubmission reset it.
    clock.advance(Duration::from_millis(40));
    assert_eq!(debouncer.flush_due(clock.now()), None);

    clock.advance(Duration::from_millis(60));
    assert_eq!(debouncer.flush_due(clock.now()), Some("b"));
}

#[test]
fn flush_ignores_the_window() {
    let clock = TestClock::new();
    let mut debouncer = Debouncer::new(Duration::from_millis(100));
    debouncer.submit(7, clock.now());
    assert_eq!(debouncer.flush(), Some(7));
    assert_eq!(debouncer.flush(), None);
}
