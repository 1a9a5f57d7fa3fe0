use std::time::{Duration, Instant};

use crate::debounce::Debouncer;

const DELAY: Duration = Duration::from_millis(500);

#[test]
fn idle_until_scheduled() {
    let mut debounce = Debouncer::new(DELAY);
    let now = Instant::now();

    assert!(!debounce.is_pending());
    assert!(!debounce.fire(now + DELAY * 10));
}

#[test]
fn fires_once_after_delay() {
    let mut debounce = Debouncer::new(DELAY);
    let start = Instant::now();
    debounce.schedule(start);

    assert_eq!(debounce.deadline(), Some(start + DELAY));
    assert!(!debounce.fire(start + Duration::from_millis(499)));
    assert!(debounce.fire(start + DELAY));
    assert!(!debounce.fire(start + DELAY * 2));
    assert!(!debounce.is_pending());
}

#[test]
fn rescheduling_pushes_deadline_back() {
    let mut debounce = Debouncer::new(DELAY);
    let start = Instant::now();
    debounce.schedule(start);
    debounce.schedule(start + Duration::from_millis(300));

    assert!(!debounce.fire(start + DELAY));
    assert!(debounce.fire(start + Duration::from_millis(800)));
}

#[test]
fn cancel_drops_deadline() {
    let mut debounce = Debouncer::new(DELAY);
    let start = Instant::now();
    debounce.schedule(start);
    debounce.cancel();

    assert!(!debounce.fire(start + DELAY));
}

#[test]
fn zero_delay_fires_immediately() {
    let mut debounce = Debouncer::new(Duration::ZERO);
    let now = Instant::now();
    debounce.schedule(now);

    assert!(debounce.fire(now));
}
