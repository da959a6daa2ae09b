use super::*;

#[test]
fn request_replaces_pending_token() {
    let mut t = ManualTimer::new();
    let a = t.request_tick();
    let b = t.request_tick();
    assert_ne!(a, b);
    assert_eq!(t.pending(), Some(b));
    assert_eq!(t.requested(), 2);
}

#[test]
fn cancel_ignores_stale_tokens() {
    let mut t = ManualTimer::new();
    let a = t.request_tick();
    let b = t.request_tick();
    t.cancel_tick(a);
    assert_eq!(t.pending(), Some(b));
    assert_eq!(t.cancelled(), 0);

    t.cancel_tick(b);
    assert_eq!(t.pending(), None);
    assert_eq!(t.cancelled(), 1);
}

#[test]
fn take_pending_hands_over_once() {
    let mut t = ManualTimer::new();
    let a = t.request_tick();
    assert_eq!(t.take_pending(), Some(a));
    assert_eq!(t.take_pending(), None);
    t.cancel_tick(a);
    assert_eq!(t.cancelled(), 0);
}
