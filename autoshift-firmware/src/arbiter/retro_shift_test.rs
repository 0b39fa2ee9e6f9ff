use autoshift_common::keycodes::key_range;

use super::*;

fn lt_a(time: Tick) -> KeyEvent {
    KeyEvent::press(key_range::layer_tap(1, 4), 0, 3, time)
}

#[test]
fn wait_and_expire() {
    let mut r = RetroShift::default();
    assert!(r.is_idle());
    assert_eq!(r.wait_for(0, 500), None);

    r.start(lt_a(65_500));
    assert!(!r.is_idle());
    assert_eq!(r.wait_for(65_500, 0), None);
    assert_eq!(r.wait_for(65_500, 500), Some(500));
    assert_eq!(r.wait_for(400, 500), Some(64));

    assert!(r.timer_expired(463, 500).is_none());
    let ev = r.timer_expired(464, 500).unwrap();
    assert_eq!(ev.time, 65_500);
    assert!(r.is_idle());
    assert!(r.timer_expired(2000, 500).is_none());
}

#[test]
fn take_matching_only_same_key() {
    let mut r = RetroShift::default();
    let ev = lt_a(10);
    r.start(ev);

    assert!(r.is_waiting_on(ScanKey::new(0, 3, false)));
    assert!(r
        .take_matching(ev.keycode, ScanKey::new(0, 4, false))
        .is_none());
    assert!(r.take_matching(ev.keycode + 1, ev.key).is_none());
    assert_eq!(r.take_matching(ev.keycode, ev.key), Some(ev));
    assert!(r.is_idle());
    assert!(r.take().is_none());
}
