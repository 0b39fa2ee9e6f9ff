use autoshift_common::globals::{self, flags, GLOBALS_COUNT};

use super::*;
use super::spec::{GlobalProp, GlobalType};

#[test]
fn defaults_match_firmware() {
    let mut values = [0u16; GLOBALS_COUNT];
    for name in names() {
        GlobalProp::new_default(name).unwrap().apply(&mut values);
    }
    assert_eq!(values, globals::DEFAULTS);
}

#[test]
fn alias() {
    assert_eq!(
        GlobalProp::new_default("auto_shift_delay").unwrap(),
        GlobalProp::new_default("auto_shift_timeout").unwrap()
    );
    assert_eq!(
        GlobalProp::new_default("nope").unwrap_err(),
        "Invalid global 'nope'"
    );
}

#[test]
fn set_values() {
    let mut g = GlobalProp::new_default("tap_code_delay").unwrap();
    g.set_value("20").unwrap();
    assert!(matches!(g.spec, GlobalType::Timeout { value: 20, .. }));
    assert_eq!(
        g.set_value("101").unwrap_err(),
        "Invalid duration; only 0 to 100 milliseconds are valid"
    );
    assert!(g.set_value("-1").is_err());

    let mut g = GlobalProp::new_default("retro_shift").unwrap();
    let mut values = globals::DEFAULTS;
    g.set_value("on").unwrap();
    g.apply(&mut values);
    assert_eq!(
        values[globals::AUTO_SHIFT_FLAGS as usize],
        globals::AUTO_SHIFT_FLAGS_DEFAULT | flags::RETRO_SHIFT
    );
    assert!(g.set_value("maybe").is_err());
}
