use autoshift_common::globals::{self, flags};

use super::*;

extern crate std;

#[test]
fn defaults() {
    let s = Settings::default();
    assert_eq!(s.timeout(), 175);
    assert_eq!(s.tapping_term(), 200);
    assert_eq!(s.retro_shift_timeout(), 500);
    assert_eq!(s.tap_code_delay(), 0);
    assert!(s.has_flag(flags::ALPHA | flags::NUMERIC | flags::SPECIAL));
    assert!(s.has_flag(flags::REPEAT));
    assert!(!s.has_flag(flags::RETRO_SHIFT));
    assert!(!s.has_flag(flags::MODIFIERS));
}

#[test]
fn load_from_config() {
    let mut s = Settings::default();
    let bin = autoshift_config::text_to_binary(
        r#"
[global]
auto_shift_timeout = 150
retro_shift = true
auto_shift_numeric = false
"#,
    )
    .unwrap();
    s.load(bin).unwrap();

    assert_eq!(s.timeout(), 150);
    assert!(s.has_flag(flags::RETRO_SHIFT));
    assert!(!s.has_flag(flags::NUMERIC));
    assert!(s.has_flag(flags::ALPHA));
    assert_eq!(s.tapping_term(), 200);
}

#[test]
fn load_errors() {
    let mut s = Settings::default();
    s.set_timeout(99);

    assert_eq!(s.load([0u16; 0]), Err(LoadError::Corrupt));
    assert_eq!(s.load([PROTOCOL_VERSION + 1, 0]), Err(LoadError::VersionMismatch));
    assert_eq!(
        s.load([PROTOCOL_VERSION, 1, globals::TAPPING_TERM]),
        Err(LoadError::Corrupt)
    );
    assert_eq!(
        s.load([PROTOCOL_VERSION, 1, 77, 1]),
        Err(LoadError::UnknownGlobal(77))
    );
    assert_eq!(
        s.load([PROTOCOL_VERSION, 0, 1]),
        Err(LoadError::Corrupt)
    );

    assert_eq!(s.timeout(), 99);

    s.load([PROTOCOL_VERSION, 1, globals::TAPPING_TERM, 125])
        .unwrap();
    assert_eq!(s.tapping_term(), 125);
    assert_eq!(s.timeout(), 175);
}

#[test]
fn eligible_classes() {
    let mut s = Settings::default();
    assert!(s.is_eligible(0x04));
    assert!(s.is_eligible(0x1d));
    assert!(s.is_eligible(0x27));
    assert!(s.is_eligible(0x2b));
    assert!(s.is_eligible(0x38));
    assert!(s.is_eligible(0x64));
    assert!(!s.is_eligible(0x28));
    assert!(!s.is_eligible(0x2c));
    assert!(!s.is_eligible(0xe1));

    s.set_flag(flags::NUMERIC, false);
    s.set_flag(flags::SPECIAL, false);
    assert!(!s.is_eligible(0x1e));
    assert!(!s.is_eligible(0x2d));
    assert!(s.is_eligible(0x04));

    s.set_flag(flags::ALPHA, false);
    assert!(!s.is_eligible(0x04));
}
