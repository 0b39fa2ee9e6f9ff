use autoshift_common::keycodes::key_range;

use crate::test::kc;

use super::*;

#[test]
fn test_key_code() {
    assert_eq!(key_code("a"), Some(4));
    assert_eq!(key_code("A"), Some(4));
    assert_eq!(key_code("z"), Some(0x1d));
    assert_eq!(key_code("1"), Some(0x1e));
    assert_eq!(key_code("0"), Some(0x27));
    assert_eq!(key_code("-"), Some(45));
    assert_eq!(key_code("/"), Some(0x38));
    assert_eq!(key_code("\\["), Some(0x2f));
    assert_eq!(key_code("NonUsBackslash"), Some(0x64));
    assert_eq!(key_code("Non_Us_Backslash"), Some(0x64));
    assert_eq!(key_code("application"), Some(0x65));
    assert_eq!(key_code("lc"), Some(key_range::MODIFIER_MIN));
    assert_eq!(key_code("ls"), Some(key_range::LEFT_SHIFT));
    assert_eq!(key_code("rshift"), Some(key_range::RIGHT_SHIFT));
    assert_eq!(key_code("rg"), Some(key_range::MODIFIER_MAX));
    assert_eq!(key_code("as_toggle"), Some(key_range::AS_TOGGLE));
    assert_eq!(key_code("AS-REPORT"), Some(key_range::AS_REPORT));
    assert_eq!(key_code("nope"), None);
}

#[test]
fn names_are_unique_after_normalizing() {
    assert_eq!(KEY_NAMES.len(), LISTING.len());
    assert!(KEY_NAMES.keys().all(|k| !k.is_empty()));
    assert_eq!(KEY_NAMES.get("/"), Some(&key_range::BASIC_SLASH));
    assert_eq!(parse_keycode("S-/"), Ok(key_range::composite(2, 0x38)));
    assert_eq!(
        keycodes_iter()
            .filter(|l| l.code == key_range::BASIC_SLASH)
            .map(|l| l.name)
            .collect::<Vec<_>>(),
        ["Forwardslash", "slash", "/"]
    );
}

#[test]
fn modifiers_convert() {
    assert_eq!(modifiers_to_mods5("S"), Some(2));
    assert_eq!(modifiers_to_mods5("C-S"), Some(3));
    assert_eq!(modifiers_to_mods5("RS-RG"), Some(0x1a));
    assert_eq!(modifiers_to_mods5("S-RC"), None);
    assert_eq!(modifiers_to_mods5("X"), None);
    assert_eq!(mods5_to_string(0x1a), "RS-RG");
    assert_eq!(mods5_to_string(3), "C-S");
}

#[test]
fn parse_expressions() {
    assert_eq!(parse_keycode("a"), Ok(4));
    assert_eq!(parse_keycode(" 0x4104 "), Ok(0x4104));
    assert_eq!(parse_keycode("lt(1, a)"), Ok(key_range::layer_tap(1, 4)));
    assert_eq!(parse_keycode("mt(C-S, b)"), Ok(key_range::mod_tap(3, 5)));
    assert_eq!(parse_keycode("S-1"), Ok(key_range::composite(2, 0x1e)));
    assert_eq!(parse_keycode("C-S-a"), Ok(0x304));

    assert_eq!(
        parse_keycode("lt(16, a)"),
        Err("Invalid layer '16'; use 0 to 15".into())
    );
    assert_eq!(parse_keycode("mt(S, ls)"), Err("'ls' is not a basic key".into()));
    assert_eq!(parse_keycode("xx(S, a)"), Err("Unknown function 'xx'".into()));
    assert_eq!(parse_keycode("lt(1)"), Err("lt(...) takes two arguments".into()));
    assert!(parse_keycode("bogus").is_err());

    for code in [
        kc("a"),
        kc("enter"),
        key_range::layer_tap(3, 0x1e),
        key_range::mod_tap(0x12, 0x2d),
        key_range::composite(2, 0x38),
    ] {
        assert_eq!(parse_keycode(&keycode_to_string(code)), Ok(code));
    }
}

#[test]
fn test_list_keycodes() {
    let m = keycodes_iter().filter(|l| key_range::is_auto_shift_admin(l.code));
    assert_eq!(m.count(), 9);

    let k = keycodes_iter().find(|d| d.code == 0x64).unwrap();
    assert_eq!(k.name, "NonUsBackslash");

    assert_eq!(keycodes_iter().filter(|d| d.code == 4).count(), 1);
}
