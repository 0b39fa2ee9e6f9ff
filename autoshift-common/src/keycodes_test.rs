use super::key_range::*;

#[test]
fn classify_ranges() {
    assert!(is_basic(BASIC_A));
    assert!(!is_basic(LEFT_SHIFT + 0x100));
    assert!(is_modifier(LEFT_SHIFT));
    assert!(is_modifier(RIGHT_SHIFT));

    let lt = layer_tap(3, BASIC_A as u8);
    assert_eq!(lt, 0x4304);
    assert!(is_layer_tap(lt));
    assert!(is_retro(lt));
    assert!(!is_mod_tap(lt));

    let mt = mod_tap(0b0001, BASIC_Z as u8);
    assert!(is_mod_tap(mt));
    assert!(is_retro(mt));
    assert_eq!(key_modifiers(mt), 1);

    let c = composite(0b10010, BASIC_1 as u8);
    assert!(is_composite(c));
    assert!(is_retro(c));
    assert_eq!(key_modifiers(c), MOD_BIT_RIGHT_SHIFT);

    assert!(!is_retro(AS_TOGGLE));
    assert!(is_auto_shift_admin(AS_TOGGLE));
    assert!(is_auto_shift_admin(AS_DOWN));
    assert!(!is_auto_shift_admin(AS_DOWN - 1));
}

#[test]
fn base_code_strips_hold_half() {
    assert_eq!(base_code(layer_tap(2, 0x2d)), 0x2d);
    assert_eq!(base_code(mod_tap(0b10100, 0x04)), 0x04);
    assert_eq!(base_code(BASIC_0), 0x27);
}
