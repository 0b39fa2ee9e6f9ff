pub mod key_range {
    pub const NONE: u16 = 0;

    pub const BASIC_MIN: u16 = 0x4;
    pub const BASIC_A: u16 = 0x4;
    pub const BASIC_Z: u16 = 0x1d;
    pub const BASIC_1: u16 = 0x1e;
    pub const BASIC_0: u16 = 0x27;
    pub const BASIC_ENTER: u16 = 0x28;
    pub const BASIC_TAB: u16 = 0x2b;
    pub const BASIC_MINUS: u16 = 0x2d;
    pub const BASIC_SLASH: u16 = 0x38;
    pub const BASIC_NONUS_BACKSLASH: u16 = 0x64;
    pub const BASIC_MAX: u16 = 0xfe;

    pub const MODIFIER_MIN: u16 = 0xe0;
    pub const LEFT_SHIFT: u16 = 0xe1;
    pub const RIGHT_SHIFT: u16 = 0xe5;
    pub const MODIFIER_MAX: u16 = 0xe7;

    /// `mods5 << 8 | basic`; a basic key sent with modifiers held.
    pub const COMPOSITE_MIN: u16 = 0x100;
    pub const COMPOSITE_MAX: u16 = 0x1fff;

    /// `layer << 8 | basic`; tap sends basic, hold activates layer.
    pub const LAYER_TAP_MIN: u16 = 0x4000;
    pub const LAYER_TAP_MAX: u16 = 0x4fff;

    /// `mods5 << 8 | basic`; tap sends basic, hold activates mods.
    pub const MOD_TAP_MIN: u16 = 0x6000;
    pub const MOD_TAP_MAX: u16 = 0x7fff;

    pub const AUTO_SHIFT_MIN: u16 = 0x5c10;
    pub const AS_DOWN: u16 = AUTO_SHIFT_MIN;
    pub const AS_UP: u16 = AUTO_SHIFT_MIN + 1;
    pub const AS_REPORT: u16 = AUTO_SHIFT_MIN + 2;
    pub const AS_ON: u16 = AUTO_SHIFT_MIN + 3;
    pub const AS_OFF: u16 = AUTO_SHIFT_MIN + 4;
    pub const AS_TOGGLE: u16 = AUTO_SHIFT_MIN + 5;
    pub const AUTO_SHIFT_MAX: u16 = AS_TOGGLE;

    pub const MOD_BIT_LEFT_SHIFT: u8 = 1 << (LEFT_SHIFT - MODIFIER_MIN);
    pub const MOD_BIT_RIGHT_SHIFT: u8 = 1 << (RIGHT_SHIFT - MODIFIER_MIN);
    pub const MOD_MASK_SHIFT: u8 = MOD_BIT_LEFT_SHIFT | MOD_BIT_RIGHT_SHIFT;

    /// The basic code a composite, layer-tap or mod-tap key sends when tapped.
    pub fn base_code(code: u16) -> u8 {
        (code & 0xff) as u8
    }

    pub fn is_basic(code: u16) -> bool {
        (BASIC_MIN..=BASIC_MAX).contains(&code)
    }

    pub fn is_modifier(code: u16) -> bool {
        (MODIFIER_MIN..=MODIFIER_MAX).contains(&code)
    }

    pub fn is_composite(code: u16) -> bool {
        (COMPOSITE_MIN..=COMPOSITE_MAX).contains(&code)
    }

    pub fn is_layer_tap(code: u16) -> bool {
        (LAYER_TAP_MIN..=LAYER_TAP_MAX).contains(&code)
    }

    pub fn is_mod_tap(code: u16) -> bool {
        (MOD_TAP_MIN..=MOD_TAP_MAX).contains(&code)
    }

    pub fn is_auto_shift_admin(code: u16) -> bool {
        (AUTO_SHIFT_MIN..=AUTO_SHIFT_MAX).contains(&code)
    }

    /// Keys whose final meaning is decided by a tap-hold resolver rather than by the key itself.
    pub fn is_retro(code: u16) -> bool {
        is_mod_tap(code) || is_layer_tap(code) || is_composite(code)
    }

    pub fn layer_tap(layer: u8, basic: u8) -> u16 {
        LAYER_TAP_MIN | ((layer as u16 & 0xf) << 8) | basic as u16
    }

    pub fn mod_tap(mods5: u8, basic: u8) -> u16 {
        MOD_TAP_MIN | ((mods5 as u16 & 0x1f) << 8) | basic as u16
    }

    pub fn composite(mods5: u8, basic: u8) -> u16 {
        ((mods5 as u16 & 0x1f) << 8) | basic as u16
    }

    /// Convert the 5 bit modifier encoding (bit 4 selects the right hand) to HID modifier bits.
    ///
    /// ```
    /// use autoshift_common::keycodes::key_range::mods5_to_bits;
    /// assert_eq!(mods5_to_bits(0b00010), 0b0000_0010);
    /// assert_eq!(mods5_to_bits(0b10010), 0b0010_0000);
    /// ```
    pub fn mods5_to_bits(mods5: u8) -> u8 {
        let bits = mods5 & 0xf;
        if mods5 & 0x10 == 0 {
            bits
        } else {
            bits << 4
        }
    }

    /// Modifier bits held by the hold half of a mod-tap key, or applied by a composite key.
    pub fn key_modifiers(code: u16) -> u8 {
        if is_mod_tap(code) || is_composite(code) {
            mods5_to_bits(((code >> 8) & 0x1f) as u8)
        } else {
            0
        }
    }
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
