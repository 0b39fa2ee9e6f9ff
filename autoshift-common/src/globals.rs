//! Index and default of every tunable setting. Settings travel as `(index, value)` pairs of `u16`.

pub const AUTO_SHIFT_TIMEOUT: u16 = 0;
pub const TAPPING_TERM: u16 = 1;
pub const RETRO_SHIFT_TIMEOUT: u16 = 2;
pub const TAP_CODE_DELAY: u16 = 3;
pub const AUTO_SHIFT_FLAGS: u16 = 4;

pub const GLOBALS_COUNT: usize = 5;

pub const AUTO_SHIFT_TIMEOUT_DEFAULT: u16 = 175;
pub const TAPPING_TERM_DEFAULT: u16 = 200;
pub const RETRO_SHIFT_TIMEOUT_DEFAULT: u16 = 500;
pub const TAP_CODE_DELAY_DEFAULT: u16 = 0;
pub const AUTO_SHIFT_FLAGS_DEFAULT: u16 =
    flags::ALPHA | flags::NUMERIC | flags::SPECIAL | flags::CUSTOM | flags::REPEAT;

/// Amount the `AS_UP`/`AS_DOWN` keys move the timeout by.
pub const AUTO_SHIFT_TIMEOUT_STEP: u16 = 5;

pub mod flags {
    pub const ALPHA: u16 = 1;
    pub const NUMERIC: u16 = 1 << 1;
    pub const SPECIAL: u16 = 1 << 2;
    pub const CUSTOM: u16 = 1 << 3;
    /// Auto-shift even when modifiers other than shift are held.
    pub const MODIFIERS: u16 = 1 << 4;
    pub const REPEAT: u16 = 1 << 5;
    pub const NO_AUTO_REPEAT: u16 = 1 << 6;
    pub const RETRO_SHIFT: u16 = 1 << 7;
    pub const HOLD_ON_OTHER_KEY_PRESS: u16 = 1 << 8;
    pub const IGNORE_MOD_TAP_INTERRUPT: u16 = 1 << 9;
}

pub const DEFAULTS: [u16; GLOBALS_COUNT] = [
    AUTO_SHIFT_TIMEOUT_DEFAULT,
    TAPPING_TERM_DEFAULT,
    RETRO_SHIFT_TIMEOUT_DEFAULT,
    TAP_CODE_DELAY_DEFAULT,
    AUTO_SHIFT_FLAGS_DEFAULT,
];
