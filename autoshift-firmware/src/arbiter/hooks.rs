use autoshift_common::keycodes::key_range;

/// The basic code to send and whether shift is applied while it is down.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub code: u8,
    pub shifted: bool,
}

/// Per keyboard customisation of the arbiter. Every method has a default giving stock auto-shift
/// behaviour, so a keyboard only overrides what it needs.
pub trait AutoShiftHooks {
    /// Extra keys to treat as auto-shiftable. Only consulted when the `CUSTOM` class is enabled.
    fn is_custom(&self, _keycode: u16) -> bool {
        false
    }

    /// What to send for `keycode` once it is decided. Used for both the press and the release so a
    /// mapping that changes the code releases the same code it pressed.
    fn keystroke(&self, keycode: u16, shifted: bool) -> Keystroke {
        Keystroke {
            code: key_range::base_code(keycode),
            shifted,
        }
    }

    /// Whether an interrupted tap-hold key becomes a plain hold and leaves retro-shift alone.
    /// `policy` is the keyboard wide answer for this kind of key.
    fn force_hold_on_interrupt(&self, _keycode: u16, policy: bool) -> bool {
        policy
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;
impl AutoShiftHooks for DefaultHooks {}
