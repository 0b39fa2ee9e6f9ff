use std::collections::HashMap;

use lazy_static::lazy_static;

pub mod spec {
    use autoshift_common::globals::{self, flags};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum GlobalType {
        /// A duration in milliseconds stored directly at `index`.
        Timeout { value: u16, min: u16, max: u16 },
        /// A single bit of the flags global at `index`.
        Flag { bit: u16, value: bool },
    }
    use GlobalType::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GlobalProp {
        pub index: u16,
        pub spec: GlobalType,
    }

    impl GlobalProp {
        pub fn new_default(name: &str) -> Result<GlobalProp, String> {
            super::DEFAULTS
                .get(name)
                .ok_or_else(|| format!("Invalid global '{}'", name))
                .copied()
        }

        pub fn set_value(&mut self, text: &str) -> Result<(), String> {
            match self.spec {
                Timeout {
                    ref mut value,
                    min,
                    max,
                } => match text.parse::<u16>() {
                    Ok(n) if (min..=max).contains(&n) => *value = n,
                    _ => {
                        return Err(format!(
                            "Invalid duration; only {} to {} milliseconds are valid",
                            min, max
                        ))
                    }
                },
                Flag { ref mut value, .. } => {
                    *value = match text {
                        "true" | "on" | "yes" => true,
                        "false" | "off" | "no" => false,
                        _ => return Err(format!("Invalid switch '{}'; use true or false", text)),
                    }
                }
            }
            Ok(())
        }

        /// Apply this setting to a table of global values.
        pub fn apply(&self, values: &mut [u16]) {
            let Some(slot) = values.get_mut(self.index as usize) else {
                return;
            };
            match self.spec {
                Timeout { value, .. } => *slot = value,
                Flag { bit, value: true } => *slot |= bit,
                Flag { bit, value: false } => *slot &= !bit,
            }
        }
    }

    const fn timeout(index: u16, min: u16, max: u16) -> GlobalProp {
        GlobalProp {
            index,
            spec: Timeout {
                value: globals::DEFAULTS[index as usize],
                min,
                max,
            },
        }
    }

    const fn flag(bit: u16) -> GlobalProp {
        GlobalProp {
            index: globals::AUTO_SHIFT_FLAGS,
            spec: Flag {
                bit,
                value: globals::AUTO_SHIFT_FLAGS_DEFAULT & bit != 0,
            },
        }
    }

    pub(super) const GLOBALS: [(&str, GlobalProp); 14] = [
        (
            "auto_shift_timeout",
            timeout(globals::AUTO_SHIFT_TIMEOUT, 0, 5000),
        ),
        ("tapping_term", timeout(globals::TAPPING_TERM, 0, 5000)),
        (
            "retro_shift_timeout",
            timeout(globals::RETRO_SHIFT_TIMEOUT, 0, 5000),
        ),
        ("tap_code_delay", timeout(globals::TAP_CODE_DELAY, 0, 100)),
        ("auto_shift_alpha", flag(flags::ALPHA)),
        ("auto_shift_numeric", flag(flags::NUMERIC)),
        ("auto_shift_special", flag(flags::SPECIAL)),
        ("auto_shift_custom", flag(flags::CUSTOM)),
        ("auto_shift_modifiers", flag(flags::MODIFIERS)),
        ("auto_shift_repeat", flag(flags::REPEAT)),
        ("auto_shift_no_auto_repeat", flag(flags::NO_AUTO_REPEAT)),
        ("retro_shift", flag(flags::RETRO_SHIFT)),
        ("hold_on_other_key_press", flag(flags::HOLD_ON_OTHER_KEY_PRESS)),
        ("ignore_mod_tap_interrupt", flag(flags::IGNORE_MOD_TAP_INTERRUPT)),
    ];
}

lazy_static! {
    pub static ref DEFAULTS: HashMap<&'static str, spec::GlobalProp> = {
        let mut m = HashMap::new();
        for (k, v) in spec::GLOBALS.iter() {
            m.insert(*k, *v);
        }
        m.insert("auto_shift_delay", spec::GLOBALS[0].1);
        m
    };
}

/// Setting names in declaration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    spec::GLOBALS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
#[path = "globals_test.rs"]
mod test;
