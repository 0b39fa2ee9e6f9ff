use autoshift_common::{
    globals::{self, flags, GLOBALS_COUNT},
    keycodes::key_range,
    PROTOCOL_VERSION,
};

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    VersionMismatch,
    Corrupt,
    UnknownGlobal(u16),
}

/// Live tuning of the arbiter. Values are indexed by [globals] so a settings image compiled on the
/// host can be applied without translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    values: [u16; GLOBALS_COUNT],
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            values: globals::DEFAULTS,
        }
    }
}

impl Settings {
    /// Replace all settings from a compiled image. The format is:
    ///
    /// protocol version
    /// pair count
    /// `pair count` pairs of global index and value.
    ///
    /// Globals missing from the image take their default. On error the current settings are left
    /// untouched.
    pub fn load(&mut self, iter: impl IntoIterator<Item = u16>) -> Result<(), LoadError> {
        let mut iter = iter.into_iter();
        if iter.next().ok_or(LoadError::Corrupt)? != PROTOCOL_VERSION {
            return Err(LoadError::VersionMismatch);
        }
        let count = iter.next().ok_or(LoadError::Corrupt)?;

        let mut values = globals::DEFAULTS;
        for _ in 0..count {
            let index = iter.next().ok_or(LoadError::Corrupt)?;
            let value = iter.next().ok_or(LoadError::Corrupt)?;
            *values
                .get_mut(index as usize)
                .ok_or(LoadError::UnknownGlobal(index))? = value;
        }
        if iter.next().is_some() {
            return Err(LoadError::Corrupt);
        }

        self.values = values;
        Ok(())
    }

    pub fn global(&self, index: u16) -> u16 {
        self.values.get(index as usize).copied().unwrap_or(0)
    }

    pub fn set_global(&mut self, index: u16, value: u16) {
        if let Some(v) = self.values.get_mut(index as usize) {
            *v = value;
        }
    }

    pub fn timeout(&self) -> u16 {
        self.global(globals::AUTO_SHIFT_TIMEOUT)
    }

    pub fn set_timeout(&mut self, timeout: u16) {
        self.set_global(globals::AUTO_SHIFT_TIMEOUT, timeout);
    }

    pub fn tapping_term(&self) -> u16 {
        self.global(globals::TAPPING_TERM)
    }

    /// 0 means a retro key is never handed back to the tap-hold resolver by timeout.
    pub fn retro_shift_timeout(&self) -> u16 {
        self.global(globals::RETRO_SHIFT_TIMEOUT)
    }

    pub fn tap_code_delay(&self) -> u16 {
        self.global(globals::TAP_CODE_DELAY)
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.global(globals::AUTO_SHIFT_FLAGS) & flag == flag
    }

    pub fn set_flag(&mut self, flag: u16, on: bool) {
        let v = self.global(globals::AUTO_SHIFT_FLAGS);
        self.set_global(
            globals::AUTO_SHIFT_FLAGS,
            if on { v | flag } else { v & !flag },
        );
    }

    /// Whether a basic keycode falls in one of the enabled auto-shift classes.
    pub fn is_eligible(&self, code: u8) -> bool {
        let code = code as u16;
        match code {
            key_range::BASIC_A..=key_range::BASIC_Z => self.has_flag(flags::ALPHA),
            key_range::BASIC_1..=key_range::BASIC_0 => self.has_flag(flags::NUMERIC),
            key_range::BASIC_TAB
            | key_range::BASIC_MINUS..=key_range::BASIC_SLASH
            | key_range::BASIC_NONUS_BACKSLASH => self.has_flag(flags::SPECIAL),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod test;
