/// Milliseconds read from a free running 16 bit clock. Wraps every 65.5 seconds.
pub type Tick = u16;

/// Time from `then` until `now`. Correct across a wrap of the clock as long as less than one full
/// period has passed.
#[inline(always)]
pub fn timer_elapsed(now: Tick, then: Tick) -> u16 {
    now.wrapping_sub(then)
}

/// Physical switch position plus its up/down state. The top bit of `row` holds the state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanKey {
    row: u8,
    col: u8,
}
impl ScanKey {
    pub fn new(row: u8, col: u8, is_down: bool) -> Self {
        Self {
            row: row | if is_down { 0x80 } else { 0 },
            col,
        }
    }

    pub fn row(&self) -> usize {
        (self.row & 0x7f) as usize
    }

    pub fn column(&self) -> usize {
        self.col as usize
    }

    pub fn is_down(&self) -> bool {
        self.row & 0x80 == 0x80
    }

    pub fn same_key(&self, other: ScanKey) -> bool {
        self.col == other.col && self.row & 0x7f == other.row & 0x7f
    }

    pub(crate) fn set_down(&mut self, down: bool) {
        if down {
            self.row |= 0x80;
        } else {
            self.row &= !0x80;
        }
    }
}

/// A key switch transition after the layout has been applied: which keycode it produces, where it
/// is and when it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub keycode: u16,
    pub key: ScanKey,
    pub time: Tick,
}
impl KeyEvent {
    pub fn new(keycode: u16, key: ScanKey, time: Tick) -> Self {
        Self { keycode, key, time }
    }

    pub fn press(keycode: u16, row: u8, col: u8, time: Tick) -> Self {
        Self::new(keycode, ScanKey::new(row, col, true), time)
    }

    pub fn release(keycode: u16, row: u8, col: u8, time: Tick) -> Self {
        Self::new(keycode, ScanKey::new(row, col, false), time)
    }

    pub fn is_down(&self) -> bool {
        self.key.is_down()
    }

    /// The same switch pressed down at `time`.
    pub(crate) fn as_press(&self, time: Tick) -> Self {
        let mut key = self.key;
        key.set_down(true);
        Self::new(self.keycode, key, time)
    }
}

#[cfg(test)]
#[path = "key_event_test.rs"]
mod test;
