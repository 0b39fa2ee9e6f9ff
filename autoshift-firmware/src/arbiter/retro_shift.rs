use core::mem;

use RetroShift::*;

use crate::key_event::{timer_elapsed, KeyEvent, ScanKey, Tick};

/// A tap-hold key whose auto-shift decision waits on the tap-hold resolver.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(super) enum RetroShift {
    #[default]
    Idle,
    Wait {
        event: KeyEvent,
    },
}
impl RetroShift {
    pub(super) fn start(&mut self, event: KeyEvent) {
        debug_assert!(matches!(self, Idle));
        *self = Wait { event };
    }

    pub(super) fn is_idle(&self) -> bool {
        matches!(self, Idle)
    }

    pub(super) fn take(&mut self) -> Option<KeyEvent> {
        match mem::take(self) {
            Wait { event } => Some(event),
            Idle => None,
        }
    }

    /// Stop tracking the key if it is the one waiting.
    pub(super) fn take_matching(&mut self, keycode: u16, key: ScanKey) -> Option<KeyEvent> {
        if matches!(self, Wait { event } if event.keycode == keycode && event.key.same_key(key)) {
            self.take()
        } else {
            None
        }
    }

    pub(super) fn is_waiting_on(&self, key: ScanKey) -> bool {
        matches!(self, Wait { event } if event.key.same_key(key))
    }

    /// Milliseconds left before the waiting key is handed back. `None` when nothing is waiting or
    /// `timeout` is 0.
    pub(super) fn wait_for(&self, now: Tick, timeout: u16) -> Option<u16> {
        match self {
            Wait { event } if timeout != 0 => {
                Some(timeout.saturating_sub(timer_elapsed(now, event.time)))
            }
            _ => None,
        }
    }

    /// The waiting key if its time is up.
    pub(super) fn timer_expired(&mut self, now: Tick, timeout: u16) -> Option<KeyEvent> {
        if self.wait_for(now, timeout) == Some(0) {
            self.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "retro_shift_test.rs"]
mod test;
