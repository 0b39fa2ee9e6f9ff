use core::{fmt::Write, mem};

use autoshift_common::{
    globals::{self, flags},
    keycodes::key_range::{self, MOD_BIT_LEFT_SHIFT, MOD_BIT_RIGHT_SHIFT, MOD_MASK_SHIFT},
};
use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Instant, Timer};
use heapless::String;
use hooks::{AutoShiftHooks, Keystroke};
use retro_shift::RetroShift;

use crate::{
    add_key_bit, del_key_bit, has_key_bit,
    key_event::{timer_elapsed, KeyEvent, ScanKey, Tick},
    settings::{LoadError, Settings},
    KEY_BITS_SIZE,
};

pub mod hooks;

pub(crate) mod retro_shift;

/// What the arbiter asks of the keyboard report assembler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArbiterEvent {
    /// Press or release `code`; while `shifted` a shift is applied for this key only.
    Key {
        code: u8,
        shifted: bool,
        is_down: bool,
    },
    /// Suppress (`false`) or restore (`true`) physically held modifiers.
    Modifiers(u8, bool),
    ClearOneshotMods(u8),
    /// Wait this many milliseconds before the next event.
    Delay(u16),
    /// The tap-hold resolver should finish this key itself.
    Handoff {
        keycode: u16,
        key: ScanKey,
    },
    /// Not an auto-shift concern; process normally.
    Forward(KeyEvent),
    Clear,
}
impl ArbiterEvent {
    fn key(stroke: Keystroke, is_down: bool) -> Self {
        Self::Key {
            code: stroke.code,
            shifted: stroke.shifted,
            is_down,
        }
    }
}

/// The tap-hold resolver's decision about a tap-hold key.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    Tap,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    Key(KeyEvent),
    Verdict {
        keycode: u16,
        verdict: Verdict,
        press_time: Tick,
        key: ScanKey,
    },
    OneshotMods(u8),
    Exit,
}

pub struct InputChannel<M: RawMutex, const N: usize>(Channel<M, Input, N>);
impl<M: RawMutex, const N: usize> Default for InputChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> InputChannel<M, N> {
    pub async fn send(&self, msg: Input) {
        self.0.send(msg).await;
    }

    pub fn try_send(&self, msg: Input) {
        self.0.try_send(msg).ok();
    }

    async fn receive(&self) -> Input {
        self.0.receive().await
    }
}

pub struct ArbiterChannel<M: RawMutex, const N: usize>(Channel<M, ArbiterEvent, N>);
impl<M: RawMutex, const N: usize> Default for ArbiterChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> ArbiterChannel<M, N> {
    pub async fn receive(&self) -> ArbiterEvent {
        self.0.receive().await
    }

    fn report(&self, message: ArbiterEvent) {
        if self.0.try_send(message).is_err() {
            crate::warn!("report buffer full");
            self.0.clear();
            let _ = self.0.try_send(ArbiterEvent::Clear);
        }
    }
}

pub struct AutoShift<'c, H: AutoShiftHooks, M: RawMutex, const REPORT_BUFFER_SIZE: usize> {
    settings: Settings,
    hooks: H,
    report_channel: &'c ArbiterChannel<M, REPORT_BUFFER_SIZE>,
    enabled: bool,
    /// The one key waiting for a tap or hold decision.
    pending: Option<KeyEvent>,
    retro: RetroShift,
    /// Last press or decision; start of the key-repeat window.
    time: Tick,
    last_key: u16,
    last_shifted: bool,
    /// Physically held shift bits removed while a decided key is sent.
    cancelling_shift: u8,
    modifiers: u8,
    oneshot_mods: u8,
    /// Shift state each base code was pressed with, so its release matches.
    shift_states: [u8; KEY_BITS_SIZE],
    /// Codes pressed by the arbiter and not yet released.
    keys_down: [u8; KEY_BITS_SIZE],
    /// Eligible keys pressed while disabled; their release is not ours either.
    passthrough_keys: [u8; KEY_BITS_SIZE],
    /// Retro keys decided here when interrupted; the resolver must not see their release.
    retro_tapped: [u8; KEY_BITS_SIZE],
    /// Retro keys interrupted into a hold whose modifiers are in `modifiers`.
    retro_held: [u8; KEY_BITS_SIZE],
}

impl<'c, H: AutoShiftHooks, M: RawMutex, const REPORT_BUFFER_SIZE: usize>
    AutoShift<'c, H, M, REPORT_BUFFER_SIZE>
{
    pub fn new(
        report_channel: &'c ArbiterChannel<M, REPORT_BUFFER_SIZE>,
        settings: Settings,
        hooks: H,
    ) -> Self {
        Self {
            settings,
            hooks,
            report_channel,
            enabled: true,
            pending: None,
            retro: RetroShift::Idle,
            time: 0,
            last_key: key_range::NONE,
            last_shifted: false,
            cancelling_shift: 0,
            modifiers: 0,
            oneshot_mods: 0,
            shift_states: [0; KEY_BITS_SIZE],
            keys_down: [0; KEY_BITS_SIZE],
            passthrough_keys: [0; KEY_BITS_SIZE],
            retro_tapped: [0; KEY_BITS_SIZE],
            retro_held: [0; KEY_BITS_SIZE],
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn load_settings(
        &mut self,
        image: impl IntoIterator<Item = u16>,
    ) -> Result<(), LoadError> {
        self.settings
            .load(image)
            .inspect_err(|err| crate::warn!("settings rejected {:?}", err))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.flush_shift();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.flush_shift();
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn timeout(&self) -> u16 {
        self.settings.timeout()
    }

    pub fn set_timeout(&mut self, timeout: u16) {
        self.settings.set_timeout(timeout);
    }

    pub fn increment_timeout(&mut self, delta: u16) {
        self.set_timeout(self.timeout().saturating_add(delta));
    }

    pub fn decrement_timeout(&mut self, delta: u16) {
        self.set_timeout(self.timeout().saturating_sub(delta));
    }

    /// The current timeout framed by newlines, as typed by the `AS_REPORT` key.
    pub fn timeout_report(&self) -> String<8> {
        let mut s = String::new();
        let _ = write!(s, "\n{}\n", self.timeout());
        s
    }

    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    /// For keyboards that track modifiers outside the arbiter, e.g. held mod-tap keys.
    pub fn set_modifiers(&mut self, modifiers: u8) {
        self.modifiers = modifiers;
    }

    pub fn set_oneshot_mods(&mut self, oneshot_mods: u8) {
        self.oneshot_mods = oneshot_mods;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_retro_pending(&self) -> bool {
        !self.retro.is_idle()
    }

    /// Process a key switch transition. Returns `true` if the event should continue to normal
    /// processing, `false` if the arbiter has dealt with it.
    pub fn key_event(&mut self, event: KeyEvent) -> bool {
        let keycode = event.keycode;
        let now = event.time;

        if event.is_down() {
            if self.pending.is_some() {
                self.end(None, now, false);
            }
            if !self.retro.is_waiting_on(event.key) {
                self.interrupt_retro(now);
            }
            if key_range::is_auto_shift_admin(keycode) {
                self.admin_action(keycode);
                return false;
            }
            if key_range::is_retro(keycode) {
                return self.retro_press(event);
            }
        } else {
            if key_range::is_auto_shift_admin(keycode) {
                return false;
            }
            match keycode {
                key_range::LEFT_SHIFT => self.cancelling_shift &= !MOD_BIT_LEFT_SHIFT,
                key_range::RIGHT_SHIFT => self.cancelling_shift &= !MOD_BIT_RIGHT_SHIFT,
                _ => {}
            }
            if key_range::is_retro(keycode) {
                return self.retro_release(event);
            }
        }

        if key_range::is_modifier(keycode) {
            self.track_modifier(keycode, event.is_down());
        }

        if self.is_auto_shift_key(keycode) {
            if event.is_down() {
                return self.press(event);
            }
            let passthrough =
                del_key_bit(&mut self.passthrough_keys, key_range::base_code(keycode));
            self.end(Some(keycode), now, false);
            return passthrough;
        }

        if event.is_down() {
            // a different key ends any key-repeat run
            self.last_key = key_range::NONE;
        }
        true
    }

    /// Resolve whatever has timed out. Must be called at least as often as the timeout for keys
    /// held without other input to be decided promptly.
    pub fn matrix_scan(&mut self, now: Tick) {
        if let Some(pending) = self.pending {
            if timer_elapsed(now, pending.time) >= self.settings.timeout() {
                self.end(None, now, true);
            }
        }
        if let Some(event) = self
            .retro
            .timer_expired(now, self.settings.retro_shift_timeout())
        {
            crate::debug!(
                "retro key {:?} at {:?}/{:?} handed off",
                event.keycode,
                event.key.row(),
                event.key.column()
            );
            self.report(ArbiterEvent::Handoff {
                keycode: event.keycode,
                key: event.key,
            });
        }
    }

    /// Milliseconds until [Self::matrix_scan] has work to do, or `None` if nothing is waiting.
    pub fn wait_for(&self, now: Tick) -> Option<u16> {
        let pending = self.pending.map(|p| {
            self.settings
                .timeout()
                .saturating_sub(timer_elapsed(now, p.time))
        });
        let retro = self
            .retro
            .wait_for(now, self.settings.retro_shift_timeout());
        match (pending, retro) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// The tap-hold resolver has decided about a key it was told of. Returns `true` if the key
    /// should get the resolver's default processing.
    pub fn hold_verdict(
        &mut self,
        keycode: u16,
        verdict: Verdict,
        press_time: Tick,
        key: ScanKey,
        now: Tick,
    ) -> bool {
        let Some(retro) = self.retro.take_matching(keycode, key) else {
            return true;
        };
        match verdict {
            Verdict::Tap => true,
            Verdict::Hold => {
                self.resolve_retro(retro.as_press(press_time), now);
                false
            }
        }
    }

    fn admin_action(&mut self, keycode: u16) {
        match keycode {
            key_range::AS_TOGGLE => self.toggle(),
            key_range::AS_ON => self.enable(),
            key_range::AS_OFF => self.disable(),
            key_range::AS_UP => self.increment_timeout(globals::AUTO_SHIFT_TIMEOUT_STEP),
            key_range::AS_DOWN => self.decrement_timeout(globals::AUTO_SHIFT_TIMEOUT_STEP),
            key_range::AS_REPORT => self.send_timeout_report(),
            _ => {}
        }
        crate::debug!("auto-shift {:?} timeout {:?}", self.enabled, self.timeout());
    }

    fn send_timeout_report(&mut self) {
        let report = self.timeout_report();
        for c in report.chars() {
            let code = match c {
                '\n' => key_range::BASIC_ENTER,
                '0' => key_range::BASIC_0,
                '1'..='9' => key_range::BASIC_1 + (c as u16 - '1' as u16),
                _ => continue,
            };
            let stroke = Keystroke {
                code: code as u8,
                shifted: false,
            };
            self.report(ArbiterEvent::key(stroke, true));
            self.report(ArbiterEvent::key(stroke, false));
        }
    }

    fn is_auto_shift_key(&self, keycode: u16) -> bool {
        let code = if key_range::is_retro(keycode) {
            key_range::base_code(keycode) as u16
        } else {
            keycode
        };
        (code <= key_range::BASIC_MAX && self.settings.is_eligible(code as u8))
            || (self.settings.has_flag(flags::CUSTOM) && self.hooks.is_custom(keycode))
    }

    fn bypass_for_modifiers(&self) -> bool {
        !self.settings.has_flag(flags::MODIFIERS)
            && (self.modifiers | self.oneshot_mods) & !MOD_MASK_SHIFT != 0
    }

    fn is_repeat(&self, event: &KeyEvent) -> bool {
        self.settings.has_flag(flags::REPEAT)
            && event.keycode == self.last_key
            && timer_elapsed(event.time, self.time) < self.settings.tapping_term()
            && (!self.last_shifted || self.settings.has_flag(flags::NO_AUTO_REPEAT))
    }

    fn press(&mut self, event: KeyEvent) -> bool {
        if !self.enabled {
            add_key_bit(
                &mut self.passthrough_keys,
                key_range::base_code(event.keycode),
            );
            return true;
        }
        if self.bypass_for_modifiers() {
            self.last_key = key_range::NONE;
            self.register(event.keycode, false);
            return false;
        }
        if self.is_repeat(&event) {
            self.repeat_last();
            return false;
        }
        self.begin(event);
        false
    }

    fn begin(&mut self, event: KeyEvent) {
        self.last_shifted = (self.modifiers | self.oneshot_mods) & MOD_MASK_SHIFT != 0;
        if self.oneshot_mods & MOD_MASK_SHIFT != 0 {
            self.oneshot_mods &= !MOD_MASK_SHIFT;
            self.report(ArbiterEvent::ClearOneshotMods(MOD_MASK_SHIFT));
        }
        self.last_key = event.keycode;
        self.time = event.time;
        self.pending = Some(event);
    }

    fn repeat_last(&mut self) {
        self.cancel_shift();
        self.register(self.last_key, self.last_shifted);
    }

    /// Decide the pending key, or release a key sent earlier. `keycode` of `None` decides whatever
    /// is pending. Returns `true` if anything was sent.
    fn end(&mut self, keycode: Option<u16>, now: Tick, matrix_trigger: bool) -> bool {
        let sent = match self.pending {
            Some(pending) if keycode.is_none_or(|kc| kc == pending.keycode) => {
                self.pending = None;
                let elapsed = timer_elapsed(now, pending.time);
                self.last_shifted = elapsed >= self.settings.timeout() || self.last_shifted;
                self.cancel_shift();
                self.register(pending.keycode, self.last_shifted);

                if matrix_trigger
                    && self.settings.has_flag(flags::REPEAT)
                    && !self.settings.has_flag(flags::NO_AUTO_REPEAT)
                {
                    // stays down until the switch is released so the host repeats it
                    self.time = now;
                    return true;
                }

                let delay = self.settings.tap_code_delay();
                if delay > 0 {
                    self.report(ArbiterEvent::Delay(delay));
                }
                self.unregister(pending.keycode);
                self.flush_shift();
                true
            }
            _ => {
                let Some(keycode) = keycode else {
                    return false;
                };
                let released = self.unregister(keycode);
                if keycode == self.last_key {
                    self.flush_shift();
                }
                released
            }
        };
        self.time = now;
        sent
    }

    fn retro_press(&mut self, event: KeyEvent) -> bool {
        if !self.enabled
            || !self.settings.has_flag(flags::RETRO_SHIFT)
            || !self.is_auto_shift_key(event.keycode)
        {
            return true;
        }
        if self.is_repeat(&event) {
            self.repeat_last();
            return false;
        }
        self.retro.start(event);
        true
    }

    fn retro_release(&mut self, event: KeyEvent) -> bool {
        let keycode = event.keycode;
        let base = key_range::base_code(keycode);
        if del_key_bit(&mut self.retro_tapped, base) {
            return false;
        }
        if del_key_bit(&mut self.retro_held, base) {
            let mods = key_range::key_modifiers(keycode);
            self.modifiers &= !mods;
            self.cancelling_shift &= !mods;
            return true;
        }
        // released before any verdict: the resolver keeps its default tap handling
        self.retro.take_matching(keycode, event.key);
        !self.end(Some(keycode), event.time, false)
    }

    /// Another key went down while a retro key waits on its verdict.
    fn interrupt_retro(&mut self, now: Tick) {
        let Some(retro) = self.retro.take() else {
            return;
        };
        let policy = if key_range::is_layer_tap(retro.keycode) {
            self.settings.has_flag(flags::HOLD_ON_OTHER_KEY_PRESS)
        } else {
            !self.settings.has_flag(flags::IGNORE_MOD_TAP_INTERRUPT)
        };
        let base = key_range::base_code(retro.keycode);
        if self.hooks.force_hold_on_interrupt(retro.keycode, policy) {
            crate::debug!("retro key {:?} interrupted into a hold", retro.keycode);
            add_key_bit(&mut self.retro_held, base);
            self.modifiers |= key_range::key_modifiers(retro.keycode);
            return;
        }
        add_key_bit(&mut self.retro_tapped, base);
        self.resolve_retro(retro, now);
    }

    /// Run the tap/hold math for a retro key using its own press time.
    fn resolve_retro(&mut self, event: KeyEvent, now: Tick) {
        if self.pending.is_some() {
            self.end(None, now, false);
        }
        if self.bypass_for_modifiers() {
            self.last_key = key_range::NONE;
            self.register(event.keycode, false);
            self.unregister(event.keycode);
            return;
        }
        self.begin(event);
        self.end(None, now, false);
    }

    fn register(&mut self, keycode: u16, shifted: bool) {
        let base = key_range::base_code(keycode);
        if shifted {
            add_key_bit(&mut self.shift_states, base);
        } else {
            del_key_bit(&mut self.shift_states, base);
        }
        let stroke = self.hooks.keystroke(keycode, shifted);
        if !add_key_bit(&mut self.keys_down, stroke.code) {
            self.report(ArbiterEvent::key(stroke, false));
        }
        self.report(ArbiterEvent::key(stroke, true));
    }

    fn unregister(&mut self, keycode: u16) -> bool {
        let shifted = has_key_bit(&self.shift_states, key_range::base_code(keycode));
        let stroke = self.hooks.keystroke(keycode, shifted);
        if del_key_bit(&mut self.keys_down, stroke.code) {
            self.report(ArbiterEvent::key(stroke, false));
            true
        } else {
            false
        }
    }

    fn cancel_shift(&mut self) {
        let held = self.modifiers & MOD_MASK_SHIFT;
        if held != 0 {
            self.cancelling_shift |= held;
            self.modifiers &= !held;
            self.report(ArbiterEvent::Modifiers(held, false));
        }
    }

    fn flush_shift(&mut self) {
        let restore = mem::take(&mut self.cancelling_shift);
        if restore != 0 {
            self.modifiers |= restore;
            self.report(ArbiterEvent::Modifiers(restore, true));
        }
    }

    fn track_modifier(&mut self, keycode: u16, is_down: bool) {
        let bit = 1 << (keycode - key_range::MODIFIER_MIN);
        if is_down {
            self.modifiers |= bit;
        } else {
            self.modifiers &= !bit;
        }
    }

    fn report(&self, message: ArbiterEvent) {
        self.report_channel.report(message);
    }

    fn now() -> Tick {
        Instant::now().as_millis() as Tick
    }

    /// Feed the arbiter from `input` until [Input::Exit]. Events the arbiter does not consume are
    /// passed on as [ArbiterEvent::Forward].
    pub async fn run<const INPUT_BUFFER_SIZE: usize>(
        &mut self,
        input: &InputChannel<M, INPUT_BUFFER_SIZE>,
    ) {
        loop {
            let message = match self.wait_for(Self::now()) {
                Some(ms) => {
                    match select(input.receive(), Timer::after_millis(ms as u64)).await {
                        Either::First(msg) => Some(msg),
                        Either::Second(_) => None,
                    }
                }
                None => Some(input.receive().await),
            };

            match message {
                None => self.matrix_scan(Self::now()),
                Some(Input::Key(event)) => {
                    if self.key_event(event) {
                        self.report(ArbiterEvent::Forward(event));
                    }
                }
                Some(Input::Verdict {
                    keycode,
                    verdict,
                    press_time,
                    key,
                }) => {
                    self.hold_verdict(keycode, verdict, press_time, key, Self::now());
                }
                Some(Input::OneshotMods(mods)) => self.set_oneshot_mods(mods),
                Some(Input::Exit) => return,
            }
        }
    }
}

#[cfg(test)]
#[path = "arbiter_test.rs"]
mod test;
