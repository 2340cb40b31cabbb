use smallvec::SmallVec;

use super::Keymap;
use super::table;
use super::types::*;

impl Keymap {
    /// Handles a host key press.
    ///
    /// Repeated presses of a key that is already down are swallowed, so the
    /// sink sees exactly one press per physical keystroke.
    pub fn key_down<S: KeySink + ?Sized>(
        &mut self,
        symbol: KeySymbol,
        physical: PhysicalScanCode,
        modifiers: KeyMod,
        sink: &mut S,
    ) {
        if symbol.is_ignored() {
            return;
        }

        if symbol.is_shortcut_trigger() {
            self.shortcut.latch_key(symbol);
            return;
        }

        let was_pressed = self.key_states.insert(symbol, true).unwrap_or(false);

        // Held until the start of the next frame, when it is safe to act on.
        if modifiers.is_shortcut_combo() {
            self.shortcut.latch_combo(symbol, modifiers);
            if !was_pressed {
                self.latched.insert(symbol);
            }
            return;
        }

        if let Some(code) = self.remap(symbol, physical, modifiers)
            && !was_pressed
        {
            sink.press_st_key(code, true);
        }
    }

    /// Handles a host key release.
    pub fn key_up<S: KeySink + ?Sized>(
        &mut self,
        symbol: KeySymbol,
        physical: PhysicalScanCode,
        modifiers: KeyMod,
        sink: &mut S,
    ) {
        if symbol.is_ignored() {
            return;
        }

        if symbol == KeySymbol::CapsLock {
            // The target toggles capslock on a press pulse, so every host
            // transition has to become one.
            sink.press_st_key(table::CAPSLOCK, true);
        } else if symbol.is_shortcut_trigger() {
            return;
        }

        if self.is_pressed(symbol)
            && let Some(code) = self.remap(symbol, physical, modifiers)
        {
            sink.press_st_key(code, false);
        }

        self.key_states.insert(symbol, false);
        self.latched.remove(&symbol);
    }

    /// Releases keys still held from an earlier frame when host key repeat
    /// is disabled. Called once per emulated frame.
    ///
    /// Modifiers and escape stay held so combinations keep working. Keys
    /// whose press was taken by the shortcut latch are skipped, since the
    /// sink never saw them go down.
    pub fn debounce_all_keys<S: KeySink + ?Sized>(&mut self, modifiers: KeyMod, sink: &mut S) {
        if !self.disable_key_repeat() {
            return;
        }

        let mut held: SmallVec<[KeySymbol; 8]> = self
            .key_states
            .iter()
            .filter(|&(symbol, &pressed)| pressed && !self.latched.contains(symbol))
            .map(|(&symbol, _)| symbol)
            .collect();
        held.sort_unstable();

        for symbol in held {
            if let Some(code) = self.remap(symbol, 0, modifiers)
                && table::requires_debounce(code.get())
            {
                sink.press_st_key(code, false);
                self.key_states.insert(symbol, false);
            }
        }
    }
}
