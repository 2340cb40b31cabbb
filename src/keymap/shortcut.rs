//! Shortcut key latch.
//!
//! The dispatcher only ever overwrites the latch. The front end polls it at
//! the start of a frame, when acting on it is safe, and consumes it there.

use super::types::{KeyMod, KeySymbol};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutLatch {
    pub key: Option<KeySymbol>,
    pub ctrl_pressed: bool,
    pub shift_pressed: bool,
}

impl ShortcutLatch {
    /// Latches a bare shortcut trigger such as F11. Sticky flags are kept.
    pub(crate) fn latch_key(&mut self, key: KeySymbol) {
        self.key = Some(key);
    }

    /// Latches a key pressed together with a shortcut modifier. Ctrl and
    /// shift are only ever set here, never cleared.
    pub(crate) fn latch_combo(&mut self, key: KeySymbol, modifiers: KeyMod) {
        self.key = Some(key);
        if modifiers.intersects(KeyMod::CTRL) {
            self.ctrl_pressed = true;
        }
        if modifiers.intersects(KeyMod::SHIFT) {
            self.shift_pressed = true;
        }
    }

    #[inline]
    pub(crate) fn is_pending(&self) -> bool {
        self.key.is_some()
    }

    /// Consumes the pending shortcut, leaving an empty latch behind.
    pub fn take(&mut self) -> Option<ShortcutLatch> {
        if self.is_pending() {
            Some(std::mem::take(self))
        } else {
            None
        }
    }

    /// Front-end action bound to the latched key, if any.
    pub fn action(&self) -> Option<ShortcutAction> {
        match self.key? {
            KeySymbol::F11 => Some(ShortcutAction::ToggleFullscreen),
            KeySymbol::M => Some(ShortcutAction::ToggleMouseMode),
            KeySymbol::Q => Some(ShortcutAction::Quit),
            KeySymbol::D => Some(ShortcutAction::DumpDebug),
            KeySymbol::E => Some(ShortcutAction::ToggleRenderer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ToggleFullscreen,
    ToggleMouseMode,
    Quit,
    DumpDebug,
    ToggleRenderer,
}

impl ShortcutAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleFullscreen => "ToggleFullscreen",
            Self::ToggleMouseMode => "ToggleMouseMode",
            Self::Quit => "Quit",
            Self::DumpDebug => "DumpDebug",
            Self::ToggleRenderer => "ToggleRenderer",
        }
    }
}
