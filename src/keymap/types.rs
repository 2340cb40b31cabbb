//! Type definitions for host key events and target scancodes.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

/// Physical key position reported by the host. Zero means the host did not
/// report one for this event.
pub type PhysicalScanCode = u32;

/// Logical key symbol from the host's key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySymbol {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpDivide,
    KpMultiply,
    KpMinus,
    KpPlus,
    KpPeriod,
    KpEnter,
    Escape,
    Backspace,
    Tab,
    Return,
    Space,
    CapsLock,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    LGui,
    RGui,
    /// AltGr / mode switch key.
    Mode,
    NumLockClear,
    ScrollLock,
    PrintScreen,
    Pause,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Insert,
    Delete,
    /// The extra "<>" key found on ISO keyboards.
    Less,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    Comma,
    Period,
    Slash,
    /// Any symbol the remapper has no name for, by raw host value.
    Other(u32),
}

impl KeySymbol {
    /// Returns the digit for keypad 0-9, `None` for every other symbol.
    pub fn keypad_digit(self) -> Option<u8> {
        match self {
            KeySymbol::Kp0 => Some(0),
            KeySymbol::Kp1 => Some(1),
            KeySymbol::Kp2 => Some(2),
            KeySymbol::Kp3 => Some(3),
            KeySymbol::Kp4 => Some(4),
            KeySymbol::Kp5 => Some(5),
            KeySymbol::Kp6 => Some(6),
            KeySymbol::Kp7 => Some(7),
            KeySymbol::Kp8 => Some(8),
            KeySymbol::Kp9 => Some(9),
            _ => None,
        }
    }

    /// Modifier and lock keys that are never passed through to the machine.
    #[inline]
    pub fn is_ignored(self) -> bool {
        matches!(
            self,
            KeySymbol::Mode | KeySymbol::LGui | KeySymbol::NumLockClear
        )
    }

    /// Function keys reserved for the global shortcut handler.
    #[inline]
    pub fn is_shortcut_trigger(self) -> bool {
        matches!(self, KeySymbol::F11 | KeySymbol::F12)
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::parsing::symbol_name(*self))
    }
}

impl FromStr for KeySymbol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parsing::key_name_to_symbol(s)
            .ok_or_else(|| anyhow::anyhow!("unknown key name '{}'", s))
    }
}

bitflags! {
    /// Host modifier state attached to a key event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyMod: u16 {
        const LSHIFT = 0x0001;
        const RSHIFT = 0x0002;
        const LCTRL  = 0x0040;
        const RCTRL  = 0x0080;
        const LALT   = 0x0100;
        const RALT   = 0x0200;
        const LGUI   = 0x0400;
        const RGUI   = 0x0800;
        const NUM    = 0x1000;
        const CAPS   = 0x2000;
        const MODE   = 0x4000;

        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const CTRL  = Self::LCTRL.bits() | Self::RCTRL.bits();
        const ALT   = Self::LALT.bits() | Self::RALT.bits();
        const GUI   = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

impl KeyMod {
    /// Modifiers that turn a key press into a shortcut instead of a keystroke.
    pub const SHORTCUT_COMBO: KeyMod = KeyMod::MODE.union(KeyMod::RGUI).union(KeyMod::CTRL);

    #[inline]
    pub fn is_shortcut_combo(self) -> bool {
        self.intersects(Self::SHORTCUT_COMBO)
    }

    #[inline]
    pub fn num_lock(self) -> bool {
        self.contains(Self::NUM)
    }
}

/// Scancode of the target keyboard, always within `0..=0x7F`.
///
/// The high bit is reserved by the keyboard protocol to flag a release;
/// that encoding is done by the key sink, see [`ScanCode::release_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanCode(pub(crate) u8);

impl ScanCode {
    pub const MAX: u8 = 0x7F;
    pub const RELEASE_BIT: u8 = 0x80;

    pub const fn new(code: u8) -> Option<Self> {
        if code <= Self::MAX {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Applies a host scancode offset. Results outside the target range
    /// are rejected rather than wrapped.
    pub fn from_offset(physical: PhysicalScanCode, offset: i32) -> Option<Self> {
        let code = i64::from(physical) - i64::from(offset);
        if (0..=i64::from(Self::MAX)).contains(&code) {
            Some(Self(code as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Byte sent on the wire when this key goes up.
    #[inline]
    pub const fn release_byte(self) -> u8 {
        self.0 | Self::RELEASE_BIT
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:02x}", self.0)
    }
}

/// A single press or release delivered to the machine's key matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAction {
    pub scancode: ScanCode,
    pub pressed: bool,
}

impl KeyAction {
    pub const fn press(scancode: ScanCode) -> Self {
        Self {
            scancode,
            pressed: true,
        }
    }

    pub const fn release(scancode: ScanCode) -> Self {
        Self {
            scancode,
            pressed: false,
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.pressed { "press" } else { "release" };
        write!(f, "{} {}", verb, self.scancode)
    }
}

/// Receiver of translated key actions, typically the emulated key matrix.
pub trait KeySink {
    fn press_st_key(&mut self, scancode: ScanCode, pressed: bool);
}

impl KeySink for Vec<KeyAction> {
    fn press_st_key(&mut self, scancode: ScanCode, pressed: bool) {
        self.push(KeyAction { scancode, pressed });
    }
}

impl<S: KeySink + ?Sized> KeySink for &mut S {
    fn press_st_key(&mut self, scancode: ScanCode, pressed: bool) {
        (**self).press_st_key(scancode, pressed);
    }
}
