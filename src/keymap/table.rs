//! Static translation tables for the target keyboard.
//!
//! Everything here is pure. The stateful parts of the remapping (offset
//! detection state, scancode cache) live on [`super::Keymap`].

use super::types::{KeySymbol, PhysicalScanCode, ScanCode};

/// Scancode of the capslock key, which the target keyboard treats as a toggle.
pub const CAPSLOCK: ScanCode = ScanCode(0x3A);

/// Offset assumed when no anchor key has been seen yet. X11 reports PC
/// scancodes shifted by 8, which makes it the most likely guess.
pub const DEFAULT_FALLBACK_OFFSET: i32 = 8;

/// Keys that stay held across frames when key repeat is disabled.
const DEBOUNCE_EXEMPT: [u8; 5] = [
    0x1D, // Control
    0x2A, // Left shift
    0x01, // Escape
    0x38, // Alternate
    0x36, // Right shift
];

/// Keypad 0-9 with numlock on.
const KEYPAD_NUMERIC: [ScanCode; 10] = [
    ScanCode(0x70),
    ScanCode(0x6D),
    ScanCode(0x6E),
    ScanCode(0x6F),
    ScanCode(0x6A),
    ScanCode(0x6B),
    ScanCode(0x6C),
    ScanCode(0x67),
    ScanCode(0x68),
    ScanCode(0x69),
];

/// Keypad 0-9 with numlock off. Games of the era expect cursor keys here,
/// and 7/9 land on Insert/Home for Dungeon Master.
const KEYPAD_CURSOR: [ScanCode; 10] = [
    ScanCode(0x70), // 0
    ScanCode(0x6D), // 1
    ScanCode(0x50), // 2: down
    ScanCode(0x6F), // 3
    ScanCode(0x4B), // 4: left
    ScanCode(0x50), // 5: down again
    ScanCode(0x4D), // 6: right
    ScanCode(0x52), // 7: insert
    ScanCode(0x48), // 8: up
    ScanCode(0x47), // 9: home
];

/// Looks up keys with a fixed target scancode.
///
/// Keypad digits are not part of this table, see [`resolve_keypad`].
pub fn lookup(symbol: KeySymbol) -> Option<ScanCode> {
    use KeySymbol::*;

    let code = match symbol {
        KpDivide => 0x65,
        KpMultiply => 0x66,
        KpMinus => 0x4A,
        KpPlus => 0x4E,
        KpPeriod => 0x71,
        KpEnter => 0x72,

        Home => 0x47,
        // "<>" on the German keyboard; End has no key of its own.
        End => 0x60,
        Up => 0x48,
        Left => 0x4B,
        Right => 0x4D,
        Down => 0x50,
        Insert => 0x52,
        Delete => 0x53,
        Less => 0x60,

        RCtrl => 0x1D,
        RAlt => 0x38,

        _ => return anchor_scancode(symbol),
    };

    Some(ScanCode(code))
}

/// Keys whose scancode matches a PC101 layout, so their host scancode
/// reveals the platform offset.
fn anchor_scancode(symbol: KeySymbol) -> Option<ScanCode> {
    use KeySymbol::*;

    let code = match symbol {
        Escape => 0x01,
        Num1 => 0x02,
        Num2 => 0x03,
        Num3 => 0x04,
        Num4 => 0x05,
        Num5 => 0x06,
        Num6 => 0x07,
        Num7 => 0x08,
        Num8 => 0x09,
        Num9 => 0x0A,
        Num0 => 0x0B,
        Backspace => 0x0E,
        Tab => 0x0F,
        Return => 0x1C,
        Space => 0x39,
        Q => 0x10,
        W => 0x11,
        E => 0x12,
        R => 0x13,
        T => 0x14,
        Y => 0x15,
        U => 0x16,
        I => 0x17,
        O => 0x18,
        P => 0x19,
        A => 0x1E,
        S => 0x1F,
        D => 0x20,
        F => 0x21,
        G => 0x22,
        H => 0x23,
        J => 0x24,
        K => 0x25,
        L => 0x26,
        Z => 0x2C,
        X => 0x2D,
        C => 0x2E,
        V => 0x2F,
        B => 0x30,
        N => 0x31,
        M => 0x32,
        CapsLock => 0x3A,
        LShift => 0x2A,
        LCtrl => 0x1D,
        LAlt => 0x38,
        F1 => 0x3B,
        F2 => 0x3C,
        F3 => 0x3D,
        F4 => 0x3E,
        F5 => 0x3F,
        F6 => 0x40,
        F7 => 0x41,
        F8 => 0x42,
        F9 => 0x43,
        F10 => 0x44,
        _ => return None,
    };

    Some(ScanCode(code))
}

/// Returns whether `symbol` can be used to detect the host scancode offset.
#[inline]
pub(crate) fn is_anchor(symbol: KeySymbol) -> bool {
    anchor_scancode(symbol).is_some()
}

/// Derives the host scancode offset from an anchor key.
///
/// Returns `None` for non-anchor symbols and for the illegal physical code 0.
/// The result may be negative; callers decide whether it is usable.
pub fn infer_offset(symbol: KeySymbol, physical: PhysicalScanCode) -> Option<i32> {
    if physical == 0 {
        return None;
    }

    let expected = anchor_scancode(symbol)?;
    let physical = i32::try_from(physical).ok()?;
    Some(physical - i32::from(expected.get()))
}

/// Maps keypad digits, switching between numeric and cursor layouts on
/// the live numlock state. `None` for non-keypad symbols.
pub fn resolve_keypad(symbol: KeySymbol, num_lock: bool) -> Option<ScanCode> {
    let digit = usize::from(symbol.keypad_digit()?);
    let table = if num_lock {
        &KEYPAD_NUMERIC
    } else {
        &KEYPAD_CURSOR
    };
    Some(table[digit])
}

/// Returns true if a held key must be released after one frame when host
/// key repeat is disabled. Modifiers and escape are left held.
pub fn requires_debounce(scancode: u8) -> bool {
    !DEBOUNCE_EXEMPT.contains(&scancode)
}
