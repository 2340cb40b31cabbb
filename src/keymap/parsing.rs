//! Key and modifier name parsing utilities.

use std::borrow::Cow;

use super::types::*;

/// Canonical names, in the order they are printed.
pub(crate) const SYMBOL_NAMES: &[(&str, KeySymbol)] = &[
    ("A", KeySymbol::A),
    ("B", KeySymbol::B),
    ("C", KeySymbol::C),
    ("D", KeySymbol::D),
    ("E", KeySymbol::E),
    ("F", KeySymbol::F),
    ("G", KeySymbol::G),
    ("H", KeySymbol::H),
    ("I", KeySymbol::I),
    ("J", KeySymbol::J),
    ("K", KeySymbol::K),
    ("L", KeySymbol::L),
    ("M", KeySymbol::M),
    ("N", KeySymbol::N),
    ("O", KeySymbol::O),
    ("P", KeySymbol::P),
    ("Q", KeySymbol::Q),
    ("R", KeySymbol::R),
    ("S", KeySymbol::S),
    ("T", KeySymbol::T),
    ("U", KeySymbol::U),
    ("V", KeySymbol::V),
    ("W", KeySymbol::W),
    ("X", KeySymbol::X),
    ("Y", KeySymbol::Y),
    ("Z", KeySymbol::Z),
    ("0", KeySymbol::Num0),
    ("1", KeySymbol::Num1),
    ("2", KeySymbol::Num2),
    ("3", KeySymbol::Num3),
    ("4", KeySymbol::Num4),
    ("5", KeySymbol::Num5),
    ("6", KeySymbol::Num6),
    ("7", KeySymbol::Num7),
    ("8", KeySymbol::Num8),
    ("9", KeySymbol::Num9),
    ("F1", KeySymbol::F1),
    ("F2", KeySymbol::F2),
    ("F3", KeySymbol::F3),
    ("F4", KeySymbol::F4),
    ("F5", KeySymbol::F5),
    ("F6", KeySymbol::F6),
    ("F7", KeySymbol::F7),
    ("F8", KeySymbol::F8),
    ("F9", KeySymbol::F9),
    ("F10", KeySymbol::F10),
    ("F11", KeySymbol::F11),
    ("F12", KeySymbol::F12),
    ("KP_0", KeySymbol::Kp0),
    ("KP_1", KeySymbol::Kp1),
    ("KP_2", KeySymbol::Kp2),
    ("KP_3", KeySymbol::Kp3),
    ("KP_4", KeySymbol::Kp4),
    ("KP_5", KeySymbol::Kp5),
    ("KP_6", KeySymbol::Kp6),
    ("KP_7", KeySymbol::Kp7),
    ("KP_8", KeySymbol::Kp8),
    ("KP_9", KeySymbol::Kp9),
    ("KP_DIVIDE", KeySymbol::KpDivide),
    ("KP_MULTIPLY", KeySymbol::KpMultiply),
    ("KP_MINUS", KeySymbol::KpMinus),
    ("KP_PLUS", KeySymbol::KpPlus),
    ("KP_PERIOD", KeySymbol::KpPeriod),
    ("KP_ENTER", KeySymbol::KpEnter),
    ("ESCAPE", KeySymbol::Escape),
    ("BACKSPACE", KeySymbol::Backspace),
    ("TAB", KeySymbol::Tab),
    ("RETURN", KeySymbol::Return),
    ("SPACE", KeySymbol::Space),
    ("CAPSLOCK", KeySymbol::CapsLock),
    ("LSHIFT", KeySymbol::LShift),
    ("RSHIFT", KeySymbol::RShift),
    ("LCTRL", KeySymbol::LCtrl),
    ("RCTRL", KeySymbol::RCtrl),
    ("LALT", KeySymbol::LAlt),
    ("RALT", KeySymbol::RAlt),
    ("LGUI", KeySymbol::LGui),
    ("RGUI", KeySymbol::RGui),
    ("MODE", KeySymbol::Mode),
    ("NUMLOCK", KeySymbol::NumLockClear),
    ("SCROLLLOCK", KeySymbol::ScrollLock),
    ("PRINTSCREEN", KeySymbol::PrintScreen),
    ("PAUSE", KeySymbol::Pause),
    ("HOME", KeySymbol::Home),
    ("END", KeySymbol::End),
    ("PAGEUP", KeySymbol::PageUp),
    ("PAGEDOWN", KeySymbol::PageDown),
    ("UP", KeySymbol::Up),
    ("DOWN", KeySymbol::Down),
    ("LEFT", KeySymbol::Left),
    ("RIGHT", KeySymbol::Right),
    ("INSERT", KeySymbol::Insert),
    ("DELETE", KeySymbol::Delete),
    ("LESS", KeySymbol::Less),
    ("MINUS", KeySymbol::Minus),
    ("EQUALS", KeySymbol::Equals),
    ("LEFTBRACKET", KeySymbol::LeftBracket),
    ("RIGHTBRACKET", KeySymbol::RightBracket),
    ("BACKSLASH", KeySymbol::Backslash),
    ("SEMICOLON", KeySymbol::Semicolon),
    ("QUOTE", KeySymbol::Quote),
    ("BACKQUOTE", KeySymbol::Backquote),
    ("COMMA", KeySymbol::Comma),
    ("PERIOD", KeySymbol::Period),
    ("SLASH", KeySymbol::Slash),
];

/// Converts a key symbol to its canonical name. Unnamed symbols print as `#<value>`.
pub fn symbol_name(symbol: KeySymbol) -> Cow<'static, str> {
    if let KeySymbol::Other(raw) = symbol {
        return Cow::Owned(format!("#{}", raw));
    }

    SYMBOL_NAMES
        .iter()
        .find(|(_, s)| *s == symbol)
        .map(|(name, _)| Cow::Borrowed(*name))
        .unwrap_or(Cow::Borrowed("UNKNOWN"))
}

pub fn key_name_to_symbol(key_name: &str) -> Option<KeySymbol> {
    let key = key_name.trim().to_uppercase();

    if let Some(raw) = key.strip_prefix('#') {
        return raw.parse::<u32>().ok().map(KeySymbol::Other);
    }

    // aliases
    let canonical = match key.as_str() {
        "ESC" => "ESCAPE",
        "ENTER" => "RETURN",
        "BACK" => "BACKSPACE",
        "CAPITAL" | "CAPS" => "CAPSLOCK",
        "DEL" => "DELETE",
        "INS" => "INSERT",
        "ALTGR" => "MODE",
        "LWIN" | "LSUPER" => "LGUI",
        "RWIN" | "RSUPER" => "RGUI",
        "NUMLOCKCLEAR" => "NUMLOCK",
        other => other,
    };

    // NUMPAD5 and KP5 spellings
    let canonical = if let Some(digit) = canonical
        .strip_prefix("NUMPAD")
        .or_else(|| canonical.strip_prefix("KP"))
        && digit.len() == 1
        && digit.chars().all(|c| c.is_ascii_digit())
    {
        Cow::Owned(format!("KP_{}", digit))
    } else {
        Cow::Borrowed(canonical)
    };

    SYMBOL_NAMES
        .iter()
        .find(|(name, _)| *name == &*canonical)
        .map(|(_, symbol)| *symbol)
}

/// Converts a single modifier name to its flag.
pub fn modifier_name_to_flag(name: &str) -> Option<KeyMod> {
    match name.trim().to_uppercase().as_str() {
        "LSHIFT" => Some(KeyMod::LSHIFT),
        "RSHIFT" => Some(KeyMod::RSHIFT),
        "SHIFT" => Some(KeyMod::SHIFT),
        "LCTRL" => Some(KeyMod::LCTRL),
        "RCTRL" => Some(KeyMod::RCTRL),
        "CTRL" => Some(KeyMod::CTRL),
        "LALT" => Some(KeyMod::LALT),
        "RALT" => Some(KeyMod::RALT),
        "ALT" => Some(KeyMod::ALT),
        "LGUI" => Some(KeyMod::LGUI),
        "RGUI" => Some(KeyMod::RGUI),
        "GUI" => Some(KeyMod::GUI),
        "NUM" | "NUMLOCK" => Some(KeyMod::NUM),
        "CAPS" | "CAPSLOCK" => Some(KeyMod::CAPS),
        "MODE" | "ALTGR" => Some(KeyMod::MODE),
        _ => None,
    }
}

/// Parses a modifier list such as `lctrl+num` or `shift,caps`.
///
/// An empty string or `-` yields no modifiers.
pub fn parse_modifiers(list: &str) -> anyhow::Result<KeyMod> {
    let list = list.trim();
    if list.is_empty() || list == "-" {
        return Ok(KeyMod::empty());
    }

    let mut mods = KeyMod::empty();
    for part in list.split(['+', ',']) {
        let flag = modifier_name_to_flag(part)
            .ok_or_else(|| anyhow::anyhow!("unknown modifier '{}'", part.trim()))?;
        mods |= flag;
    }
    Ok(mods)
}
