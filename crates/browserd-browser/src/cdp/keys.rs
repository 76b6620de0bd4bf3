//! US keyboard key definitions for `Input.dispatchKeyEvent`.

/// What the browser needs to synthesize one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub key: String,
    pub code: String,
    pub key_code: i64,
    /// Text the key inserts, if any.
    pub text: Option<String>,
}

/// A key plus held modifiers, parsed from e.g. `Control+Shift+Tab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: i64,
    pub key: KeyDefinition,
}

pub const MODIFIER_ALT: i64 = 1;
pub const MODIFIER_CONTROL: i64 = 2;
pub const MODIFIER_META: i64 = 4;
pub const MODIFIER_SHIFT: i64 = 8;

const NAMED_KEYS: &[(&str, &str, i64, Option<&str>)] = &[
    ("Enter", "Enter", 13, Some("\r")),
    ("Tab", "Tab", 9, None),
    ("Escape", "Escape", 27, None),
    ("Backspace", "Backspace", 8, None),
    ("Delete", "Delete", 46, None),
    ("Insert", "Insert", 45, None),
    ("ArrowUp", "ArrowUp", 38, None),
    ("ArrowDown", "ArrowDown", 40, None),
    ("ArrowLeft", "ArrowLeft", 37, None),
    ("ArrowRight", "ArrowRight", 39, None),
    ("Home", "Home", 36, None),
    ("End", "End", 35, None),
    ("PageUp", "PageUp", 33, None),
    ("PageDown", "PageDown", 34, None),
    (" ", "Space", 32, Some(" ")),
    ("Shift", "ShiftLeft", 16, None),
    ("Control", "ControlLeft", 17, None),
    ("Alt", "AltLeft", 18, None),
    ("Meta", "MetaLeft", 91, None),
];

/// Canonical key name for common aliases, compared case-insensitively.
fn canonical_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    let canonical = match lower.as_str() {
        "enter" | "return" => "Enter",
        "tab" => "Tab",
        "escape" | "esc" => "Escape",
        "backspace" => "Backspace",
        "delete" | "del" => "Delete",
        "insert" => "Insert",
        "arrowup" | "up" => "ArrowUp",
        "arrowdown" | "down" => "ArrowDown",
        "arrowleft" | "left" => "ArrowLeft",
        "arrowright" | "right" => "ArrowRight",
        "home" => "Home",
        "end" => "End",
        "pageup" => "PageUp",
        "pagedown" => "PageDown",
        " " | "space" => " ",
        "shift" => "Shift",
        "control" | "ctrl" => "Control",
        "alt" | "option" => "Alt",
        "meta" | "command" | "cmd" => "Meta",
        _ => return None,
    };
    Some(canonical)
}

/// Look up a key by name (`Enter`, `PageDown`, `F5`) or single character.
pub fn key_definition(name: &str) -> Option<KeyDefinition> {
    if let Some(canonical) = canonical_name(name) {
        return NAMED_KEYS
            .iter()
            .find(|(key, ..)| *key == canonical)
            .map(|(key, code, key_code, text)| KeyDefinition {
                key: key.to_string(),
                code: code.to_string(),
                key_code: *key_code,
                text: text.map(str::to_string),
            });
    }

    if let Some(n) = function_key_number(name) {
        return Some(KeyDefinition {
            key: format!("F{}", n),
            code: format!("F{}", n),
            key_code: 111 + n,
            text: None,
        });
    }

    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(char_definition(ch))
}

fn function_key_number(name: &str) -> Option<i64> {
    let digits = name.strip_prefix('F').or_else(|| name.strip_prefix('f'))?;
    let n: i64 = digits.parse().ok()?;
    (1..=12).contains(&n).then_some(n)
}

fn char_definition(ch: char) -> KeyDefinition {
    let (code, key_code) = if ch.is_ascii_alphabetic() {
        let upper = ch.to_ascii_uppercase();
        (format!("Key{}", upper), upper as i64)
    } else if ch.is_ascii_digit() {
        (format!("Digit{}", ch), ch as i64)
    } else {
        (String::new(), 0)
    };
    KeyDefinition {
        key: ch.to_string(),
        code,
        key_code,
        text: Some(ch.to_string()),
    }
}

/// Modifier flag for a modifier name, `None` when the name is not a modifier.
pub fn modifier_flag(name: &str) -> Option<i64> {
    match canonical_name(name)? {
        "Alt" => Some(MODIFIER_ALT),
        "Control" => Some(MODIFIER_CONTROL),
        "Meta" => Some(MODIFIER_META),
        "Shift" => Some(MODIFIER_SHIFT),
        _ => None,
    }
}

/// Parse `Key`, `Mod+Key` or `Mod+Mod+Key`. A literal plus is written `+` or `Control++`.
pub fn parse_key_combo(combo: &str) -> Option<KeyPress> {
    let (mods, key) = match combo.strip_suffix("++") {
        Some(prefix) => (prefix, "+"),
        None => match combo.rsplit_once('+') {
            Some((m, k)) if !k.is_empty() => (m, k),
            _ => ("", combo),
        },
    };

    let mut modifiers = 0;
    for part in mods.split('+').filter(|p| !p.is_empty()) {
        modifiers |= modifier_flag(part.trim())?;
    }

    let mut key = key_definition(key)?;
    if modifiers & (MODIFIER_CONTROL | MODIFIER_ALT | MODIFIER_META) != 0 {
        key.text = None;
    } else if modifiers & MODIFIER_SHIFT != 0 {
        if let Some(text) = key.text.as_mut() {
            *text = text.to_uppercase();
            key.key = text.clone();
        }
    }

    Some(KeyPress { modifiers, key })
}
