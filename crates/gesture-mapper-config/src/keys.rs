//! Key name resolution
//!
//! Bindings name keys the way people say them ("PageDown", "Esc", "Left").
//! Anything without a friendly alias falls back to evdev's own `KEY_*`
//! names, with or without the prefix.

use std::str::FromStr;

use evdev::Key;

/// Resolve a key name from the config to an evdev key
///
/// Matching is case-insensitive. Returns `None` for unknown names.
pub fn resolve_key(name: &str) -> Option<Key> {
    let upper = name.trim().to_uppercase();

    let alias = match upper.as_str() {
        "ESCAPE" | "ESC" => Some(Key::KEY_ESC),
        "RETURN" | "ENTER" => Some(Key::KEY_ENTER),
        "UP" | "UPARROW" => Some(Key::KEY_UP),
        "DOWN" | "DOWNARROW" => Some(Key::KEY_DOWN),
        "LEFT" | "LEFTARROW" => Some(Key::KEY_LEFT),
        "RIGHT" | "RIGHTARROW" => Some(Key::KEY_RIGHT),
        "PAGEUP" | "PGUP" | "PRIOR" => Some(Key::KEY_PAGEUP),
        "PAGEDOWN" | "PGDN" | "PGDOWN" | "NEXT" => Some(Key::KEY_PAGEDOWN),
        "INS" => Some(Key::KEY_INSERT),
        "DEL" => Some(Key::KEY_DELETE),
        "CTRL" | "LCTRL" => Some(Key::KEY_LEFTCTRL),
        "SHIFT" | "LSHIFT" => Some(Key::KEY_LEFTSHIFT),
        "ALT" | "LALT" => Some(Key::KEY_LEFTALT),
        "SUPER" | "META" | "LMETA" => Some(Key::KEY_LEFTMETA),
        "CAPS" | "CAPS_LOCK" => Some(Key::KEY_CAPSLOCK),
        "EQUALS" | "=" => Some(Key::KEY_EQUAL),
        "PERIOD" | "." => Some(Key::KEY_DOT),
        "," => Some(Key::KEY_COMMA),
        "-" => Some(Key::KEY_MINUS),
        "/" => Some(Key::KEY_SLASH),
        "XF86BACK" => Some(Key::KEY_BACK),
        "XF86FORWARD" => Some(Key::KEY_FORWARD),
        _ => None,
    };
    if alias.is_some() {
        return alias;
    }

    if upper.is_empty() {
        return None;
    }

    let evdev_name = if upper.starts_with("KEY_") {
        upper
    } else {
        format!("KEY_{}", upper)
    };
    Key::from_str(&evdev_name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(resolve_key("Up"), Some(Key::KEY_UP));
        assert_eq!(resolve_key("Down"), Some(Key::KEY_DOWN));
        assert_eq!(resolve_key("left"), Some(Key::KEY_LEFT));
        assert_eq!(resolve_key("RIGHT"), Some(Key::KEY_RIGHT));
    }

    #[test]
    fn test_presentation_keys() {
        assert_eq!(resolve_key("PageDown"), Some(Key::KEY_PAGEDOWN));
        assert_eq!(resolve_key("PgUp"), Some(Key::KEY_PAGEUP));
        assert_eq!(resolve_key("Space"), Some(Key::KEY_SPACE));
        assert_eq!(resolve_key("F5"), Some(Key::KEY_F5));
        assert_eq!(resolve_key("Escape"), Some(Key::KEY_ESC));
        assert_eq!(resolve_key("Return"), Some(Key::KEY_ENTER));
        assert_eq!(resolve_key("B"), Some(Key::KEY_B));
    }

    #[test]
    fn test_raw_evdev_names() {
        assert_eq!(resolve_key("KEY_F5"), Some(Key::KEY_F5));
        assert_eq!(resolve_key("key_pagedown"), Some(Key::KEY_PAGEDOWN));
        assert_eq!(resolve_key("KEY_VOLUMEUP"), Some(Key::KEY_VOLUMEUP));
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(resolve_key("NotAKey"), None);
        assert_eq!(resolve_key(""), None);
        assert_eq!(resolve_key("KEY_"), None);
    }
}
