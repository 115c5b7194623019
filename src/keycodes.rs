//! QMK keycode vocabulary for the exported wire format.

use std::collections::HashMap;

/// Wire sentinel for positions that pass through to the layer below.
pub const TRANSPARENT: &str = "KC_TRNS";

const CODES: &[(&str, &str)] = &[
    // letters
    ("a", "KC_A"),
    ("b", "KC_B"),
    ("c", "KC_C"),
    ("d", "KC_D"),
    ("e", "KC_E"),
    ("f", "KC_F"),
    ("g", "KC_G"),
    ("h", "KC_H"),
    ("i", "KC_I"),
    ("j", "KC_J"),
    ("k", "KC_K"),
    ("l", "KC_L"),
    ("m", "KC_M"),
    ("n", "KC_N"),
    ("o", "KC_O"),
    ("p", "KC_P"),
    ("q", "KC_Q"),
    ("r", "KC_R"),
    ("s", "KC_S"),
    ("t", "KC_T"),
    ("u", "KC_U"),
    ("v", "KC_V"),
    ("w", "KC_W"),
    ("x", "KC_X"),
    ("y", "KC_Y"),
    ("z", "KC_Z"),
    // digits
    ("0", "KC_0"),
    ("1", "KC_1"),
    ("2", "KC_2"),
    ("3", "KC_3"),
    ("4", "KC_4"),
    ("5", "KC_5"),
    ("6", "KC_6"),
    ("7", "KC_7"),
    ("8", "KC_8"),
    ("9", "KC_9"),
    // symbols
    ("`", "KC_GRV"),
    ("~", "KC_TILD"),
    ("!", "KC_EXLM"),
    ("@", "KC_AT"),
    ("#", "KC_HASH"),
    ("$", "KC_DLR"),
    ("%", "KC_PERC"),
    ("^", "KC_CIRC"),
    ("&", "KC_AMPR"),
    ("*", "KC_ASTR"),
    ("(", "KC_LPRN"),
    (")", "KC_RPRN"),
    ("-", "KC_MINS"),
    ("_", "KC_UNDS"),
    ("=", "KC_EQL"),
    ("+", "KC_PLUS"),
    ("[", "KC_LBRC"),
    ("]", "KC_RBRC"),
    ("{", "KC_LCBR"),
    ("}", "KC_RCBR"),
    ("\\", "KC_BSLS"),
    ("|", "KC_PIPE"),
    (";", "KC_SCLN"),
    (":", "KC_COLN"),
    ("'", "KC_QUOT"),
    ("\"", "KC_DQUO"),
    (",", "KC_COMM"),
    ("<", "KC_LT"),
    (".", "KC_DOT"),
    (">", "KC_GT"),
    ("/", "KC_SLSH"),
    ("?", "KC_QUES"),
    // named specials
    ("space", "KC_SPC"),
    ("enter", "KC_ENT"),
    ("escape", "KC_ESC"),
    ("esc", "KC_ESC"),
    ("backspace", "KC_BSPC"),
    ("tab", "KC_TAB"),
    ("delete", "KC_DEL"),
    ("del", "KC_DEL"),
    // modifiers
    ("shift", "KC_LSFT"),
    ("ctrl", "KC_LCTL"),
    ("alt", "KC_LALT"),
    ("cmd", "KC_LGUI"),
    ("super", "KC_LGUI"),
    // navigation
    ("up", "KC_UP"),
    ("down", "KC_DOWN"),
    ("left", "KC_LEFT"),
    ("right", "KC_RGHT"),
    ("home", "KC_HOME"),
    ("end", "KC_END"),
    ("pgup", "KC_PGUP"),
    ("pgdn", "KC_PGDN"),
    // function keys
    ("f1", "KC_F1"),
    ("f2", "KC_F2"),
    ("f3", "KC_F3"),
    ("f4", "KC_F4"),
    ("f5", "KC_F5"),
    ("f6", "KC_F6"),
    ("f7", "KC_F7"),
    ("f8", "KC_F8"),
    ("f9", "KC_F9"),
    ("f10", "KC_F10"),
    ("f11", "KC_F11"),
    ("f12", "KC_F12"),
    // momentary layer holds
    ("layer1", "MO(1)"),
    ("layer2", "MO(2)"),
    ("layer3", "MO(3)"),
    ("layer4", "MO(4)"),
    ("layer5", "MO(5)"),
    ("trans", "KC_TRNS"),
    ("none", "KC_NO"),
];

/// Translates logged key names into QMK keycodes.
#[derive(Debug, Clone)]
pub struct KeycodeTable {
    codes: HashMap<&'static str, &'static str>,
}

impl KeycodeTable {
    pub fn with_defaults() -> Self {
        Self {
            codes: CODES.iter().copied().collect(),
        }
    }

    /// Wire code for a logged key name.
    ///
    /// Named specials may arrive wrapped in brackets (`[space]`); the
    /// wrapper is dropped before lookup, but a literal `[` or `]` symbol
    /// keeps its own code. A lone uppercase letter carries an explicit
    /// shift. Anything unmapped exports as transparent.
    pub fn wire_code(&self, key: &str) -> String {
        let lowered = key.to_lowercase();
        let name = unwrap_brackets(&lowered);
        if let Some(code) = self.codes.get(name) {
            return (*code).to_string();
        }

        let mut chars = key.chars();
        if let (Some(first), None) = (chars.next(), chars.next()) {
            if first.is_uppercase() {
                let lower = first.to_lowercase().to_string();
                if let Some(code) = self.codes.get(lower.as_str()) {
                    return format!("LSFT({code})");
                }
            }
        }

        TRANSPARENT.to_string()
    }
}

impl Default for KeycodeTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn unwrap_brackets(name: &str) -> &str {
    name.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(name)
}
