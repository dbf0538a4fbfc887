//! Key code names.
//!
//! Codes follow the 8-bit TMK convention: HID keyboard usages up to
//! `0xE7`, system and media keys at `0xA5..=0xB9`, `FN0..=FN7` at
//! `0xE8..=0xEF` and mouse keys at `0xF0..=0xFF`. Names may carry the
//! `KC_` prefix and are matched case-insensitively.

/// Canonical name, code and short label used for rendering.
const KEYCODES: &[(&str, u8, &str)] = &[
    ("NO", 0x00, ""),
    ("ROLL_OVER", 0x01, "ERR"),
    ("A", 0x04, "A"),
    ("B", 0x05, "B"),
    ("C", 0x06, "C"),
    ("D", 0x07, "D"),
    ("E", 0x08, "E"),
    ("F", 0x09, "F"),
    ("G", 0x0A, "G"),
    ("H", 0x0B, "H"),
    ("I", 0x0C, "I"),
    ("J", 0x0D, "J"),
    ("K", 0x0E, "K"),
    ("L", 0x0F, "L"),
    ("M", 0x10, "M"),
    ("N", 0x11, "N"),
    ("O", 0x12, "O"),
    ("P", 0x13, "P"),
    ("Q", 0x14, "Q"),
    ("R", 0x15, "R"),
    ("S", 0x16, "S"),
    ("T", 0x17, "T"),
    ("U", 0x18, "U"),
    ("V", 0x19, "V"),
    ("W", 0x1A, "W"),
    ("X", 0x1B, "X"),
    ("Y", 0x1C, "Y"),
    ("Z", 0x1D, "Z"),
    ("1", 0x1E, "1"),
    ("2", 0x1F, "2"),
    ("3", 0x20, "3"),
    ("4", 0x21, "4"),
    ("5", 0x22, "5"),
    ("6", 0x23, "6"),
    ("7", 0x24, "7"),
    ("8", 0x25, "8"),
    ("9", 0x26, "9"),
    ("0", 0x27, "0"),
    ("ENT", 0x28, "Ent"),
    ("ESC", 0x29, "Esc"),
    ("BSPC", 0x2A, "Bksp"),
    ("TAB", 0x2B, "Tab"),
    ("SPC", 0x2C, "Spc"),
    ("MINS", 0x2D, "-"),
    ("EQL", 0x2E, "="),
    ("LBRC", 0x2F, "["),
    ("RBRC", 0x30, "]"),
    ("BSLS", 0x31, "\\"),
    ("NUHS", 0x32, "#"),
    ("SCLN", 0x33, ";"),
    ("QUOT", 0x34, "'"),
    ("GRV", 0x35, "`"),
    ("COMM", 0x36, ","),
    ("DOT", 0x37, "."),
    ("SLSH", 0x38, "/"),
    ("CAPS", 0x39, "Caps"),
    ("F1", 0x3A, "F1"),
    ("F2", 0x3B, "F2"),
    ("F3", 0x3C, "F3"),
    ("F4", 0x3D, "F4"),
    ("F5", 0x3E, "F5"),
    ("F6", 0x3F, "F6"),
    ("F7", 0x40, "F7"),
    ("F8", 0x41, "F8"),
    ("F9", 0x42, "F9"),
    ("F10", 0x43, "F10"),
    ("F11", 0x44, "F11"),
    ("F12", 0x45, "F12"),
    ("PSCR", 0x46, "PScr"),
    ("SLCK", 0x47, "ScrL"),
    ("PAUS", 0x48, "Paus"),
    ("INS", 0x49, "Ins"),
    ("HOME", 0x4A, "Home"),
    ("PGUP", 0x4B, "PgUp"),
    ("DEL", 0x4C, "Del"),
    ("END", 0x4D, "End"),
    ("PGDN", 0x4E, "PgDn"),
    ("RGHT", 0x4F, "\u{2192}"),
    ("LEFT", 0x50, "\u{2190}"),
    ("DOWN", 0x51, "\u{2193}"),
    ("UP", 0x52, "\u{2191}"),
    ("NLCK", 0x53, "NumL"),
    ("PSLS", 0x54, "P/"),
    ("PAST", 0x55, "P*"),
    ("PMNS", 0x56, "P-"),
    ("PPLS", 0x57, "P+"),
    ("PENT", 0x58, "PEnt"),
    ("P1", 0x59, "P1"),
    ("P2", 0x5A, "P2"),
    ("P3", 0x5B, "P3"),
    ("P4", 0x5C, "P4"),
    ("P5", 0x5D, "P5"),
    ("P6", 0x5E, "P6"),
    ("P7", 0x5F, "P7"),
    ("P8", 0x60, "P8"),
    ("P9", 0x61, "P9"),
    ("P0", 0x62, "P0"),
    ("PDOT", 0x63, "P."),
    ("NUBS", 0x64, "<>"),
    ("APP", 0x65, "App"),
    ("PWR", 0xA5, "Pwr"),
    ("SLEP", 0xA6, "Slp"),
    ("WAKE", 0xA7, "Wake"),
    ("MUTE", 0xA8, "Mute"),
    ("VOLU", 0xA9, "Vol+"),
    ("VOLD", 0xAA, "Vol-"),
    ("MNXT", 0xAB, "Next"),
    ("MPRV", 0xAC, "Prev"),
    ("MSTP", 0xAD, "Stop"),
    ("MPLY", 0xAE, "Play"),
    ("MSEL", 0xAF, "MSel"),
    ("MAIL", 0xB0, "Mail"),
    ("CALC", 0xB1, "Calc"),
    ("MYCM", 0xB2, "MyCm"),
    ("WSCH", 0xB3, "WSch"),
    ("WHOM", 0xB4, "WHom"),
    ("WBAK", 0xB5, "WBak"),
    ("WFWD", 0xB6, "WFwd"),
    ("WSTP", 0xB7, "WStp"),
    ("WREF", 0xB8, "WRef"),
    ("WFAV", 0xB9, "WFav"),
    ("LCTL", 0xE0, "Ctrl"),
    ("LSFT", 0xE1, "Shft"),
    ("LALT", 0xE2, "Alt"),
    ("LGUI", 0xE3, "Gui"),
    ("RCTL", 0xE4, "RCtl"),
    ("RSFT", 0xE5, "RSft"),
    ("RALT", 0xE6, "RAlt"),
    ("RGUI", 0xE7, "RGui"),
    ("FN0", 0xE8, "Fn0"),
    ("FN1", 0xE9, "Fn1"),
    ("FN2", 0xEA, "Fn2"),
    ("FN3", 0xEB, "Fn3"),
    ("FN4", 0xEC, "Fn4"),
    ("FN5", 0xED, "Fn5"),
    ("FN6", 0xEE, "Fn6"),
    ("FN7", 0xEF, "Fn7"),
    ("MS_U", 0xF0, "Ms\u{2191}"),
    ("MS_D", 0xF1, "Ms\u{2193}"),
    ("MS_L", 0xF2, "Ms\u{2190}"),
    ("MS_R", 0xF3, "Ms\u{2192}"),
    ("BTN1", 0xF4, "Mb1"),
    ("BTN2", 0xF5, "Mb2"),
    ("BTN3", 0xF6, "Mb3"),
    ("BTN4", 0xF7, "Mb4"),
    ("BTN5", 0xF8, "Mb5"),
    ("WH_U", 0xF9, "Mw\u{2191}"),
    ("WH_D", 0xFA, "Mw\u{2193}"),
    ("WH_L", 0xFB, "Mw\u{2190}"),
    ("WH_R", 0xFC, "Mw\u{2192}"),
    ("ACL0", 0xFD, "Acl0"),
    ("ACL1", 0xFE, "Acl1"),
    ("ACL2", 0xFF, "Acl2"),
];

/// Long spellings and alternative short names.
const ALIASES: &[(&str, &str)] = &[
    ("ENTER", "ENT"),
    ("ESCAPE", "ESC"),
    ("BSPACE", "BSPC"),
    ("SPACE", "SPC"),
    ("MINUS", "MINS"),
    ("EQUAL", "EQL"),
    ("LBRACKET", "LBRC"),
    ("RBRACKET", "RBRC"),
    ("BSLASH", "BSLS"),
    ("NONUS_HASH", "NUHS"),
    ("SCOLON", "SCLN"),
    ("QUOTE", "QUOT"),
    ("GRAVE", "GRV"),
    ("COMMA", "COMM"),
    ("SLASH", "SLSH"),
    ("CAPSLOCK", "CAPS"),
    ("PSCREEN", "PSCR"),
    ("SCROLLLOCK", "SLCK"),
    ("PAUSE", "PAUS"),
    ("BRK", "PAUS"),
    ("INSERT", "INS"),
    ("DELETE", "DEL"),
    ("PGDOWN", "PGDN"),
    ("RIGHT", "RGHT"),
    ("NUMLOCK", "NLCK"),
    ("KP_SLASH", "PSLS"),
    ("KP_ASTERISK", "PAST"),
    ("KP_MINUS", "PMNS"),
    ("KP_PLUS", "PPLS"),
    ("KP_ENTER", "PENT"),
    ("KP_DOT", "PDOT"),
    ("NONUS_BSLASH", "NUBS"),
    ("APPLICATION", "APP"),
    ("POWER", "PWR"),
    ("SYSTEM_SLEEP", "SLEP"),
    ("SYSTEM_WAKE", "WAKE"),
    ("AUDIO_MUTE", "MUTE"),
    ("AUDIO_VOL_UP", "VOLU"),
    ("AUDIO_VOL_DOWN", "VOLD"),
    ("LCTRL", "LCTL"),
    ("LSHIFT", "LSFT"),
    ("RCTRL", "RCTL"),
    ("RSHIFT", "RSFT"),
    ("TRNS", "NO"),
    ("NONE", "NO"),
];

/// Code for a key name.
pub fn by_name(name: &str) -> Option<u8> {
    let upper = name.to_ascii_uppercase();
    let name = upper.strip_prefix("KC_").unwrap_or(&upper);
    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| *canonical);

    KEYCODES
        .iter()
        .find(|(canonical, _, _)| *canonical == name)
        .map(|&(_, code, _)| code)
}

/// Canonical name of a code.
pub fn name(code: u8) -> Option<&'static str> {
    KEYCODES
        .iter()
        .find(|&&(_, c, _)| c == code)
        .map(|&(name, _, _)| name)
}

/// Short display label, empty for `NO`, hex for unnamed codes.
pub fn label(code: u8) -> String {
    KEYCODES
        .iter()
        .find(|&&(_, c, _)| c == code)
        .map_or_else(|| format!("{code:#04x}"), |&(_, _, label)| label.to_string())
}
