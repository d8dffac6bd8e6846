//! Keyboard Codes
//!
//! Legacy `keyCode` values for common keys.

pub const BACKSPACE: u16 = 8;
pub const TAB: u16 = 9;
pub const ENTER: u16 = 13;
pub const SHIFT: u16 = 16;
pub const CONTROL: u16 = 17;
pub const ALT: u16 = 18;
pub const CAPSLOCK: u16 = 20;
pub const ESC: u16 = 27;
pub const PAGEUP: u16 = 33;
pub const PAGEDOWN: u16 = 34;
pub const END: u16 = 35;
pub const HOME: u16 = 36;
pub const LEFT: u16 = 37;
pub const UP: u16 = 38;
pub const RIGHT: u16 = 39;
pub const DOWN: u16 = 40;
pub const INSERT: u16 = 45;
pub const DELETE: u16 = 46;
pub const ALTGRAPH: u16 = 225;

pub const ARROWLEFT: u16 = LEFT;
pub const ARROWUP: u16 = UP;
pub const ARROWRIGHT: u16 = RIGHT;
pub const ARROWDOWN: u16 = DOWN;

const KEY_CODES: [(&str, u16); 23] = [
    ("BACKSPACE", BACKSPACE),
    ("TAB", TAB),
    ("ENTER", ENTER),
    ("ESC", ESC),
    ("LEFT", LEFT),
    ("UP", UP),
    ("RIGHT", RIGHT),
    ("DOWN", DOWN),
    ("DELETE", DELETE),
    ("HOME", HOME),
    ("END", END),
    ("PAGEUP", PAGEUP),
    ("PAGEDOWN", PAGEDOWN),
    ("INSERT", INSERT),
    ("CAPSLOCK", CAPSLOCK),
    ("ARROWLEFT", ARROWLEFT),
    ("ARROWUP", ARROWUP),
    ("ARROWRIGHT", ARROWRIGHT),
    ("ARROWDOWN", ARROWDOWN),
    ("SHIFT", SHIFT),
    ("CONTROL", CONTROL),
    ("ALT", ALT),
    ("ALTGRAPH", ALTGRAPH),
];

/// Look up a key code by name, ignoring case (`"Enter"` -> 13)
pub fn key_code(name: &str) -> Option<u16> {
    KEY_CODES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}
