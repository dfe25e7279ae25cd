use sdl2::keyboard::Keycode;

// Hack character set codes for keys that are not plain ASCII.
pub const NEWLINE_KEY: u16 = 128;
pub const BACKSPACE_KEY: u16 = 129;
pub const LEFT_KEY: u16 = 130;
pub const UP_KEY: u16 = 131;
pub const RIGHT_KEY: u16 = 132;
pub const DOWN_KEY: u16 = 133;
pub const HOME_KEY: u16 = 134;
pub const END_KEY: u16 = 135;
pub const PAGE_UP_KEY: u16 = 136;
pub const PAGE_DOWN_KEY: u16 = 137;
pub const INSERT_KEY: u16 = 138;
pub const DELETE_KEY: u16 = 139;
pub const ESCAPE_KEY: u16 = 140;
pub const F1_KEY: u16 = 141;

/// Translate an SDL key into what the Hack keyboard register shows while it
/// is held down. Keys the Hack machine has no code for read as 0.
pub fn keymap(keycode: Keycode) -> u16 {
    let key = keycode as i32;
    // space through '@', and '[' through '_', are the same in SDL and Hack
    if (32..=64).contains(&key) || (91..=95).contains(&key) {
        return key as u16;
    }
    // SDL has lowercase letters, Hack has uppercase
    if (Keycode::A as i32..=Keycode::Z as i32).contains(&key) {
        return (key - Keycode::A as i32) as u16 + b'A' as u16;
    }
    if (Keycode::F1 as i32..=Keycode::F12 as i32).contains(&key) {
        return (key - Keycode::F1 as i32) as u16 + F1_KEY;
    }
    match keycode {
        Keycode::Return => NEWLINE_KEY,
        Keycode::Backspace => BACKSPACE_KEY,
        Keycode::Left => LEFT_KEY,
        Keycode::Up => UP_KEY,
        Keycode::Right => RIGHT_KEY,
        Keycode::Down => DOWN_KEY,
        Keycode::Home => HOME_KEY,
        Keycode::End => END_KEY,
        Keycode::PageUp => PAGE_UP_KEY,
        Keycode::PageDown => PAGE_DOWN_KEY,
        Keycode::Insert => INSERT_KEY,
        Keycode::Delete => DELETE_KEY,
        Keycode::Escape => ESCAPE_KEY,
        _ => 0,
    }
}
