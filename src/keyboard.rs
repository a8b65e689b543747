use minifb::Key;

/// Host-supplied "is this hex key held" predicate.
pub trait Keypad {
    fn is_key_down(&self, key: u8) -> bool;
}

/// Snapshot of the 16-key hex keypad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    keys: [bool; 16],
}

impl KeyState {
    pub const fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
    }

    pub fn press(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = false;
        }
    }

    pub fn update_key(&mut self, key: &Key) {
        if let Some(num) = key_to_num(*key) {
            self.press(num);
        }
    }
}

impl Keypad for KeyState {
    fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }
}

/// Whether instruction fetch is suspended by FX0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    #[default]
    Running,
    /// register that receives the next delivered key
    AwaitingInput(u8),
}

impl InputState {
    /// Completes a wait. Keys outside 0..=F are ignored; returns the
    /// target register and the key to write into it.
    pub fn deliver(&mut self, key: u8) -> Option<(u8, u8)> {
        match *self {
            Self::AwaitingInput(reg) if key <= 0xF => {
                *self = Self::Running;
                Some((reg, key))
            }
            _ => None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::AwaitingInput(_))
    }
}

/// Left-hand block of a QWERTY keyboard laid out like the COSMAC keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_every_hex_digit() {
        #[rustfmt::skip]
        let keys = [
            Key::Key1, Key::Key2, Key::Key3, Key::Key4,
            Key::Q, Key::W, Key::E, Key::R,
            Key::A, Key::S, Key::D, Key::F,
            Key::Z, Key::X, Key::C, Key::V,
        ];
        let mut seen: Vec<u8> = keys.iter().filter_map(|k| key_to_num(*k)).collect();
        seen.sort();
        assert_eq!(seen, (0..16).collect::<Vec<u8>>());
        assert_eq!(key_to_num(Key::Escape), None);
    }

    #[test]
    fn test_key_state() {
        let mut keys = KeyState::new();
        keys.update_key(&Key::V);
        keys.press(0x3);
        assert!(keys.is_key_down(0xF));
        assert!(keys.is_key_down(0x3));
        assert!(!keys.is_key_down(0x4));
        assert!(!keys.is_key_down(0x10));
        keys.release(0x3);
        assert!(!keys.is_key_down(0x3));
        keys.reset();
        assert!(!keys.is_key_down(0xF));
    }

    #[test]
    fn test_deliver_only_completes_waits() {
        let mut state = InputState::Running;
        assert_eq!(state.deliver(4), None);

        state = InputState::AwaitingInput(0xA);
        assert_eq!(state.deliver(0x10), None);
        assert!(state.is_waiting());
        assert_eq!(state.deliver(0xB), Some((0xA, 0xB)));
        assert_eq!(state, InputState::Running);
    }
}
