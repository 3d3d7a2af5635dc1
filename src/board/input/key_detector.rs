use std::collections::HashSet;

use device_query::{DeviceQuery, DeviceState, Keycode};

/// Edge-detecting view over the keyboard. Presses and releases are
/// transitions between successive `update_keys` snapshots, so a held key is
/// reported exactly once no matter how long it stays down.
pub trait KeyDetector {
    fn update_keys(&mut self);
    fn get_pressed_keys(&self) -> Vec<Keycode>;
    fn get_released_keys(&self) -> Vec<Keycode>;
}

pub struct DeviceStateKeyDetector {
    device_state: DeviceState,
    keys: HashSet<Keycode>,
    prev_keys: HashSet<Keycode>,
}

impl DeviceStateKeyDetector {
    pub fn new() -> Self {
        let device_state = DeviceState::new();
        // Seeding with the current snapshot means keys already held at
        // startup never produce a press edge.
        let keys = device_state.get_keys().into_iter().collect();
        Self {
            device_state,
            keys,
            prev_keys: HashSet::new(),
        }
    }
}

impl Default for DeviceStateKeyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDetector for DeviceStateKeyDetector {
    fn update_keys(&mut self) {
        self.prev_keys = self.keys.clone();
        self.keys = self.device_state.get_keys().into_iter().collect();
    }

    fn get_pressed_keys(&self) -> Vec<Keycode> {
        self.keys.difference(&self.prev_keys).cloned().collect()
    }

    fn get_released_keys(&self) -> Vec<Keycode> {
        self.prev_keys.difference(&self.keys).cloned().collect()
    }
}

/// Maps a detected keycode to the lowercase character the pad key bindings
/// use. Keys with no character binding map to `None`.
pub fn keycode_to_char(key: Keycode) -> Option<char> {
    let ch = match key {
        Keycode::A => 'a',
        Keycode::B => 'b',
        Keycode::C => 'c',
        Keycode::D => 'd',
        Keycode::E => 'e',
        Keycode::F => 'f',
        Keycode::G => 'g',
        Keycode::H => 'h',
        Keycode::I => 'i',
        Keycode::J => 'j',
        Keycode::K => 'k',
        Keycode::L => 'l',
        Keycode::M => 'm',
        Keycode::N => 'n',
        Keycode::O => 'o',
        Keycode::P => 'p',
        Keycode::Q => 'q',
        Keycode::R => 'r',
        Keycode::S => 's',
        Keycode::T => 't',
        Keycode::U => 'u',
        Keycode::V => 'v',
        Keycode::W => 'w',
        Keycode::X => 'x',
        Keycode::Y => 'y',
        Keycode::Z => 'z',
        Keycode::Key0 => '0',
        Keycode::Key1 => '1',
        Keycode::Key2 => '2',
        Keycode::Key3 => '3',
        Keycode::Key4 => '4',
        Keycode::Key5 => '5',
        Keycode::Key6 => '6',
        Keycode::Key7 => '7',
        Keycode::Key8 => '8',
        Keycode::Key9 => '9',
        _ => return None,
    };
    Some(ch)
}
