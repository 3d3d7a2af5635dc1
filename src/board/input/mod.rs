pub mod global_listener;
pub mod key_detector;

pub use global_listener::GlobalKeyListener;
pub use key_detector::{keycode_to_char, DeviceStateKeyDetector, KeyDetector};
