pub mod config;
pub mod dispatcher;
pub mod flash;
pub mod input;
pub mod layout;
pub mod sampler;

pub use config::Config;
pub use dispatcher::{FocusKey, NoteDispatcher, NotePlayer};
pub use flash::FlashTracker;
pub use input::GlobalKeyListener;
pub use layout::{PadButton, PadLayout, PadRect};
pub use sampler::SampleBank;
