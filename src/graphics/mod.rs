pub mod state;
pub mod uniforms;
pub mod vertex;

pub use state::State;
pub use uniforms::{Globals, PadStates, MAX_PADS};
pub use vertex::{Vertex, generate_pad_vertices};
