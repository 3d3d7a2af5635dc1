use bytemuck;

/// Uniform array capacity; boards larger than this render their first
/// `MAX_PADS` pads.
pub const MAX_PADS: usize = 64;

/// Per-pad render state streamed to the shader each frame:
/// x = flash intensity in [0, 1], y = focus highlight, z/w reserved.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PadStates {
    pub states: [[f32; 4]; MAX_PADS],
}

impl PadStates {
    pub fn new() -> Self {
        PadStates {
            states: [[0.0; 4]; MAX_PADS],
        }
    }
}

impl Default for PadStates {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub time: f32,
    pub pad_count: u32,
}
