use crate::board::layout::PadLayout;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 2],
    pad_index: u32,
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

// Two triangles per pad. Layout rects are normalized with the origin at the
// top left; clip space has y pointing up, so rows flip here.
pub fn generate_pad_vertices(layout: &PadLayout) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(layout.len() * 6);
    for pad in layout.iter() {
        let pad_index = pad.index as u32;
        let left = pad.rect.x * 2.0 - 1.0;
        let right = (pad.rect.x + pad.rect.width) * 2.0 - 1.0;
        let top = 1.0 - pad.rect.y * 2.0;
        let bottom = 1.0 - (pad.rect.y + pad.rect.height) * 2.0;
        let corners = [
            [left, top],
            [left, bottom],
            [right, bottom],
            [left, top],
            [right, bottom],
            [right, top],
        ];
        for position in corners {
            vertices.push(Vertex {
                position,
                pad_index,
            });
        }
    }
    vertices
}
