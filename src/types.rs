use glam::Mat4;

use crate::lattice::{LatticeDims, VertexLayout};

/// Lattice uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LatticeUniform {
    pub view_proj: [[f32; 4]; 4],
    pub grid_dims: [f32; 3],
    pub voxel_scale: f32,
    pub palette_layers: f32,
    pub _pad: [f32; 3],
}

impl LatticeUniform {
    pub fn new(
        view_proj: Mat4,
        dims: LatticeDims,
        voxel_scale: f32,
        palette_layers: u32,
    ) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            grid_dims: [dims.width as f32, dims.height as f32, dims.depth as f32],
            voxel_scale,
            palette_layers: palette_layers as f32,
            _pad: [0.0; 3],
        }
    }
}

/// Vertex buffer description matching the generator's interleaved
/// float layout
pub fn lattice_vertex_layout(layout: VertexLayout) -> wgpu::VertexBufferLayout<'static> {
    static UV: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
    static UV_LAYER: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32];

    let attributes: &'static [wgpu::VertexAttribute] = match layout {
        VertexLayout::Uv => &UV,
        VertexLayout::UvLayer => &UV_LAYER,
    };

    wgpu::VertexBufferLayout {
        array_stride: (layout.stride() * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}
