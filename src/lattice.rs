use serde::{Deserialize, Serialize};

pub const VERTS_PER_FACE: usize = 6;

/// Lattice extents in voxels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeDims {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl LatticeDims {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Cubic lattice of the given edge length
    pub const fn splat(size: u32) -> Self {
        Self::new(size, size, size)
    }

    /// One slice quad per index, per axis, per facing direction
    pub const fn face_count(&self) -> u32 {
        2 * (self.width + self.height + self.depth)
    }

    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }
}

/// Per-vertex float layout of the generated buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexLayout {
    /// position.xyz + uv
    Uv,
    /// position.xyz + uv + slice layer
    UvLayer,
}

impl VertexLayout {
    pub const fn stride(&self) -> usize {
        match self {
            VertexLayout::Uv => 5,
            VertexLayout::UvLayer => 6,
        }
    }
}

/// Flat vertex buffer for a global lattice: one full cross-section quad
/// per slice index, per axis, per facing direction. Two triangles per
/// quad, no index buffer.
///
/// Slice quads pass through cell centers ((k + 0.5) * voxel_scale along
/// the slice axis) so a fragment can recover its cell with a plain
/// floor(world / voxel_scale). Triangles wind counter-clockwise as seen
/// from the set's facing direction; with back-face culling enabled only
/// the camera-facing set of each axis is rasterized.
#[derive(Debug, Clone)]
pub struct LatticeMesh {
    layout: VertexLayout,
    face_count: u32,
    data: Vec<f32>,
}

impl LatticeMesh {
    pub fn generate(dims: LatticeDims, voxel_scale: f32, layout: VertexLayout) -> Self {
        let face_count = dims.face_count();
        let stride = layout.stride();
        let data = Vec::with_capacity(face_count as usize * VERTS_PER_FACE * stride);

        let mut mesh = Self {
            layout,
            face_count,
            data,
        };

        let (w, h, d) = (
            dims.width as f32,
            dims.height as f32,
            dims.depth as f32,
        );
        let ex = w * voxel_scale;
        let ey = h * voxel_scale;
        let ez = d * voxel_scale;

        // Z slices, negative-facing set first. UVs span the cross
        // section in voxel units so fract(uv) tiles one palette tile
        // per cell.
        for positive in [false, true] {
            for k in 0..dims.depth {
                let z = (k as f32 + 0.5) * voxel_scale;
                mesh.push_quad(
                    [[0.0, 0.0, z], [ex, 0.0, z], [ex, ey, z], [0.0, ey, z]],
                    [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]],
                    k as f32,
                    !positive,
                );
            }
        }

        // X slices
        for positive in [false, true] {
            for i in 0..dims.width {
                let x = (i as f32 + 0.5) * voxel_scale;
                mesh.push_quad(
                    [[x, 0.0, 0.0], [x, 0.0, ez], [x, ey, ez], [x, ey, 0.0]],
                    [[0.0, 0.0], [d, 0.0], [d, h], [0.0, h]],
                    i as f32,
                    positive,
                );
            }
        }

        // Y slices
        for positive in [false, true] {
            for j in 0..dims.height {
                let y = (j as f32 + 0.5) * voxel_scale;
                mesh.push_quad(
                    [[0.0, y, 0.0], [ex, y, 0.0], [ex, y, ez], [0.0, y, ez]],
                    [[0.0, 0.0], [w, 0.0], [w, d], [0.0, d]],
                    j as f32,
                    positive,
                );
            }
        }

        mesh
    }

    /// Emit one quad as two triangles. `flip` reverses the winding so
    /// the quad faces the opposite direction with the same corner/UV
    /// assignment.
    fn push_quad(
        &mut self,
        corners: [[f32; 3]; 4],
        uvs: [[f32; 2]; 4],
        layer: f32,
        flip: bool,
    ) {
        const FORWARD: [usize; VERTS_PER_FACE] = [0, 1, 2, 2, 3, 0];
        const FLIPPED: [usize; VERTS_PER_FACE] = [0, 3, 2, 2, 1, 0];

        let order = if flip { &FLIPPED } else { &FORWARD };
        for &idx in order {
            self.data.extend_from_slice(&corners[idx]);
            self.data.extend_from_slice(&uvs[idx]);
            if self.layout == VertexLayout::UvLayer {
                self.data.push(layer);
            }
        }
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    pub fn vertex_count(&self) -> u32 {
        self.face_count * VERTS_PER_FACE as u32
    }

    /// Size of the buffer as uploaded to the GPU
    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    pub fn floats(&self) -> &[f32] {
        &self.data
    }
}
