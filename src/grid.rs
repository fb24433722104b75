use crate::lattice::LatticeDims;

/// Flat voxel occupancy grid: one byte per cell, 0 = empty, 1 = solid.
///
/// Cells are indexed `x + y*W + z*W*H`, which is exactly the row/slice
/// layout a W x H x D 3D texture upload expects (W bytes per row, H
/// rows per depth slice).
pub struct VoxelGrid {
    pub dims: LatticeDims,
    cells: Vec<u8>,
}

impl VoxelGrid {
    pub fn new(dims: LatticeDims) -> Self {
        Self {
            dims,
            cells: vec![0; dims.cell_count()],
        }
    }

    pub fn cell_index(&self, x: u32, y: u32, z: u32) -> usize {
        let w = self.dims.width as usize;
        let h = self.dims.height as usize;
        x as usize + y as usize * w + z as usize * w * h
    }

    pub fn is_solid(&self, x: u32, y: u32, z: u32) -> bool {
        self.cells[self.cell_index(x, y, z)] != 0
    }

    pub fn set(&mut self, x: u32, y: u32, z: u32, solid: bool) {
        let idx = self.cell_index(x, y, z);
        self.cells[idx] = solid as u8;
    }

    /// Fill every cell with a coin flip from a seeded xorshift stream.
    /// The same seed always reproduces the same grid.
    pub fn fill_noise(&mut self, seed: u32) {
        // xorshift32 never leaves state zero
        let mut state = seed.max(1);
        for cell in &mut self.cells {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            *cell = (state & 1) as u8;
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Consume the grid into the byte layout for a 3D texture upload.
    /// The grid is built once, uploaded once, and dropped here.
    pub fn into_texture_data(self) -> Vec<u8> {
        self.cells
    }
}
