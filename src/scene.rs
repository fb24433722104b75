use crate::config::DemoConfig;
use crate::grid::VoxelGrid;
use crate::lattice::LatticeMesh;

/// Everything the renderer needs that is derived from configuration:
/// the slice mesh, the occupancy grid, and the palette image paths.
pub struct Scene {
    pub mesh: LatticeMesh,
    pub grid: VoxelGrid,
    pub palette_paths: Vec<String>,
    pub voxel_scale: f32,
}

impl Scene {
    /// Builds the mesh and grid described by the configuration
    pub fn build(config: &DemoConfig) -> Self {
        let dims = config.lattice.dims();
        let voxel_scale = config.lattice.voxel_scale;

        let mesh = LatticeMesh::generate(dims, voxel_scale, config.lattice.layout);
        println!(
            "Lattice mesh: {}x{}x{} cells, {} cross-section faces, {} vertices ({} bytes)",
            dims.width,
            dims.height,
            dims.depth,
            mesh.face_count(),
            mesh.vertex_count(),
            mesh.byte_len()
        );

        let mut grid = VoxelGrid::new(dims);
        grid.fill_noise(config.lattice.fill_seed);
        println!(
            "Voxel grid: {} of {} cells solid (seed {})",
            grid.solid_count(),
            grid.cell_count(),
            config.lattice.fill_seed
        );

        Self {
            mesh,
            grid,
            palette_paths: config.textures.clone(),
            voxel_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::VertexLayout;

    #[test]
    fn build_respects_lattice_settings() {
        let mut config = DemoConfig::default();
        config.lattice.width = 4;
        config.lattice.height = 2;
        config.lattice.depth = 3;
        config.lattice.layout = VertexLayout::Uv;

        let scene = Scene::build(&config);
        assert_eq!(scene.mesh.face_count(), 2 * (4 + 2 + 3));
        assert_eq!(scene.grid.dims, config.lattice.dims());
        assert_eq!(scene.palette_paths.len(), 3);
    }

    #[test]
    fn build_is_deterministic_for_a_seed() {
        let config = DemoConfig::default();
        let a = Scene::build(&config);
        let b = Scene::build(&config);
        assert_eq!(a.grid.solid_count(), b.grid.solid_count());
        assert_eq!(a.mesh.floats(), b.mesh.floats());
    }
}
