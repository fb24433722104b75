pub mod assets;
pub mod camera;
pub mod cli;
pub mod config;
pub mod frame;
pub mod grid;
pub mod lattice;
pub mod renderer;
pub mod scene;
pub mod types;

pub use camera::Camera;
pub use grid::VoxelGrid;
pub use lattice::{LatticeDims, LatticeMesh, VertexLayout};
