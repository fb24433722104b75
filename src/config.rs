use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FOV_DEGREES, DEFAULT_SENSITIVITY, DEFAULT_SPEED};
use crate::lattice::{LatticeDims, VertexLayout};

/// Demo configuration, loadable from a JSON file. Every field has a
/// default so a partial (or absent) file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub lattice: LatticeSettings,
    pub camera: CameraSettings,
    /// Palette image paths, one 16x16 tile per texture-array layer
    pub textures: Vec<String>,
    /// Optional WGSL source override; the built-in shader is used when
    /// absent or unreadable
    pub shader: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            lattice: LatticeSettings::default(),
            camera: CameraSettings::default(),
            textures: default_texture_paths(),
            shader: None,
        }
    }
}

impl DemoConfig {
    /// Load from a JSON file; no path means defaults. An explicitly
    /// named file that cannot be read or parsed is an error, not a
    /// silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {:?}", path))?;
                let config = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {:?}", path))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeSettings {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub voxel_scale: f32,
    pub layout: VertexLayout,
    pub fill_seed: u32,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            depth: 16,
            voxel_scale: 1.0,
            layout: VertexLayout::UvLayer,
            fill_seed: 1,
        }
    }
}

impl LatticeSettings {
    pub fn dims(&self) -> LatticeDims {
        LatticeDims::new(self.width, self.height, self.depth)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -5.0],
            yaw: 90.0,
            pitch: 0.0,
            fov_degrees: DEFAULT_FOV_DEGREES,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl CameraSettings {
    pub fn to_camera(&self) -> Camera {
        let mut camera = Camera::new();
        camera.position = Vec3::from(self.position);
        camera.yaw = self.yaw;
        camera.pitch = self.pitch;
        camera.fov_degrees = self.fov_degrees;
        camera.speed = self.speed;
        camera.sensitivity = self.sensitivity;
        camera
    }
}

pub fn default_texture_paths() -> Vec<String> {
    vec![
        "resources/cobblestone.png".to_string(),
        "resources/stone.png".to_string(),
        "resources/oak_log.png".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: DemoConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.lattice.width, 16);
        assert_eq!(config.lattice.height, 16);
        assert_eq!(config.lattice.depth, 16);
        assert_eq!(config.lattice.voxel_scale, 1.0);
        assert_eq!(config.lattice.layout, VertexLayout::UvLayer);
        assert_eq!(config.camera.fov_degrees, DEFAULT_FOV_DEGREES);
        assert_eq!(config.textures.len(), 3);
        assert!(config.shader.is_none());
    }

    #[test]
    fn partial_object_overrides_named_fields_only() {
        let config: DemoConfig =
            serde_json::from_str(r#"{"lattice": {"width": 32, "layout": "uv"}}"#).unwrap();

        assert_eq!(config.lattice.width, 32);
        assert_eq!(config.lattice.layout, VertexLayout::Uv);
        // Untouched fields keep their defaults
        assert_eq!(config.lattice.height, 16);
        assert_eq!(config.lattice.voxel_scale, 1.0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result: Result<DemoConfig, _> = serde_json::from_str("{not json");
        assert!(result.is_err());
    }

    #[test]
    fn camera_settings_build_a_camera() {
        let settings = CameraSettings {
            position: [1.0, 2.0, 3.0],
            yaw: 45.0,
            pitch: -10.0,
            speed: 4.0,
            ..CameraSettings::default()
        };

        let camera = settings.to_camera();
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.yaw, 45.0);
        assert_eq!(camera.pitch, -10.0);
        assert_eq!(camera.speed, 4.0);
        assert_eq!(camera.fov_degrees, DEFAULT_FOV_DEGREES);
    }

    #[test]
    fn missing_path_loads_defaults() {
        let config = DemoConfig::load(None).unwrap();
        assert_eq!(config.lattice.dims(), LatticeDims::splat(16));
    }

    #[test]
    fn nonexistent_file_is_an_error() {
        let result = DemoConfig::load(Some(Path::new("/definitely/not/here.json")));
        assert!(result.is_err());
    }
}
