use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Side length in pixels of one palette tile (one texture-array layer)
pub const PALETTE_TILE: u32 = 16;

const BYTES_PER_PIXEL: usize = 4;

/// Reads a WGSL shader source file
pub fn read_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).context(format!("Failed to read shader source: {:?}", path))
}

/// Resolves the shader source for the render pipeline: an override file
/// when one is configured and readable, the built-in source otherwise.
/// A missing or unreadable override is logged and never fatal.
pub fn shader_source_or_builtin(path: Option<&Path>, builtin: &'static str) -> String {
    match path {
        Some(path) => match read_shader_source(path) {
            Ok(source) => {
                println!("Loaded shader override: {:?}", path);
                source
            }
            Err(e) => {
                eprintln!("Warning: {:#}; using built-in shader", e);
                builtin.to_string()
            }
        },
        None => builtin.to_string(),
    }
}

/// A decoded RGBA8 image
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes an encoded image (PNG, JPEG) into tightly packed RGBA8
pub fn decode_rgba(bytes: &[u8]) -> Result<TextureData> {
    let image = image::load_from_memory(bytes).context("Failed to decode image data")?;
    let rgba = image.to_rgba8();
    Ok(TextureData {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Reads and decodes an image file into RGBA8
pub fn load_texture_rgba(path: impl AsRef<Path>) -> Result<TextureData> {
    let path = path.as_ref();
    let bytes = fs::read(path).context(format!("Failed to read texture file: {:?}", path))?;
    decode_rgba(&bytes).context(format!("Failed to decode texture file: {:?}", path))
}

/// A stack of equally sized RGBA8 tiles, ready to upload as the layers
/// of a texture array. Layers whose source image could not be loaded
/// stay zero-filled.
pub struct Palette {
    pub tile: u32,
    pub layers: u32,
    pub pixels: Vec<u8>,
}

impl Palette {
    pub fn layer_bytes(&self) -> usize {
        (self.tile * self.tile) as usize * BYTES_PER_PIXEL
    }
}

/// Loads the palette images, one per layer. Every failure (missing
/// file, undecodable data, wrong dimensions) leaves that layer
/// zero-filled and is logged; the palette itself always succeeds. An
/// empty path list yields a single blank layer so the texture array is
/// never zero-sized.
pub fn load_palette(paths: &[String], tile: u32) -> Palette {
    let layer_bytes = (tile * tile) as usize * BYTES_PER_PIXEL;

    if paths.is_empty() {
        eprintln!("Warning: no palette textures configured; using one blank layer");
        return Palette {
            tile,
            layers: 1,
            pixels: vec![0; layer_bytes],
        };
    }

    let mut pixels = vec![0u8; layer_bytes * paths.len()];
    for (i, path) in paths.iter().enumerate() {
        println!("Loading palette layer {}: {:?}", i, path);
        match load_texture_rgba(path) {
            Ok(texture) if texture.width == tile && texture.height == tile => {
                pixels[i * layer_bytes..(i + 1) * layer_bytes].copy_from_slice(&texture.pixels);
            }
            Ok(texture) => {
                eprintln!(
                    "Warning: palette layer {} is {}x{}, expected {}x{}; leaving it blank",
                    i, texture.width, texture.height, tile, tile
                );
            }
            Err(e) => {
                eprintln!("Warning: {:#}; leaving palette layer {} blank", e, i);
            }
        }
    }

    println!("Palette ready: {} layers of {}x{}", paths.len(), tile, tile);
    Palette {
        tile,
        layers: paths.len() as u32,
        pixels,
    }
}
