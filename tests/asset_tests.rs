use std::fs;
use std::path::{Path, PathBuf};

use voxel_lattice::assets::{
    decode_rgba, load_palette, read_shader_source, shader_source_or_builtin, PALETTE_TILE,
};

/// Writes a solid-color PNG into the system temp directory
fn temp_png(name: &str, width: u32, height: u32) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "voxel_lattice_test_{}_{}",
        std::process::id(),
        name
    ));
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

#[cfg(test)]
mod shader_tests {
    use super::*;

    #[test]
    fn test_missing_shader_file_is_an_error() {
        let result = read_shader_source("/definitely/not/here.wgsl");
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("Failed to read shader source"),
            "Error should name the failed read, got: {}",
            err
        );
    }

    #[test]
    fn test_no_override_uses_the_builtin_source() {
        let source = shader_source_or_builtin(None, "builtin source");
        assert_eq!(source, "builtin source");
    }

    #[test]
    fn test_unreadable_override_falls_back_to_the_builtin() {
        let missing = Path::new("/definitely/not/here.wgsl");
        let source = shader_source_or_builtin(Some(missing), "builtin source");
        assert_eq!(source, "builtin source", "A bad override must never be fatal");
    }

    #[test]
    fn test_readable_override_wins() {
        let path = std::env::temp_dir().join(format!(
            "voxel_lattice_test_{}_override.wgsl",
            std::process::id()
        ));
        fs::write(&path, "@fragment fn fs_main() {}").unwrap();

        let source = shader_source_or_builtin(Some(path.as_path()), "builtin source");
        assert_eq!(source, "@fragment fn fs_main() {}");

        let _ = fs::remove_file(&path);
    }
}

#[cfg(test)]
mod decode_tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(decode_rgba(b"this is not an image").is_err());
    }

    #[test]
    fn test_png_bytes_decode_to_rgba() {
        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let texture = decode_rgba(&bytes).unwrap();
        assert_eq!(texture.width, 16);
        assert_eq!(texture.height, 16);
        assert_eq!(texture.pixels.len(), 16 * 16 * 4);
        assert_eq!(&texture.pixels[0..4], &[10, 20, 30, 255]);
    }
}

#[cfg(test)]
mod palette_tests {
    use super::*;

    const LAYER_BYTES: usize = (PALETTE_TILE * PALETTE_TILE) as usize * 4;

    #[test]
    fn test_missing_files_yield_blank_layers() {
        let paths = vec![
            "/definitely/not/here/a.png".to_string(),
            "/definitely/not/here/b.png".to_string(),
        ];

        let palette = load_palette(&paths, PALETTE_TILE);
        assert_eq!(palette.layers, 2, "One layer per configured path, loadable or not");
        assert_eq!(palette.pixels.len(), 2 * LAYER_BYTES);
        assert!(
            palette.pixels.iter().all(|&b| b == 0),
            "Unloadable layers stay zero-filled"
        );
    }

    #[test]
    fn test_empty_path_list_yields_one_blank_layer() {
        let palette = load_palette(&[], PALETTE_TILE);
        assert_eq!(palette.layers, 1, "A texture array needs at least one layer");
        assert_eq!(palette.pixels.len(), LAYER_BYTES);
        assert_eq!(palette.layer_bytes(), LAYER_BYTES);
        assert!(palette.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_loaded_layer_carries_its_pixels() {
        let good = temp_png("palette_good.png", PALETTE_TILE, PALETTE_TILE);
        let paths = vec![
            good.to_string_lossy().into_owned(),
            "/definitely/not/here.png".to_string(),
        ];

        let palette = load_palette(&paths, PALETTE_TILE);
        assert_eq!(palette.layers, 2);
        assert_eq!(&palette.pixels[0..4], &[10, 20, 30, 255], "First layer is the image");
        assert!(
            palette.pixels[LAYER_BYTES..].iter().all(|&b| b == 0),
            "Second layer stays blank"
        );

        let _ = fs::remove_file(&good);
    }

    #[test]
    fn test_wrong_size_image_stays_blank() {
        let small = temp_png("palette_small.png", 8, 8);
        let paths = vec![small.to_string_lossy().into_owned()];

        let palette = load_palette(&paths, PALETTE_TILE);
        assert_eq!(palette.layers, 1);
        assert!(
            palette.pixels.iter().all(|&b| b == 0),
            "A tile with the wrong dimensions is rejected, not stretched"
        );

        let _ = fs::remove_file(&small);
    }
}
