//! Parallax height map extraction
//!
//! Exported normal maps carry the parallax height in their alpha channel. The
//! engine wants it as a separate single channel texture.

use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma, RgbaImage};

use super::naming::parallax_map_source_name;
use crate::assets::AssetError;

/// Alpha values at or above this are treated as fully opaque (block compression noise)
pub const OPAQUE_ALPHA_THRESHOLD: u8 = 255 - 8;

/// Single channel height map extracted from a normal map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallaxMap {
    image: GrayImage,
}

impl ParallaxMap {
    /// Extract the height map from the alpha channel of a normal map.
    ///
    /// Returns `None` if the normal map is opaque everywhere, there is no height
    /// data to extract.
    pub fn from_normal_map(normal_map: &RgbaImage) -> Option<Self> {
        let mut is_opaque = true;

        let image = GrayImage::from_fn(normal_map.width(), normal_map.height(), |x, y| {
            let alpha = normal_map.get_pixel(x, y).0[3];
            if alpha >= OPAQUE_ALPHA_THRESHOLD {
                Luma([u8::MAX])
            } else {
                is_opaque = false;
                Luma([alpha])
            }
        });

        if is_opaque {
            None
        } else {
            Some(Self { image })
        }
    }

    /// Load a normal map file and extract its height map
    pub fn from_normal_map_file(path: impl AsRef<Path>) -> Result<Option<Self>, AssetError> {
        let path = path.as_ref();
        log::debug!("Extracting parallax map from: {:?}", path);

        let normal_map = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load normal map {}: {}", path.display(), e)))?
            .to_rgba8();

        let parallax_map = Self::from_normal_map(&normal_map);
        if parallax_map.is_none() {
            log::debug!("The normal map {:?} has no height data", path);
        }
        Ok(parallax_map)
    }

    /// Extract the height map of `<source_dir>/<normal_map_name>.png`.
    ///
    /// With `save` set the map is also written to `<source_dir>/<normal_map_name>_p.png`.
    pub fn extract(source_dir: &Path, normal_map_name: &str, save: bool) -> Result<Option<Self>, AssetError> {
        let Some(parallax_map) = Self::from_normal_map_file(source_dir.join(format!("{normal_map_name}.png")))? else {
            return Ok(None);
        };

        if save {
            let target = Self::source_path(source_dir, normal_map_name);
            if let Err(e) = parallax_map.save_png(&target) {
                log::warn!("Failed to save the extracted parallax map as {:?}: {}", target, e);
            }
        }

        Ok(Some(parallax_map))
    }

    /// Where the extracted height map of a normal map is stored next to its source
    pub fn source_path(source_dir: &Path, normal_map_name: &str) -> PathBuf {
        source_dir.join(format!("{}.png", parallax_map_source_name(normal_map_name)))
    }

    /// Write the height map as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to save parallax map {}: {}", path.display(), e)))?;
        log::info!("Saved parallax map {}x{} to {:?}", self.width(), self.height(), path);
        Ok(())
    }

    /// Width in texels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height values, row major
    pub fn texels(&self) -> &[u8] {
        self.image.as_raw()
    }
}
