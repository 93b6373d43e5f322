//! Asset manifests, naming and texture processing
//!
//! Everything needed to turn an exported asset directory into an engine-neutral
//! description of its meshes and materials.

pub mod asset_info;
pub mod manifest_parser;
pub mod materials;
pub mod naming;
pub mod parallax_map;

pub use asset_info::AssetInfo;
pub use manifest_parser::{ManifestParser, MANIFEST_EXTENSION, MESH_SOURCE_EXTENSION};
pub use materials::{
    MaterialFlags, MaterialInfo, MaterialParameterPresets, MaterialParameterType, MaterialParameterValue,
    MaterialPresetSource, MaterialPresetType, MaterialRegistry, MaterialRegistryId, MaterialRegistryItem, MaterialType,
    PresetDatabase, PresetDatabaseError, StandardMaterialParameters, TextureAddressMode, TextureInfo, WorldLayer,
};
pub use parallax_map::ParallaxMap;

#[cfg(test)]
mod tests;

use thiserror::Error;

/// Errors that reject a whole asset
///
/// No partially parsed asset is ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum AssetError {
    /// A required file is missing
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load or save an image
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// IO error while reading the manifest
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The manifest is not valid JSON
    #[error("Failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// A required manifest field is missing or has the wrong type
    #[error("The manifest must contain the field '{0}'")]
    MissingField(&'static str),

    /// The manifest version is malformed
    #[error("The version number '{0}' of the asset is invalid")]
    InvalidVersion(String),

    /// The manifest was written by an incompatible exporter
    #[error("Asset with version '{found}' is not supported by the importer '{expected}'")]
    UnsupportedVersion {
        /// Version found in the manifest
        found: String,
        /// Version of the importer
        expected: String,
    },

    /// A material key resolves to an empty name
    #[error("The asset has a material with no name (key '{0}')")]
    EmptyMaterialName(String),

    /// A material entry is malformed
    #[error("The material '{material}' is invalid: {reason}")]
    InvalidMaterial {
        /// Material name
        material: String,
        /// What is wrong with it
        reason: String,
    },

    /// A texture key does not follow the `Texture<N>` pattern
    #[error("The material '{material}' has an illformated texture key '{key}'")]
    InvalidTextureKey {
        /// Material name
        material: String,
        /// Offending key
        key: String,
    },

    /// A texture entry is malformed
    #[error("The material '{material}' has an illformated texture '{texture}': {reason}")]
    InvalidTexture {
        /// Material name
        material: String,
        /// Texture key
        texture: String,
        /// What is wrong with it
        reason: String,
    },
}
