//! Import planning
//!
//! Decides what the engine side of the importer has to do for a batch of asset
//! directories: which meshes to import, which material instances and textures to
//! create and how to parameterize them. No engine work happens here.

pub mod planner;

pub use planner::{
    AssetImportPlan, ImportMode, ImportPlan, ImportPlanner, MaterialSlotPlan, ParallaxBinding, SkippedAsset,
    TextureBinding,
};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{ManifestParser, MANIFEST_EXTENSION, MESH_SOURCE_EXTENSION};

/// Source and destination directories of one asset import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportTask {
    /// Asset directory holding `<name>.fbx` and `<name>.json`
    pub source_mesh_dir: PathBuf,
    /// Directory holding the source textures
    pub source_texture_dir: PathBuf,
    /// Content directory of the base materials
    pub base_material_dir: String,
    /// Content directory receiving the meshes
    pub output_mesh_dir: String,
    /// Content directory receiving the textures
    pub output_texture_dir: String,
    /// Content directory receiving the material instances
    pub output_material_dir: String,
}

impl ImportTask {
    /// Create a task with textures next to the meshes and all outputs below `content_root`
    pub fn new(source_mesh_dir: impl Into<PathBuf>, content_root: &str) -> Self {
        let source_mesh_dir = source_mesh_dir.into();
        let content_root = content_root.trim_end_matches('/');

        Self {
            source_texture_dir: source_mesh_dir.clone(),
            source_mesh_dir,
            base_material_dir: format!("{content_root}/BaseMaterials"),
            output_mesh_dir: format!("{content_root}/Meshes"),
            output_texture_dir: format!("{content_root}/Textures"),
            output_material_dir: format!("{content_root}/Materials"),
        }
    }

    /// Set the source texture directory
    pub fn with_source_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_texture_dir = dir.into();
        self
    }

    /// Set the base material directory
    pub fn with_base_material_dir(mut self, dir: impl Into<String>) -> Self {
        self.base_material_dir = dir.into();
        self
    }

    /// Set the mesh output directory
    pub fn with_output_mesh_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_mesh_dir = dir.into();
        self
    }

    /// Set the texture output directory
    pub fn with_output_texture_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_texture_dir = dir.into();
        self
    }

    /// Set the material instance output directory
    pub fn with_output_material_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_material_dir = dir.into();
        self
    }
}

/// Reasons an import directory cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportDirectoryError {
    /// No path given
    #[error("Path to the import directory is invalid")]
    EmptyPath,

    /// The directory does not exist
    #[error("The import directory '{0}' does not exist")]
    DirectoryNotFound(PathBuf),

    /// The mesh source is missing
    #[error("The asset directory '{directory}' is missing a '{asset}.fbx' file")]
    MissingMeshSource {
        /// Asset directory
        directory: PathBuf,
        /// Asset name
        asset: String,
    },

    /// The manifest is missing
    #[error("The asset directory '{directory}' must contain a '{asset}.json' file")]
    MissingManifest {
        /// Asset directory
        directory: PathBuf,
        /// Asset name
        asset: String,
    },
}

/// Check that `directory` is an asset directory
pub fn validate_import_directory(directory: &Path) -> Result<(), ImportDirectoryError> {
    if directory.as_os_str().is_empty() {
        return Err(ImportDirectoryError::EmptyPath);
    }

    if !directory.is_dir() {
        return Err(ImportDirectoryError::DirectoryNotFound(directory.to_path_buf()));
    }

    let asset = ManifestParser::asset_name(directory);

    if !directory.join(format!("{asset}.{MESH_SOURCE_EXTENSION}")).is_file() {
        return Err(ImportDirectoryError::MissingMeshSource {
            directory: directory.to_path_buf(),
            asset,
        });
    }

    if !directory.join(format!("{asset}.{MANIFEST_EXTENSION}")).is_file() {
        return Err(ImportDirectoryError::MissingManifest {
            directory: directory.to_path_buf(),
            asset,
        });
    }

    Ok(())
}

/// Query for engine assets that already exist
pub trait AssetCatalog {
    /// True if the asset behind `reference` exists
    fn asset_exists(&self, reference: &str) -> bool;
}

/// In-memory [`AssetCatalog`]
///
/// Engine references are case-insensitive, so lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct KnownAssets {
    references: HashSet<String>,
}

impl KnownAssets {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an existing asset
    pub fn insert(&mut self, reference: impl AsRef<str>) {
        self.references.insert(reference.as_ref().to_lowercase());
    }

    /// Number of known assets
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// True if no asset is known
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownAssets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for reference in iter {
            catalog.insert(reference);
        }
        catalog
    }
}

impl AssetCatalog for KnownAssets {
    fn asset_exists(&self, reference: &str) -> bool {
        self.references.contains(&reference.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_defaults() {
        let task = ImportTask::new("/src/meshes/rock_a", "/Game/Gravity/");
        assert_eq!(task.source_texture_dir, PathBuf::from("/src/meshes/rock_a"));
        assert_eq!(task.output_mesh_dir, "/Game/Gravity/Meshes");
        assert_eq!(task.base_material_dir, "/Game/Gravity/BaseMaterials");

        let task = task.with_output_material_dir("/Game/Shared/Materials");
        assert_eq!(task.output_material_dir, "/Game/Shared/Materials");
    }

    #[test]
    fn test_validate_import_directory() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("rock_a");

        assert_eq!(validate_import_directory(Path::new("")), Err(ImportDirectoryError::EmptyPath));
        assert_eq!(
            validate_import_directory(&directory),
            Err(ImportDirectoryError::DirectoryNotFound(directory.clone()))
        );

        std::fs::create_dir(&directory).unwrap();
        assert!(matches!(
            validate_import_directory(&directory),
            Err(ImportDirectoryError::MissingMeshSource { asset, .. }) if asset == "rock_a"
        ));

        std::fs::write(directory.join("rock_a.fbx"), b"").unwrap();
        assert!(matches!(
            validate_import_directory(&directory),
            Err(ImportDirectoryError::MissingManifest { .. })
        ));

        std::fs::write(directory.join("rock_a.json"), b"{}").unwrap();
        assert!(validate_import_directory(&directory).is_ok());
    }

    #[test]
    fn test_known_assets_ignore_case() {
        let catalog: KnownAssets = ["StaticMesh'/Game/Meshes/SM_a.SM_a'"].into_iter().collect();
        assert!(catalog.asset_exists("staticmesh'/game/meshes/sm_a.sm_a'"));
        assert!(!catalog.asset_exists("StaticMesh'/Game/Meshes/SM_b.SM_b'"));
        assert_eq!(catalog.len(), 1);
    }
}
