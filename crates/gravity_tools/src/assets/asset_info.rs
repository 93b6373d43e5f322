//! Parsed description of one exported asset

use std::path::PathBuf;

use indexmap::IndexMap;

use super::materials::MaterialInfo;

/// Meshes and materials of one asset directory
///
/// Built once by the [`ManifestParser`](super::ManifestParser) and not modified
/// afterwards. Materials keep the order in which the manifest lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetInfo {
    /// Asset name (the directory name)
    pub name: String,
    /// Path of the `<name>.fbx` mesh source
    pub source_file_path: PathBuf,
    /// Mesh names in manifest order
    pub mesh_names: Vec<String>,
    /// Materials keyed by their resolved name
    pub material_infos: IndexMap<String, MaterialInfo>,
}

impl AssetInfo {
    /// Material by resolved name
    pub fn material(&self, name: &str) -> Option<&MaterialInfo> {
        self.material_infos.get(name)
    }

    /// Iterate over materials in manifest order
    pub fn materials(&self) -> impl Iterator<Item = &MaterialInfo> {
        self.material_infos.values()
    }
}
