//! Material deduplication across an import batch
//!
//! Many assets reuse the same material under different names. The registry keeps
//! one item per distinct material so only one material instance is created for
//! all of them. Items are looked up by name first and then by a linear scan over
//! the materials of the same type, comparing content with
//! [`MaterialInfo::is_equivalent`].
//!
//! Materials that are not shareable never match anything: each registration gets
//! its own item.

use std::collections::HashMap;

use super::material_info::MaterialInfo;
use super::material_types::MaterialType;
use crate::assets::naming::sanitize_object_name;
use crate::assets::AssetInfo;

/// Handle to a registry item, valid until the registry is reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialRegistryId(usize);

impl MaterialRegistryId {
    /// Position of the item in registration order
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One distinct material of the batch
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRegistryItem {
    /// Unique asset name, `<sanitized name>_<n>`
    pub material_asset_name: String,
    /// Engine reference of the material instance, empty until resolved
    pub material_asset_reference: String,
    /// Content the item was registered with
    pub material_info: MaterialInfo,
}

/// Registry of the distinct materials of one import batch
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    items: Vec<MaterialRegistryItem>,
    by_name: HashMap<String, Vec<usize>>,
    by_type: HashMap<MaterialType, Vec<usize>>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every registered material
    pub fn reset(&mut self) {
        self.items.clear();
        self.by_name.clear();
        self.by_type.clear();
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in registration order
    pub fn items(&self) -> impl Iterator<Item = (MaterialRegistryId, &MaterialRegistryItem)> {
        self.items.iter().enumerate().map(|(index, item)| (MaterialRegistryId(index), item))
    }

    /// Item by id
    pub fn item(&self, id: MaterialRegistryId) -> Option<&MaterialRegistryItem> {
        self.items.get(id.0)
    }

    /// Mutable item by id
    pub fn item_mut(&mut self, id: MaterialRegistryId) -> Option<&mut MaterialRegistryItem> {
        self.items.get_mut(id.0)
    }

    /// Id of an item equivalent to `material_info`
    pub fn find_material_id(&self, material_info: &MaterialInfo) -> Option<MaterialRegistryId> {
        if !material_info.is_shareable {
            return None;
        }

        let matches = |indices: Option<&Vec<usize>>| {
            indices
                .into_iter()
                .flatten()
                .copied()
                .find(|&index| self.items[index].material_info.is_equivalent(material_info))
        };

        matches(self.by_name.get(&material_info.name))
            .or_else(|| matches(self.by_type.get(&material_info.material_type)))
            .map(MaterialRegistryId)
    }

    /// Item equivalent to `material_info`
    pub fn find_material(&self, material_info: &MaterialInfo) -> Option<&MaterialRegistryItem> {
        self.find_material_id(material_info).and_then(|id| self.item(id))
    }

    /// Mutable item equivalent to `material_info`
    pub fn find_material_mut(&mut self, material_info: &MaterialInfo) -> Option<&mut MaterialRegistryItem> {
        self.find_material_id(material_info).and_then(|id| self.item_mut(id))
    }

    /// Register one material and return the item it resolves to
    pub fn register_material(&mut self, material_info: &MaterialInfo) -> MaterialRegistryId {
        if let Some(id) = self.find_material_id(material_info) {
            return id;
        }

        let index = self.items.len();
        let same_name = self.by_name.entry(material_info.name.clone()).or_default();
        let material_asset_name = format!("{}_{}", sanitize_object_name(&material_info.name), same_name.len());
        same_name.push(index);
        self.by_type.entry(material_info.material_type).or_default().push(index);

        log::debug!("Registered material '{}' as '{}'", material_info.name, material_asset_name);

        self.items.push(MaterialRegistryItem {
            material_asset_name,
            material_asset_reference: String::new(),
            material_info: material_info.clone(),
        });

        MaterialRegistryId(index)
    }

    /// Register every material of an asset.
    ///
    /// Returns the item of each material in the asset's material order.
    pub fn register_asset_materials(&mut self, asset_info: &AssetInfo) -> Vec<MaterialRegistryId> {
        asset_info
            .materials()
            .map(|material_info| self.register_material(material_info))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::{MaterialParameterType, MaterialParameterValue, TextureInfo};

    fn rock(name: &str) -> MaterialInfo {
        let mut material = MaterialInfo::new(name, MaterialType::Standard);
        material.set_parameter(MaterialParameterType::PresetType, MaterialParameterValue::Str("rock".into()));
        let mut albedo = TextureInfo::new("Albedo_Rock");
        albedo.channel = 0;
        material.set_texture_info(albedo);
        material
    }

    fn asset(materials: Vec<MaterialInfo>) -> AssetInfo {
        let mut asset = AssetInfo {
            name: "asset".into(),
            ..AssetInfo::default()
        };
        for material in materials {
            asset.material_infos.insert(material.name.clone(), material);
        }
        asset
    }

    #[test]
    fn test_same_content_different_names_dedupes() {
        let mut registry = MaterialRegistry::new();

        let first = registry.register_asset_materials(&asset(vec![rock("rock_a")]));
        let second = registry.register_asset_materials(&asset(vec![rock("boulder")]));

        assert_eq!(registry.len(), 1);
        assert_eq!(first, second);
        assert_eq!(registry.item(first[0]).unwrap().material_asset_name, "rock_a_0");
        assert_eq!(
            registry.find_material(&rock("pebble")).unwrap().material_asset_name,
            "rock_a_0"
        );
    }

    #[test]
    fn test_same_name_different_content_gets_suffix() {
        let mut registry = MaterialRegistry::new();
        registry.register_material(&rock("rock"));

        let mut wet = rock("rock");
        wet.set_parameter(MaterialParameterType::Roughness0, MaterialParameterValue::Float(0.2));
        let id = registry.register_material(&wet);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.item(id).unwrap().material_asset_name, "rock_1");
        assert_eq!(registry.find_material_id(&wet), Some(id));
    }

    #[test]
    fn test_type_mismatch_is_not_reused() {
        let mut registry = MaterialRegistry::new();
        registry.register_material(&rock("rock"));

        let mut decal = rock("rock");
        decal.material_type = MaterialType::Decal;
        decal.type_string = "DC".into();
        registry.register_material(&decal);

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_non_shareable_materials_are_never_reused() {
        let mut registry = MaterialRegistry::new();

        let mut crystal = MaterialInfo::new("crystal", MaterialType::GravityCrystal);
        let mut glow = TextureInfo::new("Crystal_Glow");
        glow.channel = 0;
        crystal.set_texture_info(glow);
        assert!(!crystal.is_shareable);

        let first = registry.register_material(&crystal);
        let second = registry.register_material(&crystal);

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.item(second).unwrap().material_asset_name, "crystal_1");
        assert!(registry.find_material(&crystal).is_none());
    }

    #[test]
    fn test_sanitized_asset_names() {
        let mut registry = MaterialRegistry::new();
        let id = registry.register_material(&rock("Rock 01.v2"));
        assert_eq!(registry.item(id).unwrap().material_asset_name, "Rock_01_v2_0");
    }

    #[test]
    fn test_reference_is_kept_on_item() {
        let mut registry = MaterialRegistry::new();
        let material = rock("rock");
        registry.register_material(&material);

        registry.find_material_mut(&material).unwrap().material_asset_reference = "ref".into();
        assert_eq!(registry.find_material(&rock("other")).unwrap().material_asset_reference, "ref");
    }

    #[test]
    fn test_reset() {
        let mut registry = MaterialRegistry::new();
        registry.register_material(&rock("rock"));
        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.find_material(&rock("rock")).is_none());

        let id = registry.register_material(&rock("rock"));
        assert_eq!(registry.item(id).unwrap().material_asset_name, "rock_0");
    }
}
