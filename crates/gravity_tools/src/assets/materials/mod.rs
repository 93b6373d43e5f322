//! Material decoding and resolution
//!
//! Decodes exported material descriptions into [`MaterialInfo`] values, resolves
//! presets and deduplicates materials across an import batch.

pub mod channel_tables;
pub mod material_info;
pub mod material_registry;
pub mod material_types;
pub mod preset_database;
pub mod standard_resolver;

pub use material_info::{MaterialInfo, MaterialParameterValue, TextureInfo};
pub use material_registry::{MaterialRegistry, MaterialRegistryId, MaterialRegistryItem};
pub use material_types::{MaterialFlags, MaterialParameterType, MaterialType, TextureAddressMode};
pub use preset_database::{
    MaterialParameterPresets, MaterialPresetSource, MaterialPresetType, PresetDatabase, PresetDatabaseError,
    WorldLayer,
};
pub use standard_resolver::{StandardLayerParameters, StandardMaterialParameters};
