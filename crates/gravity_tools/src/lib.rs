//! # Gravity Tools
//!
//! Material descriptor resolution for exported Gravity assets.
//!
//! ## Features
//!
//! - **Manifest Parsing**: decodes per-asset JSON manifests into typed material descriptions
//! - **Channel Tables**: maps positional parameters and texture slots to semantic channels
//! - **Preset Resolution**: roughness/metallic/specular defaults per world layer and texture
//! - **Deduplication**: one material instance per distinct material across an import batch
//! - **Import Planning**: engine-neutral plans of the meshes, textures and instances to create
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gravity_tools::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImporterConfig::default();
//!     let presets = PresetDatabase::load(&config.preset_database_path)?;
//!
//!     let mut planner = ImportPlanner::new(config, &presets);
//!     let plan = planner.plan(&[ImportTask::new("Export/rock_a", "/Game/Gravity")], &KnownAssets::new());
//!     println!("{} asset(s) to import", plan.asset_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod core;
pub mod foundation;
pub mod import;

/// Common imports for importer users
pub mod prelude {
    pub use crate::{
        assets::{
            AssetError, AssetInfo, ManifestParser, MaterialFlags, MaterialInfo, MaterialParameterPresets,
            MaterialParameterType, MaterialParameterValue, MaterialPresetSource, MaterialPresetType,
            MaterialRegistry, MaterialRegistryItem, MaterialType, PresetDatabase, PresetDatabaseError,
            StandardMaterialParameters, TextureInfo, WorldLayer,
        },
        config::{Config, ConfigError},
        core::config::{ApplicationConfig, ImporterConfig},
        import::{validate_import_directory, AssetCatalog, ImportPlan, ImportPlanner, ImportTask, KnownAssets},
    };
}
