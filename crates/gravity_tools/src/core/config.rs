//! # Importer Configuration
//!
//! Configuration structures for the material resolution engine and the import
//! planner built on top of it.
//!
//! ## Configuration Categories
//!
//! - **Importer Config**: version compatibility, world-layer naming, preset database location, batching
//! - **Application Config**: importer settings plus the list of import tasks to plan

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

pub use crate::config::{Config, ConfigError};
use crate::import::ImportTask;

/// Version reported by the importer; manifests must match its major and minor parts
pub const IMPORTER_VERSION: &str = "1.1.0";

/// Name prefix that marks a material as belonging to the primary world layer
pub const DEFAULT_PRIMARY_WORLD_LAYER: &str = "G2_BG_Main";

/// Default import batch size
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// # Importer Configuration
///
/// Settings shared by the manifest parser, the preset resolution and the import planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Version string manifests are checked against (`major.minor.patch`)
    pub version: String,
    /// Name prefix of materials that belong to the primary world layer
    pub primary_world_layer: String,
    /// Location of the material preset database
    pub preset_database_path: PathBuf,
    /// Number of assets processed per import batch
    pub batch_size: usize,
    /// Re-apply materials to already imported meshes instead of reimporting them
    pub patch_assets: bool,
    /// Write extracted parallax maps next to their source normal maps
    pub save_extracted_parallax_maps: bool,
    /// Log level for the importer
    pub log_level: String,
}

impl ImporterConfig {
    /// Create a new importer configuration with defaults
    pub fn new() -> Self {
        Self {
            version: IMPORTER_VERSION.to_string(),
            primary_world_layer: DEFAULT_PRIMARY_WORLD_LAYER.to_string(),
            preset_database_path: PathBuf::from("Content")
                .join("MaterialDatabase")
                .join("MaterialPresetDatabase.json"),
            batch_size: DEFAULT_BATCH_SIZE,
            patch_assets: false,
            save_extracted_parallax_maps: false,
            log_level: "info".to_string(),
        }
    }

    /// Set the importer version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the primary world-layer prefix
    pub fn with_primary_world_layer(mut self, prefix: impl Into<String>) -> Self {
        self.primary_world_layer = prefix.into();
        self
    }

    /// Set the preset database location
    pub fn with_preset_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preset_database_path = path.into();
        self
    }

    /// Set the import batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable patch mode
    pub fn with_patch_assets(mut self, enabled: bool) -> Self {
        self.patch_assets = enabled;
        self
    }

    /// Enable or disable saving extracted parallax maps next to their sources
    pub fn with_save_extracted_parallax_maps(mut self, enabled: bool) -> Self {
        self.save_extracted_parallax_maps = enabled;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts: Vec<&str> = self.version.split('.').collect();
        if parts.len() < 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Importer version '{}' must have the form major.minor[.patch]",
                self.version
            )));
        }

        if self.primary_world_layer.is_empty() {
            return Err(ConfigError::Invalid("Primary world layer prefix cannot be empty".to_string()));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("Batch size must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration read by the import planner application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Importer configuration
    pub importer: ImporterConfig,
    /// Import tasks, one per source asset directory
    pub tasks: Vec<ImportTask>,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.importer.validate()
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ImporterConfig::default();
        assert_eq!(config.version, "1.1.0");
        assert_eq!(config.primary_world_layer, "G2_BG_Main");
        assert_eq!(config.batch_size, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ImporterConfig::new().with_batch_size(0).validate().is_err());
        assert!(ImporterConfig::new().with_version("1").validate().is_err());
        assert!(ImporterConfig::new().with_primary_world_layer("").validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.toml");

        let mut config = ApplicationConfig::default();
        config.importer = config.importer.with_batch_size(4).with_patch_assets(true);
        config.tasks.push(ImportTask::new("/src/meshes/rock_a", "/game/meshes"));

        config.save_to_file(&path).unwrap();
        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.ron");
        std::fs::write(&path, "(importer: (batch_size: 2))").unwrap();

        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.importer.batch_size, 2);
        assert_eq!(loaded.importer.version, IMPORTER_VERSION);
        assert!(loaded.tasks.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("config.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));
    }
}
