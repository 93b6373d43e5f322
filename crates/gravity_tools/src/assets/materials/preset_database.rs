//! Material preset database
//!
//! Roughness/metallic/specular defaults per world layer and preset type, plus a
//! mapping from texture names to preset types. The database is read once from a
//! JSON document of the form:
//!
//! ```json
//! {
//!     "G2_BG_Main":  { "rock": [0.8, 0.0, 0.5], ... },
//!     "G2_BG_Layer": { "rock": [0.9, 0.0, 0.4], ... },
//!     "G2_TextureMapping": { "albedo_rock": "rock", ... }
//! }
//! ```
//!
//! Loading is all-or-nothing: a missing section, a malformed entry, an unknown
//! name, or a preset type missing from a layer fails the whole load.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Section holding the texture name to preset mapping
pub const TEXTURE_MAPPING_SECTION: &str = "G2_TextureMapping";

/// Named preset family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MaterialPresetType {
    Unknown,
    Rock,
    Glass,
    Moss,
    Metal,
    Metal1,
    Soil,
    Wood,
    Cloth,
    Grass,
    Vinyl,
}

impl MaterialPresetType {
    /// Every known preset type
    pub const ALL: [Self; 10] = [
        Self::Rock,
        Self::Glass,
        Self::Moss,
        Self::Metal,
        Self::Metal1,
        Self::Soil,
        Self::Wood,
        Self::Cloth,
        Self::Grass,
        Self::Vinyl,
    ];

    /// Parse a preset name (case-insensitive). Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "rock" => Self::Rock,
            "glass_1" => Self::Glass,
            "moss" => Self::Moss,
            "metal" => Self::Metal,
            "metal_1" => Self::Metal1,
            "soil" => Self::Soil,
            "wood" => Self::Wood,
            "cloth" => Self::Cloth,
            "grass" => Self::Grass,
            "vinyl" => Self::Vinyl,
            _ => Self::Unknown,
        }
    }

    /// Name used in the database and in manifests
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Glass => "glass_1",
            Self::Moss => "moss",
            Self::Metal => "metal",
            Self::Metal1 => "metal_1",
            Self::Soil => "soil",
            Self::Wood => "wood",
            Self::Cloth => "cloth",
            Self::Grass => "grass",
            Self::Vinyl => "vinyl",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MaterialPresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// World layer a material belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldLayer {
    /// Unrecognized layer name
    Unknown,
    /// Main background layer (`G2_BG_Main`)
    Primary,
    /// Secondary background layer (`G2_BG_Layer`)
    Secondary,
}

impl WorldLayer {
    /// Parse a layer name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "g2_bg_main" => Self::Primary,
            "g2_bg_layer" => Self::Secondary,
            _ => Self::Unknown,
        }
    }

    /// Section name of the layer in the preset database
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primary => "G2_BG_Main",
            Self::Secondary => "G2_BG_Layer",
            Self::Unknown => "Unknown",
        }
    }

    /// Classify a material by its name: primary if it starts with `primary_prefix`
    pub fn for_material(material_name: &str, primary_prefix: &str) -> Self {
        if material_name.starts_with(primary_prefix) {
            Self::Primary
        } else {
            Self::Secondary
        }
    }
}

/// Roughness, metallic and specular defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParameterPresets {
    /// Roughness
    pub roughness: f32,
    /// Metallic
    pub metallic: f32,
    /// Specular
    pub specular: f32,
}

impl MaterialParameterPresets {
    /// Fallback used when a texture has no registered preset
    pub const DEFAULT: Self = Self {
        roughness: 0.7,
        metallic: 0.3,
        specular: 0.0,
    };

    /// Create a preset triple
    pub const fn new(roughness: f32, metallic: f32, specular: f32) -> Self {
        Self { roughness, metallic, specular }
    }
}

impl Default for MaterialParameterPresets {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read-only source of material presets
///
/// Resolution code takes this trait so tests can substitute fixed presets.
pub trait MaterialPresetSource {
    /// Preset for a world layer and preset type
    fn preset(&self, layer: WorldLayer, preset_type: MaterialPresetType) -> &MaterialParameterPresets;

    /// Preset inferred from a texture name, or the default preset
    fn preset_for_texture(&self, layer: WorldLayer, texture_name: &str) -> &MaterialParameterPresets;
}

/// Preset database loading errors
#[derive(Error, Debug)]
pub enum PresetDatabaseError {
    /// The database file could not be read
    #[error("Cannot read the material preset database '{path}': {source}")]
    Io {
        /// Database location
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or an entry has the wrong shape
    #[error("Failed to parse the material preset database: {0}")]
    Json(#[from] serde_json::Error),

    /// A top-level section is missing or not an object
    #[error("The material preset database is missing the section '{0}'")]
    MissingSection(String),

    /// A preset name is not a known preset type
    #[error("The material database contains an invalid entry '{layer}':'{preset}'")]
    UnknownPreset {
        /// Section containing the entry
        layer: String,
        /// Unrecognized preset name
        preset: String,
    },

    /// A known preset type has no entry for a layer
    #[error("The material database has no preset '{preset}' for layer '{layer}'")]
    MissingPreset {
        /// Layer section
        layer: &'static str,
        /// Missing preset type
        preset: MaterialPresetType,
    },
}

/// On-disk layout of the database
#[derive(Deserialize)]
struct PresetDocument {
    #[serde(rename = "G2_BG_Main")]
    primary: Option<PresetLayer>,
    #[serde(rename = "G2_BG_Layer")]
    secondary: Option<PresetLayer>,
    #[serde(rename = "G2_TextureMapping")]
    texture_mapping: Option<IndexMap<String, String>>,
}

/// `[roughness, metallic, specular]` per preset name
#[derive(Deserialize)]
#[serde(transparent)]
struct PresetLayer {
    presets: IndexMap<String, [f32; 3]>,
}

/// Material preset database
#[derive(Debug, Clone)]
pub struct PresetDatabase {
    primary: HashMap<MaterialPresetType, MaterialParameterPresets>,
    secondary: HashMap<MaterialPresetType, MaterialParameterPresets>,
    texture_presets: HashMap<String, MaterialPresetType>,
    default_preset: MaterialParameterPresets,
}

impl PresetDatabase {
    /// Load the database from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetDatabaseError> {
        let path = path.as_ref();
        log::debug!("Loading material preset database from: {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| PresetDatabaseError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let database = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded material preset database with {} texture mapping(s) from {:?}",
            database.texture_presets.len(),
            path
        );
        Ok(database)
    }

    /// Parse the database from a JSON document
    pub fn from_json_str(contents: &str) -> Result<Self, PresetDatabaseError> {
        let document: PresetDocument = serde_json::from_str(contents)?;

        let primary = Self::read_layer(document.primary, WorldLayer::Primary)?;
        let secondary = Self::read_layer(document.secondary, WorldLayer::Secondary)?;
        let texture_presets = Self::read_texture_mapping(document.texture_mapping)?;

        Ok(Self {
            primary,
            secondary,
            texture_presets,
            default_preset: MaterialParameterPresets::DEFAULT,
        })
    }

    fn read_layer(
        section: Option<PresetLayer>,
        layer: WorldLayer,
    ) -> Result<HashMap<MaterialPresetType, MaterialParameterPresets>, PresetDatabaseError> {
        let layer_name = layer.name();
        let section = section.ok_or_else(|| PresetDatabaseError::MissingSection(layer_name.to_string()))?;
        let mut presets = HashMap::with_capacity(section.presets.len());

        for (preset_name, [roughness, metallic, specular]) in section.presets {
            let preset_type = MaterialPresetType::from_name(&preset_name);
            if preset_type == MaterialPresetType::Unknown {
                return Err(PresetDatabaseError::UnknownPreset {
                    layer: layer_name.to_string(),
                    preset: preset_name,
                });
            }

            presets.insert(preset_type, MaterialParameterPresets::new(roughness, metallic, specular));
        }

        // every lookup must succeed once loaded
        if let Some(missing) = MaterialPresetType::ALL.iter().find(|ty| !presets.contains_key(ty)) {
            return Err(PresetDatabaseError::MissingPreset {
                layer: layer_name,
                preset: *missing,
            });
        }

        Ok(presets)
    }

    fn read_texture_mapping(
        section: Option<IndexMap<String, String>>,
    ) -> Result<HashMap<String, MaterialPresetType>, PresetDatabaseError> {
        let section =
            section.ok_or_else(|| PresetDatabaseError::MissingSection(TEXTURE_MAPPING_SECTION.to_string()))?;
        let mut mapping = HashMap::with_capacity(section.len());

        for (texture_name, preset_name) in section {
            let preset_type = MaterialPresetType::from_name(&preset_name);
            if preset_type == MaterialPresetType::Unknown {
                return Err(PresetDatabaseError::UnknownPreset {
                    layer: TEXTURE_MAPPING_SECTION.to_string(),
                    preset: preset_name,
                });
            }

            // lookups are lower-case
            mapping.insert(texture_name.to_lowercase(), preset_type);
        }

        Ok(mapping)
    }

    /// Preset selected by layer and preset name
    pub fn preset_by_name(&self, layer: WorldLayer, preset_name: &str) -> &MaterialParameterPresets {
        self.preset(layer, MaterialPresetType::from_name(preset_name))
    }

    /// Preset type registered for a texture
    pub fn texture_preset_type(&self, texture_name: &str) -> Option<MaterialPresetType> {
        self.texture_presets.get(&texture_name.to_lowercase()).copied()
    }

    /// Fallback preset
    pub const fn default_preset(&self) -> &MaterialParameterPresets {
        &self.default_preset
    }
}

impl MaterialPresetSource for PresetDatabase {
    fn preset(&self, layer: WorldLayer, preset_type: MaterialPresetType) -> &MaterialParameterPresets {
        let presets = match layer {
            WorldLayer::Primary => &self.primary,
            WorldLayer::Secondary | WorldLayer::Unknown => &self.secondary,
        };

        presets.get(&preset_type).unwrap_or_else(|| {
            log::warn!("No '{}' preset for layer '{}'. Using the default preset.", preset_type, layer.name());
            &self.default_preset
        })
    }

    fn preset_for_texture(&self, layer: WorldLayer, texture_name: &str) -> &MaterialParameterPresets {
        match self.texture_preset_type(texture_name) {
            Some(preset_type) => self.preset(layer, preset_type),
            None => &self.default_preset,
        }
    }
}
