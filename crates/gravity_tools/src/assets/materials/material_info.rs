//! Decoded material description
//!
//! [`MaterialInfo`] is the engine-independent result of decoding one manifest
//! material entry: its type, flags, semantic parameters and texture channels.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::channel_tables::UNASSIGNED_CHANNEL;
use super::material_types::{MaterialFlags, MaterialParameterType, MaterialType, TextureAddressMode};
use crate::foundation::math::Vec2;

/// A decoded parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialParameterValue {
    /// Numeric parameter
    Float(f32),
    /// String parameter (e.g. a preset tag)
    Str(String),
}

impl MaterialParameterValue {
    /// The float value, if this is a float parameter
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// The string value, if this is a string parameter
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Float(_) => None,
            Self::Str(value) => Some(value.as_str()),
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for MaterialParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "\"{value}\""),
        }
    }
}

/// A texture bound to a semantic material channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Source texture name (without extension)
    pub name: String,
    /// Semantic channel, [`UNASSIGNED_CHANNEL`] until resolved
    pub channel: i32,
    /// Whether the channel expects a normal map
    pub is_normal_map: bool,
    /// Address mode along U
    pub address_x: TextureAddressMode,
    /// Address mode along V
    pub address_y: TextureAddressMode,
    /// Atlas UV offset
    pub uv_offset: Vec2,
    /// Atlas UV scale
    pub uv_scale: Vec2,
    /// Raw per-texture values from the manifest, not used for rendering
    pub parameters: [f32; 3],
}

impl TextureInfo {
    /// Create an unassigned texture record with a unit UV transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: UNASSIGNED_CHANNEL,
            is_normal_map: false,
            address_x: TextureAddressMode::Wrap,
            address_y: TextureAddressMode::Wrap,
            uv_offset: Vec2::zeros(),
            uv_scale: Vec2::new(1.0, 1.0),
            parameters: [0.0; 3],
        }
    }

    /// Structural comparison used for material deduplication.
    ///
    /// Address modes follow from type and channel, and the raw `parameters`
    /// carry no rendering meaning, so neither takes part in the comparison.
    pub fn matches(&self, other: &Self) -> bool {
        self.name == other.name
            && self.channel == other.channel
            && self.is_normal_map == other.is_normal_map
            && self.uv_offset == other.uv_offset
            && self.uv_scale == other.uv_scale
    }

    /// UV transform packed as `[scale_x, scale_y, offset_x, offset_y]`
    pub fn uv_scale_offset(&self) -> [f32; 4] {
        [self.uv_scale.x, self.uv_scale.y, self.uv_offset.x, self.uv_offset.y]
    }
}

/// Decoded description of one material
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialInfo {
    /// Shader archetype
    pub material_type: MaterialType,
    /// Raw type code as found in the manifest
    pub type_string: String,
    /// Material name (never empty for parsed materials)
    pub name: String,
    /// Render state flags
    pub flags: MaterialFlags,
    /// Whether the material may be shared with other meshes
    pub is_shareable: bool,
    parameters: BTreeMap<MaterialParameterType, MaterialParameterValue>,
    textures: BTreeMap<i32, TextureInfo>,
}

impl MaterialInfo {
    /// Create an empty material of the given type
    pub fn new(name: impl Into<String>, material_type: MaterialType) -> Self {
        Self {
            material_type,
            type_string: material_type.code().to_string(),
            name: name.into(),
            flags: MaterialFlags::default(),
            is_shareable: material_type.is_shareable(),
            parameters: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }

    /// Look up a parameter
    pub fn parameter(&self, parameter_type: MaterialParameterType) -> Option<&MaterialParameterValue> {
        self.parameters.get(&parameter_type)
    }

    /// Store a parameter. Values for `Unknown` are dropped; returns whether the value was stored.
    pub fn set_parameter(&mut self, parameter_type: MaterialParameterType, value: MaterialParameterValue) -> bool {
        if !parameter_type.is_tracked() {
            return false;
        }

        self.parameters.insert(parameter_type, value);
        true
    }

    /// All stored parameters
    pub const fn parameters(&self) -> &BTreeMap<MaterialParameterType, MaterialParameterValue> {
        &self.parameters
    }

    /// Float parameter or `default`, logging a warning when missing or not a float
    pub fn safe_get_float_parameter(&self, parameter_type: MaterialParameterType, default: f32) -> f32 {
        match self.parameter(parameter_type) {
            Some(MaterialParameterValue::Float(value)) => *value,
            Some(other) => {
                log::warn!(
                    "Parameter '{}' of material '{}' is a {}, not a float. Using the default value {}.",
                    parameter_type,
                    self.name,
                    other.kind(),
                    default
                );
                default
            }
            None => {
                log::warn!("The material '{}' does not have the parameter '{}'.", self.name, parameter_type);
                default
            }
        }
    }

    /// String parameter or `default`, logging a warning when missing or not a string
    pub fn safe_get_string_parameter(&self, parameter_type: MaterialParameterType, default: &str) -> String {
        match self.parameter(parameter_type) {
            Some(MaterialParameterValue::Str(value)) => value.clone(),
            Some(other) => {
                log::warn!(
                    "Parameter '{}' of material '{}' is a {}, not a string. Using the default value '{}'.",
                    parameter_type,
                    self.name,
                    other.kind(),
                    default
                );
                default.to_string()
            }
            None => {
                log::warn!("The material '{}' does not have the parameter '{}'.", self.name, parameter_type);
                default.to_string()
            }
        }
    }

    /// Texture bound to `channel`, if any
    pub fn texture_info(&self, channel: i32) -> Option<&TextureInfo> {
        if channel < 0 {
            return None;
        }
        self.textures.get(&channel)
    }

    /// Bind a texture to its channel.
    ///
    /// Unassigned textures are rejected (returns false). A texture already bound to
    /// the same channel is replaced.
    pub fn set_texture_info(&mut self, info: TextureInfo) -> bool {
        if info.channel < 0 {
            return false;
        }

        if let Some(previous) = self.textures.insert(info.channel, info) {
            log::debug!(
                "Material '{}' rebinds channel {} (replaced texture '{}').",
                self.name,
                previous.channel,
                previous.name
            );
        }
        true
    }

    /// All bound textures keyed by channel
    pub const fn texture_infos(&self) -> &BTreeMap<i32, TextureInfo> {
        &self.textures
    }

    /// Structural equality used to deduplicate materials.
    ///
    /// The name is ignored: materials exported under different names but with the
    /// same content resolve to one asset.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.is_shareable != other.is_shareable
            || self.material_type != other.material_type
            || self.type_string != other.type_string
            || self.flags != other.flags
        {
            return false;
        }

        let parameters_match = MaterialParameterType::TRACKED
            .iter()
            .all(|ty| self.parameter(*ty) == other.parameter(*ty));

        if !parameters_match || self.textures.len() != other.textures.len() {
            return false;
        }

        self.textures.iter().all(|(channel, texture)| {
            other
                .textures
                .get(channel)
                .is_some_and(|other_texture| texture.matches(other_texture))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MaterialParameterType as P;

    fn textured(channel: i32, name: &str) -> TextureInfo {
        let mut info = TextureInfo::new(name);
        info.channel = channel;
        info
    }

    fn sample_material(name: &str) -> MaterialInfo {
        let mut material = MaterialInfo::new(name, MaterialType::Standard);
        material.set_parameter(P::PresetType, MaterialParameterValue::Str("rock".into()));
        material.set_parameter(P::Roughness0, MaterialParameterValue::Float(0.5));
        material.set_texture_info(textured(0, "Albedo_Rock"));
        material
    }

    #[test]
    fn test_unknown_parameter_not_stored() {
        let mut material = MaterialInfo::new("m", MaterialType::Standard);
        assert!(!material.set_parameter(P::Unknown, MaterialParameterValue::Float(1.0)));
        assert!(material.parameters().is_empty());
        assert!(material.parameter(P::Unknown).is_none());
    }

    #[test]
    fn test_safe_getters() {
        let material = sample_material("m");

        assert_eq!(material.safe_get_float_parameter(P::Roughness0, 0.7), 0.5);
        // missing
        assert_eq!(material.safe_get_float_parameter(P::Metallic0, 0.3), 0.3);
        // tag mismatch
        assert_eq!(material.safe_get_float_parameter(P::PresetType, 0.1), 0.1);

        assert_eq!(material.safe_get_string_parameter(P::PresetType, "Unknown"), "rock");
        assert_eq!(material.safe_get_string_parameter(P::Roughness0, "Unknown"), "Unknown");
        assert_eq!(material.safe_get_string_parameter(P::AlphaTest, "x"), "x");
    }

    #[test]
    fn test_texture_accessors() {
        let mut material = MaterialInfo::new("m", MaterialType::Standard);

        assert!(!material.set_texture_info(TextureInfo::new("unassigned")));
        assert!(material.texture_infos().is_empty());
        assert!(material.texture_info(-1).is_none());

        assert!(material.set_texture_info(textured(1, "first")));
        assert!(material.set_texture_info(textured(1, "second")));
        assert_eq!(material.texture_infos().len(), 1);
        assert_eq!(material.texture_info(1).unwrap().name, "second");
        assert!(material.texture_info(2).is_none());
    }

    #[test]
    fn test_equivalence_ignores_name() {
        assert!(sample_material("a").is_equivalent(&sample_material("b")));
    }

    #[test]
    fn test_equivalence_detects_parameter_changes() {
        let a = sample_material("a");

        let mut changed_value = sample_material("a");
        changed_value.set_parameter(P::Roughness0, MaterialParameterValue::Float(0.6));
        assert!(!a.is_equivalent(&changed_value));

        let mut extra = sample_material("a");
        extra.set_parameter(P::Metallic0, MaterialParameterValue::Float(0.0));
        assert!(!a.is_equivalent(&extra));
        assert!(!extra.is_equivalent(&a));

        let mut retyped = sample_material("a");
        retyped.set_parameter(P::Roughness0, MaterialParameterValue::Str("0.5".into()));
        assert!(!a.is_equivalent(&retyped));

        let mut flagged = sample_material("a");
        flagged.flags = MaterialFlags::ALPHA_TESTED;
        assert!(!a.is_equivalent(&flagged));
    }

    #[test]
    fn test_equivalence_detects_texture_changes() {
        let a = sample_material("a");

        let mut renamed = sample_material("a");
        renamed.set_texture_info(textured(0, "Albedo_Moss"));
        assert!(!a.is_equivalent(&renamed));

        let mut moved = sample_material("a");
        let mut uv = textured(0, "Albedo_Rock");
        uv.uv_offset = Vec2::new(0.5, 0.0);
        moved.set_texture_info(uv);
        assert!(!a.is_equivalent(&moved));

        let mut normal = sample_material("a");
        let mut flagged = textured(0, "Albedo_Rock");
        flagged.is_normal_map = true;
        normal.set_texture_info(flagged);
        assert!(!a.is_equivalent(&normal));

        let mut extra = sample_material("a");
        extra.set_texture_info(textured(3, "Albedo_Moss"));
        assert!(!a.is_equivalent(&extra));
    }

    #[test]
    fn test_equivalence_ignores_texture_misc_parameters() {
        let a = sample_material("a");

        let mut b = sample_material("b");
        let mut texture = textured(0, "Albedo_Rock");
        texture.parameters = [1.0, 2.0, 3.0];
        b.set_texture_info(texture);

        assert!(a.is_equivalent(&b));
    }

    #[test]
    fn test_equivalence_checks_shareability() {
        let a = sample_material("a");
        let mut b = sample_material("a");
        b.is_shareable = false;
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn test_uv_scale_offset_packing() {
        let mut texture = TextureInfo::new("t");
        texture.uv_scale = Vec2::new(0.5, 0.25);
        texture.uv_offset = Vec2::new(0.1, 0.2);
        assert_eq!(texture.uv_scale_offset(), [0.5, 0.25, 0.1, 0.2]);
    }
}
