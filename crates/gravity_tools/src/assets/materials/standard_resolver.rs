//! Standard material parameter resolution
//!
//! Computes every value written into a Standard (`"23"`) material instance from a
//! decoded [`MaterialInfo`]. Roughness, metallic and specular come from the
//! preset database when the material names a preset or its albedo texture has
//! one; otherwise the material's own values are used.

use serde::{Deserialize, Serialize};

use super::material_info::MaterialInfo;
use super::material_types::{MaterialFlags, MaterialParameterType};
use super::preset_database::{MaterialParameterPresets, MaterialPresetSource, MaterialPresetType, WorldLayer};
use crate::foundation::math::{is_almost_black, LinearColor};

/// Exported parallax heights are scaled down by this factor
pub const PARALLAX_HEIGHT_SCALE: f32 = 0.125;

/// Upper bound of the opacity mask clip value, block compression leaves noise above it
pub const MAX_OPACITY_MASK_CLIP_VALUE: f32 = 0.96;

const DEFAULT_METALLIC: f32 = 0.3;
const DEFAULT_ROUGHNESS: f32 = 0.7;
const DEFAULT_SPECULAR: f32 = 0.0;
const DEFAULT_COLOR_COMPONENT: f32 = 1.0;
const DEFAULT_ALPHA_TEST: f32 = 1.0;

const LAYERED_CHANNELS: [i32; 2] = [3, 4];
const EMISSION_MASK_CHANNEL: i32 = 2;
const ALBEDO_CHANNELS: [i32; 2] = [0, 3];

/// Resolved values of one material layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardLayerParameters {
    /// Tint color
    pub color: LinearColor,
    /// Metallic
    pub metallic: f32,
    /// Roughness
    pub roughness: f32,
    /// Specular
    pub specular: f32,
    /// Emission boost
    pub emission_boost: f32,
    /// Parallax height, zero when parallax occlusion mapping is disabled
    pub parallax_height: f32,
    /// Whether the tint color is emissive
    pub is_color_emissive: bool,
    /// Whether parallax occlusion mapping is enabled
    pub is_pom_enabled: bool,
}

/// Every parameter of a Standard material instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardMaterialParameters {
    /// World layer the material was classified into
    pub world_layer: WorldLayer,
    /// Preset named by the material, `Unknown` if none
    pub preset_type: MaterialPresetType,
    /// Base layer and second layer
    pub layers: [StandardLayerParameters; 2],
    /// A texture is bound to the emission mask channel
    pub has_emission_mask: bool,
    /// `Emissive` switch
    pub is_emissive: bool,
    /// `Layered` switch
    pub is_layered: bool,
    /// Masked blending is enabled
    pub is_alpha_test_enabled: bool,
    /// Opacity mask clip value
    pub opacity_mask_clip_value: f32,
    /// The material is rendered without face culling
    pub is_two_sided: bool,
}

impl StandardMaterialParameters {
    /// Resolve the parameters of a Standard material.
    ///
    /// `has_parallax_map[i]` tells whether a height map is bound for layer `i`.
    pub fn resolve(
        material: &MaterialInfo,
        presets: &impl MaterialPresetSource,
        primary_layer_prefix: &str,
        has_parallax_map: [bool; 2],
    ) -> Self {
        let textures = material.texture_infos();
        let mut is_layered = LAYERED_CHANNELS.iter().any(|channel| textures.contains_key(channel));
        let has_emission_mask = textures.contains_key(&EMISSION_MASK_CHANNEL);

        let preset_name = material.safe_get_string_parameter(MaterialParameterType::PresetType, "Unknown");
        let preset_type = MaterialPresetType::from_name(&preset_name);
        let world_layer = WorldLayer::for_material(&material.name, primary_layer_prefix);

        let layer_presets: [Option<&MaterialParameterPresets>; 2] = if preset_type == MaterialPresetType::Unknown {
            // fall back to the presets of the albedo textures
            ALBEDO_CHANNELS.map(|channel| {
                material
                    .texture_info(channel)
                    .map(|albedo| presets.preset_for_texture(world_layer, &albedo.name))
            })
        } else {
            let preset = presets.preset(world_layer, preset_type);
            [Some(preset), Some(preset)]
        };

        let base = Self::resolve_layer(material, 0, layer_presets[0], has_parallax_map[0]);
        let second = Self::resolve_layer(material, 1, layer_presets[1], has_parallax_map[1]);

        let is_emissive = has_emission_mask || base.is_color_emissive || second.is_color_emissive;
        is_layered |= second.is_color_emissive || second.is_pom_enabled;

        let alpha_test = material.safe_get_float_parameter(MaterialParameterType::AlphaTest, DEFAULT_ALPHA_TEST);

        Self {
            world_layer,
            preset_type,
            layers: [base, second],
            has_emission_mask,
            is_emissive,
            is_layered,
            is_alpha_test_enabled: material.flags.contains(MaterialFlags::ALPHA_TESTED) && alpha_test > 0.0,
            opacity_mask_clip_value: alpha_test.min(MAX_OPACITY_MASK_CLIP_VALUE),
            is_two_sided: !material.flags.contains(MaterialFlags::USE_FACE_CULLING),
        }
    }

    fn resolve_layer(
        material: &MaterialInfo,
        layer: usize,
        preset: Option<&MaterialParameterPresets>,
        has_parallax_map: bool,
    ) -> StandardLayerParameters {
        use MaterialParameterType as P;

        let [metallic_type, roughness_type, specular_type, color_r, color_g, color_b, boost_type, parallax_type] =
            if layer == 0 {
                [P::Metallic0, P::Roughness0, P::Specular0, P::ColorR0, P::ColorG0, P::ColorB0, P::EmissionBoost0, P::ParallaxHeight0]
            } else {
                [P::Metallic1, P::Roughness1, P::Specular1, P::ColorR1, P::ColorG1, P::ColorB1, P::EmissionBoost1, P::ParallaxHeight1]
            };

        let preset = preset.copied().unwrap_or_else(|| {
            MaterialParameterPresets::new(
                material.safe_get_float_parameter(roughness_type, DEFAULT_ROUGHNESS),
                material.safe_get_float_parameter(metallic_type, DEFAULT_METALLIC),
                material.safe_get_float_parameter(specular_type, DEFAULT_SPECULAR),
            )
        });

        let color = LinearColor::new(
            material.safe_get_float_parameter(color_r, DEFAULT_COLOR_COMPONENT),
            material.safe_get_float_parameter(color_g, DEFAULT_COLOR_COMPONENT),
            material.safe_get_float_parameter(color_b, DEFAULT_COLOR_COMPONENT),
            1.0,
        );

        let emission_boost = material.safe_get_float_parameter(boost_type, 0.0);
        let parallax_height = PARALLAX_HEIGHT_SCALE * material.safe_get_float_parameter(parallax_type, 0.0);
        let is_pom_enabled = parallax_height > 0.0 && has_parallax_map;

        StandardLayerParameters {
            is_color_emissive: emission_boost > 0.0 && !is_almost_black(&color),
            color,
            metallic: preset.metallic,
            roughness: preset.roughness,
            specular: preset.specular,
            emission_boost,
            parallax_height: if is_pom_enabled { parallax_height } else { 0.0 },
            is_pom_enabled,
        }
    }

    /// Named scalar parameters
    pub fn scalar_parameters(&self) -> Vec<(&'static str, f32)> {
        let [l0, l1] = &self.layers;
        vec![
            ("Metallic0", l0.metallic),
            ("Roughness0", l0.roughness),
            ("Specular0", l0.specular),
            ("Metallic1", l1.metallic),
            ("Roughness1", l1.roughness),
            ("Specular1", l1.specular),
            ("EmissionBoost0", l0.emission_boost),
            ("EmissionBoost1", l1.emission_boost),
            ("ParallaxHeight0", l0.parallax_height),
            ("ParallaxHeight1", l1.parallax_height),
        ]
    }

    /// Named vector parameters
    pub fn vector_parameters(&self) -> Vec<(&'static str, LinearColor)> {
        vec![("Color0", self.layers[0].color), ("Color1", self.layers[1].color)]
    }

    /// Named static switch parameters
    pub fn switch_parameters(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Emissive", self.is_emissive),
            ("POM0", self.layers[0].is_pom_enabled),
            ("POM1", self.layers[1].is_pom_enabled),
            ("Layered", self.is_layered),
        ]
    }
}
