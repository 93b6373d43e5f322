//! Fixed lookup tables for decoding exported material data
//!
//! The exporting tool writes material parameters and texture slots positionally.
//! These tables map positions to semantic roles per material type. They were
//! reverse engineered from the game data; there is nothing to derive, only to look
//! up. Every function falls back to an "unmapped" value for holes in the tables.

use super::material_types::{MaterialParameterType, MaterialType, TextureAddressMode};

/// Channel value for textures that have no semantic slot
pub const UNASSIGNED_CHANNEL: i32 = -1;

/// Map a positional parameter index to its semantic role.
///
/// Index 0 is never decoded and index 1 holds the [`MaterialFlags`](super::MaterialFlags).
/// Soil, Translucent, Grass, TreeBranches and Water carry parameters whose meaning
/// is still unknown, so nothing is decoded for them.
pub const fn parameter_index_to_field_type(material_type: MaterialType, index: usize) -> MaterialParameterType {
    use MaterialParameterType as P;

    match material_type {
        MaterialType::Standard => match index {
            2 => P::PresetType,
            3 => P::Roughness0,
            4 => P::Metallic0,
            5 => P::Specular0,
            6 => P::EmissionBoost0,
            7 => P::ParallaxHeight0,
            8 => P::Roughness1,
            9 => P::Metallic1,
            10 => P::Specular1,
            11 => P::EmissionBoost1,
            12 => P::ParallaxHeight1,
            13 => P::ColorR0,
            14 => P::ColorG0,
            15 => P::ColorB0,
            16 => P::ColorR1,
            17 => P::ColorG1,
            18 => P::ColorB1,
            19 => P::AlphaTest,
            _ => P::Unknown,
        },
        // TODO: locate the emission and color slots of decals
        MaterialType::Decal => match index {
            9 => P::Roughness0,
            10 => P::Metallic0,
            11 => P::Specular0,
            12 => P::AlphaTest,
            _ => P::Unknown,
        },
        MaterialType::GravityCrystal
        | MaterialType::Window
        | MaterialType::Glass
        | MaterialType::TV
        | MaterialType::Soil
        | MaterialType::Translucent
        | MaterialType::Grass
        | MaterialType::TreeBranches
        | MaterialType::Water
        | MaterialType::Unknown => P::Unknown,
    }
}

/// Map a raw texture binding index (`Texture<N>`) to a semantic channel.
///
/// Returns [`UNASSIGNED_CHANNEL`] for bindings without a mapping.
pub const fn texture_binding_index_to_channel(material_type: MaterialType, binding_index: i32) -> i32 {
    match material_type {
        MaterialType::Standard => match binding_index {
            1 => 0, // Albedo 0
            2 => 1, // Normal 0
            3 => 2, // Emission
            4 => 3, // Albedo 1
            5 => 4, // Normal 1
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Translucent => match binding_index {
            2 => 0, // Emission
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::TreeBranches => match binding_index {
            1 => 0, // Albedo 0
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Grass | MaterialType::Decal => match binding_index {
            1 => 0, // Albedo 0
            2 => 1, // Normal 0
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::GravityCrystal => match binding_index {
            1 => 0, // Emission
            2 => 1, // Normal 0
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Soil => match binding_index {
            1 => 0, // Albedo 0
            2 => 1, // Albedo 1
            3 => 2, // Albedo 2
            4 => 3, // Albedo 3
            5 => 4, // Normal 0
            6 => 5, // Normal 1
            7 => 6, // Normal 2
            8 => 7, // Normal 3
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Window => match binding_index {
            1 => 0, // Glass
            2 => 1, // Glass normal
            3 => 2, // Interior
            4 => 3, // Curtains
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Water => match binding_index {
            1 => 0, // Water normal
            2 => 1, // Absorption
            4 => 2, // Caustics
            _ => UNASSIGNED_CHANNEL,
        },
        MaterialType::Glass => match binding_index {
            1 => 0, // Glass normal
            _ => UNASSIGNED_CHANNEL,
        },
        // TVs bind no textures
        MaterialType::TV | MaterialType::Unknown => UNASSIGNED_CHANNEL,
    }
}

/// Returns true if the channel of the given material type expects a normal map
pub const fn is_channel_normal_map(material_type: MaterialType, channel: i32) -> bool {
    match material_type {
        MaterialType::Standard => matches!(channel, 1 | 4),
        MaterialType::Grass | MaterialType::GravityCrystal | MaterialType::Window | MaterialType::Decal => {
            channel == 1
        }
        MaterialType::Soil => matches!(channel, 4..=7),
        MaterialType::Water | MaterialType::Glass => channel == 0,
        MaterialType::Translucent | MaterialType::TreeBranches | MaterialType::TV | MaterialType::Unknown => {
            false
        }
    }
}

/// Texture address mode to use for a channel
pub const fn texture_address_mode(material_type: MaterialType, channel: i32) -> TextureAddressMode {
    match (material_type, channel) {
        // curtains must not bleed over the window frame
        (MaterialType::Window, 3) => TextureAddressMode::Clamp,
        (MaterialType::GravityCrystal, 0) => TextureAddressMode::Clamp,
        _ => TextureAddressMode::Wrap,
    }
}

/// Parallax binding derived from a Standard material's normal channel.
///
/// The height map lives in the alpha channel of the normal map. Returns the
/// parameter that scales it and the channel the extracted height map binds to.
pub const fn parallax_channel_for_normal(
    material_type: MaterialType,
    normal_channel: i32,
) -> Option<(MaterialParameterType, i32)> {
    match (material_type, normal_channel) {
        (MaterialType::Standard, 1) => Some((MaterialParameterType::ParallaxHeight0, 5)),
        (MaterialType::Standard, 4) => Some((MaterialParameterType::ParallaxHeight1, 6)),
        _ => None,
    }
}
