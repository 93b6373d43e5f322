//! Material type, parameter role and flag enumerations
//!
//! These mirror the fixed set of shader archetypes used by the exporting tool.
//! Every type carries a stable two-character legacy code which is used both for
//! parsing manifests and for addressing the base material assets (`M_Type<code>`).

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Shader archetype of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum MaterialType {
    /// Unrecognized type code
    #[default]
    Unknown,
    /// `23`
    Standard,
    /// `24`
    Translucent,
    /// `28`
    TreeBranches,
    /// `29`
    Grass,
    /// `30`
    GravityCrystal,
    /// `2A`
    TV,
    /// `2B`
    Soil,
    /// `2C`
    Window,
    /// `2D`
    Water,
    /// `2E`
    Glass,
    /// `DC`
    Decal,
}

impl MaterialType {
    /// All known (non-`Unknown`) material types
    pub const ALL: [Self; 11] = [
        Self::Standard,
        Self::Translucent,
        Self::TreeBranches,
        Self::Grass,
        Self::GravityCrystal,
        Self::TV,
        Self::Soil,
        Self::Window,
        Self::Water,
        Self::Glass,
        Self::Decal,
    ];

    /// Parse a legacy type code. Unrecognized codes map to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "23" => Self::Standard,
            "24" => Self::Translucent,
            "28" => Self::TreeBranches,
            "29" => Self::Grass,
            "30" => Self::GravityCrystal,
            "2A" => Self::TV,
            "2B" => Self::Soil,
            "2C" => Self::Window,
            "2D" => Self::Water,
            "2E" => Self::Glass,
            "DC" => Self::Decal,
            _ => Self::Unknown,
        }
    }

    /// The legacy type code, or `"Unknown"`
    pub const fn code(self) -> &'static str {
        match self {
            Self::Standard => "23",
            Self::Translucent => "24",
            Self::TreeBranches => "28",
            Self::Grass => "29",
            Self::GravityCrystal => "30",
            Self::TV => "2A",
            Self::Soil => "2B",
            Self::Window => "2C",
            Self::Water => "2D",
            Self::Glass => "2E",
            Self::Decal => "DC",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether materials of this type may be shared between meshes.
    ///
    /// Gravity crystals encode mesh-section geometry (billboard offsets, bounding
    /// sphere) in their parameters and therefore belong to exactly one mesh.
    pub const fn is_shareable(self) -> bool {
        !matches!(self, Self::GravityCrystal)
    }

    /// Whether meshes using this material type can be rendered with Nanite
    pub const fn supports_nanite(self) -> bool {
        !matches!(
            self,
            Self::Decal | Self::Glass | Self::Grass | Self::Translucent | Self::TreeBranches | Self::Water
        )
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Semantic role of a decoded material parameter
///
/// `Unknown` means "not tracked" and is never stored in a [`MaterialInfo`](super::MaterialInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MaterialParameterType {
    Unknown,

    PresetType,

    Roughness0,
    Metallic0,
    Specular0,
    EmissionBoost0,
    ParallaxHeight0,
    ColorR0,
    ColorG0,
    ColorB0,

    Roughness1,
    Metallic1,
    Specular1,
    EmissionBoost1,
    ParallaxHeight1,
    ColorR1,
    ColorG1,
    ColorB1,

    Roughness2,
    Metallic2,
    Specular2,
    EmissionBoost2,
    ParallaxHeight2,
    ColorR2,
    ColorG2,
    ColorB2,

    Roughness3,
    Metallic3,
    Specular3,
    EmissionBoost3,
    ParallaxHeight3,
    ColorR3,
    ColorG3,
    ColorB3,

    AlphaTest,
    IOR,
    Opacity,

    PositionOffsetX,
    PositionOffsetY,
    PositionOffsetZ,
    BoundingSphereRadius,
}

impl MaterialParameterType {
    /// Every tracked parameter role, in declaration order (excludes `Unknown`)
    pub const TRACKED: [Self; 40] = [
        Self::PresetType,
        Self::Roughness0,
        Self::Metallic0,
        Self::Specular0,
        Self::EmissionBoost0,
        Self::ParallaxHeight0,
        Self::ColorR0,
        Self::ColorG0,
        Self::ColorB0,
        Self::Roughness1,
        Self::Metallic1,
        Self::Specular1,
        Self::EmissionBoost1,
        Self::ParallaxHeight1,
        Self::ColorR1,
        Self::ColorG1,
        Self::ColorB1,
        Self::Roughness2,
        Self::Metallic2,
        Self::Specular2,
        Self::EmissionBoost2,
        Self::ParallaxHeight2,
        Self::ColorR2,
        Self::ColorG2,
        Self::ColorB2,
        Self::Roughness3,
        Self::Metallic3,
        Self::Specular3,
        Self::EmissionBoost3,
        Self::ParallaxHeight3,
        Self::ColorR3,
        Self::ColorG3,
        Self::ColorB3,
        Self::AlphaTest,
        Self::IOR,
        Self::Opacity,
        Self::PositionOffsetX,
        Self::PositionOffsetY,
        Self::PositionOffsetZ,
        Self::BoundingSphereRadius,
    ];

    /// Returns true for every role except `Unknown`
    pub const fn is_tracked(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for MaterialParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

bitflags! {
    /// Render state flags stored in the second parameter slot of a material.
    ///
    /// An empty set means the material is two sided without alpha testing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MaterialFlags: u8 {
        /// The material uses alpha testing
        const ALPHA_TESTED = 0x2;
        /// The material uses face culling
        const USE_FACE_CULLING = 0x4;
        /// Not yet understood, possibly shadow casting
        const UNKNOWN_3 = 0x8;
    }
}

impl Default for MaterialFlags {
    fn default() -> Self {
        Self::USE_FACE_CULLING
    }
}

impl MaterialFlags {
    /// Build flags from the raw numeric slot value, keeping unknown bits
    pub fn from_raw(value: f64) -> Self {
        // The slot is a byte-sized bitset written as a JSON number
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bits = value as u8;
        Self::from_bits_retain(bits)
    }
}

/// Texture address mode hint for a texture channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureAddressMode {
    /// Repeat the texture
    #[default]
    Wrap,
    /// Clamp UVs to the edge texels
    Clamp,
}
