//! Asset manifest parser
//!
//! An exported asset lives in a directory `<name>/` holding the mesh source
//! `<name>.fbx` and a manifest `<name>.json`:
//!
//! ```json
//! {
//!     "Version": "1.1.0",
//!     "Meshes": ["rock_a_lod0"],
//!     "Materials": {
//!         "Scene/Props:rock_a": {
//!             "Type": "23",
//!             "Parameters": [0, 4, "rock", 0.8],
//!             "Textures": {
//!                 "Texture1": { "Name": "Albedo_Rock", "Parameters": [0, 0, 0], "Atlas": [1, 1, 0, 0] }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! Structural problems reject the whole asset. Materials with an unknown type code
//! are skipped, and values that cannot be decoded fall back to defaults.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::materials::channel_tables::{
    is_channel_normal_map, parameter_index_to_field_type, texture_address_mode, texture_binding_index_to_channel,
};
use super::materials::{
    MaterialFlags, MaterialInfo, MaterialParameterType, MaterialParameterValue, MaterialType, TextureInfo,
};
use super::{AssetError, AssetInfo};
use crate::foundation::math::Vec2;

/// Extension of the manifest file
pub const MANIFEST_EXTENSION: &str = "json";
/// Extension of the mesh source file
pub const MESH_SOURCE_EXTENSION: &str = "fbx";

const VERSION_FIELD: &str = "Version";
const MESHES_FIELD: &str = "Meshes";
const MATERIALS_FIELD: &str = "Materials";
const MATERIAL_TYPE_FIELD: &str = "Type";
const MATERIAL_PARAMETERS_FIELD: &str = "Parameters";
const MATERIAL_TEXTURES_FIELD: &str = "Textures";
const TEXTURE_KEY_PREFIX: &str = "Texture";
const TEXTURE_NAME_FIELD: &str = "Name";
const TEXTURE_PARAMETERS_FIELD: &str = "Parameters";
const TEXTURE_ATLAS_FIELD: &str = "Atlas";
const NO_TEXTURE: &str = "No Texture";

/// Parameter slot holding the material flags
const FLAGS_PARAMETER_INDEX: usize = 1;
/// First parameter slot decoded through the parameter table
const FIRST_DECODED_PARAMETER_INDEX: usize = 2;

/// Manifest parser bound to the importer version it accepts
#[derive(Debug, Clone)]
pub struct ManifestParser {
    importer_version: String,
}

impl ManifestParser {
    /// Create a parser accepting manifests compatible with `importer_version`
    pub fn new(importer_version: impl Into<String>) -> Self {
        Self {
            importer_version: importer_version.into(),
        }
    }

    /// Version string this parser checks manifests against
    pub fn importer_version(&self) -> &str {
        &self.importer_version
    }

    /// Name of the asset stored in `directory`
    pub fn asset_name(directory: &Path) -> String {
        directory
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Parse the asset stored in `directory`
    pub fn parse_directory(&self, directory: impl AsRef<Path>) -> Result<AssetInfo, AssetError> {
        let directory = directory.as_ref();
        let asset_name = Self::asset_name(directory);

        let source_file_path = directory.join(format!("{asset_name}.{MESH_SOURCE_EXTENSION}"));
        let manifest_path = directory.join(format!("{asset_name}.{MANIFEST_EXTENSION}"));

        if !source_file_path.is_file() {
            return Err(AssetError::NotFound(format!(
                "The asset directory '{}' is missing the '{}.{}' file",
                directory.display(),
                asset_name,
                MESH_SOURCE_EXTENSION
            )));
        }

        if !manifest_path.is_file() {
            return Err(AssetError::NotFound(format!(
                "The asset directory '{}' must contain a valid '{}.{}' file",
                directory.display(),
                asset_name,
                MANIFEST_EXTENSION
            )));
        }

        let contents = std::fs::read_to_string(&manifest_path)?;
        self.parse_manifest(&asset_name, source_file_path, &contents)
    }

    /// Parse manifest `contents` of the asset `asset_name`
    pub fn parse_manifest(
        &self,
        asset_name: &str,
        source_file_path: PathBuf,
        contents: &str,
    ) -> Result<AssetInfo, AssetError> {
        let root: Value = serde_json::from_str(contents)?;

        let version = root
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .ok_or(AssetError::MissingField(VERSION_FIELD))?;
        self.check_version(version)?;

        let mesh_names = root
            .get(MESHES_FIELD)
            .and_then(Value::as_array)
            .and_then(|meshes| {
                meshes
                    .iter()
                    .map(|mesh| mesh.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or(AssetError::MissingField(MESHES_FIELD))?;

        let materials = root
            .get(MATERIALS_FIELD)
            .and_then(Value::as_object)
            .ok_or(AssetError::MissingField(MATERIALS_FIELD))?;

        log::info!("Load material info of model '{}'", asset_name);

        let mut asset_info = AssetInfo {
            name: asset_name.to_string(),
            source_file_path,
            mesh_names,
            ..AssetInfo::default()
        };

        for (key, entry) in materials {
            let Some(material_info) = Self::parse_material(key, entry)? else {
                continue;
            };

            if asset_info.material_infos.contains_key(&material_info.name) {
                log::warn!(
                    "The asset '{}' defines the material '{}' more than once. The last definition is used.",
                    asset_name,
                    material_info.name
                );
            }
            asset_info.material_infos.insert(material_info.name.clone(), material_info);
        }

        Ok(asset_info)
    }

    /// Check that a manifest version is compatible with the importer.
    ///
    /// Both versions must have the same number of components and agree on the
    /// major and minor component.
    pub fn check_version(&self, version: &str) -> Result<(), AssetError> {
        fn split(v: &str) -> Vec<&str> {
            v.split('.').filter(|part| !part.is_empty()).map(str::trim).collect()
        }

        let asset_parts = split(version);
        let importer_parts = split(&self.importer_version);

        if asset_parts.len() < 2 || asset_parts.len() != importer_parts.len() {
            return Err(AssetError::InvalidVersion(version.to_string()));
        }

        if asset_parts[..2] != importer_parts[..2] {
            return Err(AssetError::UnsupportedVersion {
                found: version.to_string(),
                expected: self.importer_version.clone(),
            });
        }

        Ok(())
    }

    /// Decode one material entry. Returns `None` for materials that are skipped.
    fn parse_material(key: &str, entry: &Value) -> Result<Option<MaterialInfo>, AssetError> {
        let name = material_name_from_key(key);
        if name.is_empty() {
            return Err(AssetError::EmptyMaterialName(key.to_string()));
        }

        let invalid = |reason: &str| AssetError::InvalidMaterial {
            material: name.to_string(),
            reason: reason.to_string(),
        };

        let object = entry.as_object().ok_or_else(|| invalid("the entry is not an object"))?;

        let type_string = object
            .get(MATERIAL_TYPE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("the type is missing"))?;

        let material_type = MaterialType::from_code(type_string);
        if material_type == MaterialType::Unknown {
            log::warn!("The material '{}' (type {}) is not supported.", name, type_string);
            return Ok(None);
        }

        let mut material_info = MaterialInfo::new(name, material_type);
        material_info.type_string = type_string.to_string();

        if let Some(parameters) = object.get(MATERIAL_PARAMETERS_FIELD).and_then(Value::as_array) {
            Self::parse_parameters(parameters, &mut material_info);
        }

        if let Some(textures) = object.get(MATERIAL_TEXTURES_FIELD).and_then(Value::as_object) {
            Self::parse_textures(textures, &mut material_info)?;
        }

        Ok(Some(material_info))
    }

    fn parse_parameters(values: &[Value], material_info: &mut MaterialInfo) {
        if let Some(flags) = values.get(FLAGS_PARAMETER_INDEX) {
            material_info.flags = match flags.as_f64() {
                Some(raw) => MaterialFlags::from_raw(raw),
                None => {
                    log::warn!(
                        "The material '{}' is missing material flags. Will use default flags.",
                        material_info.name
                    );
                    MaterialFlags::default()
                }
            };
        }

        for (index, value) in values.iter().enumerate().skip(FIRST_DECODED_PARAMETER_INDEX) {
            let parameter_type = parameter_index_to_field_type(material_info.material_type, index);
            if parameter_type == MaterialParameterType::Unknown {
                continue;
            }

            let parameter = match value {
                #[allow(clippy::cast_possible_truncation)]
                Value::Number(number) => MaterialParameterValue::Float(number.as_f64().unwrap_or_default() as f32),
                Value::String(text) => MaterialParameterValue::Str(text.clone()),
                _ => {
                    log::warn!(
                        "Encountered an unexpected material parameter data type. Material: '{}', Parameter idx: '{}'.",
                        material_info.name,
                        index
                    );
                    continue;
                }
            };

            material_info.set_parameter(parameter_type, parameter);
        }
    }

    fn parse_textures(textures: &Map<String, Value>, material_info: &mut MaterialInfo) -> Result<(), AssetError> {
        for (key, entry) in textures {
            let binding_index = texture_binding_index(key).ok_or_else(|| AssetError::InvalidTextureKey {
                material: material_info.name.clone(),
                key: key.clone(),
            })?;

            let Some(mut texture_info) = Self::parse_texture(&material_info.name, key, entry)? else {
                continue;
            };

            let material_type = material_info.material_type;
            texture_info.channel = texture_binding_index_to_channel(material_type, binding_index);
            texture_info.is_normal_map = is_channel_normal_map(material_type, texture_info.channel);
            texture_info.address_x = texture_address_mode(material_type, texture_info.channel);
            texture_info.address_y = texture_info.address_x;

            if !material_info.set_texture_info(texture_info) {
                log::debug!(
                    "The texture binding {} of material '{}' has no channel and is dropped.",
                    binding_index,
                    material_info.name
                );
            }
        }

        Ok(())
    }

    fn parse_texture(material: &str, key: &str, entry: &Value) -> Result<Option<TextureInfo>, AssetError> {
        let invalid = |reason: &str| AssetError::InvalidTexture {
            material: material.to_string(),
            texture: key.to_string(),
            reason: reason.to_string(),
        };

        let name = entry
            .get(TEXTURE_NAME_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("the name is missing"))?;

        if name.eq_ignore_ascii_case(NO_TEXTURE) {
            log::debug!("Skipping empty texture slot '{}' of material '{}'.", key, material);
            return Ok(None);
        }

        let parameters = entry
            .get(TEXTURE_PARAMETERS_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("the parameters are missing"))?;
        let parameters: [f32; 3] =
            read_numbers::<3>(parameters).ok_or_else(|| invalid("the parameters must be 3 numbers"))?;

        let mut texture_info = TextureInfo::new(name);
        texture_info.parameters = parameters;

        if let Some(atlas) = entry.get(TEXTURE_ATLAS_FIELD).and_then(Value::as_array) {
            let [scale_x, scale_y, offset_x, offset_y] =
                read_numbers::<4>(atlas).ok_or_else(|| invalid("the atlas must be 4 numbers"))?;
            texture_info.uv_scale = Vec2::new(scale_x, scale_y);
            texture_info.uv_offset = Vec2::new(offset_x, offset_y);
        }

        Ok(Some(texture_info))
    }
}

/// Material name of a manifest key: everything after the last `:`
pub fn material_name_from_key(key: &str) -> &str {
    key.rsplit_once(':').map_or(key, |(_, name)| name)
}

/// Binding index of a `Texture<N>` key
pub fn texture_binding_index(key: &str) -> Option<i32> {
    let digits = key.strip_prefix(TEXTURE_KEY_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Read exactly `N` numbers
fn read_numbers<const N: usize>(values: &[Value]) -> Option<[f32; N]> {
    if values.len() != N {
        return None;
    }

    let mut numbers = [0.0_f32; N];
    for (number, value) in numbers.iter_mut().zip(values) {
        #[allow(clippy::cast_possible_truncation)]
        let parsed = value.as_f64()? as f32;
        *number = parsed;
    }
    Some(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::TextureAddressMode;
    use approx::assert_relative_eq;

    fn parser() -> ManifestParser {
        ManifestParser::new("1.1.0")
    }

    fn parse(contents: &str) -> Result<AssetInfo, AssetError> {
        parser().parse_manifest("rock_a", PathBuf::from("rock_a/rock_a.fbx"), contents)
    }

    fn manifest_with_materials(materials: &str) -> String {
        format!(r#"{{ "Version": "1.1.0", "Meshes": ["rock_a_lod0"], "Materials": {materials} }}"#)
    }

    #[test]
    fn test_material_name_from_key() {
        assert_eq!(material_name_from_key("Group:MyMat"), "MyMat");
        assert_eq!(material_name_from_key("a:b:c"), "c");
        assert_eq!(material_name_from_key("plain"), "plain");
        assert_eq!(material_name_from_key("Group:"), "");
    }

    #[test]
    fn test_texture_binding_index() {
        assert_eq!(texture_binding_index("Texture12"), Some(12));
        assert_eq!(texture_binding_index("Texture0"), Some(0));
        assert_eq!(texture_binding_index("TextureFoo"), None);
        assert_eq!(texture_binding_index("Texture"), None);
        assert_eq!(texture_binding_index("texture1"), None);
        assert_eq!(texture_binding_index("Texture-1"), None);
    }

    #[test]
    fn test_version_check() {
        let parser = parser();
        assert!(parser.check_version("1.1.0").is_ok());
        assert!(parser.check_version("1.1.7").is_ok());
        // empty components are dropped before comparing
        assert!(parser.check_version("1..1.0").is_ok());
        assert!(parser.check_version("1.1.0.").is_ok());
        assert!(matches!(parser.check_version("9.9.9"), Err(AssetError::UnsupportedVersion { .. })));
        assert!(matches!(parser.check_version("1.2.0"), Err(AssetError::UnsupportedVersion { .. })));
        assert!(matches!(parser.check_version("1.1"), Err(AssetError::InvalidVersion(_))));
        assert!(matches!(parser.check_version(""), Err(AssetError::InvalidVersion(_))));
    }

    #[test]
    fn test_rejects_incompatible_version() {
        let result = parse(r#"{ "Version": "9.9.9", "Meshes": [], "Materials": {} }"#);
        assert!(matches!(result, Err(AssetError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert!(matches!(
            parse(r#"{ "Meshes": [], "Materials": {} }"#),
            Err(AssetError::MissingField("Version"))
        ));
        assert!(matches!(
            parse(r#"{ "Version": "1.1.0", "Materials": {} }"#),
            Err(AssetError::MissingField("Meshes"))
        ));
        assert!(matches!(
            parse(r#"{ "Version": "1.1.0", "Meshes": [] }"#),
            Err(AssetError::MissingField("Materials"))
        ));
        assert!(matches!(
            parse(r#"{ "Version": "1.1.0", "Meshes": [1], "Materials": {} }"#),
            Err(AssetError::MissingField("Meshes"))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(parse("{ \"Version\": "), Err(AssetError::Json(_))));
    }

    #[test]
    fn test_resolves_material_name() {
        let asset = parse(&manifest_with_materials(r#"{ "Group:MyMat": { "Type": "23" } }"#)).unwrap();
        let material = asset.material("MyMat").unwrap();
        assert_eq!(material.name, "MyMat");
        assert_eq!(material.material_type, MaterialType::Standard);
        assert_eq!(material.flags, MaterialFlags::USE_FACE_CULLING);
        assert_eq!(asset.mesh_names, vec!["rock_a_lod0".to_string()]);
    }

    #[test]
    fn test_rejects_empty_material_name() {
        let result = parse(&manifest_with_materials(r#"{ "Group:": { "Type": "23" } }"#));
        assert!(matches!(result, Err(AssetError::EmptyMaterialName(_))));

        let result = parse(&manifest_with_materials(r#"{ "": { "Type": "23" } }"#));
        assert!(matches!(result, Err(AssetError::EmptyMaterialName(_))));
    }

    #[test]
    fn test_missing_type_rejects_asset() {
        let result = parse(&manifest_with_materials(r#"{ "a": { "Parameters": [] } }"#));
        assert!(matches!(result, Err(AssetError::InvalidMaterial { .. })));
    }

    #[test]
    fn test_unknown_type_skips_material() {
        let asset = parse(&manifest_with_materials(
            r#"{ "odd": { "Type": "??" }, "rock": { "Type": "23" } }"#,
        ))
        .unwrap();
        assert!(asset.material("odd").is_none());
        assert!(asset.material("rock").is_some());
    }

    #[test]
    fn test_parameters_and_flags() {
        let asset = parse(&manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Parameters": [7, 2, "rock", 0.8, 0.1, null, [], 0.5] } }"#,
        ))
        .unwrap();
        let material = asset.material("rock").unwrap();

        assert_eq!(material.flags, MaterialFlags::ALPHA_TESTED);
        assert_eq!(material.safe_get_string_parameter(MaterialParameterType::PresetType, ""), "rock");
        assert_relative_eq!(material.safe_get_float_parameter(MaterialParameterType::Roughness0, 0.0), 0.8);
        assert_relative_eq!(material.safe_get_float_parameter(MaterialParameterType::Metallic0, 0.0), 0.1);
        // null and arrays are skipped
        assert!(material.parameter(MaterialParameterType::Specular0).is_none());
        assert!(material.parameter(MaterialParameterType::EmissionBoost0).is_none());
        assert_relative_eq!(material.safe_get_float_parameter(MaterialParameterType::ParallaxHeight0, 0.0), 0.5);
        assert!(material.parameter(MaterialParameterType::Unknown).is_none());
    }

    #[test]
    fn test_non_numeric_flags_use_default() {
        let asset = parse(&manifest_with_materials(r#"{ "rock": { "Type": "23", "Parameters": [0, "x"] } }"#))
            .unwrap();
        assert_eq!(asset.material("rock").unwrap().flags, MaterialFlags::USE_FACE_CULLING);
    }

    #[test]
    fn test_untabled_parameters_are_ignored() {
        let asset = parse(&manifest_with_materials(
            r#"{ "soil": { "Type": "2B", "Parameters": [0, 4, 0.5, 0.25] } }"#,
        ))
        .unwrap();
        assert!(asset.material("soil").unwrap().parameters().is_empty());
    }

    #[test]
    fn test_textures() {
        let asset = parse(&manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Textures": {
                "Texture1": { "Name": "Albedo_Rock", "Parameters": [1, 2, 3], "Atlas": [0.5, 0.25, 0.1, 0.2] },
                "Texture2": { "Name": "Normal_Rock", "Parameters": [0, 0, 0] },
                "Texture3": { "Name": "no texture" },
                "Texture9": { "Name": "Unmapped", "Parameters": [0, 0, 0] }
            } } }"#,
        ))
        .unwrap();
        let material = asset.material("rock").unwrap();
        assert_eq!(material.texture_infos().len(), 2);

        let albedo = material.texture_info(0).unwrap();
        assert_eq!(albedo.name, "Albedo_Rock");
        assert!(!albedo.is_normal_map);
        assert_eq!(albedo.parameters, [1.0, 2.0, 3.0]);
        assert_eq!(albedo.uv_scale_offset(), [0.5, 0.25, 0.1, 0.2]);

        let normal = material.texture_info(1).unwrap();
        assert!(normal.is_normal_map);
        assert_eq!(normal.uv_scale, Vec2::new(1.0, 1.0));
        assert_eq!(normal.uv_offset, Vec2::zeros());
    }

    #[test]
    fn test_texture_address_modes() {
        let asset = parse(&manifest_with_materials(
            r#"{ "window": { "Type": "2C", "Textures": {
                "Texture4": { "Name": "Curtains", "Parameters": [0, 0, 0] },
                "Texture1": { "Name": "Glass", "Parameters": [0, 0, 0] }
            } } }"#,
        ))
        .unwrap();
        let material = asset.material("window").unwrap();
        assert_eq!(material.texture_info(3).unwrap().address_x, TextureAddressMode::Clamp);
        assert_eq!(material.texture_info(0).unwrap().address_y, TextureAddressMode::Wrap);
    }

    #[test]
    fn test_rejects_malformed_textures() {
        let bad_key = manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Textures": { "TextureFoo": { "Name": "a", "Parameters": [0, 0, 0] } } } }"#,
        );
        assert!(matches!(parse(&bad_key), Err(AssetError::InvalidTextureKey { .. })));

        let bad_atlas = manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Textures": { "Texture1": { "Name": "a", "Parameters": [0, 0, 0], "Atlas": [1, 1, 0] } } } }"#,
        );
        assert!(matches!(parse(&bad_atlas), Err(AssetError::InvalidTexture { .. })));

        let bad_parameters = manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Textures": { "Texture1": { "Name": "a", "Parameters": [0, 0] } } } }"#,
        );
        assert!(matches!(parse(&bad_parameters), Err(AssetError::InvalidTexture { .. })));

        let missing_name = manifest_with_materials(
            r#"{ "rock": { "Type": "23", "Textures": { "Texture1": { "Parameters": [0, 0, 0] } } } }"#,
        );
        assert!(matches!(parse(&missing_name), Err(AssetError::InvalidTexture { .. })));
    }

    #[test]
    fn test_preserves_material_order() {
        let asset = parse(&manifest_with_materials(
            r#"{ "zeta": { "Type": "23" }, "alpha": { "Type": "23" }, "mid": { "Type": "23" } }"#,
        ))
        .unwrap();
        let names: Vec<_> = asset.material_infos.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_directory() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("rock_a");
        std::fs::create_dir(&directory).unwrap();

        assert!(matches!(parser().parse_directory(&directory), Err(AssetError::NotFound(_))));

        std::fs::write(directory.join("rock_a.fbx"), b"").unwrap();
        assert!(matches!(parser().parse_directory(&directory), Err(AssetError::NotFound(_))));

        std::fs::write(
            directory.join("rock_a.json"),
            manifest_with_materials(r#"{ "rock": { "Type": "23" } }"#),
        )
        .unwrap();

        let asset = parser().parse_directory(&directory).unwrap();
        assert_eq!(asset.name, "rock_a");
        assert_eq!(asset.source_file_path, directory.join("rock_a.fbx"));
        assert_eq!(asset.material_infos.len(), 1);
    }
}
