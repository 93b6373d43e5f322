//! Engine object names and references
//!
//! Collaborators that create engine assets need stable names for everything the
//! importer produces. All names are built here so the planner and the engine side
//! agree on them.

use std::path::{Path, PathBuf};

use super::materials::MaterialType;

/// Characters that may not appear in an engine object name
pub const INVALID_OBJECT_NAME_CHARACTERS: &str = "\"' ,/.:|&!~\n\r\t@#(){}[]=;^%$`\\*?<>";

/// Source texture extensions in lookup order
pub const SOURCE_TEXTURE_EXTENSIONS: [&str; 2] = ["dds", "png"];

/// Suffix appended to a normal map name for its extracted height map
pub const PARALLAX_MAP_SUFFIX: &str = "_p";

/// Replace every invalid object name character with `_`
pub fn sanitize_object_name(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_OBJECT_NAME_CHARACTERS.contains(c) { '_' } else { c })
        .collect()
}

fn object_reference(class: &str, directory: &str, object_name: &str) -> String {
    format!("{class}'{directory}/{object_name}.{object_name}'")
}

/// Reference of the base material of a type code
pub fn base_material_reference(directory: &str, type_string: &str) -> String {
    object_reference("Material", directory, &format!("M_Type{type_string}"))
}

/// Reference of the base material of a material type
pub fn base_material_reference_for_type(directory: &str, material_type: MaterialType) -> String {
    base_material_reference(directory, material_type.code())
}

/// Reference of the debug material used when a base material is missing
pub fn invalid_material_reference(directory: &str) -> String {
    object_reference("Material", directory, "M_Invalid")
}

/// Object name of a material instance
pub fn material_instance_name(material_asset_name: &str) -> String {
    format!("MI_{material_asset_name}")
}

/// Reference of a material instance
pub fn material_instance_reference(directory: &str, material_asset_name: &str) -> String {
    object_reference("MaterialInstanceConstant", directory, &material_instance_name(material_asset_name))
}

/// Object name of an imported texture
pub fn texture_asset_name(texture_name: &str) -> String {
    format!("T_{}", sanitize_object_name(texture_name))
}

/// Reference of an imported texture
pub fn texture_reference(directory: &str, texture_name: &str) -> String {
    object_reference("Texture", directory, &texture_asset_name(texture_name))
}

/// Source name of the height map extracted from a normal map
pub fn parallax_map_source_name(normal_map_name: &str) -> String {
    format!("{normal_map_name}{PARALLAX_MAP_SUFFIX}")
}

/// Object name of a height map extracted from a normal map
pub fn parallax_map_asset_name(normal_map_name: &str) -> String {
    texture_asset_name(&parallax_map_source_name(normal_map_name))
}

/// Reference of a height map extracted from a normal map
pub fn parallax_map_reference(directory: &str, normal_map_name: &str) -> String {
    object_reference("Texture2D", directory, &parallax_map_asset_name(normal_map_name))
}

/// Object name of an imported static mesh
pub fn static_mesh_asset_name(mesh_name: &str) -> String {
    format!("SM_{}", sanitize_object_name(mesh_name))
}

/// Reference of an imported static mesh
pub fn static_mesh_reference(directory: &str, mesh_name: &str) -> String {
    object_reference("StaticMesh", directory, &static_mesh_asset_name(mesh_name))
}

/// Material parameter receiving the texture of a channel
pub fn texture_parameter_name(channel: i32) -> String {
    format!("Texture{channel}")
}

/// Material parameter receiving the packed UV transform of a channel
pub fn uv_scale_offset_parameter_name(channel: i32) -> String {
    format!("TextureUVScaleOffset{channel}")
}

/// Candidate source files of a texture, in lookup order
pub fn source_texture_candidates(source_directory: &Path, texture_name: &str) -> Vec<PathBuf> {
    SOURCE_TEXTURE_EXTENSIONS
        .iter()
        .map(|extension| source_directory.join(format!("{texture_name}.{extension}")))
        .collect()
}
