//! Batch import planner

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

use super::{AssetCatalog, ImportTask};
use crate::assets::materials::channel_tables::parallax_channel_for_normal;
use crate::assets::materials::{
    MaterialInfo, MaterialPresetSource, MaterialRegistry, MaterialRegistryId, MaterialType, StandardMaterialParameters,
    TextureAddressMode, TextureInfo,
};
use crate::assets::naming;
use crate::assets::parallax_map::ParallaxMap;
use crate::assets::ManifestParser;
use crate::core::config::ImporterConfig;

/// How meshes of planned assets are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportMode {
    /// Import the mesh sources, replacing existing meshes
    Import,
    /// Re-apply materials to meshes that are already imported
    Patch,
}

/// Height map bound next to a normal map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallaxBinding {
    /// Channel receiving the height map
    pub channel: i32,
    /// Object name of the height map texture
    pub asset_name: String,
    /// Engine reference of the height map texture
    pub asset_reference: String,
    /// Normal map the height map is extracted from
    pub source_normal_map: PathBuf,
    /// Previously extracted height map, used instead of extracting again
    pub extracted_source: PathBuf,
    /// Write the extracted height map to `extracted_source`
    pub save_extracted: bool,
    /// Whether the texture must be created
    pub create: bool,
    /// Texture parameter name
    pub texture_parameter: String,
    /// UV transform parameter name
    pub uv_scale_offset_parameter: String,
}

/// Texture bound to a material instance channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureBinding {
    /// Semantic channel
    pub channel: i32,
    /// Source texture name
    pub texture_name: String,
    /// Object name of the texture asset
    pub asset_name: String,
    /// Engine reference of the texture asset
    pub asset_reference: String,
    /// Source files to import from, in lookup order
    pub source_candidates: Vec<PathBuf>,
    /// Whether the texture must be imported
    pub import: bool,
    /// Import as normal map
    pub is_normal_map: bool,
    /// Address mode along U
    pub address_x: TextureAddressMode,
    /// Address mode along V
    pub address_y: TextureAddressMode,
    /// Texture parameter name
    pub texture_parameter: String,
    /// UV transform parameter name
    pub uv_scale_offset_parameter: String,
    /// Packed `[scale_x, scale_y, offset_x, offset_y]`
    pub uv_scale_offset: [f32; 4],
    /// Height map extracted from this normal map
    pub parallax: Option<ParallaxBinding>,
}

/// Material instance assigned to one material slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSlotPlan {
    /// Material slot (the material name)
    pub slot_name: String,
    /// Registry item the material resolved to
    #[serde(skip)]
    pub registry_id: MaterialRegistryId,
    /// Deduplicated material asset name
    pub material_asset_name: String,
    /// Material instance object name
    pub instance_name: String,
    /// Material instance reference
    pub instance_reference: String,
    /// Parent base material
    pub base_material_reference: String,
    /// Material used when the base material is missing
    pub fallback_material_reference: String,
    /// Whether the instance must be created
    pub create_instance: bool,
    /// Textures to bind
    pub textures: Vec<TextureBinding>,
    /// Resolved parameters for Standard materials
    pub standard_parameters: Option<StandardMaterialParameters>,
}

/// Everything to do for one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetImportPlan {
    /// Asset name
    pub asset_name: String,
    /// Mesh source file
    pub source_file_path: PathBuf,
    /// Content directory of the asset's meshes
    pub mesh_destination_dir: String,
    /// References of the asset's meshes
    pub mesh_references: Vec<String>,
    /// One entry per material
    pub material_slots: Vec<MaterialSlotPlan>,
}

/// An asset that could not be planned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAsset {
    /// Asset directory
    pub directory: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Result of planning one batch of import tasks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPlan {
    /// Mesh processing mode
    pub mode: ImportMode,
    /// Asset plans grouped into import batches
    pub batches: Vec<Vec<AssetImportPlan>>,
    /// Assets whose meshes all exist already
    pub up_to_date: Vec<String>,
    /// Assets that failed to parse
    pub skipped: Vec<SkippedAsset>,
}

impl ImportPlan {
    /// All asset plans in batch order
    pub fn assets(&self) -> impl Iterator<Item = &AssetImportPlan> {
        self.batches.iter().flatten()
    }

    /// Number of planned assets
    pub fn asset_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// Number of material instances to create
    pub fn instances_to_create(&self) -> usize {
        self.assets()
            .flat_map(|asset| &asset.material_slots)
            .filter(|slot| slot.create_instance)
            .count()
    }
}

/// Plans import batches against a material registry and a preset source
pub struct ImportPlanner<'a, P: MaterialPresetSource> {
    config: ImporterConfig,
    parser: ManifestParser,
    presets: &'a P,
    registry: MaterialRegistry,
}

impl<'a, P: MaterialPresetSource> ImportPlanner<'a, P> {
    /// Create a planner
    pub fn new(config: ImporterConfig, presets: &'a P) -> Self {
        Self {
            parser: ManifestParser::new(config.version.clone()),
            config,
            presets,
            registry: MaterialRegistry::new(),
        }
    }

    /// Registry of the last planned batch
    pub const fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// Plan one batch of tasks
    pub fn plan(&mut self, tasks: &[ImportTask], catalog: &impl AssetCatalog) -> ImportPlan {
        self.registry.reset();

        let mode = if self.config.patch_assets {
            ImportMode::Patch
        } else {
            ImportMode::Import
        };

        let mut skipped = Vec::new();
        let mut up_to_date = Vec::new();
        let mut pending = Vec::new();

        // every material is registered before any instance is named
        for task in tasks {
            let asset_info = match self.parser.parse_directory(&task.source_mesh_dir) {
                Ok(asset_info) => asset_info,
                Err(e) => {
                    log::warn!("Skipping asset {:?}: {}", task.source_mesh_dir, e);
                    skipped.push(SkippedAsset {
                        directory: task.source_mesh_dir.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let material_ids = self.registry.register_asset_materials(&asset_info);
            let mesh_destination_dir = format!("{}/{}", task.output_mesh_dir, asset_info.name);
            let mesh_references: Vec<String> = asset_info
                .mesh_names
                .iter()
                .map(|mesh| naming::static_mesh_reference(&mesh_destination_dir, mesh))
                .collect();

            let requires_import = match mode {
                ImportMode::Import => mesh_references.iter().any(|reference| !catalog.asset_exists(reference)),
                ImportMode::Patch => !mesh_references.is_empty(),
            };

            if requires_import {
                pending.push((task, asset_info, material_ids, mesh_destination_dir, mesh_references));
            } else {
                log::debug!("Asset '{}' is up to date", asset_info.name);
                up_to_date.push(asset_info.name);
            }
        }

        let mut planned_assets = HashSet::new();
        let mut assets = Vec::with_capacity(pending.len());

        for (task, asset_info, material_ids, mesh_destination_dir, mesh_references) in pending {
            log::info!("Planning '{}'", asset_info.name);

            let material_slots = asset_info
                .materials()
                .zip(material_ids)
                .filter_map(|(material, id)| self.plan_material(task, material, id, catalog, &mut planned_assets))
                .collect();

            assets.push(AssetImportPlan {
                asset_name: asset_info.name.clone(),
                source_file_path: asset_info.source_file_path.clone(),
                mesh_destination_dir,
                mesh_references,
                material_slots,
            });
        }

        let batch_size = self.config.batch_size.max(1);
        let mut batches = Vec::with_capacity(assets.len().div_ceil(batch_size));
        let mut assets = assets.into_iter().peekable();
        while assets.peek().is_some() {
            batches.push(assets.by_ref().take(batch_size).collect());
        }

        ImportPlan {
            mode,
            batches,
            up_to_date,
            skipped,
        }
    }

    fn plan_material(
        &mut self,
        task: &ImportTask,
        material: &MaterialInfo,
        id: MaterialRegistryId,
        catalog: &impl AssetCatalog,
        planned_assets: &mut HashSet<String>,
    ) -> Option<MaterialSlotPlan> {
        let Some(item) = self.registry.item_mut(id) else {
            log::warn!("Material '{}' was not registered.", material.name);
            return None;
        };

        if item.material_asset_reference.is_empty() {
            item.material_asset_reference =
                naming::material_instance_reference(&task.output_material_dir, &item.material_asset_name);
        }

        let instance_reference = item.material_asset_reference.clone();
        let material_asset_name = item.material_asset_name.clone();

        let save_extracted = self.config.save_extracted_parallax_maps;
        let textures: Vec<TextureBinding> = material
            .texture_infos()
            .values()
            .map(|texture| Self::plan_texture(task, material, texture, save_extracted, catalog, planned_assets))
            .collect();

        let standard_parameters = (material.material_type == MaterialType::Standard).then(|| {
            let has_parallax_map = [5, 6].map(|channel| {
                textures
                    .iter()
                    .any(|binding| binding.parallax.as_ref().is_some_and(|parallax| parallax.channel == channel))
            });
            StandardMaterialParameters::resolve(material, self.presets, &self.config.primary_world_layer, has_parallax_map)
        });

        Some(MaterialSlotPlan {
            slot_name: material.name.clone(),
            registry_id: id,
            instance_name: naming::material_instance_name(&material_asset_name),
            material_asset_name,
            create_instance: !catalog.asset_exists(&instance_reference)
                && planned_assets.insert(instance_reference.to_lowercase()),
            instance_reference,
            base_material_reference: naming::base_material_reference(&task.base_material_dir, &material.type_string),
            fallback_material_reference: naming::invalid_material_reference(&task.base_material_dir),
            textures,
            standard_parameters,
        })
    }

    fn plan_texture(
        task: &ImportTask,
        material: &MaterialInfo,
        texture: &TextureInfo,
        save_extracted: bool,
        catalog: &impl AssetCatalog,
        planned_assets: &mut HashSet<String>,
    ) -> TextureBinding {
        let asset_reference = naming::texture_reference(&task.output_texture_dir, &texture.name);
        let import = !catalog.asset_exists(&asset_reference) && planned_assets.insert(asset_reference.to_lowercase());

        let parallax = parallax_channel_for_normal(material.material_type, texture.channel)
            .filter(|(height_parameter, _)| material.safe_get_float_parameter(*height_parameter, 0.0) > 0.0)
            .map(|(_, channel)| {
                let asset_reference = naming::parallax_map_reference(&task.output_texture_dir, &texture.name);
                ParallaxBinding {
                    channel,
                    asset_name: naming::parallax_map_asset_name(&texture.name),
                    create: !catalog.asset_exists(&asset_reference)
                        && planned_assets.insert(asset_reference.to_lowercase()),
                    asset_reference,
                    source_normal_map: task.source_texture_dir.join(format!("{}.png", texture.name)),
                    extracted_source: ParallaxMap::source_path(&task.source_texture_dir, &texture.name),
                    save_extracted,
                    texture_parameter: naming::texture_parameter_name(channel),
                    uv_scale_offset_parameter: naming::uv_scale_offset_parameter_name(channel),
                }
            });

        TextureBinding {
            channel: texture.channel,
            texture_name: texture.name.clone(),
            asset_name: naming::texture_asset_name(&texture.name),
            asset_reference,
            source_candidates: naming::source_texture_candidates(&task.source_texture_dir, &texture.name),
            import,
            is_normal_map: texture.is_normal_map,
            address_x: texture.address_x,
            address_y: texture.address_y,
            texture_parameter: naming::texture_parameter_name(texture.channel),
            uv_scale_offset_parameter: naming::uv_scale_offset_parameter_name(texture.channel),
            uv_scale_offset: texture.uv_scale_offset(),
            parallax,
        }
    }
}
