//! Integration tests spanning manifest parsing, preset resolution and import planning


use std::path::{Path, PathBuf};

/// Write an asset directory `<root>/<name>/` with an empty mesh source and `manifest`
pub(crate) fn write_asset(root: &Path, name: &str, manifest: &str) -> PathBuf {
    let directory = root.join(name);
    std::fs::create_dir_all(&directory).unwrap();
    std::fs::write(directory.join(format!("{name}.fbx")), b"").unwrap();
    std::fs::write(directory.join(format!("{name}.json")), manifest).unwrap();
    directory
}

/// Manifest with one shared rock material and one crystal material
pub(crate) fn rock_manifest(mesh: &str, rock_material: &str) -> String {
    format!(
        r#"{{
            "Version": "1.1.0",
            "Meshes": ["{mesh}"],
            "Materials": {{
                "Props:{rock_material}": {{
                    "Type": "23",
                    "Parameters": [0, 4, "rock", 0, 0, 0, 0, 0.5],
                    "Textures": {{
                        "Texture1": {{ "Name": "Albedo_Rock", "Parameters": [0, 0, 0] }},
                        "Texture2": {{ "Name": "Normal_Rock", "Parameters": [1, 1, 1] }}
                    }}
                }},
                "Props:crystal": {{
                    "Type": "30",
                    "Parameters": [0, 4, 1.5, 2.5, 3.5, 4.5],
                    "Textures": {{
                        "Texture1": {{ "Name": "Crystal_Glow", "Parameters": [0, 0, 0] }}
                    }}
                }}
            }}
        }}"#
    )
}
