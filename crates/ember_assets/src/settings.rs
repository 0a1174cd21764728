use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, postprocess::ImportFlags};

/// Knobs of the model import pipeline.
///
/// Every field has a default, so a settings file only needs the values it
/// wants to change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Entity name used for nodes that have none.
    pub fallback_node_name: String,
    /// Shader program assigned to every imported mesh.
    pub shader: Option<String>,
    /// Decoder flags when a model is loaded as a new scene root.
    pub scene_flags: ImportFlags,
    /// Decoder flags when a model is loaded under an existing entity.
    pub child_flags: ImportFlags,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            fallback_node_name: "New node".to_owned(),
            shader: None,
            scene_flags: ImportFlags::smooth_triangulated(),
            child_flags: ImportFlags::flat_normals(),
        }
    }
}

impl ImportSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::NormalGeneration;

    #[test]
    fn defaults_match_the_two_entry_points() {
        let settings = ImportSettings::default();

        assert_eq!(settings.fallback_node_name, "New node");
        assert_eq!(settings.shader, None);
        assert_eq!(settings.scene_flags.normals, NormalGeneration::Smooth);
        assert!(settings.scene_flags.triangulate);
        assert_eq!(settings.child_flags.normals, NormalGeneration::Flat);
        assert!(!settings.child_flags.triangulate);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let settings = ImportSettings::from_json_str(
            r#"{ "fallback_node_name": "Unnamed", "shader": "skinned", "child_flags": { "triangulate": true } }"#,
        )
        .unwrap();

        assert_eq!(settings.fallback_node_name, "Unnamed");
        assert_eq!(settings.shader.as_deref(), Some("skinned"));
        assert_eq!(settings.scene_flags, ImportFlags::smooth_triangulated());
        assert_eq!(settings.child_flags.normals, NormalGeneration::None);
        assert!(settings.child_flags.triangulate);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ImportSettings::from_json_str("{ fallback_node_name: 3 }").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));

        let err = ImportSettings::from_json_file(path).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
