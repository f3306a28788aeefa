use std::fs;
use std::path::Path;

use cutout::PlacementAnchor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One companion object requested by a scene, placed relative to the main
/// object by a polar offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneObject {
    pub name: String,
    /// Degrees from the +x axis; negative values point below the main
    /// object.
    pub angle: f32,
    /// Normalized distance from the main object.
    pub distance: f32,
}

/// Scene description: a main object with companions placed around it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    pub main: String,
    /// Normalized anchor for the main object, center by default.
    #[serde(default = "default_anchor")]
    pub anchor: [f32; 2],
    #[serde(default)]
    pub companions: Vec<SceneObject>,
}

fn default_anchor() -> [f32; 2] {
    [0.5, 0.5]
}

impl SceneConfig {
    /// Load a scene from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a scene from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a scene from a JSON string
    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load the scene
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(SceneError::UnsupportedFileFormat),
        }
    }

    /// Convert the scene to a pretty JSON string
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Resolve every object of the scene to a concrete placement anchor:
    /// the main object at its own anchor, companions offset from it.
    /// Out-of-canvas positions are clamped (with a logged warning).
    pub fn resolved_placements(&self) -> Vec<(String, PlacementAnchor)> {
        let (main_anchor, _) = PlacementAnchor::new(self.anchor[0], self.anchor[1]).clamped();

        let mut placements = vec![(self.main.clone(), main_anchor)];
        for companion in &self.companions {
            let (anchor, _) = main_anchor.offset(companion.angle, companion.distance);
            placements.push((companion.name.clone(), anchor));
        }
        placements
    }
}
