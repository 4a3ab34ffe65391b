use std::path::Path;

use crate::{
    choreo::sequences::PageRefs,
    foundation::config::EngineConfig,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::geometry::SceneGeometry,
};

/// A laid-out page plus the element refs each composition binds to.
///
/// This is the file format the CLI consumes. `config` is optional and falls back to
/// [`EngineConfig::default`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub geometry: SceneGeometry,
    #[serde(default)]
    pub refs: PageRefs,
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

impl Scene {
    /// Parse and validate a JSON scene.
    pub fn from_json_str(s: &str) -> ScrollweaveResult<Self> {
        let scene: Self = serde_json::from_str(s)?;
        scene.geometry.validate()?;
        if let Some(cfg) = &scene.config {
            cfg.validate()?;
        }
        Ok(scene)
    }

    /// Read, parse and validate a JSON scene file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ScrollweaveResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            ScrollweaveError::validation(format!("read scene '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Config embedded in the scene, or the default.
    pub fn config_or_default(&self) -> EngineConfig {
        self.config.clone().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/scene.rs"]
mod tests;
