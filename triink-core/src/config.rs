/// Viewer configuration
///
/// Values can come from a TOML file, command-line flags or a host page.
/// Out-of-range numbers are clamped by [`ViewerConfig::sanitized`] rather
/// than rejected.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TriinkError};

/// Triangle budget bounds
pub const TRIANGLE_LIMIT_RANGE: (i64, i64) = (50, 50_000);
/// Field-of-view bounds in degrees
pub const FOV_RANGE: (f64, f64) = (20.0, 140.0);
/// Scene-insertion mesh identifier bounds
pub const MESH_ID_RANGE: (i64, i64) = (1, 999);

/// Settings consumed by the viewer and the export codecs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Maximum number of triangles kept on load
    pub triangle_limit: i64,
    /// Vertical field of view in degrees
    pub fov_degrees: f64,
    /// Cycle the display palette instead of a flat colour
    pub colors: bool,
    pub backface_cull: bool,
    pub auto_rotate: bool,
    /// Mesh identifier written by the scene-insertion export
    pub mesh_id: i64,
    /// Cull flag written by the scene-insertion export
    pub insert_backcull: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            triangle_limit: 600,
            fov_degrees: 75.0,
            colors: true,
            backface_cull: false,
            auto_rotate: false,
            mesh_id: 7,
            insert_backcull: false,
        }
    }
}

impl ViewerConfig {
    /// Parse TOML text. Missing keys take their defaults; the result is sanitized.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<Self>(text).map(Self::sanitized)
    }

    /// Load a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TriinkError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| TriinkError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Clamp every numeric field into its safe range
    pub fn sanitized(mut self) -> Self {
        self.triangle_limit = clamp_triangle_limit(self.triangle_limit) as i64;
        self.fov_degrees = clamp_fov(self.fov_degrees);
        self.mesh_id = clamp_mesh_id(self.mesh_id);
        self
    }

    /// Triangle budget as a count, already clamped
    pub fn triangle_budget(&self) -> usize {
        clamp_triangle_limit(self.triangle_limit)
    }
}

pub fn clamp_triangle_limit(limit: i64) -> usize {
    limit.clamp(TRIANGLE_LIMIT_RANGE.0, TRIANGLE_LIMIT_RANGE.1) as usize
}

/// Non-finite values fall back to the default field of view
pub fn clamp_fov(degrees: f64) -> f64 {
    if degrees.is_finite() {
        degrees.clamp(FOV_RANGE.0, FOV_RANGE.1)
    } else {
        ViewerConfig::default().fov_degrees
    }
}

pub fn clamp_mesh_id(id: i64) -> i64 {
    id.clamp(MESH_ID_RANGE.0, MESH_ID_RANGE.1)
}
