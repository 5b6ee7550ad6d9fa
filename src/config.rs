//! Export configuration
//!
//! An [`ExportConfig`] is plain data: it can be built in code with the
//! `with_*` helpers or deserialized from JSON, where every field is optional.
//!
//! ```json
//! { "layout": { "explicit": ["t", "z", "y", "x"] }, "chunk_len": 12 }
//! ```

use crate::dimension::Axis;
use crate::errors::{Result, RuGaXError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output axis order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLayout {
    /// Leading pair from the built-in preference table
    #[default]
    Preferred,
    /// Caller's order; varying axes it omits follow in preferred order
    Explicit(Vec<Axis>),
}

/// Dimension labels used on the exported array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisNames {
    pub x: String,
    pub y: String,
    pub z: String,
    pub t: String,
    pub e: String,
}

impl Default for AxisNames {
    fn default() -> Self {
        Self {
            x: "lon".to_string(),
            y: "lat".to_string(),
            z: "lev".to_string(),
            t: "time".to_string(),
            e: "ens".to_string(),
        }
    }
}

impl AxisNames {
    pub fn label(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
            Axis::T => &self.t,
            Axis::E => &self.e,
        }
    }
}

/// Configuration for an [`Exporter`](crate::export::Exporter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub names: AxisNames,
    pub layout: AxisLayout,
    /// Chunk length along the leading axis of chunked exports; whole axis when unset
    pub chunk_len: Option<usize>,
    /// Attach a `history` attribute stamped with the export time
    pub history: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            names: AxisNames::default(),
            layout: AxisLayout::Preferred,
            chunk_len: None,
            history: true,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: AxisLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_names(mut self, names: AxisNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_chunk_len(mut self, chunk_len: usize) -> Self {
        self.chunk_len = Some(chunk_len);
        self
    }

    pub fn without_history(mut self) -> Self {
        self.history = false;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RuGaXError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_len == Some(0) {
            return Err(RuGaXError::Config("chunk_len must be positive".to_string()));
        }
        Ok(())
    }
}
