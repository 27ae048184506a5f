//! Engine configuration

use serde::{Deserialize, Serialize};

/// How the dispatcher treats elements that fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Fail the render with a validation error
    Diagnostics,
    /// Write an inline error annotation and keep rendering
    Production,
}

impl Default for RenderMode {
    /// `Diagnostics` in debug builds, `Production` in release builds
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Diagnostics
        } else {
            Self::Production
        }
    }
}

/// Configuration for a [`ReportEngine`](crate::ReportEngine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of invalid view elements
    pub render_mode: RenderMode,

    /// Longest chain of references or nested definitions followed before
    /// resolution gives up with a cycle error
    pub max_resolution_depth: usize,

    /// Rows read from a data source per query; `None` reads everything
    pub max_result_rows: Option<usize>,

    /// Whether compiled expressions are cached per render scope
    pub expression_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            max_resolution_depth: 64,
            max_result_rows: Some(10_000),
            expression_cache: true,
        }
    }
}

impl EngineConfig {
    /// Configuration for authoring: invalid views fail loudly
    pub fn diagnostics() -> Self {
        Self {
            render_mode: RenderMode::Diagnostics,
            ..Self::default()
        }
    }

    /// Configuration for serving reports: invalid elements are annotated inline
    pub fn production() -> Self {
        Self {
            render_mode: RenderMode::Production,
            ..Self::default()
        }
    }

    /// Load from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the result-row cap
    pub fn with_max_result_rows(mut self, max: Option<usize>) -> Self {
        self.max_result_rows = max;
        self
    }
}
