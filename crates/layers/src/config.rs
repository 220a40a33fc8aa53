use serde::{Deserialize, Serialize};

/// Number of zoom levels covered by the vector length table.
pub const ZOOM_LEVELS: usize = 30;

/// Visual wind-vector length in meters per integer zoom level. Chosen so the
/// drawn arrow has a similar on-screen length at every zoom; it does not scale
/// with wind speed.
pub const DEFAULT_ZOOM_OFFSET_LEVEL: [f64; ZOOM_LEVELS] = [
    1.0, 1_000_000.0, 550_000.0, 290_000.0, 140_000.0, 70_000.0, 38_000.0, 17_000.0, 7_600.0,
    3_900.0, 1_900.0, 950.0, 470.0, 250.0, 120.0, 60.0, 30.0, 15.5, 8.1, 4.0, 2.0, 1.0, 0.5, 0.25,
    0.12, 0.06, 0.03, 0.015, 0.008, 1.0,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconSet {
    pub default: String,
    pub inactive: String,
    pub focus: Option<String>,
    pub buddy: Option<String>,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            default: "ais_active.svg".to_string(),
            inactive: "ais_inactive.svg".to_string(),
            focus: None,
            buddy: None,
        }
    }
}

/// Fixed overlay configuration. Every field is optional in JSON and falls
/// back to [`OverlayConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    pub label_min_zoom: f64,
    pub vector_min_zoom: f64,
    /// Targets silent for at least this long use the inactive icon.
    pub inactive_time_ms: i64,
    pub zoom_offset_level: Vec<f64>,
    pub icons: IconSet,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            label_min_zoom: 10.0,
            vector_min_zoom: 15.0,
            inactive_time_ms: 180_000,
            zoom_offset_level: DEFAULT_ZOOM_OFFSET_LEVEL.to_vec(),
            icons: IconSet::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    ZoomTable { len: usize },
    Range { field: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid overlay config: {msg}"),
            ConfigError::ZoomTable { len } => write!(
                f,
                "zoomOffsetLevel must have {ZOOM_LEVELS} entries, got {len}"
            ),
            ConfigError::Range { field } => write!(f, "{field} is out of range"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl OverlayConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: OverlayConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zoom_offset_level.len() != ZOOM_LEVELS {
            return Err(ConfigError::ZoomTable {
                len: self.zoom_offset_level.len(),
            });
        }
        if self
            .zoom_offset_level
            .iter()
            .any(|d| !d.is_finite() || *d < 0.0)
        {
            return Err(ConfigError::Range {
                field: "zoomOffsetLevel",
            });
        }
        if !self.label_min_zoom.is_finite() || self.label_min_zoom < 0.0 {
            return Err(ConfigError::Range {
                field: "labelMinZoom",
            });
        }
        if !self.vector_min_zoom.is_finite() || self.vector_min_zoom < 0.0 {
            return Err(ConfigError::Range {
                field: "vectorMinZoom",
            });
        }
        if self.inactive_time_ms < 0 {
            return Err(ConfigError::Range {
                field: "inactiveTimeMs",
            });
        }
        Ok(())
    }

    /// Wind-vector length for a (possibly fractional) zoom: the table entry
    /// at `floor(zoom)`, clamped to the table.
    pub fn vector_length_m(&self, zoom: f64) -> f64 {
        let last = self.zoom_offset_level.len().saturating_sub(1);
        let index = if zoom.is_nan() {
            0
        } else {
            (zoom.floor().max(0.0) as usize).min(last)
        };
        self.zoom_offset_level.get(index).copied().unwrap_or(0.0)
    }
}
