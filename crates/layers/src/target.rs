use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use foundation::ids::TargetId;
use foundation::math::LonLat;
use foundation::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Wind observation. Which field is present selects the vector mode that can
/// draw it: `direction` for true wind, `awa` for apparent wind.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    /// True wind bearing, degrees.
    pub direction: Option<f64>,
    /// Apparent wind angle relative to the target's orientation, degrees.
    pub awa: Option<f64>,
}

/// Latest known state of one tracked vessel. Read-only to the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSnapshot {
    pub id: TargetId,
    #[serde(default)]
    pub position: Option<LonLat>,
    /// Heading, degrees.
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub wind: Wind,
    /// Historical path, already split where the source saw a discontinuity.
    #[serde(default)]
    pub track: Vec<Vec<LonLat>>,
    #[serde(default)]
    pub last_updated: Timestamp,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub mmsi: Option<String>,
    #[serde(default)]
    pub buddy: bool,
}

impl TargetSnapshot {
    pub fn new(id: impl Into<TargetId>) -> Self {
        Self {
            id: id.into(),
            position: None,
            orientation: 0.0,
            wind: Wind::default(),
            track: Vec::new(),
            last_updated: Timestamp::default(),
            name: None,
            callsign: None,
            mmsi: None,
            buddy: false,
        }
    }
}

/// Lookup of current snapshots by id.
pub trait TargetSource {
    fn get(&self, id: &TargetId) -> Option<&TargetSnapshot>;
}

impl<S: BuildHasher> TargetSource for HashMap<TargetId, TargetSnapshot, S> {
    fn get(&self, id: &TargetId) -> Option<&TargetSnapshot> {
        HashMap::get(self, id)
    }
}

impl TargetSource for BTreeMap<TargetId, TargetSnapshot> {
    fn get(&self, id: &TargetId) -> Option<&TargetSnapshot> {
        BTreeMap::get(self, id)
    }
}
