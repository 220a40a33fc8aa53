use foundation::ids::FeatureKey;
use foundation::math::MapCoord;

use crate::components::{FeatureStyle, Geometry};

/// A renderable record owned by a [`crate::FeatureStore`].
///
/// `revision` increments on every mutation so callers can tell whether an
/// operation touched a feature at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    key: FeatureKey,
    geometry: Geometry,
    style: FeatureStyle,
    revision: u64,
}

impl Feature {
    pub fn new(key: FeatureKey, geometry: Geometry, style: FeatureStyle) -> Self {
        Self {
            key,
            geometry,
            style,
            revision: 0,
        }
    }

    pub fn key(&self) -> &FeatureKey {
        &self.key
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn style(&self) -> &FeatureStyle {
        &self.style
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.revision += 1;
    }

    pub fn set_style(&mut self, style: FeatureStyle) {
        self.style = style;
        self.revision += 1;
    }

    /// Replaces the line coordinates of a multi line string in place.
    /// Any other geometry is swapped for a multi line string.
    pub fn set_coordinates(&mut self, lines: Vec<Vec<MapCoord>>) {
        match &mut self.geometry {
            Geometry::MultiLineString { lines: current } => *current = lines,
            other => *other = Geometry::multi_line_string(lines),
        }
        self.revision += 1;
    }

    /// Geometry and style, ignoring revision.
    pub fn same_content(&self, other: &Feature) -> bool {
        self.key == other.key && self.geometry == other.geometry && self.style == other.style
    }
}
