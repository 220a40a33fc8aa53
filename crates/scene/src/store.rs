use std::collections::BTreeMap;

use foundation::ids::{FeatureKey, FeatureKind};

use crate::components::{FeatureStyle, Geometry};
use crate::feature::Feature;

/// Id-indexed feature storage consumed by the target synchronizer.
///
/// `keys_of_kind` returns owned keys so callers can mutate the store while
/// walking them.
pub trait FeatureStore {
    /// Inserts a feature, replacing any existing one with the same key.
    fn add_feature(&mut self, key: FeatureKey, geometry: Geometry, style: FeatureStyle);
    fn feature(&self, key: &FeatureKey) -> Option<&Feature>;
    fn feature_mut(&mut self, key: &FeatureKey) -> Option<&mut Feature>;
    fn remove_feature(&mut self, key: &FeatureKey) -> Option<Feature>;
    fn keys_of_kind(&self, kind: FeatureKind) -> Vec<FeatureKey>;
    fn len(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &FeatureKey) -> bool {
        self.feature(key).is_some()
    }
}

/// Ordered in-memory store. Iteration is sorted by (kind, target id).
#[derive(Debug, Default, Clone)]
pub struct MemoryFeatureStore {
    features: BTreeMap<FeatureKey, Feature>,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Lookup by the `"<prefix>-<target>"` string form.
    pub fn feature_by_external_id(&self, external_id: &str) -> Option<&Feature> {
        let key = FeatureKey::parse(external_id)?;
        self.features.get(&key)
    }

    pub fn count_of_kind(&self, kind: FeatureKind) -> usize {
        self.features.keys().filter(|k| k.kind == kind).count()
    }
}

impl FeatureStore for MemoryFeatureStore {
    fn add_feature(&mut self, key: FeatureKey, geometry: Geometry, style: FeatureStyle) {
        let feature = Feature::new(key.clone(), geometry, style);
        self.features.insert(key, feature);
    }

    fn feature(&self, key: &FeatureKey) -> Option<&Feature> {
        self.features.get(key)
    }

    fn feature_mut(&mut self, key: &FeatureKey) -> Option<&mut Feature> {
        self.features.get_mut(key)
    }

    fn remove_feature(&mut self, key: &FeatureKey) -> Option<Feature> {
        self.features.remove(key)
    }

    fn keys_of_kind(&self, kind: FeatureKind) -> Vec<FeatureKey> {
        self.features
            .keys()
            .filter(|k| k.kind == kind)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.features.len()
    }

    fn clear(&mut self) {
        self.features.clear();
    }
}
