use foundation::ids::FeatureKind;

/// Per-kind counter triple.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct KindCounters {
    pub marker: u64,
    pub vector: u64,
    pub track: u64,
}

impl KindCounters {
    pub fn get(&self, kind: FeatureKind) -> u64 {
        match kind {
            FeatureKind::Marker => self.marker,
            FeatureKind::Vector => self.vector,
            FeatureKind::Track => self.track,
        }
    }

    pub fn bump(&mut self, kind: FeatureKind) {
        match kind {
            FeatureKind::Marker => self.marker += 1,
            FeatureKind::Vector => self.vector += 1,
            FeatureKind::Track => self.track += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.marker + self.vector + self.track
    }
}

/// Deterministic store-mutation counters kept by the synchronizer.
///
/// `updated` counts geometry rewrites of existing features; `restyled` counts
/// style-only refreshes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub events: u64,
    pub added: KindCounters,
    pub updated: KindCounters,
    pub restyled: KindCounters,
    pub removed: KindCounters,
}

impl SyncStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
