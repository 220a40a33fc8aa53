use serde::{Deserialize, Serialize};

/// Stable identifier of a tracked target (an MMSI, a Signal K context, ...).
///
/// Deserializes from either a JSON string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTargetId", into = "String")]
pub struct TargetId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTargetId {
    Text(String),
    Number(u64),
}

impl From<RawTargetId> for TargetId {
    fn from(raw: RawTargetId) -> Self {
        match raw {
            RawTargetId::Text(s) => Self(s),
            RawTargetId::Number(n) => Self(n.to_string()),
        }
    }
}

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TargetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TargetId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three feature kinds derived from one target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKind {
    Marker,
    Vector,
    Track,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 3] = [FeatureKind::Marker, FeatureKind::Vector, FeatureKind::Track];

    /// Prefix used in external feature ids.
    pub const fn prefix(self) -> &'static str {
        match self {
            FeatureKind::Marker => "ais",
            FeatureKind::Vector => "wind",
            FeatureKind::Track => "track",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

/// Identity of one feature: its kind plus the bare target id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureKey {
    pub kind: FeatureKind,
    pub target: TargetId,
}

impl FeatureKey {
    pub fn new(kind: FeatureKind, target: TargetId) -> Self {
        Self { kind, target }
    }

    pub fn marker(target: &TargetId) -> Self {
        Self::new(FeatureKind::Marker, target.clone())
    }

    pub fn vector(target: &TargetId) -> Self {
        Self::new(FeatureKind::Vector, target.clone())
    }

    pub fn track(target: &TargetId) -> Self {
        Self::new(FeatureKind::Track, target.clone())
    }

    /// `"<prefix>-<target>"`, e.g. `"wind-366999712"`.
    pub fn external_id(&self) -> String {
        format!("{}-{}", self.kind.prefix(), self.target)
    }

    /// Inverse of [`FeatureKey::external_id`]. Target ids may themselves
    /// contain `-`; only the first one separates the prefix.
    pub fn parse(external_id: &str) -> Option<Self> {
        let (prefix, target) = external_id.split_once('-')?;
        let kind = FeatureKind::from_prefix(prefix)?;
        Some(Self::new(kind, TargetId::new(target)))
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.target)
    }
}
