use std::collections::BTreeSet;

use foundation::ids::TargetId;

/// Inbound lifecycle events, dispatched by `TargetSynchronizer::apply`.
///
/// Variants carrying a view value replace that slot of the held view state
/// before any refresh runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetEvent {
    UpdateIds(Vec<TargetId>),
    StaleIds(Vec<TargetId>),
    RemoveIds(Vec<TargetId>),
    FilterChanged(Option<BTreeSet<TargetId>>),
    /// `previous` is `None` on the first zoom observation.
    ZoomChanged {
        previous: Option<f64>,
        current: f64,
    },
    FocusChanged(Option<TargetId>),
    VectorModeChanged(bool),
    TrackToggleChanged(bool),
}

impl TargetEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TargetEvent::UpdateIds(_) => "update",
            TargetEvent::StaleIds(_) => "stale",
            TargetEvent::RemoveIds(_) => "remove",
            TargetEvent::FilterChanged(_) => "filter",
            TargetEvent::ZoomChanged { .. } => "zoom",
            TargetEvent::FocusChanged(_) => "focus",
            TargetEvent::VectorModeChanged(_) => "vector_mode",
            TargetEvent::TrackToggleChanged(_) => "track_toggle",
        }
    }

    /// Number of ids carried by id-list events.
    pub fn id_count(&self) -> usize {
        match self {
            TargetEvent::UpdateIds(ids) | TargetEvent::StaleIds(ids) | TargetEvent::RemoveIds(ids) => {
                ids.len()
            }
            _ => 0,
        }
    }
}
