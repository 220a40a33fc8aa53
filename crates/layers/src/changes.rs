use std::collections::BTreeSet;

use foundation::ids::TargetId;

use crate::event::TargetEvent;

/// One delivery batch in the shape a property-change host produces: every
/// slot is independently optional and `None` means "did not change".
///
/// The nested options on `filter_ids` and `focus_id` distinguish "changed to
/// nothing" (`Some(None)`) from "unchanged" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub remove_ids: Option<Vec<TargetId>>,
    pub update_ids: Option<Vec<TargetId>>,
    pub stale_ids: Option<Vec<TargetId>>,
    pub zoom: Option<ZoomChange>,
    pub filter_ids: Option<Option<BTreeSet<TargetId>>>,
    pub vector_apparent: Option<bool>,
    pub focus_id: Option<Option<TargetId>>,
    pub show_track: Option<bool>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomChange {
    pub previous: Option<f64>,
    pub current: f64,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        *self == ChangeSet::default()
    }

    /// Events in dispatch order: remove, update, stale, zoom, filter, vector
    /// mode, focus, track toggle.
    pub fn into_events(self) -> Vec<TargetEvent> {
        let mut events = Vec::new();
        if let Some(ids) = self.remove_ids {
            events.push(TargetEvent::RemoveIds(ids));
        }
        if let Some(ids) = self.update_ids {
            events.push(TargetEvent::UpdateIds(ids));
        }
        if let Some(ids) = self.stale_ids {
            events.push(TargetEvent::StaleIds(ids));
        }
        if let Some(ZoomChange { previous, current }) = self.zoom {
            events.push(TargetEvent::ZoomChanged { previous, current });
        }
        if let Some(filter) = self.filter_ids {
            events.push(TargetEvent::FilterChanged(filter));
        }
        if let Some(apparent) = self.vector_apparent {
            events.push(TargetEvent::VectorModeChanged(apparent));
        }
        if let Some(focus) = self.focus_id {
            events.push(TargetEvent::FocusChanged(focus));
        }
        if let Some(show) = self.show_track {
            events.push(TargetEvent::TrackToggleChanged(show));
        }
        events
    }
}
