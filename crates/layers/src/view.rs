use std::collections::BTreeSet;

use foundation::ids::TargetId;

use crate::event::TargetEvent;

/// Immutable snapshot of the frequently changing view parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// `None` until the host reports a zoom level.
    pub zoom: Option<f64>,
    pub focus_id: Option<TargetId>,
    /// Absent or empty means no filtering.
    pub filter_ids: Option<BTreeSet<TargetId>>,
    pub vector_apparent: bool,
    pub show_track: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: None,
            focus_id: None,
            filter_ids: None,
            vector_apparent: false,
            show_track: true,
        }
    }
}

impl ViewState {
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_focus(mut self, id: impl Into<TargetId>) -> Self {
        self.focus_id = Some(id.into());
        self
    }

    pub fn with_filter<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetId>,
    {
        self.filter_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_vector_apparent(mut self, apparent: bool) -> Self {
        self.vector_apparent = apparent;
        self
    }

    pub fn with_show_track(mut self, show: bool) -> Self {
        self.show_track = show;
        self
    }

    /// Zoom used for styling; an unreported zoom counts as 0.
    pub fn zoom_level(&self) -> f64 {
        self.zoom.unwrap_or(0.0)
    }

    /// Whether `id` passes the filter. Always checks the bare target id.
    pub fn passes_filter(&self, id: &TargetId) -> bool {
        match &self.filter_ids {
            Some(ids) if !ids.is_empty() => ids.contains(id),
            _ => true,
        }
    }

    pub fn is_focus(&self, id: &TargetId) -> bool {
        self.focus_id.as_ref() == Some(id)
    }

    /// Events that turn `self` into `next`, in dispatch order: zoom, filter,
    /// vector mode, focus, track toggle. Unchanged slots produce nothing.
    /// Dropping back to an unreported zoom is emitted as a change to level 0,
    /// the level an unreported zoom styles at.
    pub fn diff(&self, next: &ViewState) -> Vec<TargetEvent> {
        let mut events = Vec::new();
        if self.zoom != next.zoom {
            events.push(TargetEvent::ZoomChanged {
                previous: self.zoom,
                current: next.zoom_level(),
            });
        }
        if self.filter_ids != next.filter_ids {
            events.push(TargetEvent::FilterChanged(next.filter_ids.clone()));
        }
        if self.vector_apparent != next.vector_apparent {
            events.push(TargetEvent::VectorModeChanged(next.vector_apparent));
        }
        if self.focus_id != next.focus_id {
            events.push(TargetEvent::FocusChanged(next.focus_id.clone()));
        }
        if self.show_track != next.show_track {
            events.push(TargetEvent::TrackToggleChanged(next.show_track));
        }
        events
    }
}
