use foundation::ids::TargetId;
use foundation::time::Timestamp;
use scene::components::{FeatureStyle, IconStyle, MarkerStyle, Rgba, StrokeStyle, TextStyle};

use crate::config::{IconSet, OverlayConfig};
use crate::labels::label_text;
use crate::target::TargetSnapshot;
use crate::view::ViewState;

pub const APPARENT_WIND_COLOR: Rgba = Rgba::rgb(16, 75, 16);
pub const TRUE_WIND_COLOR: Rgba = Rgba::rgb(128, 128, 0);
pub const TRACK_COLOR: Rgba = Rgba::rgb(255, 0, 255);

pub const VECTOR_STROKE_WIDTH: f32 = 2.0;
pub const TRACK_STROKE_WIDTH: f32 = 1.0;
pub const TRACK_LINE_DASH: [f32; 2] = [2.0, 2.0];

pub const FOCUS_ICON_SIZE_PX: [f32; 2] = [50.0, 50.0];
pub const FOCUS_ICON_SCALE: f32 = 0.75;
pub const FOCUS_ICON_ANCHOR_PX: [f32; 2] = [9.5, 22.5];
pub const LABEL_OFFSET_Y_PX: f32 = -12.0;

/// Everything a style rule may read besides the target itself.
#[derive(Debug, Copy, Clone)]
pub struct StyleContext<'a> {
    pub view: &'a ViewState,
    pub config: &'a OverlayConfig,
    pub now: Timestamp,
}

impl<'a> StyleContext<'a> {
    pub fn new(view: &'a ViewState, config: &'a OverlayConfig, now: Timestamp) -> Self {
        Self { view, config, now }
    }

    fn vectors_shown(&self) -> bool {
        self.view.zoom_level() >= self.config.vector_min_zoom
    }
}

/// Bearing the wind vector points along, or `None` when the active mode has
/// no data. Zero (north) is a valid direction.
pub fn wind_direction(target: &TargetSnapshot, vector_apparent: bool) -> Option<f64> {
    if vector_apparent {
        target.wind.awa.map(|awa| target.orientation + awa)
    } else {
        target.wind.direction
    }
}

pub fn is_inactive(target: &TargetSnapshot, now: Timestamp, inactive_time_ms: i64) -> bool {
    now.millis_since(target.last_updated) >= inactive_time_ms
}

/// Buddy icon if flagged and configured, else the default; the inactive icon
/// overrides both.
pub fn marker_icon<'a>(
    target: &TargetSnapshot,
    icons: &'a IconSet,
    now: Timestamp,
    inactive_time_ms: i64,
) -> &'a str {
    if is_inactive(target, now, inactive_time_ms) {
        return &icons.inactive;
    }
    match &icons.buddy {
        Some(buddy) if target.buddy => buddy,
        _ => &icons.default,
    }
}

pub fn marker_style(id: &TargetId, target: &TargetSnapshot, ctx: &StyleContext<'_>) -> FeatureStyle {
    let icons = &ctx.config.icons;
    let icon = marker_icon(target, icons, ctx.now, ctx.config.inactive_time_ms);

    if !ctx.view.passes_filter(id) {
        return FeatureStyle::Marker(MarkerStyle {
            icon: IconStyle::new(icon, target.orientation, 0.0),
            text: None,
        });
    }

    if let Some(focus_icon) = &icons.focus
        && ctx.view.is_focus(id)
    {
        let mut icon = IconStyle::new(focus_icon.as_str(), target.orientation, 1.0);
        icon.size_px = Some(FOCUS_ICON_SIZE_PX);
        icon.scale = FOCUS_ICON_SCALE;
        icon.anchor_px = Some(FOCUS_ICON_ANCHOR_PX);
        return FeatureStyle::Marker(MarkerStyle { icon, text: None });
    }

    FeatureStyle::Marker(MarkerStyle {
        icon: IconStyle::new(icon, target.orientation, 1.0),
        text: Some(TextStyle {
            text: label_text(target, ctx.view.zoom_level(), ctx.config.label_min_zoom),
            offset_y_px: LABEL_OFFSET_Y_PX,
        }),
    })
}

pub fn vector_style(id: &TargetId, ctx: &StyleContext<'_>) -> FeatureStyle {
    let base = if ctx.view.vector_apparent {
        APPARENT_WIND_COLOR
    } else {
        TRUE_WIND_COLOR
    };
    let visible = ctx.vectors_shown() && ctx.view.passes_filter(id);
    FeatureStyle::Stroke(StrokeStyle {
        color: base.with_alpha(if visible { 1.0 } else { 0.0 }),
        width: VECTOR_STROKE_WIDTH,
        line_dash: None,
    })
}

pub fn track_style(id: &TargetId, ctx: &StyleContext<'_>) -> FeatureStyle {
    let visible = ctx.vectors_shown() && ctx.view.show_track && ctx.view.passes_filter(id);
    FeatureStyle::Stroke(StrokeStyle {
        color: TRACK_COLOR.with_alpha(if visible { 1.0 } else { 0.0 }),
        width: TRACK_STROKE_WIDTH,
        line_dash: Some(TRACK_LINE_DASH),
    })
}
