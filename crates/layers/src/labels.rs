use crate::target::TargetSnapshot;

/// First non-empty of name, callsign, mmsi.
pub fn label_candidate(target: &TargetSnapshot) -> Option<&str> {
    [&target.name, &target.callsign, &target.mmsi]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Label text shown next to a marker; empty below `label_min_zoom`.
pub fn label_text(target: &TargetSnapshot, zoom: f64, label_min_zoom: f64) -> String {
    if zoom < label_min_zoom {
        return String::new();
    }
    label_candidate(target).unwrap_or_default().to_string()
}

/// True when a zoom change can alter marker labels: the first observation,
/// or a move across `label_min_zoom` in either direction.
pub fn crosses_label_threshold(previous: Option<f64>, current: f64, label_min_zoom: f64) -> bool {
    match previous {
        None => true,
        Some(previous) => (previous < label_min_zoom) != (current < label_min_zoom),
    }
}
