use foundation::math::{LonLat, MapCoord, Projection, destination_point, unwrap_longitudes};
use scene::components::Geometry;

pub fn marker_geometry<P: Projection + ?Sized>(position: LonLat, projection: &P) -> Geometry {
    Geometry::point(projection.project(position))
}

/// Far end of the wind vector: `length_m` from `position` along `direction_deg`.
pub fn wind_endpoint(position: LonLat, direction_deg: f64, length_m: f64) -> LonLat {
    destination_point(position, direction_deg, length_m)
}

pub fn vector_geometry<P: Projection + ?Sized>(
    position: LonLat,
    direction_deg: f64,
    length_m: f64,
    projection: &P,
) -> Geometry {
    let end = wind_endpoint(position, direction_deg, length_m);
    Geometry::line_string(vec![projection.project(position), projection.project(end)])
}

/// Projected track lines. Each segment is unwrapped across the antimeridian
/// on its own; segments are never joined.
pub fn track_lines<P: Projection + ?Sized>(track: &[Vec<LonLat>], projection: &P) -> Vec<Vec<MapCoord>> {
    track
        .iter()
        .map(|segment| projection.project_all(&unwrap_longitudes(segment)))
        .collect()
}

pub fn track_geometry<P: Projection + ?Sized>(track: &[Vec<LonLat>], projection: &P) -> Geometry {
    Geometry::multi_line_string(track_lines(track, projection))
}
