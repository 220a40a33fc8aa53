use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters).
///
/// Also the sphere radius used by [`destination_point`].
pub const WGS84_A: f64 = 6_378_137.0;

/// Geographic position in degrees, longitude first (EPSG:4326 axis order).
///
/// Serializes as a `[lon, lat]` pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}

/// Spherical forward solution: the point `distance_m` from `origin` along the
/// great circle leaving at `bearing_deg` (clockwise from north).
///
/// The returned longitude is continuous with `origin.lon` rather than wrapped
/// into [-180, 180), so a short line from `origin` never jumps across the map
/// at the antimeridian.
pub fn destination_point(origin: LonLat, bearing_deg: f64, distance_m: f64) -> LonLat {
    let delta = distance_m / WGS84_A;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();

    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let d_lambda = y.atan2(x);

    LonLat::new(origin.lon + d_lambda.to_degrees(), phi2.to_degrees())
}

/// Rewrites longitudes so every consecutive delta lies within [-180, 180].
///
/// The first point is kept as-is; each later point is shifted by whole turns
/// relative to its (already shifted) predecessor. A path crossing the
/// antimeridian therefore continues past ±180 instead of wrapping.
pub fn unwrap_longitudes(segment: &[LonLat]) -> Vec<LonLat> {
    let mut out: Vec<LonLat> = Vec::with_capacity(segment.len());
    for p in segment {
        let lon = match out.last() {
            None => p.lon,
            Some(prev) => {
                let delta = p.lon - prev.lon;
                p.lon - 360.0 * (delta / 360.0).round()
            }
        };
        out.push(LonLat::new(lon, p.lat));
    }
    out
}
