use super::{LonLat, WGS84_A};

/// Latitude bound of the square Web Mercator world.
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// A point in the display projection.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MapCoord {
    pub x: f64,
    pub y: f64,
}

impl MapCoord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pure mapping from geographic degrees to display coordinates.
pub trait Projection {
    fn project(&self, p: LonLat) -> MapCoord;

    fn project_all(&self, points: &[LonLat]) -> Vec<MapCoord> {
        points.iter().map(|p| self.project(*p)).collect()
    }
}

impl<F> Projection for F
where
    F: Fn(LonLat) -> MapCoord,
{
    fn project(&self, p: LonLat) -> MapCoord {
        self(p)
    }
}

/// EPSG:4326 → EPSG:3857 (spherical Web Mercator, meters).
///
/// Longitudes outside [-180, 180] project linearly past the world edge, which
/// keeps unwrapped tracks continuous.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn project(&self, p: LonLat) -> MapCoord {
        let lat = p.lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);
        let x = WGS84_A * p.lon.to_radians();
        let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        MapCoord::new(x, y)
    }
}
