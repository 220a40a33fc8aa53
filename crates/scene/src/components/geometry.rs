use foundation::math::MapCoord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    MultiLineString,
}

/// Feature geometry in display-projection coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point { position: MapCoord },
    LineString { vertices: Vec<MapCoord> },
    MultiLineString { lines: Vec<Vec<MapCoord>> },
}

impl Geometry {
    pub fn point(position: MapCoord) -> Self {
        Geometry::Point { position }
    }

    pub fn line_string(vertices: Vec<MapCoord>) -> Self {
        Geometry::LineString { vertices }
    }

    pub fn multi_line_string(lines: Vec<Vec<MapCoord>>) -> Self {
        Geometry::MultiLineString { lines }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point { .. } => GeometryKind::Point,
            Geometry::LineString { .. } => GeometryKind::LineString,
            Geometry::MultiLineString { .. } => GeometryKind::MultiLineString,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point { .. } => 1,
            Geometry::LineString { vertices } => vertices.len(),
            Geometry::MultiLineString { lines } => lines.iter().map(Vec::len).sum(),
        }
    }
}
