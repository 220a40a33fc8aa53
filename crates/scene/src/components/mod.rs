pub mod geometry;
pub mod style;

pub use geometry::*;
pub use style::*;
