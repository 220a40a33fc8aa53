pub mod components;
pub mod feature;
pub mod store;

pub use components::*;
pub use feature::*;
pub use store::*;
