//! AIS target overlay: keeps marker, wind-vector and track features in step
//! with live target snapshots and the current view.

pub mod changes;
pub mod config;
pub mod event;
pub mod geometry;
pub mod labels;
pub mod stats;
pub mod symbology;
pub mod sync;
pub mod target;
pub mod view;

pub use changes::{ChangeSet, ZoomChange};
pub use config::{ConfigError, IconSet, OverlayConfig};
pub use event::TargetEvent;
pub use stats::{KindCounters, SyncStats};
pub use sync::{SyncError, TargetSynchronizer};
pub use target::{TargetSnapshot, TargetSource, Wind};
pub use view::ViewState;
