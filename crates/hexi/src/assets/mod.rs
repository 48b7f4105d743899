pub mod atlas;
pub mod progress_bar;
pub mod resources;
pub mod tracker;

pub use atlas::Atlas;
pub use progress_bar::ProgressBar;
pub use resources::{AssetKind, Payload, Resource, ResourceTable};
pub use tracker::LoadTracker;
