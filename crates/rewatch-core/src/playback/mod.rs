mod threshold;
mod tracker;

pub use threshold::RewatchThresholdMonitor;
pub use tracker::PlaybackTracker;
