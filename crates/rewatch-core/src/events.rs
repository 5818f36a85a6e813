use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the tracker produces an Event.
/// The UI layer polls for events; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Playback started (or restarted after a pause).
    PlaybackStarted {
        play_count: u32,
        position_secs: f64,
        at: DateTime<Utc>,
    },
    /// Medium duration (and layout scratch) became known.
    MetadataLoaded {
        duration_secs: f64,
        render_width: u32,
        at: DateTime<Utc>,
    },
    /// A whole second was crossed for the first time.
    SecondWatched {
        second: u64,
        at: DateTime<Utc>,
    },
    /// A previously-watched second was crossed again.
    SecondRewatched {
        second: u64,
        count_rewatched: u64,
        at: DateTime<Utc>,
    },
    /// Rewatched coverage crossed the configured fraction of the duration.
    /// Emitted at most once per tracker.
    RewatchThresholdCrossed {
        count_rewatched: u64,
        duration_secs: f64,
        percentage_check: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        position_secs: f64,
        duration_secs: f64,
        elapsed: String,
        fraction_played: f64,
        play_count: u32,
        count_rewatched: u64,
        watched_secs: u64,
        rewatched_secs: u64,
        threshold_crossed: bool,
        at: DateTime<Utc>,
    },
}
