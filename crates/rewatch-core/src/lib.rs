//! # Rewatch Core Library
//!
//! This library tracks, for a continuously-playing linear medium such as a
//! video, which whole-second positions have been played at least once
//! ("watched") and which have been played a second time ("rewatched"), and
//! raises a one-time notification once cumulative rewatched coverage exceeds
//! a configurable fraction of the total duration.
//!
//! ## Architecture
//!
//! - **Interval sets**: sorted, disjoint, maximally-merged integer ranges
//!   recording per-second coverage
//! - **Playback tracker**: a caller-driven state machine that requires the
//!   caller to deliver position updates via `on_tick()`; every state change
//!   produces an [`Event`]
//! - **Threshold monitor**: a one-shot latch over the rewatched counter
//! - **Session**: wiring between an abstract time source, the tracker, and
//!   an optional write-only UI sink
//!
//! ## Key Components
//!
//! - [`IntervalSet`]: ordered coverage collection with merge-on-insert
//! - [`PlaybackTracker`]: second-crossing detection and classification
//! - [`RewatchThresholdMonitor`]: latched coverage-fraction check
//! - [`Config`]: TOML configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod intervals;
pub mod playback;
pub mod session;

pub use config::{Config, TrackingConfig, DEFAULT_PERCENTAGE_CHECK};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use format::format_hms;
pub use intervals::{InsertOutcome, Interval, IntervalSet};
pub use playback::{PlaybackTracker, RewatchThresholdMonitor};
pub use session::{NullSink, PlaybackSession, TimeSource, UiSink};
