//! Playback tracker implementation.
//!
//! The tracker is a caller-driven state machine. It does not use internal
//! threads or observe a clock - the caller delivers position updates via
//! `on_tick()` whenever its time source reports progress.
//!
//! Only whole-second *crossings* matter: a tick that stays within the same
//! second updates the observed position and nothing else. Each crossed
//! second is classified as a first watch or a rewatch against the two
//! coverage sets.
//!
//! ## Usage
//!
//! ```ignore
//! let mut tracker = PlaybackTracker::new(0.25);
//! tracker.on_metadata_ready(duration, width);
//! tracker.on_play_start(0.0);
//! // On every time-source tick:
//! let events = tracker.on_tick(position); // classification events, if any
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::threshold::RewatchThresholdMonitor;
use crate::events::Event;
use crate::format::format_hms;
use crate::intervals::{InsertOutcome, IntervalSet};

/// Core playback tracker.
///
/// Owns the watched and rewatched coverage sets and the threshold monitor
/// exclusively. All operations are total: they classify and return events,
/// they never fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackTracker {
    watched: IntervalSet,
    rewatched: IntervalSet,
    monitor: RewatchThresholdMonitor,
    /// Most recent position observed from the time source.
    last_position: f64,
    /// Medium duration in seconds; 0.0 until metadata arrives.
    duration: f64,
    /// Layout scratch reported with metadata (progress-bar width).
    render_width: u32,
    play_count: u32,
    /// Distinct seconds successfully added to the rewatched set.
    count_rewatched: u64,
}

impl PlaybackTracker {
    pub fn new(percentage_check: f64) -> Self {
        Self {
            watched: IntervalSet::new(),
            rewatched: IntervalSet::new(),
            monitor: RewatchThresholdMonitor::new(percentage_check),
            last_position: 0.0,
            duration: 0.0,
            render_width: 0,
            play_count: 0,
            count_rewatched: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn count_rewatched(&self) -> u64 {
        self.count_rewatched
    }

    pub fn threshold_crossed(&self) -> bool {
        self.monitor.is_crossed()
    }

    pub fn watched(&self) -> &IntervalSet {
        &self.watched
    }

    pub fn rewatched(&self) -> &IntervalSet {
        &self.rewatched
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    /// 0.0 .. 1.0 fraction of the medium played through.
    ///
    /// Returns 0.0 while the duration is unknown or degenerate.
    pub fn fraction_played(&self) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.last_position / self.duration).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            position_secs: self.last_position,
            duration_secs: self.duration,
            elapsed: format_hms(self.last_position),
            fraction_played: self.fraction_played(),
            play_count: self.play_count,
            count_rewatched: self.count_rewatched,
            watched_secs: self.watched.coverage_secs(),
            rewatched_secs: self.rewatched.coverage_secs(),
            threshold_crossed: self.monitor.is_crossed(),
            at: Utc::now(),
        }
    }

    // ── Signals ──────────────────────────────────────────────────────

    /// Deliver a position update from the time source.
    ///
    /// Detects a whole-second crossing (`floor` of the previous position is
    /// below `floor` of the new one) and classifies the crossed second.
    /// Backward seeks never produce a crossing; the next forward crossing
    /// over already-visited territory classifies as a rewatch.
    pub fn on_tick(&mut self, position: f64) -> Vec<Event> {
        let mut events = Vec::new();
        let last_floor = self.last_position.floor();
        let cur_floor = position.floor();
        if last_floor < cur_floor {
            self.classify(cur_floor as u64, &mut events);
        }
        self.last_position = position;
        events
    }

    /// Deliver a play-started signal.
    ///
    /// Increments the play counter and re-bases crossing detection at the
    /// starting position. The second playback begins in counts as played,
    /// so it is classified immediately; the coverage sets are never cleared
    /// (tracking is cumulative across play/pause cycles within a session).
    pub fn on_play_start(&mut self, position: f64) -> Vec<Event> {
        self.play_count += 1;
        self.last_position = position;
        let mut events = vec![Event::PlaybackStarted {
            play_count: self.play_count,
            position_secs: position,
            at: Utc::now(),
        }];
        self.classify(position.floor() as u64, &mut events);
        events
    }

    /// Record the medium duration and layout scratch once metadata is known.
    pub fn on_metadata_ready(&mut self, duration_secs: f64, render_width: u32) -> Event {
        self.duration = duration_secs;
        self.render_width = render_width;
        Event::MetadataLoaded {
            duration_secs,
            render_width,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Classify a newly-crossed second as first watch or rewatch.
    ///
    /// The rewatched counter increments on every successful insertion into
    /// the rewatched set, whichever merge branch fired. The threshold check
    /// itself is latched, so re-checking after the latch is a no-op.
    fn classify(&mut self, second: u64, events: &mut Vec<Event>) {
        // A tick at the very end of the stream can report a position equal
        // to the duration; that floor is one past the last real second.
        if self.duration.is_finite() && self.duration > 0.0 && second as f64 >= self.duration {
            return;
        }
        if self.watched.contains(second) {
            if self.rewatched.insert(second) == InsertOutcome::Inserted {
                self.count_rewatched += 1;
                events.push(Event::SecondRewatched {
                    second,
                    count_rewatched: self.count_rewatched,
                    at: Utc::now(),
                });
                if self.monitor.check(self.count_rewatched, self.duration) {
                    events.push(Event::RewatchThresholdCrossed {
                        count_rewatched: self.count_rewatched,
                        duration_secs: self.duration,
                        percentage_check: self.monitor.percentage_check(),
                        at: Utc::now(),
                    });
                }
            }
        } else {
            self.watched.insert(second);
            events.push(Event::SecondWatched {
                second,
                at: Utc::now(),
            });
        }
    }
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PERCENTAGE_CHECK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watched_spans(tracker: &PlaybackTracker) -> Vec<(u64, u64)> {
        tracker.watched().spans().iter().map(|s| (s.start, s.end)).collect()
    }

    fn rewatched_spans(tracker: &PlaybackTracker) -> Vec<(u64, u64)> {
        tracker.rewatched().spans().iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn crossing_marks_second_watched() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(30.0, 640);
        tracker.on_play_start(0.0);
        let events = tracker.on_tick(1.2);
        assert!(matches!(events[0], Event::SecondWatched { second: 1, .. }));
        assert_eq!(watched_spans(&tracker), vec![(0, 1)]);
    }

    #[test]
    fn sub_second_ticks_only_update_position() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(30.0, 640);
        tracker.on_play_start(0.0);
        assert!(tracker.on_tick(0.25).is_empty());
        assert!(tracker.on_tick(0.75).is_empty());
        assert_eq!(tracker.last_position(), 0.75);
        assert_eq!(watched_spans(&tracker), vec![(0, 0)]);
    }

    #[test]
    fn backward_seek_does_not_cross() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(30.0, 640);
        tracker.on_play_start(0.0);
        for tick in [1.0, 2.0, 3.0, 4.0, 5.0] {
            tracker.on_tick(tick);
        }
        // Seek back to 1.5: no crossing, no corruption.
        assert!(tracker.on_tick(1.5).is_empty());
        assert_eq!(watched_spans(&tracker), vec![(0, 5)]);

        // Forward over visited territory classifies as rewatch.
        let events = tracker.on_tick(2.5);
        assert!(matches!(
            events[0],
            Event::SecondRewatched { second: 2, count_rewatched: 1, .. }
        ));
        assert_eq!(rewatched_spans(&tracker), vec![(2, 2)]);
    }

    #[test]
    fn play_start_classifies_starting_second() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(30.0, 640);
        let events = tracker.on_play_start(0.0);
        assert!(matches!(events[0], Event::PlaybackStarted { play_count: 1, .. }));
        assert!(matches!(events[1], Event::SecondWatched { second: 0, .. }));

        // Replaying from the same position classifies it as a rewatch.
        let events = tracker.on_play_start(0.0);
        assert!(matches!(events[0], Event::PlaybackStarted { play_count: 2, .. }));
        assert!(matches!(events[1], Event::SecondRewatched { second: 0, .. }));
    }

    #[test]
    fn tick_at_duration_is_not_a_playable_second() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(10.0, 640);
        tracker.on_play_start(9.5);
        assert!(tracker.on_tick(10.0).is_empty());
        assert_eq!(watched_spans(&tracker), vec![(9, 9)]);
    }

    #[test]
    fn threshold_event_fires_once() {
        let mut tracker = PlaybackTracker::new(0.25);
        tracker.on_metadata_ready(10.0, 640);
        tracker.on_play_start(0.0);
        for tick in 1..=9 {
            tracker.on_tick(tick as f64 + 0.1);
        }
        assert!(!tracker.threshold_crossed());

        tracker.on_play_start(0.0); // rewatch 0 -> count 1
        tracker.on_tick(1.1); // count 2
        let events = tracker.on_tick(2.1); // count 3 >= 2.5
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::RewatchThresholdCrossed { count_rewatched: 3, .. })));
        assert!(tracker.threshold_crossed());

        // Later rewatches keep counting but never re-emit the crossing.
        let events = tracker.on_tick(3.1);
        assert!(matches!(
            events[0],
            Event::SecondRewatched { count_rewatched: 4, .. }
        ));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn fraction_played_is_clamped_and_guards_degenerate_duration() {
        let mut tracker = PlaybackTracker::default();
        assert_eq!(tracker.fraction_played(), 0.0);

        tracker.on_metadata_ready(10.0, 640);
        tracker.on_play_start(0.0);
        tracker.on_tick(5.0);
        assert!((tracker.fraction_played() - 0.5).abs() < f64::EPSILON);

        tracker.on_metadata_ready(f64::NAN, 640);
        assert_eq!(tracker.fraction_played(), 0.0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut tracker = PlaybackTracker::default();
        tracker.on_metadata_ready(10.0, 640);
        tracker.on_play_start(0.0);
        tracker.on_tick(1.2);
        tracker.on_tick(2.2);
        tracker.on_tick(3.5);
        match tracker.snapshot() {
            Event::StateSnapshot {
                position_secs,
                duration_secs,
                elapsed,
                play_count,
                watched_secs,
                threshold_crossed,
                ..
            } => {
                assert_eq!(position_secs, 3.5);
                assert_eq!(duration_secs, 10.0);
                assert_eq!(elapsed, "0:03");
                assert_eq!(play_count, 1);
                assert_eq!(watched_secs, 4); // seconds 0..=3
                assert!(!threshold_crossed);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
