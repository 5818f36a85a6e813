//! Session wiring between a time source, the tracker, and a UI sink.
//!
//! The collaborators are traits so any delivery mechanism (callback,
//! polling loop, or message channel) can drive a session. The session is an
//! explicit instance with injected collaborators; nothing here is global.

use crate::events::Event;
use crate::format::format_hms;
use crate::playback::PlaybackTracker;

/// Source of playback time signals.
///
/// Positions are expected to be non-negative and finite; rejecting anything
/// else is this collaborator's responsibility.
pub trait TimeSource {
    /// Current playback position in seconds.
    fn current_position(&self) -> f64;

    /// Total duration in seconds, once metadata is available.
    fn duration(&self) -> Option<f64>;
}

/// Write-only sink for UI updates.
///
/// Implementations format and render however they like; the session only
/// pushes values.
pub trait UiSink {
    /// Elapsed time as display text (e.g. `1:05`).
    fn elapsed_changed(&mut self, elapsed: &str);

    /// Fraction of the medium played, in `[0, 1]`, for a progress bar.
    fn progress_changed(&mut self, fraction: f64);

    /// The one-time rewatch threshold notification.
    fn rewatch_threshold_crossed(&mut self);
}

/// A sink that ignores all updates, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UiSink for NullSink {
    fn elapsed_changed(&mut self, _elapsed: &str) {}
    fn progress_changed(&mut self, _fraction: f64) {}
    fn rewatch_threshold_crossed(&mut self) {}
}

/// One tracking session over a single medium.
///
/// Owns the tracker and both collaborators. The caller forwards the time
/// source's discrete signals (`play_started`, `metadata_ready`) and calls
/// [`PlaybackSession::poll`] on every tick.
pub struct PlaybackSession<T: TimeSource, S: UiSink> {
    tracker: PlaybackTracker,
    source: T,
    sink: S,
}

impl<T: TimeSource, S: UiSink> PlaybackSession<T, S> {
    pub fn new(source: T, sink: S, percentage_check: f64) -> Self {
        Self {
            tracker: PlaybackTracker::new(percentage_check),
            source,
            sink,
        }
    }

    pub fn tracker(&self) -> &PlaybackTracker {
        &self.tracker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Forward a metadata-ready signal. Returns `None` while the source
    /// still reports no duration.
    pub fn metadata_ready(&mut self, render_width: u32) -> Option<Event> {
        let duration = self.source.duration()?;
        Some(self.tracker.on_metadata_ready(duration, render_width))
    }

    /// Forward a play-started signal at the source's current position.
    pub fn play_started(&mut self) -> Vec<Event> {
        let position = self.source.current_position();
        let events = self.tracker.on_play_start(position);
        self.forward_threshold(&events);
        events
    }

    /// Drive one tick: read the position, classify any crossing, and push
    /// elapsed text, progress fraction, and the threshold notification to
    /// the sink. Returns the classification events for the caller.
    pub fn poll(&mut self) -> Vec<Event> {
        let position = self.source.current_position();
        let events = self.tracker.on_tick(position);
        self.sink.elapsed_changed(&format_hms(position));
        self.sink.progress_changed(self.tracker.fraction_played());
        self.forward_threshold(&events);
        events
    }

    fn forward_threshold(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|e| matches!(e, Event::RewatchThresholdCrossed { .. }))
        {
            self.sink.rewatch_threshold_crossed();
        }
    }
}
