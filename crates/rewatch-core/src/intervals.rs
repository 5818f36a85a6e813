//! Per-second coverage interval sets.
//!
//! An [`IntervalSet`] stores which whole seconds of a medium have been
//! covered as a sorted sequence of closed ranges. Consecutive ranges are
//! never adjacent: `[3,5]` and `[6,8]` collapse to `[3,8]` at insert time,
//! so the sequence is always maximally merged.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A closed range `[start, end]` of whole seconds, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Single-second range `[second, second]`.
    pub fn point(second: u64) -> Self {
        Self {
            start: second,
            end: second,
        }
    }

    /// Number of seconds covered by this range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, second: u64) -> bool {
        self.start <= second && second <= self.end
    }
}

/// Result of [`IntervalSet::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The set gained coverage of the second.
    Inserted,
    /// The second was already covered; the set is unchanged.
    AlreadyPresent,
}

/// Sorted, disjoint, maximally-merged collection of [`Interval`]s.
///
/// Invariant: for any two consecutive intervals `[a,b]`, `[c,d]` it holds
/// that `c > b + 1` (no overlap, no adjacency).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalSet {
    spans: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Add coverage of a single second, merging with neighbouring spans.
    ///
    /// The scan runs from the last (largest) span backwards: under forward
    /// playback the new second extends the tail span, so the common case is
    /// amortized O(1). Seeks degrade to O(n) over the span count.
    pub fn insert(&mut self, second: u64) -> InsertOutcome {
        let mut i = self.spans.len();
        while i > 0 {
            i -= 1;
            let span = self.spans[i];
            if second > span.end {
                if second == span.end + 1 {
                    // Merge-right: extend this span's end.
                    self.spans[i].end = second;
                } else {
                    self.spans.insert(i + 1, Interval::point(second));
                }
                return InsertOutcome::Inserted;
            }
            if second >= span.start {
                return InsertOutcome::AlreadyPresent;
            }
            if second + 1 == span.start {
                // Merge-left: extend this span's start, then coalesce with
                // the predecessor if the gap between them just closed.
                self.spans[i].start = second;
                if i > 0 && self.spans[i - 1].end + 1 == second {
                    self.spans[i - 1].end = self.spans[i].end;
                    self.spans.remove(i);
                }
                return InsertOutcome::Inserted;
            }
        }
        // Below every existing span and not adjacent to the first one,
        // or the set is empty.
        self.spans.insert(0, Interval::point(second));
        InsertOutcome::Inserted
    }

    /// True iff some interval covers `second`.
    pub fn contains(&self, second: u64) -> bool {
        self.spans
            .binary_search_by(|span| {
                if span.end < second {
                    Ordering::Less
                } else if span.start > second {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Read-only view of the merged spans, in ascending order.
    pub fn spans(&self) -> &[Interval] {
        &self.spans
    }

    /// Number of disjoint spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total number of seconds covered across all spans.
    pub fn coverage_secs(&self) -> u64 {
        self.spans.iter().map(Interval::len).sum()
    }
}
