//! Closed-interval merging on a single chromosome.

use crate::gtf::entry::ExonType;

/// A closed, 1-based genomic interval `[start, stop]` with an optional feature tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: u32,
    pub stop: u32,
    pub tag: Option<ExonType>,
}

impl Interval {
    #[must_use]
    pub fn new(start: u32, stop: u32, tag: Option<ExonType>) -> Self {
        Self { start, stop, tag }
    }
}

/// Merge overlapping or adjacent intervals into the minimal covering set.
///
/// Input may be in any order. Intervals are sorted by start (ties by tag) and
/// scanned left to right; `[a, b]` and `[c, d]` join when `c <= b + 1`. Each
/// merged run keeps the tag of its first interval, so callers merge one tag
/// at a time when tags matter.
#[must_use]
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| (i.start, i.tag));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(current) if interval.start <= current.stop.saturating_add(1) => {
                current.stop = current.stop.max(interval.stop);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Merge the intervals carrying `tag`, ignoring all others.
#[must_use]
pub fn merge_tagged(intervals: &[Interval], tag: ExonType) -> Vec<Interval> {
    let selected: Vec<Interval> = intervals
        .iter()
        .filter(|i| i.tag == Some(tag))
        .copied()
        .collect();
    merge(&selected)
}
