use super::Real;
use crate::error::MalformedInput;
use itertools::Itertools;
use std::ops::Range;

/// The shared time base of one recording, in seconds.
///
/// Construction guarantees the axis is non-empty, finite and strictly
/// increasing, so every lookup below can rely on sorted order.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeAxis {
    times: Vec<Real>,
}

impl TimeAxis {
    pub fn new(times: Vec<Real>) -> Result<Self, MalformedInput> {
        if times.is_empty() {
            return Err(MalformedInput::EmptyTimeAxis);
        }
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(MalformedInput::NonFiniteTime { index });
        }
        if let Some(index) = times
            .iter()
            .tuple_windows()
            .position(|(earlier, later)| later <= earlier)
        {
            return Err(MalformedInput::NonIncreasingTime { index: index + 1 });
        }
        Ok(Self { times })
    }

    /// An axis of `len` samples starting at zero, spaced by `sample_interval`.
    pub fn uniform(len: usize, sample_interval: Real) -> Result<Self, MalformedInput> {
        Self::new((0..len).map(|i| i as Real * sample_interval).collect())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.times
    }

    pub fn time(&self, index: usize) -> Option<Real> {
        self.times.get(index).copied()
    }

    /// Left-biased insertion index: every sample before it is earlier than `time`.
    /// Returns 0 for times before the axis and `len()` for times after it.
    pub fn index_of(&self, time: Real) -> usize {
        self.times.partition_point(|&t| t < time)
    }

    /// Right-biased insertion index: every sample before it is at or before `time`.
    pub fn upper_index_of(&self, time: Real) -> usize {
        self.times.partition_point(|&t| t <= time)
    }

    /// Index range of the samples whose time lies in `[from, to]`.
    /// The range is empty when no sample falls inside.
    pub fn span(&self, from: Real, to: Real) -> Range<usize> {
        let start = self.index_of(from);
        let end = self.upper_index_of(to).max(start);
        start..end
    }
}
