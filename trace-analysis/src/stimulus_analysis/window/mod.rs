pub mod baseline;
pub mod charge;

use super::{Real, TimeAxis};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

pub use baseline::{BaselineStatistic, trace_baseline};
pub use charge::trapezoid;

/// The named windows of the analysis, used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum WindowKind {
    #[strum(to_string = "blanking")]
    Blank,
    #[strum(to_string = "baseline")]
    Baseline,
    #[strum(to_string = "peak")]
    Peak,
    #[strum(to_string = "charge")]
    Charge,
    #[strum(to_string = "trace baseline")]
    TraceBaseline,
}

/// Offsets, in seconds, of a window relative to an event onset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WindowOffsets {
    pub start: Real,
    pub end: Real,
}

impl WindowOffsets {
    pub fn new(start: Real, end: Real) -> Self {
        Self { start, end }
    }

    /// Absolute bounds of the window placed around `onset`.
    pub fn around(&self, onset: Real) -> (Real, Real) {
        (onset + self.start, onset + self.end)
    }
}

/// A window fixed in absolute time, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AbsoluteWindow {
    pub start: Real,
    pub end: Real,
}

/// The samples of one trace that fall inside one window, with their times.
#[derive(Clone, Copy, Debug)]
pub struct SampleWindow<'a> {
    pub times: &'a [Real],
    pub values: &'a [Real],
}

impl<'a> SampleWindow<'a> {
    /// Selects the samples whose time lies in `[from, to]`.
    /// Fails with `EmptyWindowResult` when fewer than `min_samples` fall inside.
    pub fn select(
        axis: &'a TimeAxis,
        samples: &'a [Real],
        kind: WindowKind,
        (from, to): (Real, Real),
        min_samples: usize,
    ) -> Result<Self, AnalysisError> {
        let range = axis.span(from, to);
        let empty = || AnalysisError::EmptyWindowResult {
            window: kind,
            from,
            to,
        };
        if range.len() < min_samples.max(1) {
            return Err(empty());
        }
        let times = axis.as_slice().get(range.clone()).ok_or_else(empty)?;
        let values = samples.get(range).ok_or_else(empty)?;
        Ok(Self { times, values })
    }

    pub fn minimum(&self) -> Option<Real> {
        self.values.iter().copied().reduce(Real::min)
    }

    pub fn mean(&self) -> Option<Real> {
        (!self.values.is_empty())
            .then(|| self.values.iter().sum::<Real>() / self.values.len() as Real)
    }
}
