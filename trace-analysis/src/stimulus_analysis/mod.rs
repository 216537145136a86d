//! Event-aligned analysis of evoked responses.
//!
//! A recording shares one [TimeAxis] between all of its traces. Onsets are
//! found once from the stimulus marker channel using the same detector idiom
//! as any other event stream:
//! ```rust,ignore
//! let onsets = axis
//!     .as_slice()
//!     .iter()
//!     .copied()
//!     .zip(stimulus.iter().copied())
//!     .events(RisingEdgeDetector::new(25.0))
//!     .collect::<Vec<_>>();
//! ```
//! Each trace is then blanked around every onset and measured through the
//! windows of [WindowOffsets].

pub mod artifact;
pub mod detectors;
pub mod features;
pub mod iterators;
pub mod onset;
pub mod time_index;
pub mod window;

pub use artifact::{interpolate_span, remove_artifact};
pub use detectors::{Detector, rising_edge_detector::RisingEdgeDetector};
pub use features::{EventResult, extract_features};
pub use iterators::{EventFilter, SaveToFileFilter};
pub use onset::{OnsetTimes, detect_onset_indices};
pub use time_index::TimeAxis;
pub use window::{
    AbsoluteWindow, BaselineStatistic, SampleWindow, WindowKind, WindowOffsets, trace_baseline,
    trapezoid,
};

pub use ephys_common::Real;
