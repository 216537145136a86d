//! Evoked-response analysis of electrophysiology recordings.
//!
//! Stimulus onsets are located once per recording, then every trace is
//! analysed independently: the stimulation artifact around each onset is
//! blanked by interpolation and the baseline, peak, phasic amplitude and
//! charge of the response are measured relative to a whole-trace baseline.

pub mod batch;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod parameters;
pub mod processing;
pub mod report;
pub mod stimulus_analysis;
