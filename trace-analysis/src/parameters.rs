use crate::stimulus_analysis::{
    AbsoluteWindow, BaselineStatistic, Real, WindowKind, WindowOffsets,
};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

/// What happens to a trace when the analysis of one of its events fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failed event and carry on with the next one.
    #[strum(to_string = "skip-event")]
    SkipEvent,
    /// Discard the whole trace at its first failed event.
    #[strum(to_string = "abort-trace")]
    AbortTrace,
}

/// Every parameter of the analysis. All fields are required in the parameter file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Converts raw sample units into reporting units (e.g. A to pA).
    pub unit_scale: Real,
    /// Stimulus marker level whose upward crossing marks an onset.
    pub onset_threshold: Real,
    pub blank_window: WindowOffsets,
    pub baseline_window: WindowOffsets,
    pub peak_window: WindowOffsets,
    pub charge_window: WindowOffsets,
    /// Absolute window, in seconds, over which the whole-trace baseline is averaged.
    pub trace_baseline_window: AbsoluteWindow,
    pub baseline_statistic: BaselineStatistic,
    pub on_event_failure: FailurePolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot Open Parameter File: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid Parameter File: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {window} window: end {end} is before start {start}")]
    ReversedWindow {
        window: WindowKind,
        start: Real,
        end: Real,
    },
    #[error("Invalid {window} window: offsets must be finite")]
    NonFiniteWindow { window: WindowKind },
    #[error("Parameter {0} must be finite")]
    NonFiniteParameter(&'static str),
}

impl AnalysisConfig {
    /// Reads, parses and validates a JSON parameter file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unit_scale.is_finite() {
            return Err(ConfigError::NonFiniteParameter("unit-scale"));
        }
        if !self.onset_threshold.is_finite() {
            return Err(ConfigError::NonFiniteParameter("onset-threshold"));
        }
        let windows = [
            (WindowKind::Blank, self.blank_window.start, self.blank_window.end),
            (WindowKind::Baseline, self.baseline_window.start, self.baseline_window.end),
            (WindowKind::Peak, self.peak_window.start, self.peak_window.end),
            (WindowKind::Charge, self.charge_window.start, self.charge_window.end),
            (
                WindowKind::TraceBaseline,
                self.trace_baseline_window.start,
                self.trace_baseline_window.end,
            ),
        ];
        for (window, start, end) in windows {
            if !start.is_finite() || !end.is_finite() {
                return Err(ConfigError::NonFiniteWindow { window });
            }
            if end < start {
                return Err(ConfigError::ReversedWindow { window, start, end });
            }
        }
        Ok(())
    }
}
