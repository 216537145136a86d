use crate::stimulus_analysis::{Real, WindowKind};
use thiserror::Error;

/// Input whose shape or values make analysis meaningless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    #[error("Time axis is empty")]
    EmptyTimeAxis,
    #[error("Non-finite time value at sample {index}")]
    NonFiniteTime { index: usize },
    #[error("Time axis not strictly increasing at sample {index}")]
    NonIncreasingTime { index: usize },
    #[error("Length {found} does not match time axis length {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },
    #[error("Non-finite onset time at position {index}")]
    NonFiniteOnset { index: usize },
    #[error("Onset times not strictly increasing at position {index}")]
    NonIncreasingOnset { index: usize },
}

/// Stable, machine-readable names of the failure classes, as written to reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    #[strum(to_string = "invalid-window")]
    InvalidWindow,
    #[strum(to_string = "empty-window-result")]
    EmptyWindowResult,
    #[strum(to_string = "malformed-input")]
    MalformedInput,
    #[strum(to_string = "cancelled")]
    Cancelled,
}

/// Failure of one step of the analysis of one event (or of the whole-trace baseline).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid {window} window: samples {start}..={end} do not fit an axis of {len} samples")]
    InvalidWindow {
        window: WindowKind,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("Empty {window} window: too few samples between {from}s and {to}s")]
    EmptyWindowResult {
        window: WindowKind,
        from: Real,
        to: Real,
    },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidWindow { .. } => ErrorKind::InvalidWindow,
            AnalysisError::EmptyWindowResult { .. } => ErrorKind::EmptyWindowResult,
        }
    }
}

/// Failure that discards a whole trace. Sibling traces are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("Malformed trace: {0}")]
    Malformed(#[from] MalformedInput),
    #[error("Whole-trace baseline unavailable: {0}")]
    TraceBaseline(AnalysisError),
    #[error("Trace aborted at stimulus {index} ({onset}s): {source}")]
    EventFailed {
        index: usize,
        onset: Real,
        source: AnalysisError,
    },
    #[error("Cancelled before analysis started")]
    Cancelled,
}

impl TraceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TraceError::Malformed(_) => ErrorKind::MalformedInput,
            TraceError::TraceBaseline(source) | TraceError::EventFailed { source, .. } => {
                source.kind()
            }
            TraceError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Failure that discards a whole recording. Other recordings in a batch are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordingError {
    #[error("Malformed time axis: {0}")]
    TimeAxis(MalformedInput),
    #[error("Malformed stimulus channel: {0}")]
    Stimulus(MalformedInput),
    #[error("Malformed onset list: {0}")]
    Onsets(MalformedInput),
    #[error("No onset source: neither a stimulus channel nor an onset list was supplied")]
    NoOnsetSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_print_stably() {
        assert_eq!(ErrorKind::InvalidWindow.to_string(), "invalid-window");
        assert_eq!(ErrorKind::EmptyWindowResult.to_string(), "empty-window-result");
        assert_eq!(ErrorKind::MalformedInput.to_string(), "malformed-input");
    }

    #[test]
    fn trace_error_kind_follows_cause() {
        let cause = AnalysisError::EmptyWindowResult {
            window: WindowKind::Charge,
            from: 1.0,
            to: 1.1,
        };
        let error = TraceError::EventFailed {
            index: 2,
            onset: 1.0,
            source: cause,
        };
        assert_eq!(error.kind(), ErrorKind::EmptyWindowResult);
        assert_eq!(
            TraceError::Malformed(MalformedInput::NonFiniteSample { index: 3 }).kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn messages_name_the_window() {
        let error = AnalysisError::InvalidWindow {
            window: WindowKind::Blank,
            start: 998,
            end: 1000,
            len: 1000,
        };
        assert_eq!(
            error.to_string(),
            "Invalid blanking window: samples 998..=1000 do not fit an axis of 1000 samples"
        );
    }
}
