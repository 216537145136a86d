use crate::error::{AnalysisError, TraceError};
use ephys_common::metrics::{
    failures::{self, FailureKind},
    metric_names::{
        EVENTS_ANALYSED, FAILURES, ONSETS_DETECTED, RECORDINGS_PROCESSED, TRACES_ANALYSED,
    },
};
use metrics::counter;

pub fn describe() {
    metrics::describe_counter!(
        RECORDINGS_PROCESSED,
        metrics::Unit::Count,
        "Number of recording files processed"
    );
    metrics::describe_counter!(
        TRACES_ANALYSED,
        metrics::Unit::Count,
        "Number of traces analysed without a trace-level failure"
    );
    metrics::describe_counter!(
        EVENTS_ANALYSED,
        metrics::Unit::Count,
        "Number of events measured successfully"
    );
    metrics::describe_counter!(
        ONSETS_DETECTED,
        metrics::Unit::Count,
        "Number of stimulus onsets found"
    );
    metrics::describe_counter!(
        FAILURES,
        metrics::Unit::Count,
        "Number of failures encountered"
    );
}

fn record_failure(kind: FailureKind) {
    counter!(FAILURES, &[failures::get_label(kind)]).increment(1);
}

pub(crate) fn record_event_analysed() {
    counter!(EVENTS_ANALYSED).increment(1);
}

pub(crate) fn record_trace_analysed() {
    counter!(TRACES_ANALYSED).increment(1);
}

pub(crate) fn record_recording_processed(num_onsets: usize) {
    counter!(RECORDINGS_PROCESSED).increment(1);
    counter!(ONSETS_DETECTED).increment(num_onsets as u64);
}

pub(crate) fn record_event_failure(error: &AnalysisError) {
    record_failure(match error {
        AnalysisError::InvalidWindow { .. } => FailureKind::InvalidWindow,
        AnalysisError::EmptyWindowResult { .. } => FailureKind::EmptyWindowResult,
    });
}

pub(crate) fn record_trace_failure(error: &TraceError) {
    match error {
        TraceError::Malformed(_) => record_failure(FailureKind::MalformedTrace),
        TraceError::TraceBaseline(source) => record_event_failure(source),
        TraceError::EventFailed { .. } => record_failure(FailureKind::TraceAborted),
        TraceError::Cancelled => record_failure(FailureKind::TraceCancelled),
    }
}

pub(crate) fn record_recording_failure() {
    record_failure(FailureKind::MalformedRecording);
}

pub(crate) fn record_load_failure() {
    record_failure(FailureKind::UnableToLoadRecording);
}

pub(crate) fn record_report_failure() {
    record_failure(FailureKind::ReportWriteFailed);
}
