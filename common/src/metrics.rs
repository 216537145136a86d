pub mod metric_names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "ephys_pipeline_";

    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const RECORDINGS_PROCESSED: &str = concatcp!(METRIC_NAME_PREFIX, "recordings_processed");
    pub const TRACES_ANALYSED: &str = concatcp!(METRIC_NAME_PREFIX, "traces_analysed");
    pub const EVENTS_ANALYSED: &str = concatcp!(METRIC_NAME_PREFIX, "events_analysed");
    pub const ONSETS_DETECTED: &str = concatcp!(METRIC_NAME_PREFIX, "onsets_detected");
}

pub mod failures {
    #[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        InvalidWindow,
        EmptyWindowResult,
        MalformedTrace,
        MalformedRecording,
        TraceAborted,
        TraceCancelled,
        UnableToLoadRecording,
        ReportWriteFailed,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::InvalidWindow => "invalid_window",
                FailureKind::EmptyWindowResult => "empty_window_result",
                FailureKind::MalformedTrace => "malformed_trace",
                FailureKind::MalformedRecording => "malformed_recording",
                FailureKind::TraceAborted => "trace_aborted",
                FailureKind::TraceCancelled => "trace_cancelled",
                FailureKind::UnableToLoadRecording => "unable_to_load_recording",
                FailureKind::ReportWriteFailed => "report_write_failed",
            },
        )
    }
}
