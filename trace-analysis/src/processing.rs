use crate::{
    error::{AnalysisError, MalformedInput, RecordingError, TraceError},
    metrics,
    parameters::{AnalysisConfig, FailurePolicy},
    stimulus_analysis::{
        EventResult, OnsetTimes, Real, TimeAxis, extract_features, remove_artifact,
        trace_baseline,
    },
};
use ephys_common::recording::{OnsetFile, RecordingFile};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A named sequence of samples aligned with the recording's time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub name: String,
    pub samples: Vec<Real>,
}

impl Trace {
    pub fn new(name: impl Into<String>, samples: Vec<Real>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    fn validate(&self, axis: &TimeAxis) -> Result<(), MalformedInput> {
        if self.samples.len() != axis.len() {
            return Err(MalformedInput::LengthMismatch {
                expected: axis.len(),
                found: self.samples.len(),
            });
        }
        if let Some(index) = self.samples.iter().position(|v| !v.is_finite()) {
            return Err(MalformedInput::NonFiniteSample { index });
        }
        Ok(())
    }
}

/// The outcome of one event of one trace. `index` is zero-based.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub index: usize,
    pub onset: Real,
    pub outcome: Result<EventResult, AnalysisError>,
}

/// Everything computed for one trace.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceAnalysis {
    pub trace_baseline: Real,
    pub events: Vec<EventRecord>,
    /// The working copy after every event's artifact was removed.
    pub blanked: Vec<Real>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysedTrace {
    pub name: String,
    pub outcome: Result<TraceAnalysis, TraceError>,
}

/// A validated recording: the shared time axis, its onsets and its traces.
///
/// Traces are validated individually when analysed, so one malformed trace
/// does not prevent the others from being processed.
#[derive(Clone, Debug)]
pub struct Recording {
    pub axis: TimeAxis,
    pub onsets: OnsetTimes,
    pub traces: Vec<Trace>,
}

impl Recording {
    /// Validates a loaded recording file.
    ///
    /// Onsets come from `onset_override` when given, then from the file's own
    /// onset list, and otherwise are detected from its stimulus channel.
    pub fn from_file(
        file: RecordingFile,
        onset_override: Option<OnsetFile>,
        onset_threshold: Real,
    ) -> Result<Self, RecordingError> {
        let axis = TimeAxis::new(file.time_in_seconds()).map_err(RecordingError::TimeAxis)?;
        let onsets = match (onset_override.or(file.onsets), &file.stimulus) {
            (Some(times), _) => OnsetTimes::new(times).map_err(RecordingError::Onsets)?,
            (None, Some(stimulus)) => OnsetTimes::detect(&axis, stimulus, onset_threshold)
                .map_err(RecordingError::Stimulus)?,
            (None, None) => return Err(RecordingError::NoOnsetSource),
        };
        let traces = file
            .traces
            .into_iter()
            .map(|column| Trace::new(column.name, column.samples))
            .collect();
        Ok(Self {
            axis,
            onsets,
            traces,
        })
    }
}

/// Analyses every event of one trace on a private working copy.
///
/// The whole-trace baseline is taken from the untouched samples. Events are
/// then processed in onset order, each blanking its artifact in the working
/// copy before its features are measured, so later events see every earlier
/// blanking.
#[tracing::instrument(skip_all, fields(trace = %trace.name, num_events = onsets.len(), num_failed))]
pub fn analyse_trace(
    axis: &TimeAxis,
    onsets: &OnsetTimes,
    trace: &Trace,
    config: &AnalysisConfig,
) -> Result<TraceAnalysis, TraceError> {
    trace.validate(axis)?;

    let reference = trace_baseline(axis, &trace.samples, &config.trace_baseline_window)
        .map_err(TraceError::TraceBaseline)?;
    debug!("Whole-trace baseline: {reference}");

    let mut working = trace.samples.clone();
    let mut events = Vec::with_capacity(onsets.len());
    for (index, onset) in onsets.iter().enumerate() {
        let outcome = remove_artifact(axis, &mut working, onset, &config.blank_window)
            .and_then(|()| extract_features(axis, &working, onset, reference, config));

        match outcome {
            Ok(_) => metrics::record_event_analysed(),
            Err(ref error) => {
                metrics::record_event_failure(error);
                warn!("Stimulus {} at {onset}s failed: {error}", index + 1);
                if config.on_event_failure == FailurePolicy::AbortTrace {
                    return Err(TraceError::EventFailed {
                        index,
                        onset,
                        source: error.clone(),
                    });
                }
            }
        }
        events.push(EventRecord {
            index,
            onset,
            outcome,
        });
    }

    let num_failed = events.iter().filter(|event| event.outcome.is_err()).count();
    tracing::Span::current().record("num_failed", num_failed);

    Ok(TraceAnalysis {
        trace_baseline: reference,
        events,
        blanked: working,
    })
}

/// Analyses every trace of a recording in parallel, returning them in input order.
///
/// If `cancel` is set, traces which have not yet started are reported as
/// [TraceError::Cancelled]; traces already running finish normally.
#[tracing::instrument(skip_all, fields(num_traces = recording.traces.len(), num_onsets = recording.onsets.len()))]
pub fn analyse_recording(
    recording: &Recording,
    config: &AnalysisConfig,
    cancel: Option<&AtomicBool>,
) -> Vec<AnalysedTrace> {
    info!(
        "Analysing {} traces against {} onsets",
        recording.traces.len(),
        recording.onsets.len()
    );
    recording
        .traces
        .par_iter()
        .map(|trace| {
            let outcome = if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                Err(TraceError::Cancelled)
            } else {
                analyse_trace(&recording.axis, &recording.onsets, trace, config)
            };
            match &outcome {
                Ok(_) => metrics::record_trace_analysed(),
                Err(error) => {
                    metrics::record_trace_failure(error);
                    warn!("Trace {} failed: {error}", trace.name);
                }
            }
            AnalysedTrace {
                name: trace.name.clone(),
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        parameters::tests::standard_config,
        stimulus_analysis::{AbsoluteWindow, WindowKind, WindowOffsets},
    };
    use assert_approx_eq::assert_approx_eq;

    const SAMPLE_INTERVAL: Real = 0.001;
    const NUM_SAMPLES: usize = 1000;

    /// A flat trace at 2.0 with, for each onset sample, an artifact on the
    /// following sample and a negative-going response decaying from the one after.
    fn synthetic_trace(onsets: &[usize]) -> Vec<Real> {
        (0..NUM_SAMPLES)
            .map(|i| {
                let response: Real = onsets
                    .iter()
                    .filter(|&&onset| i > onset)
                    .map(|&onset| match i - onset {
                        1 => 50.0,
                        k => -10.0 * (-((k - 2) as Real) * SAMPLE_INTERVAL / 0.005).exp(),
                    })
                    .sum();
                2.0 + response
            })
            .collect()
    }

    fn recording(onsets: &[usize], traces: Vec<Trace>) -> Recording {
        let axis = TimeAxis::uniform(NUM_SAMPLES, SAMPLE_INTERVAL).unwrap();
        let onsets = OnsetTimes::new(
            onsets
                .iter()
                .map(|&onset| axis.time(onset).unwrap())
                .collect(),
        )
        .unwrap();
        Recording {
            axis,
            onsets,
            traces,
        }
    }

    #[test]
    fn three_onsets_give_three_finite_results_per_trace() {
        let onsets = [200, 400, 600];
        let traces = vec![
            Trace::new("a", synthetic_trace(&onsets)),
            Trace::new("b", synthetic_trace(&onsets)),
        ];
        let recording = recording(&onsets, traces);
        let results = analyse_recording(&recording, &standard_config(), None);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "a");
        assert_eq!(results[1].name, "b");
        for trace in results {
            let analysis = trace.outcome.unwrap();
            assert_approx_eq!(analysis.trace_baseline, 2.0);
            assert_eq!(analysis.events.len(), 3);
            for event in analysis.events {
                let result = event.outcome.unwrap();
                assert!(result.baseline.is_finite());
                assert!(result.charge.is_finite());
                assert_approx_eq!(result.baseline, 0.0);
                assert_approx_eq!(result.peak, -10.0);
                assert_approx_eq!(result.phasic, -10.0);
                assert!(result.charge < 0.0);
            }
        }
    }

    #[test]
    fn artifact_is_blanked_before_measurement() {
        let onsets = [500];
        let trace = Trace::new("a", synthetic_trace(&onsets));
        let recording = recording(&onsets, vec![trace.clone()]);
        let analysis = analyse_trace(
            &recording.axis,
            &recording.onsets,
            &trace,
            &standard_config(),
        )
        .unwrap();

        // samples 500..=502 are blanked, and the original is untouched
        assert_eq!(trace.samples[501], 52.0);
        assert_approx_eq!(analysis.blanked[501], -3.0);
        assert_eq!(analysis.blanked[500], trace.samples[500]);
        assert_eq!(analysis.blanked[502], trace.samples[502]);
    }

    #[test]
    fn charge_window_past_the_end_fails_only_the_last_event() {
        let onsets = [200, 400, 996];
        let trace = Trace::new("a", synthetic_trace(&onsets));
        let recording = recording(&onsets, vec![trace]);
        let config = AnalysisConfig {
            charge_window: WindowOffsets::new(0.005, 0.01),
            ..standard_config()
        };
        let results = analyse_recording(&recording, &config, None);

        let events = &results[0].outcome.as_ref().unwrap().events;
        assert_eq!(events.len(), 3);
        assert!(events[0].outcome.is_ok());
        assert!(events[1].outcome.is_ok());
        assert!(matches!(
            events[2].outcome,
            Err(AnalysisError::EmptyWindowResult {
                window: WindowKind::Charge,
                ..
            })
        ));
    }

    #[test]
    fn skipped_event_is_tagged_and_later_events_continue() {
        let onsets = [0, 200, 400];
        let trace = Trace::new("a", synthetic_trace(&onsets));
        let recording = recording(&onsets, vec![trace]);
        // the first onset has no samples before it
        let config = AnalysisConfig {
            baseline_window: WindowOffsets::new(-0.002, -0.001),
            ..standard_config()
        };
        let results = analyse_recording(&recording, &config, None);

        let analysis = results[0].outcome.as_ref().unwrap();
        let events = &analysis.events;
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0].outcome.as_ref().unwrap_err().kind(),
            ErrorKind::EmptyWindowResult
        );
        assert_eq!(events[1].index, 1);
        assert!(events[1].outcome.is_ok());
        assert!(events[2].outcome.is_ok());
        // the failed event was still blanked
        assert_approx_eq!(analysis.blanked[1], -3.0);
    }

    #[test]
    fn abort_policy_fails_the_trace_at_the_first_failed_event() {
        let onsets = [200, 999];
        let trace = Trace::new("a", synthetic_trace(&onsets));
        let recording = recording(&onsets, vec![trace]);
        let config = AnalysisConfig {
            on_event_failure: FailurePolicy::AbortTrace,
            ..standard_config()
        };
        let results = analyse_recording(&recording, &config, None);

        match &results[0].outcome {
            Err(TraceError::EventFailed {
                index,
                onset,
                source,
            }) => {
                assert_eq!(*index, 1);
                assert_eq!(Some(*onset), recording.axis.time(999));
                assert_eq!(source.kind(), ErrorKind::InvalidWindow);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn zero_onsets_is_not_an_error() {
        let trace = Trace::new("a", vec![1.0; NUM_SAMPLES]);
        let recording = recording(&[], vec![trace]);
        let results = analyse_recording(&recording, &standard_config(), None);

        let analysis = results[0].outcome.as_ref().unwrap();
        assert!(analysis.events.is_empty());
        assert_eq!(analysis.blanked, vec![1.0; NUM_SAMPLES]);
    }

    #[test]
    fn malformed_trace_does_not_affect_siblings() {
        let onsets = [200];
        let mut bad = synthetic_trace(&onsets);
        bad[10] = Real::NAN;
        let traces = vec![
            Trace::new("short", vec![0.0; NUM_SAMPLES - 1]),
            Trace::new("nan", bad),
            Trace::new("good", synthetic_trace(&onsets)),
        ];
        let recording = recording(&onsets, traces);
        let results = analyse_recording(&recording, &standard_config(), None);

        assert_eq!(
            results[0].outcome,
            Err(TraceError::Malformed(MalformedInput::LengthMismatch {
                expected: NUM_SAMPLES,
                found: NUM_SAMPLES - 1
            }))
        );
        assert_eq!(
            results[1].outcome,
            Err(TraceError::Malformed(MalformedInput::NonFiniteSample {
                index: 10
            }))
        );
        assert!(results[2].outcome.is_ok());
    }

    #[test]
    fn trace_baseline_window_outside_the_trace_fails_the_trace() {
        let trace = Trace::new("a", vec![1.0; NUM_SAMPLES]);
        let recording = recording(&[200], vec![trace]);
        let config = AnalysisConfig {
            trace_baseline_window: AbsoluteWindow {
                start: 5.0,
                end: 6.0,
            },
            ..standard_config()
        };
        let results = analyse_recording(&recording, &config, None);
        assert!(matches!(
            results[0].outcome,
            Err(TraceError::TraceBaseline(
                AnalysisError::EmptyWindowResult { .. }
            ))
        ));
    }

    #[test]
    fn cancelled_batch_reports_every_trace() {
        let onsets = [200];
        let traces = vec![
            Trace::new("a", synthetic_trace(&onsets)),
            Trace::new("b", synthetic_trace(&onsets)),
        ];
        let recording = recording(&onsets, traces);
        let cancel = AtomicBool::new(true);
        let results = analyse_recording(&recording, &standard_config(), Some(&cancel));

        assert_eq!(results.len(), 2);
        assert!(
            results
                .iter()
                .all(|trace| trace.outcome == Err(TraceError::Cancelled))
        );
    }

    #[test]
    fn recording_prefers_override_then_onsets_then_stimulus() {
        let file = RecordingFile {
            time: vec![0.0, 1.0, 2.0, 3.0],
            time_scale: Some(0.5),
            stimulus: Some(vec![0.0, 30.0, 0.0, 30.0]),
            onsets: Some(vec![1.0]),
            traces: Vec::new(),
        };

        let detected = RecordingFile {
            onsets: None,
            ..file.clone()
        };
        let recording = Recording::from_file(detected, None, 25.0).unwrap();
        assert_eq!(recording.onsets.as_slice(), &[0.5, 1.5]);

        let recording = Recording::from_file(file.clone(), None, 25.0).unwrap();
        assert_eq!(recording.onsets.as_slice(), &[1.0]);

        let recording = Recording::from_file(file, Some(vec![0.25]), 25.0).unwrap();
        assert_eq!(recording.onsets.as_slice(), &[0.25]);
    }

    #[test]
    fn malformed_recordings_are_rejected() {
        let file = RecordingFile {
            time: vec![0.0, 2.0, 1.0],
            stimulus: Some(vec![0.0; 3]),
            ..Default::default()
        };
        assert_eq!(
            Recording::from_file(file, None, 25.0).unwrap_err(),
            RecordingError::TimeAxis(MalformedInput::NonIncreasingTime { index: 2 })
        );

        let file = RecordingFile {
            time: vec![0.0, 1.0, 2.0],
            stimulus: Some(vec![0.0; 2]),
            ..Default::default()
        };
        assert_eq!(
            Recording::from_file(file, None, 25.0).unwrap_err(),
            RecordingError::Stimulus(MalformedInput::LengthMismatch {
                expected: 3,
                found: 2
            })
        );

        let file = RecordingFile {
            time: vec![0.0, 1.0, 2.0],
            ..Default::default()
        };
        assert_eq!(
            Recording::from_file(file.clone(), Some(vec![1.0, 0.5]), 25.0).unwrap_err(),
            RecordingError::Onsets(MalformedInput::NonIncreasingOnset { index: 1 })
        );
        assert_eq!(
            Recording::from_file(file, None, 25.0).unwrap_err(),
            RecordingError::NoOnsetSource
        );
    }
}
