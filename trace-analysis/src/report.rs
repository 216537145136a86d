//! Per-recording result reports and trace dumps.
//!
//! A report holds one row per (trace, event) in trace then stimulus order.
//! Values which could not be computed are written as `null`, with the row's
//! status, error kind and message saying why.
use crate::{
    error::TraceError,
    processing::{AnalysedTrace, Recording},
    stimulus_analysis::{Real, SaveToFileFilter},
};
use ephys_common::{StimulusNumber, stimulus_number};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot Write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot Serialise Report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    Ok,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResultRow {
    pub trace: String,
    pub stimulus: StimulusNumber,
    pub time: Real,
    pub baseline: Option<Real>,
    pub peak: Option<Real>,
    pub phasic: Option<Real>,
    pub charge: Option<Real>,
    pub status: RowStatus,
    pub error_kind: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TraceSummary {
    pub trace: String,
    pub trace_baseline: Real,
    pub events: usize,
    pub failed_events: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FailedTrace {
    pub trace: String,
    pub error_kind: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub source: String,
    pub onsets: Vec<Real>,
    pub traces: Vec<TraceSummary>,
    pub rows: Vec<ResultRow>,
    pub failed_traces: Vec<FailedTrace>,
}

impl Report {
    pub fn new(
        source: impl Into<String>,
        recording: &Recording,
        analysed: &[AnalysedTrace],
    ) -> Self {
        let mut traces = Vec::new();
        let mut rows = Vec::new();
        let mut failed_traces = Vec::new();

        for trace in analysed {
            match &trace.outcome {
                Ok(analysis) => {
                    rows.extend(analysis.events.iter().map(|event| {
                        let values = event.outcome.as_ref().ok();
                        let failure = event.outcome.as_ref().err();
                        ResultRow {
                            trace: trace.name.clone(),
                            stimulus: stimulus_number(event.index),
                            time: event.onset,
                            baseline: values.map(|v| v.baseline),
                            peak: values.map(|v| v.peak),
                            phasic: values.map(|v| v.phasic),
                            charge: values.map(|v| v.charge),
                            status: if failure.is_some() {
                                RowStatus::Failed
                            } else {
                                RowStatus::Ok
                            },
                            error_kind: failure.map(|e| e.kind().to_string()),
                            error: failure.map(ToString::to_string),
                        }
                    }));
                    traces.push(TraceSummary {
                        trace: trace.name.clone(),
                        trace_baseline: analysis.trace_baseline,
                        events: analysis.events.len(),
                        failed_events: analysis
                            .events
                            .iter()
                            .filter(|event| event.outcome.is_err())
                            .count(),
                    });
                }
                Err(error) => failed_traces.push(failed_trace(&trace.name, error)),
            }
        }

        Self {
            source: source.into(),
            onsets: recording.onsets.as_slice().to_vec(),
            traces,
            rows,
            failed_traces,
        }
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        let io_error = |source| ReportError::Io {
            path: path.to_owned(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(io_error)
    }
}

fn failed_trace(name: &str, error: &TraceError) -> FailedTrace {
    FailedTrace {
        trace: name.to_owned(),
        error_kind: error.kind().to_string(),
        error: error.to_string(),
    }
}

/// Replaces characters which are awkward in file names.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes `time,value` dumps of the onsets and of each trace before and
/// after artifact removal, for plotting outside the pipeline.
/// Trace files are named `<stem>.<name>-<position>`, so traces whose names
/// coincide once made file safe still get files of their own.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), stem = stem))]
pub fn save_trace_dumps(
    dir: &Path,
    stem: &str,
    recording: &Recording,
    analysed: &[AnalysedTrace],
) -> Result<(), ReportError> {
    let path = dir.join(format!("{stem}.onsets.csv"));
    recording
        .onsets
        .iter()
        .save_to_file(&path)
        .map_err(|source| ReportError::Io { path, source })?;

    let times = recording.axis.as_slice();
    for (position, (trace, result)) in recording.traces.iter().zip(analysed).enumerate() {
        let name = format!("{}-{position}", file_safe(&trace.name));
        let path = dir.join(format!("{stem}.{name}.original.csv"));
        times
            .iter()
            .copied()
            .zip(trace.samples.iter().copied())
            .save_to_file(&path)
            .map_err(|source| ReportError::Io { path, source })?;

        if let Ok(analysis) = &result.outcome {
            let path = dir.join(format!("{stem}.{name}.blanked.csv"));
            times
                .iter()
                .copied()
                .zip(analysis.blanked.iter().copied())
                .save_to_file(&path)
                .map_err(|source| ReportError::Io { path, source })?;
        }
    }
    Ok(())
}
