use crate::{
    error::RecordingError,
    loader::{LoadError, load_recording},
    metrics,
    parameters::AnalysisConfig,
    processing::{Recording, analyse_recording},
    report::{Report, ReportError, save_trace_dumps},
};
use ephys_common::recording::OnsetFile;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::atomic::AtomicBool,
};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Recording(#[from] RecordingError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Invalid Input Pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Cannot Read Input: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("No Input Files Matched")]
    NoInputs,
    #[error("Output Name {stem} Already Used By {}", .earlier.display())]
    DuplicateStem { stem: String, earlier: PathBuf },
    #[error("Cannot Create Output Directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings shared by every file of a batch.
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    /// Replaces each recording's own onset source when given.
    pub onset_override: Option<OnsetFile>,
    pub save_traces: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSummary {
    pub report: PathBuf,
    pub traces: usize,
    pub failed_traces: usize,
    pub failed_events: usize,
}

/// Expands file paths and glob patterns into a sorted, duplicate free list of files.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, BatchError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern)? {
            paths.push(entry?);
        }
        if paths.len() == before {
            warn!("No files match {pattern}");
        }
    }
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        return Err(BatchError::NoInputs);
    }
    Ok(paths)
}

/// Name shared by every output file written for `path`.
fn output_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_owned())
}

/// Analyses one recording file and writes its report into the output directory.
#[tracing::instrument(skip_all, fields(path = %path.display(), num_onsets))]
pub fn process_file(
    path: &Path,
    config: &AnalysisConfig,
    options: &BatchOptions,
    cancel: Option<&AtomicBool>,
) -> Result<FileSummary, BatchError> {
    let file = load_recording(path)?;
    let recording = Recording::from_file(
        file,
        options.onset_override.clone(),
        config.onset_threshold,
    )?;
    tracing::Span::current().record("num_onsets", recording.onsets.len());
    info!(
        "Found {} stimuli at {:?}",
        recording.onsets.len(),
        recording.onsets.as_slice()
    );

    let analysed = analyse_recording(&recording, config, cancel);

    let stem = output_stem(path);
    let report = Report::new(path.display().to_string(), &recording, &analysed);
    let report_path = options.output_dir.join(format!("{stem}.results.json"));
    report.write_to_file(&report_path)?;
    if options.save_traces {
        save_trace_dumps(&options.output_dir, &stem, &recording, &analysed)?;
    }
    metrics::record_recording_processed(recording.onsets.len());

    Ok(FileSummary {
        report: report_path,
        traces: analysed.len(),
        failed_traces: report.failed_traces.len(),
        failed_events: report.traces.iter().map(|trace| trace.failed_events).sum(),
    })
}

/// Processes each input file in turn. A failed file is logged and reported
/// in the returned list; the remaining files are still processed.
/// A file whose outputs would overwrite those of an earlier file fails with
/// `DuplicateStem` and is not analysed.
pub fn run_batch(
    inputs: &[PathBuf],
    config: &AnalysisConfig,
    options: &BatchOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<(PathBuf, Result<FileSummary, BatchError>)>, BatchError> {
    std::fs::create_dir_all(&options.output_dir).map_err(|source| BatchError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut claimed = HashMap::<String, PathBuf>::new();
    Ok(inputs
        .iter()
        .map(|path| {
            let stem = output_stem(path);
            let outcome = match claimed.get(&stem) {
                Some(earlier) => Err(BatchError::DuplicateStem {
                    stem,
                    earlier: earlier.clone(),
                }),
                None => {
                    claimed.insert(stem, path.clone());
                    process_file(path, config, options, cancel)
                }
            };
            match &outcome {
                Ok(summary) => info!(
                    "Wrote {} ({} traces, {} failed traces, {} failed events)",
                    summary.report.display(),
                    summary.traces,
                    summary.failed_traces,
                    summary.failed_events
                ),
                Err(e) => {
                    error!("{}: {e}", path.display());
                    match e {
                        BatchError::Load(_) => metrics::record_load_failure(),
                        BatchError::Report(_) | BatchError::DuplicateStem { .. } => {
                            metrics::record_report_failure()
                        }
                        _ => metrics::record_recording_failure(),
                    }
                }
            }
            (path.clone(), outcome)
        })
        .collect())
}
