use super::{Real, SampleWindow, TimeAxis, WindowKind, trapezoid};
use crate::{error::AnalysisError, parameters::AnalysisConfig};
use serde::Serialize;

/// The metrics of one stimulation event on one trace, in reporting units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventResult {
    pub time: Real,
    pub baseline: Real,
    pub peak: Real,
    pub phasic: Real,
    pub charge: Real,
}

/// Computes the metrics of the event at `onset` from an already blanked trace.
///
/// Every metric is measured from `trace_baseline` and then multiplied by the
/// configured unit scale. The peak is the minimum of its window, as responses
/// are inward (negative-going) currents.
pub fn extract_features(
    axis: &TimeAxis,
    samples: &[Real],
    onset: Real,
    trace_baseline: Real,
    config: &AnalysisConfig,
) -> Result<EventResult, AnalysisError> {
    let scale = config.unit_scale;

    let bounds = config.baseline_window.around(onset);
    let window = SampleWindow::select(axis, samples, WindowKind::Baseline, bounds, 1)?;
    let baseline = config
        .baseline_statistic
        .apply(&window)
        .ok_or_else(|| empty(WindowKind::Baseline, bounds))?;
    let baseline = scale * (baseline - trace_baseline);

    let bounds = config.peak_window.around(onset);
    let window = SampleWindow::select(axis, samples, WindowKind::Peak, bounds, 1)?;
    let peak = window
        .minimum()
        .ok_or_else(|| empty(WindowKind::Peak, bounds))?;
    let peak = scale * (peak - trace_baseline);

    // A charge window needs two samples to enclose any time.
    let bounds = config.charge_window.around(onset);
    let window = SampleWindow::select(axis, samples, WindowKind::Charge, bounds, 2)?;
    let charge = scale * trapezoid(&window, trace_baseline);

    Ok(EventResult {
        time: onset,
        baseline,
        peak,
        phasic: peak - baseline,
        charge,
    })
}

fn empty(window: WindowKind, (from, to): (Real, Real)) -> AnalysisError {
    AnalysisError::EmptyWindowResult { window, from, to }
}
