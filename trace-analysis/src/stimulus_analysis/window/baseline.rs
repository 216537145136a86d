use super::{AbsoluteWindow, Real, SampleWindow, TimeAxis, WindowKind};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Statistic summarising the per-event baseline window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum BaselineStatistic {
    #[strum(to_string = "mean")]
    Mean,
    #[strum(to_string = "min")]
    Min,
}

impl BaselineStatistic {
    pub fn apply(self, window: &SampleWindow) -> Option<Real> {
        match self {
            BaselineStatistic::Mean => window.mean(),
            BaselineStatistic::Min => window.minimum(),
        }
    }
}

/// Mean of the samples inside a fixed absolute window, the zero reference
/// for every per-event metric of the trace.
pub fn trace_baseline(
    axis: &TimeAxis,
    samples: &[Real],
    window: &AbsoluteWindow,
) -> Result<Real, AnalysisError> {
    let bounds = (window.start, window.end);
    let selected = SampleWindow::select(axis, samples, WindowKind::TraceBaseline, bounds, 1)?;
    selected.mean().ok_or(AnalysisError::EmptyWindowResult {
        window: WindowKind::TraceBaseline,
        from: window.start,
        to: window.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn mean_and_min() {
        let times = [0.0, 1.0, 2.0];
        let values = [3.0, -1.0, 4.0];
        let window = SampleWindow {
            times: &times,
            values: &values,
        };
        assert_eq!(BaselineStatistic::Mean.apply(&window), Some(2.0));
        assert_eq!(BaselineStatistic::Min.apply(&window), Some(-1.0));
    }

    #[test]
    fn statistic_names() {
        assert_eq!(
            serde_json::from_str::<BaselineStatistic>(r#""min""#).unwrap(),
            BaselineStatistic::Min
        );
        assert_eq!(
            serde_json::from_str::<BaselineStatistic>(r#""mean""#).unwrap(),
            BaselineStatistic::Mean
        );
        assert!(serde_json::from_str::<BaselineStatistic>(r#""median""#).is_err());
    }

    #[test]
    fn baseline_over_absolute_window() {
        let axis = TimeAxis::uniform(10, 0.1).unwrap();
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0, 100.0, 100.0, 100.0, 100.0];
        let baseline =
            trace_baseline(&axis, &samples, &AbsoluteWindow { start: 0.0, end: 0.4 }).unwrap();
        assert_approx_eq!(baseline, 3.0, 1e-12);
    }

    #[test]
    fn baseline_window_outside_trace() {
        let axis = TimeAxis::uniform(10, 0.1).unwrap();
        let samples = [0.0; 10];
        let result = trace_baseline(&axis, &samples, &AbsoluteWindow { start: 5.0, end: 6.0 });
        assert!(matches!(
            result,
            Err(AnalysisError::EmptyWindowResult {
                window: WindowKind::TraceBaseline,
                ..
            })
        ));
    }
}
