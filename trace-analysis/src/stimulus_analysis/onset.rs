use super::{EventFilter, Real, RisingEdgeDetector, TimeAxis};
use crate::error::MalformedInput;
use itertools::Itertools;

/// Indices of the samples at which the stimulus channel rises from below
/// `threshold` to at or above it, in sample order.
pub fn detect_onset_indices(stimulus: &[Real], threshold: Real) -> Vec<usize> {
    stimulus
        .iter()
        .copied()
        .enumerate()
        .events(RisingEdgeDetector::new(threshold))
        .collect()
}

/// The ordered stimulation events of one recording.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OnsetTimes {
    times: Vec<Real>,
}

impl OnsetTimes {
    /// Accepts an externally supplied event-time table.
    pub fn new(times: Vec<Real>) -> Result<Self, MalformedInput> {
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(MalformedInput::NonFiniteOnset { index });
        }
        if let Some(index) = times
            .iter()
            .tuple_windows()
            .position(|(earlier, later)| later <= earlier)
        {
            return Err(MalformedInput::NonIncreasingOnset { index: index + 1 });
        }
        Ok(Self { times })
    }

    /// Detects onsets from a stimulus marker channel sampled on `axis`.
    #[tracing::instrument(skip_all, fields(threshold = threshold, num_onsets))]
    pub fn detect(
        axis: &TimeAxis,
        stimulus: &[Real],
        threshold: Real,
    ) -> Result<Self, MalformedInput> {
        if stimulus.len() != axis.len() {
            return Err(MalformedInput::LengthMismatch {
                expected: axis.len(),
                found: stimulus.len(),
            });
        }
        if let Some(index) = stimulus.iter().position(|v| !v.is_finite()) {
            return Err(MalformedInput::NonFiniteSample { index });
        }
        let times: Vec<Real> = detect_onset_indices(stimulus, threshold)
            .into_iter()
            .filter_map(|index| axis.time(index))
            .collect();
        tracing::Span::current().record("num_onsets", times.len());
        Ok(Self { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.times
    }

    pub fn iter(&self) -> impl Iterator<Item = Real> + '_ {
        self.times.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rising_edges() {
        let stimulus = [0.0, 0.0, 30.0, 30.0, 0.0, 0.0, 30.0];
        assert_eq!(detect_onset_indices(&stimulus, 25.0), vec![2, 6]);
    }

    #[test]
    fn onset_is_time_of_later_sample() {
        let axis = TimeAxis::uniform(7, 0.5).unwrap();
        let stimulus = [0.0, 0.0, 30.0, 30.0, 0.0, 0.0, 30.0];
        let onsets = OnsetTimes::detect(&axis, &stimulus, 25.0).unwrap();
        assert_eq!(onsets.as_slice(), &[1.0, 3.0]);
    }

    #[test]
    fn flat_channel_has_no_onsets() {
        let axis = TimeAxis::uniform(5, 1.0).unwrap();
        let onsets = OnsetTimes::detect(&axis, &[0.0; 5], 25.0).unwrap();
        assert!(onsets.is_empty());
    }

    #[test]
    fn stimulus_length_must_match_axis() {
        let axis = TimeAxis::uniform(5, 1.0).unwrap();
        assert_eq!(
            OnsetTimes::detect(&axis, &[0.0; 4], 25.0),
            Err(MalformedInput::LengthMismatch {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn stimulus_must_be_finite() {
        let axis = TimeAxis::uniform(3, 1.0).unwrap();
        assert_eq!(
            OnsetTimes::detect(&axis, &[0.0, Real::INFINITY, 0.0], 25.0),
            Err(MalformedInput::NonFiniteSample { index: 1 })
        );
    }

    #[test]
    fn external_onsets_must_increase() {
        assert!(OnsetTimes::new(vec![0.1, 0.2, 0.3]).is_ok());
        assert_eq!(
            OnsetTimes::new(vec![0.1, 0.3, 0.2]),
            Err(MalformedInput::NonIncreasingOnset { index: 2 })
        );
        assert_eq!(
            OnsetTimes::new(vec![0.1, Real::NAN]),
            Err(MalformedInput::NonFiniteOnset { index: 1 })
        );
    }
}
