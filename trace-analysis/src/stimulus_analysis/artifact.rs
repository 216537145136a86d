use super::{Real, TimeAxis, WindowKind, WindowOffsets};
use crate::error::AnalysisError;

/// Blanks the stimulation artifact of the event at `onset`.
///
/// The samples from the first sample at or after `onset + window.start` up to
/// and including the first sample at or after `onset + window.end` are replaced
/// by a straight line between the two boundary samples.
/// A window ending before the first sample is `InvalidWindow`, like one
/// ending after the last.
pub fn remove_artifact(
    axis: &TimeAxis,
    samples: &mut [Real],
    onset: Real,
    window: &WindowOffsets,
) -> Result<(), AnalysisError> {
    let (from, to) = window.around(onset);
    let (start, end) = (axis.index_of(from), axis.index_of(to));
    if axis.time(0).is_some_and(|first| to < first) {
        return Err(AnalysisError::InvalidWindow {
            window: WindowKind::Blank,
            start,
            end,
            len: samples.len(),
        });
    }
    interpolate_span(samples, start, end)
}

/// Replaces `samples[start..=end]` with a linear ramp from `samples[start]`
/// to `samples[end]`. Both boundary samples keep their values exactly.
/// The samples are left untouched if either boundary does not exist.
pub fn interpolate_span(
    samples: &mut [Real],
    start: usize,
    end: usize,
) -> Result<(), AnalysisError> {
    let invalid = AnalysisError::InvalidWindow {
        window: WindowKind::Blank,
        start,
        end,
        len: samples.len(),
    };
    if end < start {
        return Err(invalid);
    }
    let Some(segment) = samples.get_mut(start..=end) else {
        return Err(invalid);
    };
    let (Some(&first), Some(&last)) = (segment.first(), segment.last()) else {
        return Err(invalid);
    };

    let steps = (end - start) as Real;
    let last_position = end - start;
    for (position, sample) in segment.iter_mut().enumerate() {
        *sample = if position == 0 {
            first
        } else if position == last_position {
            last
        } else {
            first + (position as Real / steps) * (last - first)
        };
    }
    Ok(())
}
