pub mod metrics;
pub mod recording;
pub mod tracer;

/// Scalar type used for times and sample values throughout the pipeline.
pub type Real = f64;

/// Index of a sample along a recording's time axis.
pub type SampleIndex = usize;

/// One-based number of a stimulus within a recording, as reported to users.
pub type StimulusNumber = usize;

pub fn stimulus_number(event_index: usize) -> StimulusNumber {
    event_index + 1
}
