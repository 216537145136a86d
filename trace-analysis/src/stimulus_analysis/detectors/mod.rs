pub mod rising_edge_detector;

use super::Real;

/// A state machine fed one trace point at a time, which reports the time of
/// the point at which its trigger condition is met.
pub trait Detector: Clone {
    type TimeType: Copy;

    fn signal(&mut self, time: Self::TimeType, value: Real) -> Option<Self::TimeType>;
}
