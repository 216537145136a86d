use super::{Detector, Real};
use std::marker::PhantomData;

/// Fires on the first sample at or above the threshold that follows a sample
/// below it. Falling edges and samples that stay above the threshold do not fire.
#[derive(Default, Debug, Clone)]
pub struct RisingEdgeDetector<T> {
    threshold: Real,
    previous: Option<Real>,
    phantom: PhantomData<T>,
}

impl<T> RisingEdgeDetector<T> {
    pub fn new(threshold: Real) -> Self {
        Self {
            threshold,
            previous: None,
            phantom: PhantomData,
        }
    }
}

impl<T: Copy> Detector for RisingEdgeDetector<T> {
    type TimeType = T;

    fn signal(&mut self, time: T, value: Real) -> Option<T> {
        let crossed = self
            .previous
            .is_some_and(|previous| previous < self.threshold && value >= self.threshold);
        self.previous = Some(value);
        crossed.then_some(time)
    }
}
