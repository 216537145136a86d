use super::{Detector, Real};

#[derive(Clone)]
pub struct EventIter<I, D>
where
    I: Iterator<Item = (D::TimeType, Real)>,
    D: Detector,
{
    source: I,
    detector: D,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (D::TimeType, Real)>,
    D: Detector,
{
    type Item = D::TimeType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (time, value) = self.source.next()?;
            if let Some(event) = self.detector.signal(time, value) {
                return Some(event);
            }
        }
    }
}

pub trait EventFilter<I, D>
where
    I: Iterator<Item = (D::TimeType, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (D::TimeType, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
        }
    }
}
