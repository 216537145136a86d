use super::{Real, SampleWindow};
use itertools::Itertools;

/// Trapezoidal integral over time of the window's samples measured from `reference`.
pub fn trapezoid(window: &SampleWindow, reference: Real) -> Real {
    window
        .times
        .iter()
        .zip(window.values)
        .tuple_windows()
        .map(|((t0, v0), (t1, v1))| (t1 - t0) * ((v0 - reference) + (v1 - reference)) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn single_trapezoid() {
        let window = SampleWindow {
            times: &[0.0, 1.0],
            values: &[2.0, 4.0],
        };
        assert_eq!(trapezoid(&window, 0.0), 3.0);
    }

    #[test]
    fn reference_is_subtracted() {
        let window = SampleWindow {
            times: &[0.0, 1.0],
            values: &[2.0, 4.0],
        };
        assert_eq!(trapezoid(&window, 1.0), 2.0);
    }

    #[test]
    fn non_uniform_spacing() {
        let window = SampleWindow {
            times: &[0.0, 0.5, 2.0],
            values: &[-1.0, -3.0, -1.0],
        };
        // 0.5 * (-4) / 2 + 1.5 * (-4) / 2
        assert_approx_eq!(trapezoid(&window, 0.0), -4.0, 1e-12);
    }

    #[test]
    fn single_sample_has_no_area() {
        let window = SampleWindow {
            times: &[1.0],
            values: &[5.0],
        };
        assert_eq!(trapezoid(&window, 0.0), 0.0);
    }
}
