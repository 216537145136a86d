use crate::config::{NoiseAttributes, NoiseSource};
use ephys_common::Real;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// A noise source together with the value it produced at the previous sample.
pub(crate) struct Noise {
    distribution: NoiseDistribution,
    smoothing_factor: Real,
    prev: Real,
}

enum NoiseDistribution {
    Uniform { min: Real, max: Real },
    Gaussian(Normal<Real>),
}

impl Noise {
    pub(crate) fn new(source: &NoiseSource) -> Result<Self, NormalError> {
        let distribution = match source.attributes {
            NoiseAttributes::Uniform { min, max } => NoiseDistribution::Uniform { min, max },
            NoiseAttributes::Gaussian { mean, sd } => {
                NoiseDistribution::Gaussian(Normal::new(mean, sd)?)
            }
        };
        Ok(Self {
            distribution,
            smoothing_factor: source.smoothing_factor,
            prev: Real::default(),
        })
    }

    /// Draws the next value, blended with the previous one by the smoothing factor.
    pub(crate) fn sample<R: Rng>(&mut self, rng: &mut R) -> Real {
        let new_value = match &self.distribution {
            NoiseDistribution::Uniform { min, max } => rng.random_range(*min..*max),
            NoiseDistribution::Gaussian(normal) => normal.sample(rng),
        };
        self.prev = new_value * (1.0 - self.smoothing_factor) + self.prev * self.smoothing_factor;
        self.prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn source(attributes: NoiseAttributes, smoothing_factor: Real) -> NoiseSource {
        NoiseSource {
            attributes,
            smoothing_factor,
        }
    }

    #[test]
    fn uniform_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut noise = Noise::new(&source(
            NoiseAttributes::Uniform {
                min: -1.0,
                max: 1.0,
            },
            0.0,
        ))
        .unwrap();
        assert!((0..1000).all(|_| (-1.0..1.0).contains(&noise.sample(&mut rng))));
    }

    #[test]
    fn smoothing_reduces_spread() {
        let spread = |factor| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut noise = Noise::new(&source(
                NoiseAttributes::Gaussian { mean: 0.0, sd: 1.0 },
                factor,
            ))
            .unwrap();
            let values: Vec<Real> = (0..5000).map(|_| noise.sample(&mut rng)).collect();
            values.iter().map(|v| v * v).sum::<Real>() / values.len() as Real
        };
        assert!(spread(0.9) < spread(0.0) / 2.0);
    }
}
