use ephys_common::Real;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot Open Simulation File: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid Simulation File: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid Parameter {0}: {1}")]
    InvalidParameter(&'static str, &'static str),
}

/// Description of a synthetic recording.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Simulation {
    /// Seconds between samples.
    pub sample_interval: Real,
    /// Length of the recording in seconds.
    pub duration: Real,
    pub stimulus: StimulusTrain,
    pub traces: Vec<TraceTemplate>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A regular train of stimulation pulses, written to the marker channel.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StimulusTrain {
    pub start: Real,
    /// Pulses per second.
    pub frequency: Real,
    pub count: usize,
    pub pulse_width: Real,
    pub marker_amplitude: Real,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TraceTemplate {
    pub name: String,
    /// Level of the trace in the absence of any response.
    pub holding: Real,
    pub response: Response,
    pub artifact: Artifact,
    #[serde(default)]
    pub noises: Vec<NoiseSource>,
}

/// A negative-going, double exponential postsynaptic current.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Response {
    /// Magnitude of the peak, in sample units.
    pub amplitude: Real,
    /// Delay from onset to the start of the response.
    pub latency: Real,
    pub rise: Real,
    pub decay: Real,
}

/// A rectangular stimulation artifact starting at each onset.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Artifact {
    pub amplitude: Real,
    pub duration: Real,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NoiseSource {
    pub attributes: NoiseAttributes,
    /// Weight given to the previous noise value, in `[0, 1)`.
    pub smoothing_factor: Real,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "noise-type")]
pub enum NoiseAttributes {
    Uniform { min: Real, max: Real },
    Gaussian { mean: Real, sd: Real },
}

impl Simulation {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let simulation: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        simulation.validate()?;
        Ok(simulation)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name, value: Real| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter(name, "must be positive"))
            }
        };
        positive("sample-interval", self.sample_interval)?;
        positive("duration", self.duration)?;
        positive("frequency", self.stimulus.frequency)?;
        positive("pulse-width", self.stimulus.pulse_width)?;
        for trace in &self.traces {
            positive("rise", trace.response.rise)?;
            positive("decay", trace.response.decay)?;
            if trace.response.rise >= trace.response.decay {
                return Err(ConfigError::InvalidParameter(
                    "rise",
                    "must be shorter than decay",
                ));
            }
            for noise in &trace.noises {
                if !(0.0..1.0).contains(&noise.smoothing_factor) {
                    return Err(ConfigError::InvalidParameter(
                        "smoothing-factor",
                        "must lie in [0, 1)",
                    ));
                }
                match noise.attributes {
                    NoiseAttributes::Uniform { min, max } => {
                        if !(min.is_finite() && max.is_finite() && min < max) {
                            return Err(ConfigError::InvalidParameter(
                                "uniform",
                                "min must be below max",
                            ));
                        }
                    }
                    NoiseAttributes::Gaussian { mean, sd } => {
                        if !mean.is_finite() {
                            return Err(ConfigError::InvalidParameter("mean", "must be finite"));
                        }
                        if !(sd.is_finite() && sd >= 0.0) {
                            return Err(ConfigError::InvalidParameter(
                                "sd",
                                "must be finite and non-negative",
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
