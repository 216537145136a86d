use crate::{
    config::{Response, Simulation, StimulusTrain, TraceTemplate},
    noise::Noise,
};
use ephys_common::{
    Real, SampleIndex,
    recording::{RecordingFile, TraceColumn},
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::NormalError;
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid Noise Distribution in {trace}: {source}")]
    Noise { trace: String, source: NormalError },
}

/// Sample indices of the stimulation pulses which fit in the recording.
pub fn onset_indices(
    train: &StimulusTrain,
    sample_interval: Real,
    len: usize,
) -> Vec<SampleIndex> {
    (0..train.count)
        .map(|k| ((train.start + k as Real / train.frequency) / sample_interval).round())
        .filter(|&index| index >= 0.0)
        .map(|index| index as SampleIndex)
        .filter(|&index| index < len)
        .collect()
}

fn stimulus_channel(
    train: &StimulusTrain,
    onsets: &[SampleIndex],
    sample_interval: Real,
    len: usize,
) -> Vec<Real> {
    let width = ((train.pulse_width / sample_interval).round() as usize).max(1);
    let mut channel = vec![0.0; len];
    for &onset in onsets {
        channel
            .iter_mut()
            .skip(onset)
            .take(width)
            .for_each(|sample| *sample = train.marker_amplitude);
    }
    channel
}

impl Response {
    /// Value of the response `dt` seconds after its onset.
    fn at(&self, dt: Real) -> Real {
        let t = dt - self.latency;
        if t < 0.0 {
            return 0.0;
        }
        // time of the peak of the unnormalised double exponential
        let t_peak =
            self.rise * self.decay / (self.decay - self.rise) * (self.decay / self.rise).ln();
        let norm = (-t_peak / self.decay).exp() - (-t_peak / self.rise).exp();
        -self.amplitude * ((-t / self.decay).exp() - (-t / self.rise).exp()) / norm
    }
}

fn simulate_trace(
    template: &TraceTemplate,
    times: &[Real],
    onsets: &[Real],
    seed: u64,
) -> Result<TraceColumn, SimulationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut noises = template
        .noises
        .iter()
        .map(Noise::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SimulationError::Noise {
            trace: template.name.clone(),
            source,
        })?;

    let samples = times
        .iter()
        .map(|&t| {
            let evoked: Real = onsets
                .iter()
                .map(|&onset| t - onset)
                .filter(|&dt| dt >= 0.0)
                .map(|dt| {
                    let artifact = if dt < template.artifact.duration {
                        template.artifact.amplitude
                    } else {
                        0.0
                    };
                    template.response.at(dt) + artifact
                })
                .sum();
            let noise: Real = noises.iter_mut().map(|noise| noise.sample(&mut rng)).sum();
            template.holding + evoked + noise
        })
        .collect();

    Ok(TraceColumn {
        name: template.name.clone(),
        samples,
    })
}

/// Generates a recording file with a stimulus channel and one trace per template.
///
/// Each trace draws its noise from its own generator, seeded from `seed` and
/// its position, so output is reproducible regardless of thread scheduling.
#[tracing::instrument(skip_all, fields(seed = seed, num_traces = simulation.traces.len()))]
pub fn simulate(simulation: &Simulation, seed: u64) -> Result<RecordingFile, SimulationError> {
    let len = (simulation.duration / simulation.sample_interval).round() as usize;
    let times: Vec<Real> = (0..len)
        .map(|i| i as Real * simulation.sample_interval)
        .collect();

    let onset_samples = onset_indices(&simulation.stimulus, simulation.sample_interval, len);
    let onset_times: Vec<Real> = onset_samples
        .iter()
        .map(|&i| i as Real * simulation.sample_interval)
        .collect();
    info!("Simulating {len} samples with {} stimuli", onset_samples.len());

    let stimulus = stimulus_channel(
        &simulation.stimulus,
        &onset_samples,
        simulation.sample_interval,
        len,
    );
    let traces = simulation
        .traces
        .par_iter()
        .enumerate()
        .map(|(index, template)| {
            simulate_trace(template, &times, &onset_times, seed.wrapping_add(index as u64))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordingFile {
        time: times,
        time_scale: None,
        stimulus: Some(stimulus),
        onsets: None,
        traces,
    })
}
