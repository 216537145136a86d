use thiserror::Error;
use tracing::{debug, level_filters::LevelFilter, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Cannot Set Global Tracing Subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

pub struct TracerOptions {
    /// Level used when `RUST_LOG` is absent or holds no valid directive.
    pub default_level: LevelFilter,
    /// Rayon workers log concurrently, so thread ids keep per-trace lines attributable.
    pub with_thread_ids: bool,
}

/// This object initialises the global tracing subscriber, given a TracerOptions struct.
pub struct TracerEngine;

impl TracerEngine {
    /// Initialises the stdout tracer for the crate
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the binary, attached to the startup message.
    /// * `module_name` - The name of the current module.
    /// #Returns
    /// An instance of TracerEngine, or an error if a global subscriber was already set.
    pub fn new(
        options: TracerOptions,
        service_name: &str,
        module_name: &str,
    ) -> Result<Self, TracerError> {
        let stdout_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_thread_ids(options.with_thread_ids);

        // This filter is applied to the stdout tracer
        let log_filter = EnvFilter::builder()
            .with_default_directive(options.default_level.into())
            .from_env_lossy();

        let subscriber =
            tracing_subscriber::Registry::default().with(stdout_tracer.with_filter(log_filter));

        tracing::subscriber::set_global_default(subscriber)?;
        debug!(service = service_name, module = module_name, "Tracer initialised");

        Ok(Self)
    }
}
