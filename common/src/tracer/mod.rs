mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerError, TracerOptions};

/// Should be called at the start of each binary.
/// Initialises the stdout tracer with the given default level, which applies
/// whenever `RUST_LOG` does not override it, and tags the subscriber with the
/// name of the calling binary.
#[macro_export]
macro_rules! init_tracer {
    ($level:expr) => {{
        $crate::tracer::TracerEngine::new(
            $crate::tracer::TracerOptions {
                default_level: $level,
                with_thread_ids: true,
            },
            env!("CARGO_BIN_NAME"),
            module_path!(),
        )
    }};
}
