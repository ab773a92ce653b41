mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerOptions};

/// Should be called at the start of each binary.
/// Installs the global subscriber and announces the component name.
#[macro_export]
macro_rules! init_tracer {
    ($options:expr) => {{
        let tracer = $crate::tracer::TracerEngine::new($options, env!("CARGO_BIN_NAME"));
        // Emitted here rather than in `TracerEngine::new` so the event
        // carries the calling module as its target.
        tracing::info!("Tracing initialised for {}", tracer.service_name());
        tracer
    }};
}
