//! rig-repack library
//!
//! Conversion operations behind the rig-repack CLI, callable from other tools.

pub mod convert;

pub use convert::{compact_from_text, extract_to_text, merge_clip};

/// Install the process-wide log subscriber.
///
/// Safe to call more than once; later calls are no-ops. Nothing is torn down
/// at exit.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
