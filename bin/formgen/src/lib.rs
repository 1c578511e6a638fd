//! formgen CLI Library
//!
//! Command implementations for the `formgen` binary, exposed as a library so
//! they can be driven from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, list, render, fill, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use formgen::cmd;
//!
//! // Build every template into __generated__/
//! cmd::build::run(Path::new("formgen.toml"), &cmd::build::BuildArgs::default()).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use formgen_core::Config;
pub use formgen_generator::{BuildReport, Builder, TemplateRegistry};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// formgen::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
