//! Tracing subscriber setup for binaries and tests embedding the engine

use tracing_subscriber::EnvFilter;

/// Log output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
}

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `vigil=debug` when verbose and
/// `vigil=info` when not. Returns `false` if a subscriber was already installed.
pub fn init_logging(verbose: bool, format: LogFormat) -> bool {
    let filter = default_filter(verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(verbose);

    match format {
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "vigil=debug"
    } else {
        "vigil=info"
    }
}
