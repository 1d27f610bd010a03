use tracing_subscriber::EnvFilter;

use crate::bootstrap::{LogFormat, LogSettings};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; events go to stderr. Safe to call more than once.
pub fn init(settings: &LogSettings) {
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&settings.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match settings.format {
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(make_filter())
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Pretty => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(make_filter())
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
