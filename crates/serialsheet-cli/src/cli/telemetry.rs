//! Log output for the binary.
//!
//! Events from the library (batch generation, layout warnings, render
//! progress) and from the commands are written to stderr, leaving stdout for
//! command output. The level is taken from `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=serialsheet=debug serialsheet generate -n 500
//! ```

use crate::cli::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let pretty = (format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_target(false)
            .with_timer(ChronoLocal::rfc_3339())
            .with_file(true)
            .pretty()
    });
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_thread_ids(true)
            .with_timer(ChronoLocal::rfc_3339())
            .json()
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(pretty)
        .with(json)
        .try_init()?;
    Ok(())
}
