use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// Logs go to stderr so stdout stays clean for minted IDs and JSON records.
/// Verbosity is controlled with `RUST_LOG` and defaults to `warn`, which
/// still surfaces clock regressions reported by the generator.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false)
                .with_timer(fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}
