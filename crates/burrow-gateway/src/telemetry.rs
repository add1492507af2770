use crate::cli::LogFormat;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber and routes `log` records into it.
///
/// Filtering follows `RUST_LOG`, falling back to `info`.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    tracing_log::LogTracer::init()?;

    Ok(())
}
