use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "protocol_mirror=warn,protocol_mirror_syntax=warn";
const VERBOSE_FILTER: &str = "protocol_mirror=debug,protocol_mirror_syntax=debug";
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("invalid tracing filter directive `{directive}`: {source}")]
    InvalidFilter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs process-global tracing output on stderr.
///
/// Behavior:
/// - Uses `RUST_LOG` when present.
/// - Falls back to `warn` for this tool's crates, or `debug` when `verbose`.
/// - Is idempotent: repeated calls are no-ops after first successful init.
pub fn init_tracing(verbose: bool) -> Result<(), TelemetryInitError> {
    if TRACING_INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = resolve_filter(verbose)?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    let _ = TRACING_INITIALIZED.set(());
    Ok(())
}

fn resolve_filter(verbose: bool) -> Result<EnvFilter, TelemetryInitError> {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryInitError::InvalidFilter {
            directive: fallback.to_string(),
            source,
        }),
    }
}
