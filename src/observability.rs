//! Observability utilities.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Read `MAGMA_LOG_FORMAT`; anything other than `json` means compact.
    pub fn from_env() -> Self {
        std::env::var("MAGMA_LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Initialize tracing subscriber once for the process.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Format comes from
/// [`LogFormat::from_env`].
pub fn init_tracing() {
    init_tracing_with(LogFormat::from_env());
}

/// Like [`init_tracing`] with an explicit format. Later calls are no-ops.
pub fn init_tracing_with(format: LogFormat) {
    TRACING_INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init(),
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
