//! Logging setup
//!
//! Console output via `tracing-subscriber`, plus an optional non-blocking
//! daily-rolling file writer when a log directory is configured. The file
//! writer's guard is kept alive for the process lifetime.

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infrastructure::config::LoggingConfig;

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "pricewatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}
