//! CardioPredict: Cardiovascular Risk Estimator
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiopredict::adapters::sanitize::SanitizingMakeWriter;
use cardiopredict::config::AppConfig;
use cardiopredict::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Writing logs to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let use_file = config
        .log_mode
        .uses_file(std::io::stdout().is_terminal());

    let (writer, _guard) = if use_file {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: open() below reports the real failure.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Cannot open log file {}", config.log_file.display()))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer, config.sanitize_max_bytes)),
        )
        .init();

    tracing::info!(
        "Starting CardioPredict: analysis_delay_ms={}",
        config.analysis_delay.as_millis()
    );

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("CardioPredict shutdown complete.");
    Ok(())
}
