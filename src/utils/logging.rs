use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";
pub const WATCH_PREFIX: &str = "watch";

const LOG_FILES_KEPT: usize = 5;

/// Logs into `<dir>/logs/<prefix>.<date>`, and to stdout as well when `show_std` is set. The
/// counter's own output goes to stdout too, so console logging stays opt-in.
pub fn enable_logging(
    prefix: &str,
    application_data_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let files = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(LOG_FILES_KEPT)
        .filename_prefix(prefix)
        .build(application_data_path.join("logs"))?;
    let console = std::io::stdout.with_filter(move |_| show_std);

    let fallback = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(log_level, fallback.as_deref()))
        .with_span_events(FmtSpan::CLOSE)
        // Escape codes would end up in the log files.
        .with_ansi(false)
        .with_writer(console.and(files))
        .compact()
        .init();
    Ok(())
}

/// Only this crate's events are kept. An explicit level wins over `RUST_LOG`, and `info` is used
/// when neither is present.
fn crate_filter(log_level: Option<LevelFilter>, fallback: Option<&str>) -> EnvFilter {
    let level = log_level
        .map(|v| v.to_string())
        .or_else(|| fallback.map(str::to_owned))
        .unwrap_or_else(|| LevelFilter::INFO.to_string());
    EnvFilter::new(format!(
        "{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        level.to_lowercase()
    ))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
