//! Logging setup and the YAML result report

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::fs::File;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Wall-clock time as HH:MM:SS
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Send the log to `output_path`, or to stdout when none is given
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            }
            Err(err) => eprintln!("Could not create output file {}: {}", path, err),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

/// Serialize `report` as YAML into `path`
pub fn write_report<T: Serialize>(path: &str, report: &T) -> Result<()> {
    let text = serde_yml::to_string(report).wrap_err("Failed to serialize report")?;
    fs::write(path, text).wrap_err_with(|| format!("Unable to write report: {}", path))?;
    info!("Report written to: {}", path);
    Ok(())
}
