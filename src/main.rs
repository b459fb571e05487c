//! Bac Français 2024 - Exam Results Dashboard
//!
//! Loads the school's exam-results export, cleans it and displays global
//! and per-class statistics with interactive charts.

mod charts;
mod config;
mod data;
mod error;
mod gui;
mod pipeline;
mod stats;

use anyhow::Context;
use config::Settings;
use data::ScoreTable;
use eframe::egui;
use gui::BacDashboardApp;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // single report of the fatal error, with its whole context chain
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load settings and data, then run the window until it closes.
fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("Cannot load settings")?;
    let table = load_results(&settings)?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Bac Français 2024"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Bac Français 2024",
        options,
        Box::new(move |cc| Ok(Box::new(BacDashboardApp::new(cc, settings, table)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

fn load_results(settings: &Settings) -> anyhow::Result<ScoreTable> {
    let table = pipeline::load_clean(settings).with_context(|| {
        format!("Cannot load results from {}", settings.csv_path.display())
    })?;

    if table.is_empty() {
        log::warn!("No usable rows in {}", settings.csv_path.display());
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failure_carries_path_and_cause() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            csv_path: dir.path().join("absent.csv"),
            ..Settings::default()
        };

        let err = load_results(&settings).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("Cannot load results from "));
        assert!(message.contains("absent.csv"));
        assert!(matches!(
            err.downcast_ref::<error::DashboardError>(),
            Some(error::DashboardError::FileAccess { .. })
        ));
    }
}
