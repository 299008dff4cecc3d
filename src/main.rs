//! Gapminder - Income, Life Expectancy & Population Bubble Chart
//!
//! Loads the Gapminder tables, merges them by country and year and shows an
//! animated bubble chart, either interactively or as exported files.

mod charts;
mod cli;
mod config;
mod data;
mod error;
mod gui;
mod logging;
mod pipeline;
mod stats;

use anyhow::{anyhow, Context};
use charts::{DashboardPage, DisplaySurface, JsonSurface, PngSurface};
use clap::Parser;
use cli::Cli;
use config::{DataPaths, PipelineConfig};
use data::LoadCache;
use eframe::egui;
use gui::GapminderApp;
use logging::{init_logging, LogConfig};
use pipeline::Pipeline;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone());
    if let Err(e) = init_logging(&log_config) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let paths = cli
        .data_dir
        .as_ref()
        .map(DataPaths::in_dir)
        .unwrap_or_else(DataPaths::bundled);
    let config = PipelineConfig {
        wide_fill: cli.wide_fill.into(),
        ..PipelineConfig::with_paths(paths)
    };
    let pipeline = Pipeline::new(config, Arc::new(LoadCache::new()));

    let result = if cli.is_headless() {
        run_headless(&cli, &pipeline)
    } else {
        run_dashboard(pipeline)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "gapminder failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Write the requested exports. A pipeline error still produces the error
/// page, then exits non-zero.
fn run_headless(cli: &Cli, pipeline: &Pipeline) -> anyhow::Result<ExitCode> {
    let result = pipeline.run();
    let page = DashboardPage::from_result(&result);

    if let Some(path) = &cli.export_json {
        JsonSurface::new(path)
            .present(&page)
            .with_context(|| format!("exporting {}", path.display()))?;
    }
    if let Some(path) = &cli.export_png {
        PngSurface::new(path, (cli.width, cli.height), cli.year.clone())
            .present(&page)
            .with_context(|| format!("exporting {}", path.display()))?;
    }

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_dashboard(pipeline: Pipeline) -> anyhow::Result<ExitCode> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Gapminder"),
        ..Default::default()
    };

    eframe::run_native(
        "Gapminder",
        options,
        Box::new(move |cc| Ok(Box::new(GapminderApp::new(cc, pipeline)))),
    )
    .map_err(|e| anyhow!("{e}"))?;

    Ok(ExitCode::SUCCESS)
}
