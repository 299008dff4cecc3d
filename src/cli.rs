//! Command-line arguments for the Gapminder dashboard.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::WideFillPolicy;
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "gapminder",
    version,
    about = "Gapminder bubble chart: income, life expectancy and population over time",
    long_about = "Load the Gapminder population, life expectancy and income tables, \
                  merge them by country and year, and show an animated bubble chart.\n\n\
                  Without export flags the interactive dashboard opens. With --export-json \
                  or --export-png the page is written to disk and the program exits."
)]
pub struct Cli {
    /// Directory holding the three source CSV files (default: bundled data).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// How blank cells of the raw tables are carried forward before merging.
    #[arg(long = "wide-fill", value_enum, default_value = "row")]
    pub wide_fill: WideFillArg,

    /// Write the dashboard page as JSON and exit.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Render one frame of the chart to a PNG image and exit.
    #[arg(long = "export-png", value_name = "PATH")]
    pub export_png: Option<PathBuf>,

    /// Frame to render with --export-png (default: latest year).
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<String>,

    /// PNG width in pixels.
    #[arg(long = "width", value_name = "PX", default_value_t = 1280)]
    pub width: u32,

    /// PNG height in pixels.
    #[arg(long = "height", value_name = "PX", default_value_t = 800)]
    pub height: u32,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// True when any export flag was given; no window is opened.
    pub fn is_headless(&self) -> bool {
        self.export_json.is_some() || self.export_png.is_some()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WideFillArg {
    /// Leave blank cells missing.
    None,
    /// Carry the previous year forward within each country.
    Row,
    /// Carry the previous country down within each year.
    Column,
}

impl From<WideFillArg> for WideFillPolicy {
    fn from(arg: WideFillArg) -> Self {
        match arg {
            WideFillArg::None => WideFillPolicy::None,
            WideFillArg::Row => WideFillPolicy::ForwardAlongRow,
            WideFillArg::Column => WideFillPolicy::ForwardDownColumn,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
