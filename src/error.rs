//! Error types for the Gapminder pipeline.

use crate::data::Metric;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the wide input tables.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file does not exist.
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Polars could not parse the file as CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The country key column is absent.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Errors raised when the tidy tables cannot be joined.
#[derive(Debug, Error)]
pub enum JoinError {
    /// A table was passed in the slot of a different metric.
    #[error("expected a {expected} table for the join, got {found}")]
    MetricMismatch { expected: Metric, found: Metric },
}

/// Errors raised by the cleaner.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Mean imputation was requested but the column has no numeric values.
    #[error("cannot impute {metric}: all {missing} values are missing")]
    DegenerateColumn { metric: Metric, missing: usize },
}

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Clean(#[from] CleanError),
}

impl PipelineError {
    /// Short message for the display surface, without source chains.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Load(LoadError::FileNotFound { path }) => {
                format!("Could not find data file {}", file_label(path))
            }
            PipelineError::Load(LoadError::FileRead { path, .. }) => {
                format!("Could not read data file {}", file_label(path))
            }
            PipelineError::Load(LoadError::CsvParse { path, .. }) => {
                format!("Data file {} is not a valid table", file_label(path))
            }
            PipelineError::Load(LoadError::MissingColumn { column, path }) => {
                format!("Data file {} has no '{}' column", file_label(path), column)
            }
            PipelineError::Join(e) => format!("Could not combine the data tables: {e}"),
            PipelineError::Clean(CleanError::DegenerateColumn { metric, .. }) => {
                format!("No usable {metric} values in the data")
            }
        }
    }
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("/data/population_total.csv"),
        };
        assert_eq!(
            err.to_string(),
            "data file not found: /data/population_total.csv"
        );
    }

    #[test]
    fn test_user_message_hides_directory() {
        let err: PipelineError = LoadError::MissingColumn {
            column: "country".into(),
            path: PathBuf::from("/very/long/path/ny_gnp_pcap_cn.csv"),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "Data file ny_gnp_pcap_cn.csv has no 'country' column"
        );
    }

    #[test]
    fn test_clean_error_message() {
        let err: PipelineError = CleanError::DegenerateColumn {
            metric: Metric::GniPerCapita,
            missing: 4,
        }
        .into();
        assert_eq!(err.user_message(), "No usable gni_per_capita values in the data");
        assert_eq!(
            err.to_string(),
            "cannot impute gni_per_capita: all 4 values are missing"
        );
    }
}
