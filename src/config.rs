//! Pipeline configuration: input locations and missing-value policies.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub const POPULATION_FILE: &str = "population_total.csv";
pub const LIFE_EXPECTANCY_FILE: &str = "life_expectancy_years.csv";
pub const GNI_PER_CAPITA_FILE: &str = "ny_gnp_pcap_cn.csv";

/// Paths of the three wide input tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPaths {
    pub population: PathBuf,
    pub life_expectancy: PathBuf,
    pub gni_per_capita: PathBuf,
}

impl DataPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            population: dir.join(POPULATION_FILE),
            life_expectancy: dir.join(LIFE_EXPECTANCY_FILE),
            gni_per_capita: dir.join(GNI_PER_CAPITA_FILE),
        }
    }

    /// The data directory shipped with the crate.
    pub fn bundled() -> Self {
        Self::in_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Directory holding the population file, for display.
    pub fn data_dir(&self) -> Option<&Path> {
        self.population.parent()
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::bundled()
    }
}

/// How missing cells of a raw wide table are filled before reshaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WideFillPolicy {
    /// Keep missing cells as they are.
    None,
    /// Carry the previous non-missing cell forward along each row, across
    /// the years of one country.
    #[default]
    ForwardAlongRow,
    /// Carry the cell of the previous country down each year column. A
    /// country's gap is only filled when an earlier row has that year.
    ForwardDownColumn,
}

/// How missing numeric cells of one merged column are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MissingFill {
    /// Leave missing cells untouched.
    Leave,
    /// Replace with a fixed value.
    Constant(f64),
    /// Replace with the mean of the column's non-missing values.
    ColumnMean,
}

/// Per-column fill policies applied by the cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanPolicy {
    pub population: MissingFill,
    pub life_expectancy: MissingFill,
    pub gni_per_capita: MissingFill,
}

impl Default for CleanPolicy {
    fn default() -> Self {
        Self {
            population: MissingFill::Constant(0.0),
            life_expectancy: MissingFill::Leave,
            gni_per_capita: MissingFill::ColumnMean,
        }
    }
}

/// Everything a pipeline run needs besides the cache.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub paths: DataPaths,
    pub wide_fill: WideFillPolicy,
    pub clean: CleanPolicy,
}

impl PipelineConfig {
    pub fn with_paths(paths: DataPaths) -> Self {
        Self {
            paths,
            ..Default::default()
        }
    }
}
