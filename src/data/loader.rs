//! CSV Data Loader Module
//! Reads the wide metric tables with Polars and applies the wide fill policy.

use crate::config::{DataPaths, WideFillPolicy};
use crate::data::table::{Metric, Value, WideRow, WideTable, WideTableSet};
use crate::error::LoadError;
use polars::prelude::*;
use std::path::Path;

/// Name of the key column every input table must carry.
pub const COUNTRY_COLUMN: &str = "country";

/// Loads wide tables from delimited files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataLoader {
    fill: WideFillPolicy,
}

impl DataLoader {
    pub fn new(fill: WideFillPolicy) -> Self {
        Self { fill }
    }

    pub fn fill_policy(&self) -> WideFillPolicy {
        self.fill
    }

    /// Load the three metric tables. Fails on the first unreadable file.
    pub fn load_set(&self, paths: &DataPaths) -> Result<WideTableSet, LoadError> {
        Ok(WideTableSet {
            population: self.load_wide_table(&paths.population, Metric::Population)?,
            life_expectancy: self
                .load_wide_table(&paths.life_expectancy, Metric::LifeExpectancy)?,
            gni_per_capita: self.load_wide_table(&paths.gni_per_capita, Metric::GniPerCapita)?,
        })
    }

    /// Load one wide table. Every column is read as text; coercion happens later.
    pub fn load_wide_table(&self, path: &Path, metric: Metric) -> Result<WideTable, LoadError> {
        check_readable(path)?;

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| LoadError::CsvParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut table = Self::wide_table_from_frame(&df, metric, path)?;
        match self.fill {
            WideFillPolicy::None => {}
            WideFillPolicy::ForwardAlongRow => {
                for row in &mut table.rows {
                    forward_fill(&mut row.cells);
                }
            }
            WideFillPolicy::ForwardDownColumn => forward_fill_columns(&mut table.rows),
        }

        tracing::info!(
            path = %path.display(),
            %metric,
            countries = table.country_count(),
            years = table.year_count(),
            "loaded wide table"
        );
        Ok(table)
    }

    /// Extract a wide table from a frame of text columns.
    fn wide_table_from_frame(
        df: &DataFrame,
        metric: Metric,
        path: &Path,
    ) -> Result<WideTable, LoadError> {
        let csv_error = |e: PolarsError| LoadError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let country_col = df
            .column(COUNTRY_COLUMN)
            .map_err(|_| LoadError::MissingColumn {
                column: COUNTRY_COLUMN.to_string(),
                path: path.to_path_buf(),
            })?;
        let countries: Vec<Option<String>> = country_col
            .cast(&DataType::String)
            .map_err(csv_error)?
            .as_materialized_series()
            .str()
            .map_err(csv_error)?
            .into_iter()
            .map(|c| c.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .collect();

        let year_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name != COUNTRY_COLUMN)
            .collect();

        let mut year_cells: Vec<Vec<Value>> = Vec::with_capacity(year_names.len());
        for name in &year_names {
            let col = df.column(name).map_err(csv_error)?;
            let text = col.cast(&DataType::String).map_err(csv_error)?;
            let cells = text
                .as_materialized_series()
                .str()
                .map_err(csv_error)?
                .into_iter()
                .map(Value::from_raw)
                .collect();
            year_cells.push(cells);
        }

        let years = year_names.iter().map(|y| y.trim().to_string()).collect();
        let mut table = WideTable::new(metric, years);
        let mut skipped = 0usize;

        for (i, country) in countries.into_iter().enumerate() {
            let Some(country) = country else {
                skipped += 1;
                continue;
            };
            let cells = year_cells.iter().map(|col| col[i].clone()).collect();
            table.rows.push(WideRow { country, cells });
        }

        if skipped > 0 {
            tracing::warn!(
                path = %path.display(),
                rows = skipped,
                "dropped rows without a country name"
            );
        }

        Ok(table)
    }
}

/// Replace each missing cell with the nearest preceding non-missing cell.
/// Leading missing cells stay missing.
pub fn forward_fill(cells: &mut [Value]) {
    let mut last: Option<Value> = None;
    for cell in cells.iter_mut() {
        if cell.is_missing() {
            if let Some(prev) = &last {
                *cell = prev.clone();
            }
        } else {
            last = Some(cell.clone());
        }
    }
}

/// Replace each missing cell with the nearest non-missing cell above it in
/// the same year column. Gaps in the first row stay missing.
pub fn forward_fill_columns(rows: &mut [WideRow]) {
    let width = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let mut last: Vec<Option<Value>> = vec![None; width];
    for row in rows.iter_mut() {
        for (cell, prev) in row.cells.iter_mut().zip(last.iter_mut()) {
            if cell.is_missing() {
                if let Some(value) = prev {
                    *cell = value.clone();
                }
            } else {
                *prev = Some(cell.clone());
            }
        }
    }
}

fn check_readable(path: &Path) -> Result<(), LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if !metadata.is_file() {
        return Err(LoadError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    Ok(())
}
