//! Data Processor Module
//! Reshapes wide metric tables into long (tidy) form.

use crate::data::table::{TidyRow, TidyTable, WideTable, WideTableSet};

/// Tidy tables for the three metrics, ready to join.
#[derive(Debug, Clone, PartialEq)]
pub struct TidySet {
    pub population: TidyTable,
    pub life_expectancy: TidyTable,
    pub gni_per_capita: TidyTable,
}

/// Handles wide-to-long transformation.
pub struct DataProcessor;

impl DataProcessor {
    /// Melt a wide table: one tidy row per (country, year) cell.
    ///
    /// Rows come out country by country, years in the wide table's column order.
    pub fn melt(wide: &WideTable) -> TidyTable {
        let mut rows = Vec::with_capacity(wide.country_count() * wide.year_count());

        for row in &wide.rows {
            for (year, value) in wide.years.iter().zip(row.cells.iter()) {
                rows.push(TidyRow {
                    country: row.country.clone(),
                    year: year.clone(),
                    value: value.clone(),
                });
            }
        }

        tracing::debug!(
            metric = %wide.metric,
            rows = rows.len(),
            "reshaped wide table"
        );

        TidyTable {
            metric: wide.metric,
            rows,
        }
    }

    /// Melt all three tables of a set.
    pub fn melt_set(set: &WideTableSet) -> TidySet {
        TidySet {
            population: Self::melt(&set.population),
            life_expectancy: Self::melt(&set.life_expectancy),
            gni_per_capita: Self::melt(&set.gni_per_capita),
        }
    }
}
