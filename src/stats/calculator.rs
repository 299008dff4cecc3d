//! Statistics Calculator Module
//! Per-year summary figures for the dashboard side panel.

use crate::data::MergedTable;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::collections::HashMap;

/// Summary of one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: String,
    pub countries: usize,
    pub total_population: f64,
    /// Mean life expectancy over countries that report one.
    pub mean_life_expectancy: Option<f64>,
    /// Life expectancy weighted by population.
    pub weighted_life_expectancy: Option<f64>,
    pub median_gni_per_capita: Option<f64>,
}

#[derive(Default)]
struct YearValues {
    countries: usize,
    population: Vec<f64>,
    life_expectancy: Vec<f64>,
    weighted: Vec<(f64, f64)>,
    gni_per_capita: Vec<f64>,
}

/// Computes year summaries with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summaries for every year in `table`, keyed by year label.
    pub fn summarize_years(table: &MergedTable) -> HashMap<String, YearSummary> {
        let mut by_year: HashMap<&str, YearValues> = HashMap::new();
        for row in &table.rows {
            let entry = by_year.entry(row.year.as_str()).or_default();
            entry.countries += 1;
            let population = row.population.as_number();
            if let Some(p) = population {
                entry.population.push(p);
            }
            if let Some(life) = row.life_expectancy.as_number() {
                entry.life_expectancy.push(life);
                if let Some(p) = population {
                    entry.weighted.push((life, p));
                }
            }
            if let Some(gni) = row.gni_per_capita.as_number() {
                entry.gni_per_capita.push(gni);
            }
        }

        // Use rayon for parallel computation
        by_year
            .into_par_iter()
            .map(|(year, values)| (year.to_string(), Self::summarize(year, values)))
            .collect()
    }

    fn summarize(year: &str, values: YearValues) -> YearSummary {
        let total_population = values.population.iter().sum::<f64>();

        let mean_life_expectancy = if values.life_expectancy.is_empty() {
            None
        } else {
            Some(values.life_expectancy.iter().mean())
        };

        let weight: f64 = values.weighted.iter().map(|(_, p)| p).sum();
        let weighted_life_expectancy = if weight > 0.0 {
            Some(values.weighted.iter().map(|(life, p)| life * p).sum::<f64>() / weight)
        } else {
            None
        };

        let median_gni_per_capita = if values.gni_per_capita.is_empty() {
            None
        } else {
            Some(Data::new(values.gni_per_capita).median())
        };

        YearSummary {
            year: year.to_string(),
            countries: values.countries,
            total_population,
            mean_life_expectancy,
            weighted_life_expectancy,
            median_gni_per_capita,
        }
    }
}
