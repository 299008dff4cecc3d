//! Table Types Module
//! Wide, tidy and merged table shapes shared by every pipeline stage.

use serde::Serialize;
use std::fmt;

/// The three metrics the dashboard combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Population,
    LifeExpectancy,
    GniPerCapita,
}

impl Metric {
    /// Column name used for this metric in tidy and merged tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Population => "population",
            Metric::LifeExpectancy => "life_expectancy",
            Metric::GniPerCapita => "gni_per_capita",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A single cell. Raw text survives until the cleaner coerces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Text(String),
    Number(f64),
}

impl Value {
    /// Build a value from a raw CSV cell; blank cells are missing.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Value::Text(s.to_string()),
            _ => Value::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The numeric payload, if this value has already been coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// One row of a wide table: a country and one cell per year column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub country: String,
    pub cells: Vec<Value>,
}

/// One metric in wide format: rows are countries, columns are years.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub metric: Metric,
    /// Year labels in the file's declared column order.
    pub years: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn new(metric: Metric, years: Vec<String>) -> Self {
        Self {
            metric,
            years,
            rows: Vec::new(),
        }
    }

    pub fn country_count(&self) -> usize {
        self.rows.len()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }
}

/// The three wide tables loaded together. Cached as one immutable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTableSet {
    pub population: WideTable,
    pub life_expectancy: WideTable,
    pub gni_per_capita: WideTable,
}

/// One (country, year, value) observation for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub country: String,
    pub year: String,
    pub value: Value,
}

/// Long-format table for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyTable {
    pub metric: Metric,
    pub rows: Vec<TidyRow>,
}

impl TidyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A joined observation carrying all three metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub country: String,
    pub year: String,
    pub population: Value,
    pub life_expectancy: Value,
    pub gni_per_capita: Value,
}

impl MergedRow {
    pub fn value(&self, metric: Metric) -> &Value {
        match metric {
            Metric::Population => &self.population,
            Metric::LifeExpectancy => &self.life_expectancy,
            Metric::GniPerCapita => &self.gni_per_capita,
        }
    }

    pub fn value_mut(&mut self, metric: Metric) -> &mut Value {
        match metric {
            Metric::Population => &mut self.population,
            Metric::LifeExpectancy => &mut self.life_expectancy,
            Metric::GniPerCapita => &mut self.gni_per_capita,
        }
    }
}

/// Inner join of the three tidy tables on (country, year).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of missing cells in one metric column.
    pub fn missing_count(&self, metric: Metric) -> usize {
        self.rows
            .iter()
            .filter(|row| row.value(metric).is_missing())
            .count()
    }
}
