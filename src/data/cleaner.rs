//! Numeric coercion and missing-value imputation for the merged table.

use crate::config::{CleanPolicy, MissingFill};
use crate::data::table::{MergedTable, Metric, Value};
use crate::error::CleanError;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Non-fatal: `count` cells of `metric` failed numeric parsing and became missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionWarning {
    pub metric: Metric,
    pub count: usize,
}

/// What the cleaner changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub coercion_warnings: Vec<CoercionWarning>,
    pub population_filled: usize,
    pub gni_per_capita_filled: usize,
    /// Mean used for income imputation, when one was computed.
    pub gni_per_capita_mean: Option<f64>,
}

impl CleanReport {
    pub fn total_coercion_failures(&self) -> usize {
        self.coercion_warnings.iter().map(|w| w.count).sum()
    }
}

/// Coerces metric columns to numbers and fills the gaps per policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaner {
    policy: CleanPolicy,
}

impl Cleaner {
    pub fn new(policy: CleanPolicy) -> Self {
        Self { policy }
    }

    /// Produce a cleaned copy of `table`. Order: coerce income, population and
    /// life expectancy; fill population; fill income.
    pub fn clean(&self, table: &MergedTable) -> Result<(MergedTable, CleanReport), CleanError> {
        let mut out = table.clone();
        let mut report = CleanReport::default();

        for metric in [Metric::GniPerCapita, Metric::Population, Metric::LifeExpectancy] {
            let failed = coerce_column(&mut out, metric);
            if failed > 0 {
                tracing::warn!(%metric, cells = failed, "non-numeric cells treated as missing");
                report.coercion_warnings.push(CoercionWarning {
                    metric,
                    count: failed,
                });
            }
        }

        let (filled, _) = fill_column(&mut out, Metric::Population, self.policy.population)?;
        report.population_filled = filled;
        fill_column(&mut out, Metric::LifeExpectancy, self.policy.life_expectancy)?;
        let (filled, mean) =
            fill_column(&mut out, Metric::GniPerCapita, self.policy.gni_per_capita)?;
        report.gni_per_capita_filled = filled;
        report.gni_per_capita_mean = mean;

        tracing::info!(
            rows = out.len(),
            coercion_failures = report.total_coercion_failures(),
            population_filled = report.population_filled,
            gni_per_capita_filled = report.gni_per_capita_filled,
            "cleaned merged table"
        );

        Ok((out, report))
    }
}

/// Parse a raw cell as a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce one column in place. Returns how many text cells failed to parse.
fn coerce_column(table: &mut MergedTable, metric: Metric) -> usize {
    let mut failed = 0;
    for row in &mut table.rows {
        let cell = row.value_mut(metric);
        let coerced = match cell {
            Value::Text(raw) => match parse_number(raw) {
                Some(v) => Value::Number(v),
                None => {
                    failed += 1;
                    Value::Missing
                }
            },
            Value::Number(v) if !v.is_finite() => Value::Missing,
            _ => continue,
        };
        *cell = coerced;
    }
    failed
}

/// Fill missing cells of one column. Returns the fill count and the mean used.
fn fill_column(
    table: &mut MergedTable,
    metric: Metric,
    fill: MissingFill,
) -> Result<(usize, Option<f64>), CleanError> {
    let missing = table.missing_count(metric);
    let (replacement, mean) = match fill {
        MissingFill::Leave => return Ok((0, None)),
        MissingFill::Constant(v) => (v, None),
        MissingFill::ColumnMean => {
            if missing == 0 {
                return Ok((0, None));
            }
            let values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| row.value(metric).as_number())
                .collect();
            if values.is_empty() {
                return Err(CleanError::DegenerateColumn { metric, missing });
            }
            let mean = values.iter().mean();
            tracing::debug!(%metric, mean, samples = values.len(), "imputing column mean");
            (mean, Some(mean))
        }
    };

    for row in &mut table.rows {
        let cell = row.value_mut(metric);
        if cell.is_missing() {
            *cell = Value::Number(replacement);
        }
    }
    Ok((missing, mean))
}
