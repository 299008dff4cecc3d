//! Inner join of the three tidy metric tables on (country, year).

use crate::data::processor::TidySet;
use crate::data::table::{MergedRow, MergedTable, Metric, TidyTable};
use crate::error::JoinError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

type Key<'a> = (&'a str, &'a str);

/// Row counts around a join, for logging and the dashboard summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub population_rows: usize,
    pub life_expectancy_rows: usize,
    pub gni_per_capita_rows: usize,
    pub joined_rows: usize,
    /// Distinct keys that occur more than once within any one input.
    pub duplicate_keys: usize,
}

/// Joins tidy tables. Duplicate keys multiply: a key seen `a`, `b` and `c`
/// times in the three inputs yields `a * b * c` rows.
pub struct Joiner;

impl Joiner {
    pub fn join_set(set: &TidySet) -> Result<(MergedTable, JoinReport), JoinError> {
        Self::inner_join(&set.population, &set.life_expectancy, &set.gni_per_capita)
    }

    /// Keep only keys present in all three tables. Output follows the
    /// population table's order, then life expectancy, then income matches.
    pub fn inner_join(
        population: &TidyTable,
        life_expectancy: &TidyTable,
        gni_per_capita: &TidyTable,
    ) -> Result<(MergedTable, JoinReport), JoinError> {
        expect_metric(population, Metric::Population)?;
        expect_metric(life_expectancy, Metric::LifeExpectancy)?;
        expect_metric(gni_per_capita, Metric::GniPerCapita)?;

        let population_index = index_by_key(population);
        let life_index = index_by_key(life_expectancy);
        let gni_index = index_by_key(gni_per_capita);

        let mut rows = Vec::new();
        for pop in &population.rows {
            let key = (pop.country.as_str(), pop.year.as_str());
            let (Some(life_matches), Some(gni_matches)) = (life_index.get(&key), gni_index.get(&key))
            else {
                continue;
            };
            for &li in life_matches {
                for &gi in gni_matches {
                    rows.push(MergedRow {
                        country: pop.country.clone(),
                        year: pop.year.clone(),
                        population: pop.value.clone(),
                        life_expectancy: life_expectancy.rows[li].value.clone(),
                        gni_per_capita: gni_per_capita.rows[gi].value.clone(),
                    });
                }
            }
        }

        let duplicate_keys: HashSet<Key<'_>> = [&population_index, &life_index, &gni_index]
            .into_iter()
            .flat_map(|index| {
                index
                    .iter()
                    .filter(|(_, positions)| positions.len() > 1)
                    .map(|(key, _)| *key)
            })
            .collect();

        let report = JoinReport {
            population_rows: population.len(),
            life_expectancy_rows: life_expectancy.len(),
            gni_per_capita_rows: gni_per_capita.len(),
            joined_rows: rows.len(),
            duplicate_keys: duplicate_keys.len(),
        };

        if report.duplicate_keys > 0 {
            tracing::warn!(
                keys = report.duplicate_keys,
                "duplicate (country, year) keys multiplied in join"
            );
        }
        tracing::info!(
            population = report.population_rows,
            life_expectancy = report.life_expectancy_rows,
            gni_per_capita = report.gni_per_capita_rows,
            joined = report.joined_rows,
            "joined tidy tables"
        );

        Ok((MergedTable { rows }, report))
    }
}

fn expect_metric(table: &TidyTable, expected: Metric) -> Result<(), JoinError> {
    if table.metric == expected {
        Ok(())
    } else {
        Err(JoinError::MetricMismatch {
            expected,
            found: table.metric,
        })
    }
}

fn index_by_key(table: &TidyTable) -> HashMap<Key<'_>, Vec<usize>> {
    let mut index: HashMap<Key<'_>, Vec<usize>> = HashMap::new();
    for (pos, row) in table.rows.iter().enumerate() {
        index
            .entry((row.country.as_str(), row.year.as_str()))
            .or_default()
            .push(pos);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{TidyRow, Value};
    use proptest::prelude::*;

    fn tidy(metric: Metric, rows: &[(&str, &str, f64)]) -> TidyTable {
        TidyTable {
            metric,
            rows: rows
                .iter()
                .map(|(c, y, v)| TidyRow {
                    country: c.to_string(),
                    year: y.to_string(),
                    value: Value::Number(*v),
                })
                .collect(),
        }
    }

    #[test]
    fn test_inner_join_keeps_common_keys() {
        let pop = tidy(
            Metric::Population,
            &[("A", "2000", 1.0), ("A", "2001", 2.0), ("B", "2000", 3.0)],
        );
        let life = tidy(
            Metric::LifeExpectancy,
            &[("A", "2000", 50.0), ("B", "2000", 60.0), ("C", "2000", 70.0)],
        );
        let gni = tidy(
            Metric::GniPerCapita,
            &[("B", "2000", 900.0), ("A", "2000", 800.0), ("A", "2001", 810.0)],
        );

        let (merged, report) = Joiner::inner_join(&pop, &life, &gni).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.rows[0].country, "A");
        assert_eq!(merged.rows[0].gni_per_capita, Value::Number(800.0));
        assert_eq!(merged.rows[1].country, "B");
        assert_eq!(merged.rows[1].life_expectancy, Value::Number(60.0));
        assert_eq!(report.joined_rows, 2);
        assert_eq!(report.duplicate_keys, 0);
    }

    #[test]
    fn test_duplicate_keys_multiply() {
        let pop = tidy(Metric::Population, &[("A", "2000", 1.0), ("A", "2000", 2.0)]);
        let life = tidy(
            Metric::LifeExpectancy,
            &[("A", "2000", 50.0), ("A", "2000", 51.0), ("A", "2000", 52.0)],
        );
        let gni = tidy(Metric::GniPerCapita, &[("A", "2000", 800.0)]);

        let (merged, report) = Joiner::inner_join(&pop, &life, &gni).unwrap();

        assert_eq!(merged.len(), 6);
        assert_eq!(report.duplicate_keys, 1);
        let populations: Vec<f64> = merged
            .rows
            .iter()
            .filter_map(|r| r.population.as_number())
            .collect();
        assert_eq!(populations, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let pop = tidy(Metric::Population, &[("A", "2000", 1.0)]);
        let life = tidy(Metric::LifeExpectancy, &[("B", "2000", 50.0)]);
        let gni = tidy(Metric::GniPerCapita, &[("A", "2000", 800.0)]);
        let (merged, _) = Joiner::inner_join(&pop, &life, &gni).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_swapped_tables_are_rejected() {
        let pop = tidy(Metric::Population, &[]);
        let life = tidy(Metric::LifeExpectancy, &[]);
        let gni = tidy(Metric::GniPerCapita, &[]);
        let result = Joiner::inner_join(&pop, &gni, &life);
        assert!(matches!(
            result,
            Err(JoinError::MetricMismatch {
                expected: Metric::LifeExpectancy,
                found: Metric::GniPerCapita
            })
        ));
    }

    fn key_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..5, 0u8..5), 0..25)
    }

    fn tidy_from_keys(metric: Metric, keys: &[(u8, u8)]) -> TidyTable {
        TidyTable {
            metric,
            rows: keys
                .iter()
                .map(|(c, y)| TidyRow {
                    country: format!("c{c}"),
                    year: format!("{}", 2000 + *y as u32),
                    value: Value::Missing,
                })
                .collect(),
        }
    }

    proptest! {
        #[test]
        fn join_output_keys_exist_in_every_input(
            pop_keys in key_strategy(),
            life_keys in key_strategy(),
            gni_keys in key_strategy(),
        ) {
            let pop = tidy_from_keys(Metric::Population, &pop_keys);
            let life = tidy_from_keys(Metric::LifeExpectancy, &life_keys);
            let gni = tidy_from_keys(Metric::GniPerCapita, &gni_keys);
            let (merged, _) = Joiner::inner_join(&pop, &life, &gni).unwrap();

            let keys_of = |t: &TidyTable| -> HashSet<(String, String)> {
                t.rows.iter().map(|r| (r.country.clone(), r.year.clone())).collect()
            };
            let (pk, lk, gk) = (keys_of(&pop), keys_of(&life), keys_of(&gni));
            for row in &merged.rows {
                let key = (row.country.clone(), row.year.clone());
                prop_assert!(pk.contains(&key) && lk.contains(&key) && gk.contains(&key));
            }
        }
    }
}
