//! Load → reshape → join → clean, run once per invocation or reload.

use crate::config::PipelineConfig;
use crate::data::{
    CleanReport, Cleaner, DataLoader, DataProcessor, JoinReport, Joiner, LoadCache, MergedTable,
};
use crate::error::Result;
use std::sync::Arc;

/// Cleaned table plus the bookkeeping gathered on the way.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: MergedTable,
    pub join: JoinReport,
    pub clean: CleanReport,
}

/// Runs the data pipeline against a shared load cache.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    cache: Arc<LoadCache>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, cache: Arc<LoadCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<LoadCache> {
        &self.cache
    }

    /// Run every stage. Any stage error aborts the run.
    pub fn run(&self) -> Result<PipelineOutput> {
        let span = tracing::info_span!("pipeline", dir = ?self.config.paths.data_dir());
        let _guard = span.enter();

        let result = self.run_stages();
        if let Err(error) = &result {
            tracing::error!(%error, "pipeline failed");
        }
        result
    }

    fn run_stages(&self) -> Result<PipelineOutput> {
        let loader = DataLoader::new(self.config.wide_fill);
        let wide = self.cache.get_or_load(&loader, &self.config.paths)?;
        let tidy = DataProcessor::melt_set(&wide);
        let (merged, join) = Joiner::join_set(&tidy)?;
        let (table, clean) = Cleaner::new(self.config.clean).clean(&merged)?;

        Ok(PipelineOutput { table, join, clean })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataPaths, WideFillPolicy};
    use crate::data::{Metric, Value};
    use crate::error::{CleanError, LoadError, PipelineError};
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn pipeline(dir: &Path) -> Pipeline {
        Pipeline::new(
            PipelineConfig::with_paths(DataPaths::in_dir(dir)),
            Arc::new(LoadCache::new()),
        )
    }

    fn row<'a>(output: &'a PipelineOutput, country: &str, year: &str) -> &'a crate::data::MergedRow {
        output
            .table
            .rows
            .iter()
            .find(|r| r.country == country && r.year == year)
            .unwrap()
    }

    #[test]
    fn test_afghanistan_population_is_forward_filled() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "population_total.csv", "country,1950,1951\nAfghanistan,7e6,\n");
        write(dir.path(), "life_expectancy_years.csv", "country,1950,1951\nAfghanistan,30.0,30.5\n");
        write(dir.path(), "ny_gnp_pcap_cn.csv", "country,1950,1951\nAfghanistan,600,610\n");

        let output = pipeline(dir.path()).run().unwrap();
        let r = row(&output, "Afghanistan", "1951");

        assert_eq!(output.table.len(), 2);
        assert_eq!(r.population, Value::Number(7e6));
        assert_eq!(r.life_expectancy, Value::Number(30.5));
        assert_eq!(r.gni_per_capita, Value::Number(610.0));
        assert_eq!(output.clean.gni_per_capita_filled, 0);
    }

    fn write_blank_income_tables(dir: &Path) {
        write(
            dir,
            "population_total.csv",
            "country,1950,1951\nAfghanistan,7e6,7.1e6\nAlbania,1.2e6,1.3e6\n",
        );
        write(
            dir,
            "life_expectancy_years.csv",
            "country,1950,1951\nAfghanistan,30.0,30.5\nAlbania,55,56\n",
        );
        // Afghanistan's 1951 income is blank
        write(
            dir,
            "ny_gnp_pcap_cn.csv",
            "country,1950,1951\nAfghanistan,600,\nAlbania,1000,1400\n",
        );
    }

    fn pipeline_with_fill(dir: &Path, wide_fill: WideFillPolicy) -> Pipeline {
        let config = PipelineConfig {
            wide_fill,
            ..PipelineConfig::with_paths(DataPaths::in_dir(dir))
        };
        Pipeline::new(config, Arc::new(LoadCache::new()))
    }

    #[test]
    fn test_blank_income_takes_dataset_mean_when_filling_down_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_blank_income_tables(dir.path());

        let output = pipeline_with_fill(dir.path(), WideFillPolicy::ForwardDownColumn)
            .run()
            .unwrap();
        let r = row(&output, "Afghanistan", "1951");

        assert_eq!(r.gni_per_capita, Value::Number(1000.0));
        assert_eq!(output.clean.gni_per_capita_filled, 1);
        assert_eq!(output.clean.gni_per_capita_mean, Some(1000.0));
        assert_eq!(output.clean.total_coercion_failures(), 0);
    }

    #[test]
    fn test_blank_income_carries_previous_year_when_filling_along_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_blank_income_tables(dir.path());

        let output = pipeline_with_fill(dir.path(), WideFillPolicy::ForwardAlongRow)
            .run()
            .unwrap();
        let r = row(&output, "Afghanistan", "1951");

        assert_eq!(r.gni_per_capita, Value::Number(600.0));
        assert_eq!(output.clean.gni_per_capita_filled, 0);
        assert_eq!(output.clean.gni_per_capita_mean, None);
    }

    #[test]
    fn test_unparseable_income_takes_dataset_mean() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "population_total.csv",
            "country,1950,1951\nAfghanistan,7e6,7.1e6\nAlbania,1.2e6,1.3e6\n",
        );
        write(
            dir.path(),
            "life_expectancy_years.csv",
            "country,1950,1951\nAfghanistan,30.0,30.5\nAlbania,55,56\n",
        );
        write(
            dir.path(),
            "ny_gnp_pcap_cn.csv",
            "country,1950,1951\nAfghanistan,600,unknown\nAlbania,1000,1400\n",
        );

        let output = pipeline(dir.path()).run().unwrap();
        let r = row(&output, "Afghanistan", "1951");

        assert_eq!(r.gni_per_capita, Value::Number(1000.0));
        assert_eq!(output.clean.total_coercion_failures(), 1);
        assert_eq!(output.table.missing_count(Metric::GniPerCapita), 0);
    }

    #[test]
    fn test_only_common_keys_survive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "population_total.csv", "country,2000,2001\nA,1,2\nB,3,4\n");
        write(dir.path(), "life_expectancy_years.csv", "country,2000\nA,50\nB,60\n");
        write(dir.path(), "ny_gnp_pcap_cn.csv", "country,2000,2001\nA,5,6\n");

        let output = pipeline(dir.path()).run().unwrap();

        assert_eq!(output.table.len(), 1);
        assert_eq!(output.table.rows[0].country, "A");
        assert_eq!(output.table.rows[0].year, "2000");
        assert_eq!(output.join.joined_rows, 1);
    }

    #[test]
    fn test_disjoint_tables_render_no_data_page() {
        use crate::charts::{DashboardPage, DisplaySurface, PngSurface};

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "population_total.csv", "country,2000\nA,1\n");
        write(dir.path(), "life_expectancy_years.csv", "country,2000\nB,50\n");
        write(dir.path(), "ny_gnp_pcap_cn.csv", "country,2000\nA,5\n");

        let output = pipeline(dir.path()).run().unwrap();
        assert!(output.table.is_empty());

        let png = dir.path().join("chart.png");
        PngSurface::new(&png, (320, 240), None)
            .present(&DashboardPage::chart(&output))
            .unwrap();
        assert!(std::fs::metadata(&png).unwrap().len() > 0);
    }

    #[test]
    fn test_missing_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline(dir.path()).run();
        assert!(matches!(
            result,
            Err(PipelineError::Load(LoadError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_all_missing_income_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "population_total.csv", "country,2000\nA,1\n");
        write(dir.path(), "life_expectancy_years.csv", "country,2000\nA,50\n");
        write(dir.path(), "ny_gnp_pcap_cn.csv", "country,2000\nA,\n");

        let result = pipeline(dir.path()).run();
        assert!(matches!(
            result,
            Err(PipelineError::Clean(CleanError::DegenerateColumn { .. }))
        ));
    }

    #[test]
    fn test_bundled_data_runs_clean() {
        let pipeline = Pipeline::new(PipelineConfig::default(), Arc::new(LoadCache::new()));
        let output = pipeline.run().unwrap();

        assert_eq!(output.table.len(), 32);
        assert_eq!(output.join.duplicate_keys, 0);
        assert_eq!(output.table.missing_count(Metric::GniPerCapita), 0);
        assert_eq!(
            row(&output, "United States", "2020").life_expectancy,
            Value::Number(78.5)
        );
    }

    #[test]
    fn test_second_run_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "population_total.csv", "country,2000\nA,1\n");
        write(dir.path(), "life_expectancy_years.csv", "country,2000\nA,50\n");
        write(dir.path(), "ny_gnp_pcap_cn.csv", "country,2000\nA,5\n");

        let pipeline = pipeline(dir.path());
        pipeline.run().unwrap();
        pipeline.run().unwrap();
        assert_eq!(pipeline.cache().hits(), 1);
    }
}
