//! Declarative bubble chart description built from the cleaned table.
//!
//! Every display surface draws from this description. Building it never
//! touches the table.

use crate::data::{MergedTable, Metric};
use crate::error::PipelineError;
use crate::pipeline::PipelineOutput;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const PAGE_TITLE: &str = "Gapminder";
pub const PAGE_DESCRIPTION: &str =
    "Unlocking Lifetimes: Visualizing Progress in Longevity and Poverty Eradication";
pub const CHART_TITLE: &str = "Gapminder: Unlocking Lifetimes";
pub const GNI_AXIS_LABEL: &str = "Gross National Income per Capita (log scale)";

/// Largest bubble diameter in pixels.
pub const SIZE_MAX: f64 = 20.0;

/// Categorical colors, assigned to countries by first appearance.
pub const PALETTE: [[u8; 3]; 11] = [
    [52, 152, 219],  // Blue
    [231, 76, 60],   // Red
    [46, 204, 113],  // Green
    [155, 89, 182],  // Purple
    [243, 156, 18],  // Orange
    [26, 188, 156],  // Teal
    [233, 30, 99],   // Pink
    [0, 188, 212],   // Cyan
    [255, 87, 34],   // Deep Orange
    [121, 85, 72],   // Brown
    [96, 125, 139],  // Blue Grey
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub field: String,
    pub label: String,
    pub scale: AxisScale,
}

/// One bubble: a single (country, year) row of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub country: String,
    pub year: String,
    pub x: Option<f64>,
    /// Absent when the country has no life expectancy for that year.
    pub y: Option<f64>,
    pub size: Option<f64>,
    pub color: [u8; 3],
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub country: String,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleChartSpec {
    pub title: String,
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub size_field: String,
    pub color_field: String,
    pub hover_field: String,
    pub animation_field: String,
    pub size_max: f64,
    /// Largest marker size over all frames, so bubbles keep scale while animating.
    pub largest_size: f64,
    /// Distinct years in chronological order.
    pub frames: Vec<String>,
    pub legend: Vec<LegendEntry>,
    pub markers: Vec<Marker>,
}

impl BubbleChartSpec {
    /// Build the chart: one marker per table row.
    pub fn from_table(table: &MergedTable) -> Self {
        let mut colors: HashMap<&str, [u8; 3]> = HashMap::new();
        let mut legend = Vec::new();
        let mut markers = Vec::with_capacity(table.len());

        for row in &table.rows {
            let next = colors.len();
            let color = *colors.entry(row.country.as_str()).or_insert_with(|| {
                let color = PALETTE[next % PALETTE.len()];
                legend.push(LegendEntry {
                    country: row.country.clone(),
                    color,
                });
                color
            });

            markers.push(Marker {
                country: row.country.clone(),
                year: row.year.clone(),
                x: row.gni_per_capita.as_number(),
                y: row.life_expectancy.as_number(),
                size: row.population.as_number(),
                color,
                hover: row.country.clone(),
            });
        }

        let frames = sorted_frames(table.rows.iter().map(|r| r.year.as_str()));
        let largest_size = markers
            .iter()
            .filter_map(|m| m.size)
            .fold(0.0, f64::max);

        tracing::debug!(
            markers = markers.len(),
            frames = frames.len(),
            countries = legend.len(),
            "built bubble chart spec"
        );

        Self {
            title: CHART_TITLE.to_string(),
            x: AxisSpec {
                field: Metric::GniPerCapita.column_name().to_string(),
                label: GNI_AXIS_LABEL.to_string(),
                scale: AxisScale::Log,
            },
            y: AxisSpec {
                field: Metric::LifeExpectancy.column_name().to_string(),
                label: Metric::LifeExpectancy.column_name().to_string(),
                scale: AxisScale::Linear,
            },
            size_field: Metric::Population.column_name().to_string(),
            color_field: "country".to_string(),
            hover_field: "country".to_string(),
            animation_field: "year".to_string(),
            size_max: SIZE_MAX,
            largest_size,
            frames,
            legend,
            markers,
        }
    }

    /// Markers belonging to one animation frame.
    pub fn frame_markers<'a>(&'a self, year: &'a str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |m| m.year == year)
    }

    pub fn latest_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    /// Bubble diameter in pixels: area proportional to size.
    pub fn bubble_diameter(&self, size: Option<f64>) -> f64 {
        let max = self.largest_size;
        match size {
            Some(s) if s > 0.0 && max > 0.0 => self.size_max * (s / max).sqrt(),
            _ => 0.0,
        }
    }

    /// Positive x extent over every frame, padded for a log axis.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let (lo, hi) = extent(self.markers.iter().filter_map(|m| m.x).filter(|x| *x > 0.0))?;
        Some((lo / 1.5, hi * 1.5))
    }

    /// y extent over every frame, padded by five percent.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let (lo, hi) = extent(self.markers.iter().filter_map(|m| m.y))?;
        let pad = ((hi - lo) * 0.05).max(1.0);
        Some((lo - pad, hi + pad))
    }
}

/// Years sorted numerically when all of them are integers, else lexicographically.
pub fn sorted_frames<'a>(years: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut frames: Vec<String> = years.map(str::to_string).collect();
    frames.sort_unstable();
    frames.dedup();

    let numeric: Option<Vec<i64>> = frames.iter().map(|y| y.parse::<i64>().ok()).collect();
    if let Some(numbers) = numeric {
        let mut paired: Vec<(i64, String)> = numbers.into_iter().zip(frames).collect();
        paired.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        frames = paired.into_iter().map(|(_, y)| y).collect();
    }
    frames
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((
            match v.partial_cmp(&lo) {
                Some(Ordering::Less) => v,
                _ => lo,
            },
            match v.partial_cmp(&hi) {
                Some(Ordering::Greater) => v,
                _ => hi,
            },
        )),
    })
}

/// Counts shown next to the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageSummary {
    pub rows: usize,
    pub countries: usize,
    pub coercion_failures: usize,
    pub duplicate_keys: usize,
    pub gni_per_capita_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Chart {
        chart: BubbleChartSpec,
        summary: PageSummary,
    },
    Error {
        message: String,
    },
}

/// Everything a display surface shows: title, description and chart or error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub title: String,
    pub description: String,
    pub content: PageContent,
}

impl DashboardPage {
    pub fn chart(output: &PipelineOutput) -> Self {
        let chart = BubbleChartSpec::from_table(&output.table);
        let summary = PageSummary {
            rows: output.table.len(),
            countries: chart.legend.len(),
            coercion_failures: output.clean.total_coercion_failures(),
            duplicate_keys: output.join.duplicate_keys,
            gni_per_capita_mean: output.clean.gni_per_capita_mean,
        };
        Self::with_content(PageContent::Chart { chart, summary })
    }

    pub fn error(error: &PipelineError) -> Self {
        Self::with_content(PageContent::Error {
            message: error.user_message(),
        })
    }

    pub fn from_result(result: &Result<PipelineOutput, PipelineError>) -> Self {
        match result {
            Ok(output) => Self::chart(output),
            Err(error) => Self::error(error),
        }
    }

    pub fn chart_spec(&self) -> Option<&BubbleChartSpec> {
        match &self.content {
            PageContent::Chart { chart, .. } => Some(chart),
            PageContent::Error { .. } => None,
        }
    }

    fn with_content(content: PageContent) -> Self {
        Self {
            title: PAGE_TITLE.to_string(),
            description: PAGE_DESCRIPTION.to_string(),
            content,
        }
    }
}
