//! Static Chart Renderer
//! Draws one frame of the bubble chart, or an error message, to a PNG file.
//!
//! Layout:
//! 1. Caption: chart title and the frame's year
//! 2. Log-scaled income on x, life expectancy on y
//! 3. One translucent circle per country, area proportional to population

use crate::charts::spec::{BubbleChartSpec, DashboardPage, PageContent};
use crate::charts::surface::RenderError;
use plotters::prelude::*;
use std::path::Path;

const MESSAGE_RED: RGBColor = RGBColor(220, 53, 69);
const MESSAGE_GRAY: RGBColor = RGBColor(108, 117, 125);

/// Shown in place of the chart when the merged table has no rows.
const NO_DATA_MESSAGE: &str = "No data: no country has all three measures for any year";

/// Scale applied to the chart's bubble diameter for a full-size image.
const PNG_BUBBLE_SCALE: f64 = 3.0;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `page` to `path`. `year` selects the frame; defaults to the latest.
    /// A chart without frames renders a "No data" notice.
    pub fn render_page(
        page: &DashboardPage,
        path: &Path,
        size: (u32, u32),
        year: Option<&str>,
    ) -> Result<(), RenderError> {
        let frame = match (&page.content, year) {
            (PageContent::Chart { chart, .. }, Some(y)) => {
                if !chart.frames.iter().any(|f| f == y) {
                    return Err(RenderError::UnknownFrame(y.to_string()));
                }
                Some(y)
            }
            (PageContent::Chart { chart, .. }, None) => chart.latest_frame(),
            (PageContent::Error { .. }, _) => None,
        };

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        match (&page.content, frame) {
            (PageContent::Chart { chart, .. }, Some(frame)) => {
                if let Err(e) = Self::draw_frame(&root, chart, frame, true) {
                    // Usually a missing system font; the bubbles still carry the data.
                    tracing::warn!(error = %e, "chart text failed, rendering without labels");
                    root.fill(&WHITE).map_err(draw_error)?;
                    Self::draw_frame(&root, chart, frame, false)?;
                }
            }
            (PageContent::Chart { .. }, None) => {
                Self::draw_message(&root, &page.title, NO_DATA_MESSAGE, MESSAGE_GRAY);
            }
            (PageContent::Error { message }, _) => {
                Self::draw_message(&root, &page.title, message, MESSAGE_RED);
            }
        }

        root.present().map_err(draw_error)?;
        tracing::info!(path = %path.display(), "rendered chart image");
        Ok(())
    }

    fn draw_frame<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        chart: &BubbleChartSpec,
        year: &str,
        with_text: bool,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = chart.x_range().unwrap_or((1.0, 10.0));
        let (y_min, y_max) = chart.y_range().unwrap_or((0.0, 100.0));

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if with_text {
            builder
                .caption(format!("{} ({})", chart.title, year), ("sans-serif", 28))
                .x_label_area_size(50)
                .y_label_area_size(60);
        }
        let mut ctx = builder
            .build_cartesian_2d((x_min..x_max).log_scale(), y_min..y_max)
            .map_err(draw_error)?;

        {
            let mut mesh = ctx.configure_mesh();
            if with_text {
                mesh.x_desc(chart.x.label.as_str())
                    .y_desc(chart.y.label.as_str());
            } else {
                mesh.x_labels(0).y_labels(0);
            }
            mesh.draw().map_err(draw_error)?;
        }

        // Points a log axis cannot place are left out.
        let circles = chart.frame_markers(year).filter_map(|m| {
            let x = m.x.filter(|x| *x > 0.0)?;
            let y = m.y?;
            let radius = (chart.bubble_diameter(m.size) * PNG_BUBBLE_SCALE / 2.0).max(1.0);
            let [r, g, b] = m.color;
            Some(Circle::new(
                (x, y),
                radius.round() as i32,
                RGBColor(r, g, b).mix(0.6).filled(),
            ))
        });
        ctx.draw_series(circles).map_err(draw_error)?;

        Ok(())
    }

    /// Title and one message line. Text failures are logged; the image is still written.
    fn draw_message<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        message: &str,
        color: RGBColor,
    ) {
        let lines = [
            (title, ("sans-serif", 28).into_font().color(&BLACK), (20, 20)),
            (message, ("sans-serif", 22).into_font().color(&color), (20, 70)),
        ];
        for (text, style, pos) in lines {
            if let Err(e) = root.draw_text(text, &style, pos) {
                tracing::warn!(error = %e, "could not draw text on chart image");
            }
        }
    }
}

fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CleanReport, JoinReport, MergedRow, MergedTable, Metric, Value};
    use crate::error::{CleanError, PipelineError};
    use crate::pipeline::PipelineOutput;
    use std::path::PathBuf;

    const PNG_MAGIC: &[u8] = b"\x89PNG";

    fn chart_page(rows: Vec<MergedRow>) -> DashboardPage {
        DashboardPage::chart(&PipelineOutput {
            table: MergedTable { rows },
            join: JoinReport::default(),
            clean: CleanReport::default(),
        })
    }

    fn merged(country: &str, year: &str, pop: f64, life: Value, gni: f64) -> MergedRow {
        MergedRow {
            country: country.into(),
            year: year.into(),
            population: Value::Number(pop),
            life_expectancy: life,
            gni_per_capita: Value::Number(gni),
        }
    }

    fn render(page: &DashboardPage, year: Option<&str>) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        StaticChartRenderer::render_page(page, &path, (320, 240), year).unwrap();
        (dir, path)
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.len() > PNG_MAGIC.len());
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_renders_chart_frame() {
        let page = chart_page(vec![
            merged("A", "2000", 1_000_000.0, Value::Number(60.0), 1200.0),
            merged("B", "2000", 4_000_000.0, Value::Number(72.5), 15000.0),
            // Skipped when drawing: no life expectancy, and income a log axis cannot place
            merged("C", "2000", 2_000_000.0, Value::Missing, 800.0),
            merged("D", "2000", 3_000_000.0, Value::Number(55.0), 0.0),
        ]);

        let (_dir, path) = render(&page, None);
        assert_png(&path);
    }

    #[test]
    fn test_renders_requested_frame() {
        let page = chart_page(vec![
            merged("A", "1990", 1_000_000.0, Value::Number(58.0), 900.0),
            merged("A", "2000", 1_100_000.0, Value::Number(60.0), 1200.0),
        ]);

        let (_dir, path) = render(&page, Some("1990"));
        assert_png(&path);
    }

    #[test]
    fn test_renders_error_page() {
        let error: PipelineError = CleanError::DegenerateColumn {
            metric: Metric::GniPerCapita,
            missing: 3,
        }
        .into();

        let (_dir, path) = render(&DashboardPage::error(&error), None);
        assert_png(&path);
    }

    #[test]
    fn test_chart_without_frames_renders_notice() {
        let page = chart_page(Vec::new());
        assert_eq!(page.chart_spec().map(|c| c.frames.len()), Some(0));

        let (_dir, path) = render(&page, None);
        assert_png(&path);
    }

    #[test]
    fn test_unknown_frame_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let page = chart_page(vec![merged("A", "2000", 1.0, Value::Number(50.0), 10.0)]);

        let result = StaticChartRenderer::render_page(&page, &path, (200, 100), Some("1800"));

        assert!(matches!(result, Err(RenderError::UnknownFrame(ref y)) if y == "1800"));
        assert!(!path.exists());
    }
}
