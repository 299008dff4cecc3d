//! Chart Plotter Module
//! Draws the interactive bubble chart and summary tables with egui_plot.

use crate::charts::spec::{BubbleChartSpec, PageSummary};
use crate::stats::YearSummary;
use egui::{Color32, RichText};
use egui_plot::{Plot, PlotPoints, Points};

/// Upper bound on on-screen bubble radius in points.
const MAX_RADIUS: f64 = 28.0;

/// Draws the bubble chart using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(rgb: [u8; 3]) -> Color32 {
        Color32::from_rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Bubble radius on screen for a marker size.
    pub fn screen_radius(chart: &BubbleChartSpec, size: Option<f64>) -> f32 {
        let scale = MAX_RADIUS / chart.size_max;
        (chart.bubble_diameter(size) * scale).max(1.5) as f32
    }

    /// Tick label for a log10 axis position.
    pub fn format_log_tick(exponent: f64) -> String {
        let value = 10f64.powf(exponent);
        if value >= 1_000_000.0 {
            format!("{:.1}M", value / 1_000_000.0)
        } else if value >= 1_000.0 {
            format!("{:.0}k", value / 1_000.0)
        } else if value >= 1.0 {
            format!("{:.0}", value)
        } else {
            format!("{:.2}", value)
        }
    }

    /// Bubble chart for one frame. x is plotted as log10(income).
    pub fn draw_bubble_chart(ui: &mut egui::Ui, chart: &BubbleChartSpec, year: &str) {
        let mut plot = Plot::new("bubble_chart")
            .x_axis_label(chart.x.label.clone())
            .y_axis_label(chart.y.label.clone())
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| Self::format_log_tick(mark.value))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!(
                        "{}\nincome: {:.0}\nlife expectancy: {:.1}",
                        name,
                        10f64.powf(value.x),
                        value.y
                    )
                }
            });

        // Keep axes fixed across frames so the animation reads as motion.
        if let Some((lo, hi)) = chart.x_range() {
            plot = plot.include_x(lo.log10()).include_x(hi.log10());
        }
        if let Some((lo, hi)) = chart.y_range() {
            plot = plot.include_y(lo).include_y(hi);
        }

        plot.show(ui, |plot_ui| {
            for marker in chart.frame_markers(year) {
                // Points a log axis cannot place are left out.
                let (Some(x), Some(y)) = (marker.x.filter(|x| *x > 0.0), marker.y) else {
                    continue;
                };
                let color = Self::color(marker.color);
                plot_ui.points(
                    Points::new(PlotPoints::from_iter([[x.log10(), y]]))
                        .radius(Self::screen_radius(chart, marker.size))
                        .color(color.gamma_multiply(0.7))
                        .name(&marker.hover),
                );
            }
        });
    }

    /// Draw the data-quality counts for the loaded dataset.
    pub fn draw_page_summary(ui: &mut egui::Ui, summary: &PageSummary) {
        egui::Grid::new("page_summary")
            .striped(true)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Rows");
                ui.label(summary.rows.to_string());
                ui.end_row();

                ui.label("Countries");
                ui.label(summary.countries.to_string());
                ui.end_row();

                ui.label("Unparseable cells");
                let color = if summary.coercion_failures > 0 {
                    Color32::from_rgb(243, 156, 18)
                } else {
                    ui.visuals().text_color()
                };
                ui.label(RichText::new(summary.coercion_failures.to_string()).color(color));
                ui.end_row();

                ui.label("Duplicate keys");
                ui.label(summary.duplicate_keys.to_string());
                ui.end_row();

                ui.label("Imputed income");
                ui.label(
                    summary
                        .gni_per_capita_mean
                        .map(|m| format!("{:.0}", m))
                        .unwrap_or_else(|| "-".to_string()),
                );
                ui.end_row();
            });
    }

    /// Draw the summary table for the current frame.
    pub fn draw_year_summary(ui: &mut egui::Ui, summary: &YearSummary) {
        let fmt = |v: Option<f64>, digits: usize| {
            v.map(|v| format!("{:.*}", digits, v))
                .unwrap_or_else(|| "-".to_string())
        };

        egui::Grid::new("year_summary")
            .striped(true)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Year").strong());
                ui.label(RichText::new(&summary.year).strong());
                ui.end_row();

                ui.label("Countries");
                ui.label(summary.countries.to_string());
                ui.end_row();

                ui.label("Population");
                ui.label(format!("{:.2}M", summary.total_population / 1_000_000.0));
                ui.end_row();

                ui.label("Life expectancy (mean)");
                ui.label(fmt(summary.mean_life_expectancy, 1));
                ui.end_row();

                ui.label("Life expectancy (weighted)");
                ui.label(fmt(summary.weighted_life_expectancy, 1));
                ui.end_row();

                ui.label("Median income");
                ui.label(fmt(summary.median_gni_per_capita, 0));
                ui.end_row();
            });
    }
}
