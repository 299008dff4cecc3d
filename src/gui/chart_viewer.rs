//! Chart Viewer Widget
//! Central panel showing the bubble chart, or the error that replaced it.

use crate::charts::{ChartPlotter, DashboardPage, PageContent};
use egui::{Color32, RichText};

const ERROR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Central display area for the dashboard page.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &self,
        ui: &mut egui::Ui,
        page: Option<&DashboardPage>,
        year: Option<&str>,
        show_legend: bool,
    ) {
        let Some(page) = page else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Loading data...").size(20.0));
            });
            return;
        };

        match &page.content {
            PageContent::Error { message } => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(message).size(18.0).color(ERROR_RED));
                });
            }
            PageContent::Chart { chart, .. } => {
                let Some(year) = year else {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("No Data").size(20.0));
                    });
                    return;
                };

                ui.label(
                    RichText::new(format!("{} ({})", chart.title, year))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(8.0);

                if show_legend {
                    ui.horizontal_wrapped(|ui| {
                        for entry in &chart.legend {
                            let (rect, _) = ui
                                .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(rect.center(), 6.0, ChartPlotter::color(entry.color));
                            ui.label(RichText::new(&entry.country).size(12.0));
                            ui.add_space(8.0);
                        }
                    });
                    ui.add_space(8.0);
                }

                ChartPlotter::draw_bubble_chart(ui, chart, year);
            }
        }
    }
}
