//! Control Panel Widget
//! Left side panel: data source, year slider, playback and summaries.

use crate::charts::{ChartPlotter, PageSummary};
use crate::gui::playback::{Playback, SPEEDS};
use crate::stats::YearSummary;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with data source, animation and export controls.
pub struct ControlPanel {
    pub data_dir: Option<PathBuf>,
    pub frames: Vec<String>,
    pub playback: Playback,
    pub show_legend: bool,
    pub open_after_export: bool,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_dir: None,
            frames: Vec::new(),
            playback: Playback::new(),
            show_legend: true,
            open_after_export: true,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir,
            ..Self::default()
        }
    }

    /// Replace the available frames after a pipeline run.
    pub fn set_frames(&mut self, frames: Vec<String>) {
        self.playback.reset(frames.len());
        self.frames = frames;
    }

    /// Year currently on screen.
    pub fn current_year(&self) -> Option<&str> {
        self.frames.get(self.playback.index()).map(String::as_str)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        page_summary: Option<&PageSummary>,
        year_summary: Option<&YearSummary>,
        is_loading: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let dir_text = self
                    .data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "Bundled data".to_string());
                ui.label(RichText::new(dir_text).size(12.0));
            });

        ui.add_space(5.0);
        ui.add_enabled_ui(!is_loading, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🔄 Reload").clicked() {
                    action = ControlPanelAction::Reload;
                }
                if ui.button("🗑 Clear cache & reload").clicked() {
                    action = ControlPanelAction::ClearCacheAndReload;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Animation Section =====
        ui.label(RichText::new("🎞 Year").size(14.0).strong());
        ui.add_space(5.0);

        if self.frames.is_empty() {
            ui.label(RichText::new("No frames").color(Color32::GRAY));
        } else {
            let last = self.frames.len() - 1;
            let mut index = self.playback.index();
            ui.horizontal(|ui| {
                let slider = egui::Slider::new(&mut index, 0..=last).show_value(false);
                if ui.add(slider).changed() {
                    self.playback.seek(index);
                }
                ui.label(RichText::new(self.current_year().unwrap_or("-")).strong());
            });

            ui.horizontal(|ui| {
                let label = if self.playback.is_playing() {
                    "⏸ Pause"
                } else {
                    "▶ Play"
                };
                if ui.button(label).clicked() {
                    self.playback.toggle();
                }

                let mut fps = self.playback.frames_per_second();
                egui::ComboBox::from_id_salt("playback_speed")
                    .width(70.0)
                    .selected_text(format!("{fps} fps"))
                    .show_ui(ui, |ui| {
                        for speed in SPEEDS {
                            ui.selectable_value(&mut fps, speed, format!("{speed} fps"));
                        }
                    });
                self.playback.set_frames_per_second(fps);
            });
        }

        ui.add_space(5.0);
        ui.checkbox(&mut self.show_legend, "Show legend");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Summary Section =====
        if let Some(summary) = page_summary {
            ui.label(RichText::new("🧮 Data Quality").size(14.0).strong());
            ui.add_space(5.0);
            ChartPlotter::draw_page_summary(ui, summary);
            ui.add_space(10.0);
        }
        if let Some(summary) = year_summary {
            ChartPlotter::draw_year_summary(ui, summary);
            ui.add_space(10.0);
        }

        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(page_summary.is_some(), |ui| {
                ui.horizontal(|ui| {
                    if ui.button("💾 Export JSON").clicked() {
                        action = ControlPanelAction::ExportJson;
                    }
                    if ui.button("🖼 Export PNG").clicked() {
                        action = ControlPanelAction::ExportPng;
                    }
                });
            });
            ui.checkbox(&mut self.open_after_export, "Open PNG after export");
        });

        ui.add_space(15.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        if is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    ClearCacheAndReload,
    ExportJson,
    ExportPng,
}
