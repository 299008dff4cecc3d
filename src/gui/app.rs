//! Gapminder Main Application
//! Header, control panel and chart viewer around a background pipeline run.

use crate::charts::{
    DashboardPage, DisplaySurface, JsonSurface, PageContent, PngSurface, PAGE_DESCRIPTION,
    PAGE_TITLE,
};
use crate::error::PipelineError;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{Pipeline, PipelineOutput};
use crate::stats::{StatsCalculator, YearSummary};
use egui::{Color32, RichText, SidePanel, TopBottomPanel};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// PNG export size in pixels.
const EXPORT_SIZE: (u32, u32) = (1280, 800);

type LoadResult = Result<PipelineOutput, PipelineError>;

/// Main application window.
pub struct GapminderApp {
    pipeline: Pipeline,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    page: Option<DashboardPage>,
    year_summaries: HashMap<String, YearSummary>,

    // Async pipeline run
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl GapminderApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, pipeline: Pipeline) -> Self {
        let data_dir = pipeline.config().paths.data_dir().map(Path::to_path_buf);
        let mut app = Self {
            pipeline,
            control_panel: ControlPanel::new(data_dir),
            chart_viewer: ChartViewer::new(),
            page: None,
            year_summaries: HashMap::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Run the pipeline in a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading data...");

        let pipeline = self.pipeline.clone();
        thread::spawn(move || {
            let _ = tx.send(pipeline.run());
        });
    }

    fn clear_cache_and_reload(&mut self) {
        self.pipeline.cache().clear();
        self.start_load();
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.apply_result(&result);
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                self.control_panel
                    .set_status("Error: data loading stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    fn apply_result(&mut self, result: &LoadResult) {
        let page = DashboardPage::from_result(result);

        match (&page.content, result) {
            (PageContent::Chart { chart, summary }, Ok(output)) => {
                self.year_summaries = StatsCalculator::summarize_years(&output.table);
                self.control_panel.set_frames(chart.frames.clone());
                self.control_panel.set_status(format!(
                    "Loaded {} rows, {} countries, {} years",
                    summary.rows,
                    summary.countries,
                    chart.frames.len()
                ));
            }
            (PageContent::Error { message }, _) => {
                self.year_summaries.clear();
                self.control_panel.set_frames(Vec::new());
                self.control_panel.set_status(format!("Error: {}", message));
            }
            _ => {}
        }

        self.page = Some(page);
    }

    fn handle_export_json(&mut self) {
        let Some(page) = &self.page else {
            return;
        };
        let Some(path) = save_dialog("JSON", "json", "gapminder.json") else {
            return;
        };

        match JsonSurface::new(&path).present(page) {
            Ok(()) => self
                .control_panel
                .set_status(format!("Exported {}", file_label(&path))),
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    fn handle_export_png(&mut self) {
        let Some(page) = &self.page else {
            return;
        };
        let Some(path) = save_dialog("PNG Image", "png", "gapminder.png") else {
            return;
        };

        let year = self.control_panel.current_year().map(str::to_string);
        if let Err(e) = PngSurface::new(&path, EXPORT_SIZE, year).present(page) {
            self.control_panel.set_status(format!("Error: {}", e));
            return;
        }

        self.control_panel
            .set_status(format!("Exported {}", file_label(&path)));
        if self.control_panel.open_after_export {
            if let Err(e) = open::that(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not open exported image");
            }
        }
    }

    fn draw_header(&self, ctx: &egui::Context) {
        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            let (title, description) = self
                .page
                .as_ref()
                .map(|p| (p.title.as_str(), p.description.as_str()))
                .unwrap_or((PAGE_TITLE, PAGE_DESCRIPTION));
            ui.label(
                RichText::new(title)
                    .size(24.0)
                    .strong()
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new(description).size(13.0).color(Color32::GRAY));
            ui.add_space(6.0);
        });
    }
}

fn save_dialog(filter: &str, extension: &str, file_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(filter, &[extension])
        .set_file_name(file_name)
        .save_file()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for GapminderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        let now = ctx.input(|i| i.time);
        self.control_panel.playback.tick(now);

        if self.is_loading {
            ctx.request_repaint();
        } else if self.control_panel.playback.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(30));
        }

        self.draw_header(ctx);

        let (page_summary, year_summary) = match self.page.as_ref().map(|p| &p.content) {
            Some(PageContent::Chart { summary, .. }) => {
                let year_summary = self
                    .control_panel
                    .current_year()
                    .and_then(|y| self.year_summaries.get(y))
                    .cloned();
                (Some(summary.clone()), year_summary)
            }
            _ => (None, None),
        };

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(
                        ui,
                        page_summary.as_ref(),
                        year_summary.as_ref(),
                        self.is_loading,
                    );

                    match action {
                        ControlPanelAction::Reload => self.start_load(),
                        ControlPanelAction::ClearCacheAndReload => self.clear_cache_and_reload(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(
                ui,
                self.page.as_ref(),
                self.control_panel.current_year(),
                self.control_panel.show_legend,
            );
        });
    }
}
