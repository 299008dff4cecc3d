//! Charts module - bubble chart description, rendering and display surfaces

mod plotter;
mod renderer;
mod spec;
mod surface;

pub use plotter::ChartPlotter;
pub use spec::{
    BubbleChartSpec, DashboardPage, PageContent, PageSummary, PAGE_DESCRIPTION, PAGE_TITLE,
};
pub use surface::{DisplaySurface, JsonSurface, PngSurface, RenderError};
