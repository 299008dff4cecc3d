//! Display surfaces: where a finished dashboard page ends up.

use crate::charts::renderer::StaticChartRenderer;
use crate::charts::spec::DashboardPage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize page: {0}")]
    Json(#[from] serde_json::Error),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("year {0} is not a frame of the chart")]
    UnknownFrame(String),
}

/// Anything that can show a dashboard page.
pub trait DisplaySurface {
    fn present(&mut self, page: &DashboardPage) -> Result<(), RenderError>;
}

/// Writes the page as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonSurface {
    path: PathBuf,
}

impl JsonSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DisplaySurface for JsonSurface {
    fn present(&mut self, page: &DashboardPage) -> Result<(), RenderError> {
        let io_error = |source| RenderError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, page)?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        tracing::info!(path = %self.path.display(), "wrote chart spec");
        Ok(())
    }
}

/// Renders a single frame (or the error message) to a PNG image.
#[derive(Debug, Clone)]
pub struct PngSurface {
    path: PathBuf,
    size: (u32, u32),
    year: Option<String>,
}

impl PngSurface {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32), year: Option<String>) -> Self {
        Self {
            path: path.into(),
            size,
            year,
        }
    }
}

impl DisplaySurface for PngSurface {
    fn present(&mut self, page: &DashboardPage) -> Result<(), RenderError> {
        StaticChartRenderer::render_page(page, &self.path, self.size, self.year.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::PageContent;

    #[test]
    fn test_json_surface_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let page = DashboardPage {
            title: "Gapminder".into(),
            description: "desc".into(),
            content: PageContent::Error {
                message: "No usable gni_per_capita values in the data".into(),
            },
        };

        JsonSurface::new(&path).present(&page).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["content"]["kind"], "error");
        assert_eq!(written["description"], "desc");
    }

    #[test]
    fn test_json_surface_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("page.json");
        let page = DashboardPage {
            title: String::new(),
            description: String::new(),
            content: PageContent::Error {
                message: String::new(),
            },
        };
        let result = JsonSurface::new(&path).present(&page);
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }
}
