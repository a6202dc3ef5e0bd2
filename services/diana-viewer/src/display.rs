//! Where finished figures are shown.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use renderer::RenderedFigure;
use tracing::debug;

use crate::error::{ViewerError, ViewerResult};

/// Receives each figure that replaces the displayed one.
pub trait FigureSink {
    fn show(&mut self, figure: &RenderedFigure) -> ViewerResult<()>;
}

/// Writes the current figure to a PNG file.
///
/// The file is written next to its final location and renamed over it, so a
/// reader never sees a half-written image.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FigureSink for PngFileSink {
    fn show(&mut self, figure: &RenderedFigure) -> ViewerResult<()> {
        let png = figure.to_png()?;
        write_atomic(&self.path, &png)?;
        debug!(path = %self.path.display(), bytes = png.len(), "Display updated");
        Ok(())
    }
}

/// Write `bytes` to `path` through a temporary sibling file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ViewerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| ViewerError::Config(format!("'{}' is not a file path", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Keeps every shown figure in memory. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    shown: Arc<Mutex<Vec<RenderedFigure>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of figures shown so far.
    pub fn count(&self) -> usize {
        self.shown.lock().map(|shown| shown.len()).unwrap_or(0)
    }

    /// The most recently shown figure.
    pub fn last(&self) -> Option<RenderedFigure> {
        self.shown.lock().ok().and_then(|shown| shown.last().cloned())
    }
}

impl FigureSink for MemorySink {
    fn show(&mut self, figure: &RenderedFigure) -> ViewerResult<()> {
        let mut shown = self
            .shown
            .lock()
            .map_err(|_| ViewerError::Config("figure history lock poisoned".to_string()))?;
        shown.push(figure.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diana_common::Extent;
    use projection::ProjectionKind;
    use renderer::{render_figure, FigureLayout, FigureRequest, RenderResources};

    fn figure() -> RenderedFigure {
        let resources = RenderResources {
            layout: FigureLayout::new(160, 120),
            ..RenderResources::default()
        };
        let request = FigureRequest {
            projection: ProjectionKind::PlateCarree,
            extent: Extent::global(),
            overlays: Vec::new(),
            data: None,
        };
        render_figure(&request, &resources).unwrap()
    }

    #[test]
    fn test_png_sink_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view/diana.png");
        let mut sink = PngFileSink::new(&path);

        sink.show(&figure()).unwrap();
        sink.show(&figure()).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert!(!dir.path().join("view/diana.png.tmp").exists());
    }

    #[test]
    fn test_memory_sink_shares_history() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.show(&figure()).unwrap();
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.last().unwrap().width(), 160);
    }
}
