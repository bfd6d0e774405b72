use thiserror::Error;

use crate::{RenderKind, RenderRequest, StatusView};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two page regions: a status text/HTML area and a spinner.
pub trait Renderer {
    fn show_status(&mut self, text: &str, loading: bool) -> Result<(), RenderError>;
    fn show_error(&mut self, text: &str) -> Result<(), RenderError>;
}

pub fn apply_render(
    renderer: &mut dyn Renderer,
    request: &RenderRequest,
) -> Result<(), RenderError> {
    match request.kind {
        RenderKind::Status => renderer.show_status(&request.text, false),
        RenderKind::Loading => renderer.show_status(&request.text, true),
        RenderKind::Error => renderer.show_error(&request.text),
    }
}

/// In-memory render regions, counting every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRenderer {
    view: StatusView,
    writes: usize,
}

impl RegionRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &StatusView {
        &self.view
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Renderer for RegionRenderer {
    fn show_status(&mut self, text: &str, loading: bool) -> Result<(), RenderError> {
        self.view = StatusView::status(text, loading);
        self.writes += 1;
        Ok(())
    }

    fn show_error(&mut self, text: &str) -> Result<(), RenderError> {
        self.view = StatusView::error(text);
        self.writes += 1;
        Ok(())
    }
}
