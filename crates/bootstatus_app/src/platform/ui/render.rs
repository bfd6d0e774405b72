use std::io::{self, Write};

use bootstatus_core::{RegionRenderer, RenderError, Renderer};
#[cfg(test)]
use bootstatus_core::StatusView;

/// Prints every status change as one line. The leading glyph stands in for the spinner.
pub struct TerminalRenderer<W: Write> {
    out: W,
    regions: RegionRenderer,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            regions: RegionRenderer::new(),
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> &StatusView {
        self.regions.view()
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn print(&mut self, glyph: char, text: &str, loading: bool) -> Result<(), RenderError> {
        let ellipsis = if loading { " ..." } else { "" };
        writeln!(self.out, "{glyph} {text}{ellipsis}")?;
        self.out.flush()?;
        Ok(())
    }
}

// The regions only record what actually reached the terminal.
impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_status(&mut self, text: &str, loading: bool) -> Result<(), RenderError> {
        self.print('*', text, loading)?;
        self.regions.show_status(text, loading)
    }

    fn show_error(&mut self, text: &str) -> Result<(), RenderError> {
        self.print('!', text, false)?;
        self.regions.show_error(text)
    }
}
