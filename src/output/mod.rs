//! Reporting diagnostics to the user

mod json;
mod terminal;

use std::io::IsTerminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::DiagnosticFormat;
use crate::error::Diagnostics;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for diagnostic formatters
pub trait DiagnosticFormatter {
    /// Render diagnostics to a writer
    fn render(&self, diagnostics: &Diagnostics, writer: &mut dyn WriteColor) -> Result<()>;
}

/// Factory for creating diagnostic formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create a formatter based on format type
    pub fn create(format: DiagnosticFormat) -> Box<dyn DiagnosticFormatter> {
        match format {
            DiagnosticFormat::Terminal => Box::new(TerminalOutput::new()),
            DiagnosticFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render diagnostics to stderr
pub fn render_to_stderr(diagnostics: &Diagnostics, format: DiagnosticFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let choice = if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    formatter.render(diagnostics, &mut stderr)
}
