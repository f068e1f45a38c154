//! JSON output format

use anyhow::Result;
use serde::Serialize;
use termcolor::WriteColor;

use crate::error::{Diagnostic, Diagnostics};

use super::DiagnosticFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    errors: usize,
    warnings: usize,
    diagnostics: Vec<&'a Diagnostic>,
}

impl DiagnosticFormatter for JsonOutput {
    fn render(&self, diagnostics: &Diagnostics, writer: &mut dyn WriteColor) -> Result<()> {
        let report = JsonReport {
            success: diagnostics.is_success(),
            errors: diagnostics.error_count(),
            warnings: diagnostics.warning_count(),
            diagnostics: diagnostics.iter().collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
