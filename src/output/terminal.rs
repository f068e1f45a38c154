//! Compiler-style terminal output

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::error::{Diagnostic, Diagnostics, Severity};

use super::DiagnosticFormatter;

/// One `file(line): severity: message` line per diagnostic
pub struct TerminalOutput {
    summary: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { summary: true }
    }

    /// Omit the trailing error/warning count
    pub fn without_summary() -> Self {
        Self { summary: false }
    }

    fn write_diagnostic(&self, diagnostic: &Diagnostic, writer: &mut dyn WriteColor) -> Result<()> {
        write!(writer, "{}: ", diagnostic.location())?;

        let color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };
        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", diagnostic.severity)?;
        writer.reset()?;

        writeln!(writer, ": {}", diagnostic.message)?;
        Ok(())
    }

    fn write_summary(&self, diagnostics: &Diagnostics, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticFormatter for TerminalOutput {
    fn render(&self, diagnostics: &Diagnostics, writer: &mut dyn WriteColor) -> Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }

        for diagnostic in diagnostics {
            self.write_diagnostic(diagnostic, writer)?;
        }

        if self.summary {
            self.write_summary(diagnostics, writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use termcolor::Buffer;

    fn sample() -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::error(ErrorKind::UnknownTable, "a.xml", Some(7), "Failed to find table `T`"));
        diagnostics.push(Diagnostic::warning(ErrorKind::UnknownTransform, "a.xml", Some(9), "Unknown transform `upper`"));
        diagnostics
    }

    #[test]
    fn test_plain_lines() {
        let mut buffer = Buffer::no_color();
        TerminalOutput::new().render(&sample(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert_eq!(
            text,
            "a.xml(7): error: Failed to find table `T`\n\
             a.xml(9): warning: Unknown transform `upper`\n\
             1 error(s), 1 warning(s)\n"
        );
    }

    #[test]
    fn test_nothing_for_clean_run() {
        let mut buffer = Buffer::no_color();
        TerminalOutput::without_summary().render(&Diagnostics::new(), &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
