//! Configuration handling for rowgen

use std::path::PathBuf;

/// How diagnostics are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagnosticFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for DiagnosticFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(DiagnosticFormat::Terminal),
            "json" => Ok(DiagnosticFormat::Json),
            _ => Err(format!("Unknown diagnostic format: {}", s)),
        }
    }
}

/// Configuration for header/source generation
#[derive(Debug, Clone, Default)]
pub struct GenConfig {
    /// Path of the generated source file
    pub source_path: PathBuf,
    /// Path of the generated header file
    pub header_path: PathBuf,
    /// Table/template documents, processed in order
    pub inputs: Vec<PathBuf>,
    /// Diagnostic output format
    pub diagnostic_format: DiagnosticFormat,
    /// Start the source with an include of the header
    pub include_header: bool,
    /// Write outputs even when errors were reported
    pub keep_on_error: bool,
}

impl GenConfig {
    /// Create a new GenConfig with output paths
    pub fn new(source_path: PathBuf, header_path: PathBuf) -> Self {
        Self {
            source_path,
            header_path,
            ..Default::default()
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_diagnostic_format(mut self, format: DiagnosticFormat) -> Self {
        self.diagnostic_format = format;
        self
    }

    pub fn with_include_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    pub fn with_keep_on_error(mut self, keep: bool) -> Self {
        self.keep_on_error = keep;
        self
    }
}

/// Configuration for joining named patterns
#[derive(Debug, Clone, Default)]
pub struct JoinConfig {
    /// File the joined text is written to
    pub output_path: PathBuf,
    /// Name of the patterns to collect
    pub pattern: String,
    /// Emit `#line` directives before each block
    pub line_directives: bool,
    /// Documents to scan, in order
    pub inputs: Vec<PathBuf>,
    /// Diagnostic output format
    pub diagnostic_format: DiagnosticFormat,
}

impl JoinConfig {
    pub fn new(output_path: PathBuf, pattern: impl Into<String>) -> Self {
        Self {
            output_path,
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn with_line_directives(mut self, enabled: bool) -> Self {
        self.line_directives = enabled;
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_diagnostic_format(mut self, format: DiagnosticFormat) -> Self {
        self.diagnostic_format = format;
        self
    }
}

/// Configuration for rendering a text template with JSON data
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub template_path: PathBuf,
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    /// Diagnostic output format
    pub diagnostic_format: DiagnosticFormat,
}

impl RenderConfig {
    pub fn new(template_path: PathBuf, data_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            template_path,
            data_path,
            output_path,
            ..Default::default()
        }
    }

    pub fn with_diagnostic_format(mut self, format: DiagnosticFormat) -> Self {
        self.diagnostic_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format_from_str() {
        assert_eq!("JSON".parse::<DiagnosticFormat>(), Ok(DiagnosticFormat::Json));
        assert_eq!("terminal".parse::<DiagnosticFormat>(), Ok(DiagnosticFormat::Terminal));
        assert!("html".parse::<DiagnosticFormat>().is_err());
    }
}
