//! Diagnostics collected while loading tables and expanding templates

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The kind of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("missing attribute")]
    MissingAttribute,
    #[error("missing text")]
    MissingText,
    #[error("missing element")]
    MissingElement,
    #[error("unknown table")]
    UnknownTable,
    #[error("unbound variable")]
    UnboundVariable,
    #[error("unknown column")]
    UnknownColumn,
    #[error("invalid directive")]
    InvalidDirective,
    #[error("unknown transform")]
    UnknownTransform,
    #[error("duplicate definition")]
    DuplicateDefinition,
    #[error("failed to load document")]
    LoadFailure,
    #[error("invalid data")]
    InvalidData,
}

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single located problem in an input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    /// Document the problem was found in
    pub file: String,
    /// 1-based line of the offending node, if known
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, file: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn warning(kind: ErrorKind, file: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `file(line): ` prefix, with `-1` standing in for an unknown line
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}({})", self.file, line),
            None => format!("{}(-1)", self.file),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location(), self.severity, self.message)
    }
}

/// Ordered collection of diagnostics returned by every recursive step.
///
/// Children hand their collection back to the parent, which merges it with
/// [`Diagnostics::extend`]; nothing is shared or mutated across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Merge a child's diagnostics into this collection
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// True when no error-severity diagnostic was recorded
    pub fn is_success(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of a given kind, in the order they were recorded
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            items: vec![diagnostic],
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
