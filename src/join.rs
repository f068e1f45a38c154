//! Joining named text patterns from several documents into one file

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::JoinConfig;
use crate::error::{Diagnostic, Diagnostics, ErrorKind};
use crate::parser::{load_document, Document};

const PATTERN_TAG: &str = "pattern";

/// Joined text and the problems found while collecting it
#[derive(Debug, Clone, Default)]
pub struct Joined {
    pub text: String,
    pub diagnostics: Diagnostics,
}

impl Joined {
    pub fn success(&self) -> bool {
        self.diagnostics.is_success()
    }
}

/// Collect the text of every `pattern` element named `pattern` in a document.
///
/// Every pattern element is checked, matching or not. Only the first match
/// in a document is emitted.
pub fn join_document(file: &str, document: &Document, pattern: &str, line_directives: bool) -> Joined {
    let mut joined = Joined::default();
    let mut found: Option<usize> = None;

    for elem in document.root.child_elements_named(PATTERN_TAG) {
        let line = elem.line_number();

        let Some(name) = elem.attribute("name") else {
            joined.diagnostics.push(Diagnostic::error(
                ErrorKind::MissingAttribute,
                file,
                Some(line),
                "Missing `name` attribute on <pattern>",
            ));
            continue;
        };

        let Some(text) = elem.text() else {
            joined.diagnostics.push(Diagnostic::error(
                ErrorKind::MissingText,
                file,
                Some(line),
                format!("Pattern `{}` has no text", name),
            ));
            continue;
        };

        if name != pattern {
            continue;
        }

        if let Some(previous) = found {
            joined.diagnostics.push(Diagnostic::error(
                ErrorKind::DuplicateDefinition,
                file,
                Some(line),
                format!(
                    "Found duplicate pattern named `{}`, previous one is on line {}",
                    name, previous
                ),
            ));
            continue;
        }
        found = Some(line);

        if line_directives {
            joined.text.push_str(&format!("#line {} \"{}\"\n", line, file));
        }
        joined.text.push_str(text);
        joined.text.push_str("\n\n");
    }

    debug!(file, pattern, found = found.is_some(), "Scanned patterns");
    joined
}

/// Join the configured pattern across all inputs, in order
pub fn join_files(config: &JoinConfig) -> Joined {
    let mut joined = Joined::default();

    for input in &config.inputs {
        let file = input.display().to_string();
        match load_document(input) {
            Ok(document) => {
                let part = join_document(&file, &document, &config.pattern, config.line_directives);
                joined.text.push_str(&part.text);
                joined.diagnostics.extend(part.diagnostics);
            }
            Err(e) => joined.diagnostics.push(Diagnostic::error(
                ErrorKind::LoadFailure,
                file,
                None,
                format!("Failed to load file: {:#}", e),
            )),
        }
    }

    joined
}

pub fn write_output(config: &JoinConfig, joined: &Joined) -> Result<()> {
    fs::write(&config.output_path, &joined.text)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    info!(path = %config.output_path.display(), "Wrote joined patterns");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocumentParser, XmlParser};

    const PATTERNS: &str = "<patterns>\n<pattern name=\"decl\">int f();</pattern>\n<pattern name=\"def\">int f() { return 1; }</pattern>\n</patterns>";

    fn join(xml: &str, pattern: &str, line_directives: bool) -> Joined {
        let doc = XmlParser.parse_str(xml).unwrap();
        join_document("p.xml", &doc, pattern, line_directives)
    }

    #[test]
    fn test_selects_named_pattern() {
        let joined = join(PATTERNS, "def", false);
        assert!(joined.success());
        assert_eq!(joined.text, "int f() { return 1; }\n\n");
    }

    #[test]
    fn test_line_directive() {
        let joined = join(PATTERNS, "decl", true);
        assert_eq!(joined.text, "#line 2 \"p.xml\"\nint f();\n\n");
    }

    #[test]
    fn test_no_match_is_empty_success() {
        let joined = join(PATTERNS, "other", true);
        assert!(joined.success());
        assert!(joined.text.is_empty());
    }

    #[test]
    fn test_duplicate_pattern_reported_once_emitted() {
        let joined = join(
            "<p>\n<pattern name=\"a\">one</pattern>\n<pattern name=\"a\">two</pattern>\n</p>",
            "a",
            false,
        );

        assert_eq!(joined.text, "one\n\n");
        let duplicate: Vec<_> = joined.diagnostics.of_kind(ErrorKind::DuplicateDefinition).collect();
        assert_eq!(duplicate.len(), 1);
        assert_eq!(duplicate[0].line, Some(3));
        assert!(duplicate[0].message.contains("line 2"));
    }

    #[test]
    fn test_every_pattern_is_validated() {
        let joined = join(
            r#"<p><pattern>x</pattern><pattern name="empty"/><pattern name="a">ok</pattern></p>"#,
            "a",
            false,
        );

        let kinds: Vec<_> = joined.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::MissingAttribute, ErrorKind::MissingText]);
        assert_eq!(joined.text, "ok\n\n");
    }
}
