//! Header/source generation from tables and a template

mod directive;
mod expand;
mod router;
mod transform;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::GenConfig;
use crate::error::{Diagnostic, Diagnostics, ErrorKind};
use crate::model::TableStore;
use crate::parser::{load_document, Document, Element};

pub use directive::Directive;
pub use expand::Expander;
pub use router::{Binding, Router, Streams};
pub use transform::Transform;

const GEN_SECTION: &str = "gen";
const HEADER_PREAMBLE: &str = "#pragma once\n\n";

/// Everything one generation pass produced
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub header: String,
    pub source: String,
    pub diagnostics: Diagnostics,
}

impl Generated {
    /// True when no error was recorded. Output of a failed pass is advisory only.
    pub fn success(&self) -> bool {
        self.diagnostics.is_success()
    }

    /// Append another pass's output and diagnostics
    pub fn append(&mut self, other: Generated) {
        self.header.push_str(&other.header);
        self.source.push_str(&other.source);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Expand `template` against `tables`, writing to both streams.
pub fn run(file: &str, tables: &TableStore, template: &Element) -> Generated {
    let mut streams = Streams::new();
    let diagnostics = Expander::new(file, tables).expand(template, &Router::new(), &mut streams);

    Generated {
        header: streams.header,
        source: streams.source,
        diagnostics,
    }
}

/// Load a document's tables and expand its `gen` section
pub fn generate_document(file: &str, document: &Document) -> Generated {
    let (tables, mut diagnostics) = TableStore::build(file, &document.root);
    debug!(file, tables = tables.len(), "Built table store");

    let Some(template) = document.root.first_child_element(GEN_SECTION) else {
        diagnostics.push(Diagnostic::error(
            ErrorKind::MissingElement,
            file,
            Some(document.root.line_number()),
            "Missing gen element",
        ));
        return Generated {
            diagnostics,
            ..Default::default()
        };
    };

    let generated = run(file, &tables, template);
    diagnostics.extend(generated.diagnostics);

    Generated {
        diagnostics,
        ..generated
    }
}

/// Generate from every input of `config`, in order, into one header/source pair.
///
/// Documents that cannot be loaded are reported and skipped.
pub fn generate_files(config: &GenConfig) -> Generated {
    let mut generated = Generated {
        header: HEADER_PREAMBLE.to_string(),
        source: include_line(config),
        diagnostics: Diagnostics::new(),
    };

    for input in &config.inputs {
        let file = input.display().to_string();
        match load_document(input) {
            Ok(document) => generated.append(generate_document(&file, &document)),
            Err(e) => generated.diagnostics.push(Diagnostic::error(
                ErrorKind::LoadFailure,
                file,
                None,
                format!("Failed to load file: {:#}", e),
            )),
        }
    }

    generated
}

/// Write both outputs to the paths in `config`
pub fn write_outputs(config: &GenConfig, generated: &Generated) -> Result<()> {
    write_file(&config.header_path, &generated.header)?;
    write_file(&config.source_path, &generated.source)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote output");
    Ok(())
}

fn include_line(config: &GenConfig) -> String {
    if !config.include_header {
        return String::new();
    }
    match config.header_path.file_name() {
        Some(name) => format!("#include \"{}\"\n\n", name.to_string_lossy()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocumentParser, XmlParser};

    #[test]
    fn test_missing_gen_section() {
        let doc = XmlParser
            .parse_str(r#"<root><tables><T><col name="a"/></T></tables></root>"#)
            .unwrap();
        let out = generate_document("t.xml", &doc);

        assert!(!out.success());
        assert_eq!(out.diagnostics.of_kind(ErrorKind::MissingElement).count(), 1);
        assert!(out.header.is_empty());
    }

    #[test]
    fn test_table_errors_and_expansion_errors_combine() {
        let doc = XmlParser
            .parse_str(r#"<root><tables><T><col/></T></tables><gen><nope/>text</gen></root>"#)
            .unwrap();
        let out = generate_document("t.xml", &doc);

        let kinds: Vec<_> = out.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::MissingAttribute, ErrorKind::InvalidDirective]);
        assert_eq!(out.source, "text");
    }

    #[test]
    fn test_run_with_prebuilt_store() {
        let doc = XmlParser
            .parse_str(r#"<root><tables><T><col name="a"/><row a="1"/><row a="2"/></T></tables><gen><source>s</source><expand table="T" var="t"><var name="t" col="a"/></expand></gen></root>"#)
            .unwrap();
        let (tables, diagnostics) = TableStore::build("t.xml", &doc.root);
        assert!(diagnostics.is_empty());

        let template = doc.root.first_child_element("gen").unwrap();
        let out = run("t.xml", &tables, template);

        assert!(out.success());
        assert_eq!(out.header, "12");
        assert_eq!(out.source, "s12");
    }

    #[test]
    fn test_generate_files_reports_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenConfig::new(dir.path().join("out.cc"), dir.path().join("out.h"))
            .with_inputs(vec![dir.path().join("missing.xml")])
            .with_include_header(true);

        let out = generate_files(&config);

        assert_eq!(out.header, "#pragma once\n\n");
        assert_eq!(out.source, "#include \"out.h\"\n\n");
        assert_eq!(out.diagnostics.of_kind(ErrorKind::LoadFailure).count(), 1);
    }
}
