//! Recursive template expansion

use tracing::trace;

use crate::error::{Diagnostic, Diagnostics, ErrorKind};
use crate::model::{Table, TableStore};
use crate::parser::{Element, Node};

use super::directive::Directive;
use super::router::{Router, Streams};
use super::transform::Transform;

/// Written between items of an `expand_data` array
const DATA_SEPARATOR: &str = ", ";

/// Outcome of a single directive: its collected diagnostics, or the one
/// diagnostic that stopped it before it wrote anything.
type Step = Result<Diagnostics, Diagnostic>;

/// Walks a template tree against the tables of one document
pub struct Expander<'a> {
    file: &'a str,
    tables: &'a TableStore,
}

impl<'a> Expander<'a> {
    pub fn new(file: &'a str, tables: &'a TableStore) -> Self {
        Self { file, tables }
    }

    /// Expand every child of `node` in document order.
    ///
    /// A failing child never stops its siblings; all diagnostics are returned.
    pub fn expand(&self, node: &'a Element, router: &Router<'a>, out: &mut Streams) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for child in node.children() {
            match child {
                Node::Text(text) => router.write(out, &text.value),
                Node::Element(elem) => diagnostics.extend(self.expand_element(elem, router, out)),
            }
        }
        diagnostics
    }

    fn expand_element(&self, elem: &'a Element, router: &Router<'a>, out: &mut Streams) -> Diagnostics {
        let Some(directive) = Directive::from_tag(elem.name()) else {
            return self
                .error(elem, ErrorKind::InvalidDirective, format!("Invalid element `{}`", elem.name()))
                .into();
        };
        trace!(%directive, line = elem.line_number(), "Expanding directive");

        let step = match directive {
            Directive::Source => Ok(self.expand(elem, &router.only_source(), out)),
            Directive::Header => Ok(self.expand(elem, &router.only_header(), out)),
            Directive::Expand => self.expand_table(elem, router, out),
            Directive::Var => self.write_var(elem, router, out),
            Directive::Enum => self.expand_enum(elem, router, out),
            Directive::ExpandData => self.expand_data(elem, router, out),
        };
        step.unwrap_or_else(Diagnostics::from)
    }

    fn expand_table(&self, elem: &'a Element, router: &Router<'a>, out: &mut Streams) -> Step {
        let table = self.table(elem)?;
        let var = self.require(elem, "var")?;
        Ok(self.expand_rows(elem, router, table, var, out))
    }

    /// Expand `elem` once per row with `var` bound, separators in between
    fn expand_rows(
        &self,
        elem: &'a Element,
        router: &Router<'a>,
        table: &'a Table,
        var: &'a str,
        out: &mut Streams,
    ) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for (index, row) in table.rows().iter().enumerate() {
            if index > 0 {
                router.write(out, router.separator());
            }
            let scoped = router.with_var(var, &table.name, row);
            diagnostics.extend(self.expand(elem, &scoped, out));
        }
        diagnostics
    }

    fn write_var(&self, elem: &'a Element, router: &Router<'a>, out: &mut Streams) -> Step {
        let name = self.require(elem, "name")?;
        let binding = router.lookup(name).ok_or_else(|| {
            self.error(
                elem,
                ErrorKind::UnboundVariable,
                format!("`{}` is not an expanded table variable", name),
            )
        })?;

        let col = self.require(elem, "col")?;
        let value = binding.row.get(col).ok_or_else(|| {
            self.error(
                elem,
                ErrorKind::UnknownColumn,
                format!("`{}` is not a column in `{}` (table `{}`)", col, name, binding.table),
            )
        })?;

        let mut diagnostics = Diagnostics::new();
        match elem.attribute("transform").map(str::parse::<Transform>) {
            None => router.write(out, value),
            Some(Ok(transform)) => router.write(out, &transform.apply(value)),
            Some(Err(message)) => {
                diagnostics.push(Diagnostic::warning(
                    ErrorKind::UnknownTransform,
                    self.file,
                    Some(elem.line_number()),
                    message,
                ));
                router.write(out, value);
            }
        }
        Ok(diagnostics)
    }

    fn expand_enum(&self, elem: &'a Element, router: &Router<'a>, out: &mut Streams) -> Step {
        let name = self.require(elem, "name")?;

        let header = router.only_header();
        header.write(out, &format!("enum class {}{{", name));
        let diagnostics = self.expand(elem, &header, out);
        header.write(out, "\n};\n");

        Ok(diagnostics)
    }

    fn expand_data(&self, elem: &'a Element, router: &Router<'a>, out: &mut Streams) -> Step {
        let name = self.require(elem, "name")?;
        let table = self.table(elem)?;
        let var = self.require(elem, "var")?;
        let count = table.row_count();

        router
            .only_header()
            .write(out, &format!("extern {}[{}];\n", name, count));

        let source = router.only_source();
        source.write(out, &format!("{}[{}] = {{\n", name, count));
        let diagnostics = self.expand_rows(
            elem,
            &source.with_separator(DATA_SEPARATOR),
            table,
            var,
            out,
        );
        source.write(out, "\n};\n");

        Ok(diagnostics)
    }

    fn require(&self, elem: &'a Element, attr: &str) -> Result<&'a str, Diagnostic> {
        elem.attribute(attr).ok_or_else(|| {
            self.error(
                elem,
                ErrorKind::MissingAttribute,
                format!("Missing `{}` attribute on <{}>", attr, elem.name()),
            )
        })
    }

    fn table(&self, elem: &'a Element) -> Result<&'a Table, Diagnostic> {
        let name = self.require(elem, "table")?;
        self.tables.get(name).ok_or_else(|| {
            self.error(
                elem,
                ErrorKind::UnknownTable,
                format!("Failed to find table `{}`", name),
            )
        })
    }

    fn error(&self, elem: &Element, kind: ErrorKind, message: String) -> Diagnostic {
        Diagnostic::error(kind, self.file, Some(elem.line_number()), message)
    }
}
