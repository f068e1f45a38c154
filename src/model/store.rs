//! Table store: every table declared in a document's `tables` section

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Diagnostic, Diagnostics, ErrorKind};
use crate::parser::Element;

use super::schema::{Column, ColumnDefaults};
use super::table::{Row, Table};

const TABLES_SECTION: &str = "tables";
const COLUMN_TAG: &str = "col";
const ROW_TAG: &str = "row";

/// Named tables of one document, in declaration order
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: IndexMap<String, Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from a document root.
    ///
    /// Problems are collected rather than returned early, so a single pass
    /// reports every malformed column, row and table. The store holds
    /// whatever could be loaded.
    pub fn build(file: &str, root: &Element) -> (Self, Diagnostics) {
        let mut store = Self::new();
        let mut diagnostics = Diagnostics::new();

        let Some(section) = root.first_child_element(TABLES_SECTION) else {
            diagnostics.push(Diagnostic::error(
                ErrorKind::MissingElement,
                file,
                Some(root.line_number()),
                "Missing tables element",
            ));
            return (store, diagnostics);
        };

        for table_elem in section.child_elements() {
            let (table, table_diagnostics) = load_table(file, table_elem);
            diagnostics.extend(table_diagnostics);

            debug!(
                table = %table.name,
                columns = table.column_count(),
                rows = table.row_count(),
                "Loaded table"
            );

            let line = table.line;
            if let Err(previous) = store.insert(table) {
                diagnostics.push(Diagnostic::error(
                    ErrorKind::DuplicateDefinition,
                    file,
                    Some(line),
                    format!(
                        "Table `{}` is already defined on line {}",
                        previous.name, previous.line
                    ),
                ));
            }
        }

        (store, diagnostics)
    }

    /// Add a table. A table with the same name is kept and returned as the error.
    pub fn insert(&mut self, table: Table) -> Result<(), &Table> {
        if self.tables.contains_key(&table.name) {
            return Err(&self.tables[&table.name]);
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn load_table(file: &str, elem: &Element) -> (Table, Diagnostics) {
    let name = elem.name();
    let mut diagnostics = Diagnostics::new();

    let mut columns = ColumnDefaults::new();
    for col in elem.child_elements_named(COLUMN_TAG) {
        let Some(col_name) = col.attribute("name") else {
            diagnostics.push(Diagnostic::error(
                ErrorKind::MissingAttribute,
                file,
                Some(col.line_number()),
                format!("Missing name on column of table `{}`", name),
            ));
            continue;
        };

        let default = col.attribute("default").unwrap_or("");
        if let Err(previous) = columns.declare(Column::new(col_name, default, col.line_number())) {
            diagnostics.push(Diagnostic::error(
                ErrorKind::DuplicateDefinition,
                file,
                Some(col.line_number()),
                format!(
                    "Column `{}` of table `{}` is already declared on line {}",
                    col_name, name, previous.line
                ),
            ));
        }
    }

    let mut table = Table::new(name, columns, elem.line_number());
    for row_elem in elem.child_elements_named(ROW_TAG) {
        for attr in row_elem.attributes.keys() {
            if !table.columns.contains(attr) {
                diagnostics.push(Diagnostic::warning(
                    ErrorKind::UnknownColumn,
                    file,
                    Some(row_elem.line_number()),
                    format!("`{}` is not a column in table `{}`, value ignored", attr, name),
                ));
            }
        }

        let row = Row::resolve(&table.columns, |c| row_elem.attribute(c), row_elem.line_number());
        table.add_row(row);
    }

    for other in elem
        .child_elements()
        .filter(|e| e.name() != COLUMN_TAG && e.name() != ROW_TAG)
    {
        trace!(table = %name, tag = %other.name(), line = other.line_number(), "Skipping element");
    }

    (table, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocumentParser, XmlParser};

    fn build(xml: &str) -> (TableStore, Diagnostics) {
        let doc = XmlParser.parse_str(xml).unwrap();
        TableStore::build("test.xml", &doc.root)
    }

    #[test]
    fn test_rows_resolve_against_defaults() {
        let (store, diagnostics) = build(
            r#"<root><tables><Color>
                <col name="name"/>
                <col name="hex" default="000000"/>
                <row name="Red" hex="FF0000"/>
                <row name="Blue"/>
                <row/>
            </Color></tables></root>"#,
        );
        assert!(diagnostics.is_empty());

        let color = store.get("Color").unwrap();
        assert_eq!(color.row_count(), 3);

        let rows = color.rows();
        assert_eq!(rows[0].get("name"), Some("Red"));
        assert_eq!(rows[0].get("hex"), Some("FF0000"));
        assert_eq!(rows[1].get("name"), Some("Blue"));
        assert_eq!(rows[1].get("hex"), Some("000000"));
        assert_eq!(rows[2].get("name"), Some(""));

        for row in rows {
            assert_eq!(row.len(), color.column_count());
        }
    }

    #[test]
    fn test_missing_column_name_is_reported_and_skipped() {
        let (store, diagnostics) = build(
            r#"<root><tables>
                <A><col default="1"/><col name="x"/><row x="2"/></A>
                <B><col/><row/></B>
            </tables></root>"#,
        );

        assert_eq!(diagnostics.error_count(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == ErrorKind::MissingAttribute));

        // Both tables still load
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("A").unwrap().rows()[0].get("x"), Some("2"));
        assert!(store.get("B").unwrap().rows()[0].is_empty());
    }

    #[test]
    fn test_duplicate_table_keeps_first() {
        let (store, diagnostics) = build(
            "<root><tables>\n<T><col name=\"a\"/><row a=\"first\"/></T>\n<T><col name=\"a\"/><row a=\"second\"/></T>\n</tables></root>",
        );

        let duplicate: Vec<_> = diagnostics.of_kind(ErrorKind::DuplicateDefinition).collect();
        assert_eq!(duplicate.len(), 1);
        assert_eq!(duplicate[0].line, Some(3));
        assert!(duplicate[0].message.contains("line 2"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("T").unwrap().rows()[0].get("a"), Some("first"));
    }

    #[test]
    fn test_duplicate_column() {
        let (store, diagnostics) = build(
            r#"<root><tables><T><col name="a" default="1"/><col name="a" default="2"/><row/></T></tables></root>"#,
        );

        assert_eq!(diagnostics.of_kind(ErrorKind::DuplicateDefinition).count(), 1);
        assert_eq!(store.get("T").unwrap().rows()[0].get("a"), Some("1"));
    }

    #[test]
    fn test_unknown_row_attribute_warns() {
        let (store, diagnostics) = build(
            r#"<root><tables><T><col name="a"/><row a="1" b="2"/></T></tables></root>"#,
        );

        assert!(diagnostics.is_success());
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(store.get("T").unwrap().rows()[0].get("b"), None);
    }

    #[test]
    fn test_missing_tables_section() {
        let (store, diagnostics) = build("<root><gen/></root>");
        assert!(store.is_empty());
        assert_eq!(diagnostics.of_kind(ErrorKind::MissingElement).count(), 1);
    }
}
