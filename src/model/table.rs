//! Table and Row data structures

use indexmap::IndexMap;

use super::schema::ColumnDefaults;

/// A fully resolved row: one value for every declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: IndexMap<String, String>,
    /// Line of the `row` declaration
    pub source_line: usize,
}

impl Row {
    /// Resolve a row against a schema.
    ///
    /// `lookup` supplies the row's own value for a column; columns it has no
    /// value for fall back to the column default.
    pub fn resolve<'a, F>(defaults: &ColumnDefaults, mut lookup: F, source_line: usize) -> Self
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let values = defaults
            .iter()
            .map(|column| {
                let value = match lookup(&column.name) {
                    Some(value) => value.to_string(),
                    None => column.default.clone(),
                };
                (column.name.clone(), value)
            })
            .collect();

        Self {
            values,
            source_line,
        }
    }

    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered sequence of rows sharing one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: ColumnDefaults,
    pub rows: Vec<Row>,
    /// Line of the table declaration
    pub line: usize,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: ColumnDefaults, line: usize) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            line,
        }
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn color_columns() -> ColumnDefaults {
        let mut defaults = ColumnDefaults::new();
        defaults.declare(Column::new("name", "", 1)).unwrap();
        defaults.declare(Column::new("hex", "000000", 2)).unwrap();
        defaults
    }

    #[test]
    fn test_row_value_overrides_default() {
        let columns = color_columns();
        let row = Row::resolve(&columns, |c| (c == "hex").then_some("FF0000"), 3);

        assert_eq!(row.get("hex"), Some("FF0000"));
        assert_eq!(row.get("name"), Some(""));
    }

    #[test]
    fn test_row_has_exactly_schema_columns() {
        let columns = color_columns();
        let row = Row::resolve(&columns, |c| (c == "name").then_some("Blue"), 4);

        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["name", "hex"]);
        assert_eq!(row.get("name"), Some("Blue"));
        assert_eq!(row.get("hex"), Some("000000"));
        assert_eq!(row.get("alpha"), None);
    }
}
