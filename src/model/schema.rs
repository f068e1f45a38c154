//! Column declarations and their fallback values

use indexmap::IndexMap;

/// A declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name (from the `name` attribute)
    pub name: String,
    /// Value used when a row does not supply one
    pub default: String,
    /// Line of the `col` declaration
    pub line: usize,
}

impl Column {
    pub fn new(name: impl Into<String>, default: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            line,
        }
    }
}

/// Per-table schema: column names and their defaults, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDefaults {
    columns: IndexMap<String, Column>,
}

impl ColumnDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column. An already declared name is kept and its
    /// declaration returned as the error.
    pub fn declare(&mut self, column: Column) -> Result<(), &Column> {
        if self.columns.contains_key(&column.name) {
            return Err(&self.columns[&column.name]);
        }
        self.columns.insert(column.name.clone(), column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_declaration_wins() {
        let mut defaults = ColumnDefaults::new();
        assert!(defaults.declare(Column::new("hex", "000000", 3)).is_ok());

        let previous = defaults.declare(Column::new("hex", "FFFFFF", 4)).unwrap_err();
        assert_eq!(previous.line, 3);

        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.get("hex").map(|c| c.default.as_str()), Some("000000"));
    }
}
