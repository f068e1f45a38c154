//! Output routing: which streams are written and which rows are in scope

use rustc_hash::FxHashMap;

use crate::model::Row;

/// The two generated artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streams {
    pub header: String,
    pub source: String,
}

impl Streams {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A row bound to a variable name by an enclosing expansion
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    /// Name of the table the row came from
    pub table: &'a str,
    pub row: &'a Row,
}

/// Where expansion output goes, and what it can refer to.
///
/// Routers are values: every `only_*`/`with_*` call returns a new router and
/// leaves `self` untouched, so sibling directives never see each other's
/// narrowing or bindings.
#[derive(Debug, Clone)]
pub struct Router<'a> {
    writes_header: bool,
    writes_source: bool,
    bindings: FxHashMap<&'a str, Binding<'a>>,
    separator: &'a str,
}

impl Default for Router<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Router<'a> {
    /// Router writing to both streams with nothing bound
    pub fn new() -> Self {
        Self {
            writes_header: true,
            writes_source: true,
            bindings: FxHashMap::default(),
            separator: "",
        }
    }

    pub fn only_source(&self) -> Self {
        Self {
            writes_header: false,
            writes_source: true,
            ..self.clone()
        }
    }

    pub fn only_header(&self) -> Self {
        Self {
            writes_header: true,
            writes_source: false,
            ..self.clone()
        }
    }

    /// Bind `name` to a row, replacing any outer binding of the same name
    pub fn with_var(&self, name: &'a str, table: &'a str, row: &'a Row) -> Self {
        let mut derived = self.clone();
        derived.bindings.insert(name, Binding { table, row });
        derived
    }

    /// Use `separator` between successive expansion iterations
    pub fn with_separator(&self, separator: &'a str) -> Self {
        Self {
            separator,
            ..self.clone()
        }
    }

    pub fn writes_header(&self) -> bool {
        self.writes_header
    }

    pub fn writes_source(&self) -> bool {
        self.writes_source
    }

    pub fn separator(&self) -> &'a str {
        self.separator
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'a>> {
        self.bindings.get(name).copied()
    }

    /// Append `text` to every enabled stream
    pub fn write(&self, streams: &mut Streams, text: &str) {
        if self.writes_header {
            streams.header.push_str(text);
        }
        if self.writes_source {
            streams.source.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDefaults;

    #[test]
    fn test_write_fans_out() {
        let mut streams = Streams::new();
        let router = Router::new();

        router.write(&mut streams, "both;");
        router.only_header().write(&mut streams, "h;");
        router.only_source().write(&mut streams, "s;");

        assert_eq!(streams.header, "both;h;");
        assert_eq!(streams.source, "both;s;");
    }

    #[test]
    fn test_derivation_leaves_original_untouched() {
        let row = Row::resolve(&ColumnDefaults::new(), |_| None, 1);
        let router = Router::new();

        let narrowed = router.only_source().with_separator(", ").with_var("c", "Color", &row);
        assert!(!narrowed.writes_header());
        assert!(narrowed.lookup("c").is_some());
        drop(narrowed);

        assert!(router.writes_header());
        assert!(router.writes_source());
        assert_eq!(router.separator(), "");
        assert!(router.lookup("c").is_none());
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let defaults = ColumnDefaults::new();
        let outer_row = Row::resolve(&defaults, |_| None, 1);
        let inner_row = Row::resolve(&defaults, |_| None, 2);

        let outer = Router::new().with_var("v", "Outer", &outer_row);
        let inner = outer.with_var("v", "Inner", &inner_row);

        assert_eq!(inner.lookup("v").map(|b| b.table), Some("Inner"));
        assert_eq!(outer.lookup("v").map(|b| b.table), Some("Outer"));
    }
}
