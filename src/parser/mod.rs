//! Document layer: a generic tree of elements, attributes and text

mod xml;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;

pub use self::xml::XmlParser;

/// A node in a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(&t.value),
            Node::Element(_) => None,
        }
    }
}

/// A run of character data (entities already resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub line: usize,
}

/// A named element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
    /// 1-based line of the opening tag
    pub line: usize,
}

impl Element {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text of the first child, if that child is text
    pub fn text(&self) -> Option<&str> {
        self.children.first().and_then(Node::as_text)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn line_number(&self) -> usize {
        self.line
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |e| e.name == name)
    }

    pub fn first_child_element(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }
}

/// A parsed document with a single root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

/// Trait for turning document text into a [`Document`]
pub trait DocumentParser {
    fn parse_str(&self, input: &str) -> Result<Document>;

    fn parse(&self, path: &Path) -> Result<Document> {
        let input = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.parse_str(&input)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Load an XML document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    XmlParser.parse(path)
}
