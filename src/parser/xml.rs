//! XML loader built on the quick-xml event reader

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, DocumentParser, Element, Node, Text};

/// Parser for XML documents
pub struct XmlParser;

impl DocumentParser for XmlParser {
    fn parse_str(&self, input: &str) -> Result<Document> {
        let lines = LineIndex::new(input);
        let mut reader = Reader::from_str(input);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let line = lines.line_of(reader.buffer_position() as usize);
            let event = reader
                .read_event()
                .with_context(|| format!("Malformed XML near line {}", line))?;

            match event {
                Event::Start(e) => open.push(start_element(&e, line)?),
                Event::Empty(e) => {
                    let element = start_element(&e, line)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .with_context(|| format!("Unexpected closing tag on line {}", line))?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(t) => {
                    let value = t
                        .unescape()
                        .with_context(|| format!("Invalid character data on line {}", line))?;
                    push_text(&mut open, &value, line)?;
                }
                Event::CData(c) => {
                    let bytes = c.into_inner();
                    push_text(&mut open, &String::from_utf8_lossy(&bytes), line)?;
                }
                Event::Eof => break,
                // Comments, declarations, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            bail!(
                "Unclosed element <{}> opened on line {}",
                element.name,
                element.line
            );
        }

        let root = root.context("Document has no root element")?;
        Ok(Document { root })
    }
}

fn start_element(start: &BytesStart<'_>, line: usize) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name, line);

    for attr in start.attributes() {
        let attr = attr.with_context(|| {
            format!("Invalid attribute on <{}> at line {}", element.name, line)
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .with_context(|| format!("Invalid value for attribute `{}` at line {}", key, line))?
            .into_owned();
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }

    if root.is_some() {
        bail!(
            "Second root element <{}> on line {}",
            element.name,
            element.line
        );
    }
    *root = Some(element);
    Ok(())
}

/// Append character data, merging with a directly preceding text node
fn push_text(open: &mut [Element], value: &str, line: usize) -> Result<()> {
    let Some(parent) = open.last_mut() else {
        if value.trim().is_empty() {
            return Ok(());
        }
        bail!("Text outside the root element on line {}", line);
    };

    if let Some(Node::Text(previous)) = parent.children.last_mut() {
        previous.value.push_str(value);
    } else {
        parent.children.push(Node::Text(Text {
            value: value.to_string(),
            line,
        }));
    }
    Ok(())
}

/// Maps byte offsets to 1-based line numbers
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(input: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }
}
