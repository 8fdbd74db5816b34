//! Owned, ordered XML tree.
//!
//! Parsed from text with `roxmltree`, written back with `quick-xml`. The
//! inference pass reads it, and generated bindings read and write it through
//! the typed accessors below (missing or unparsable values read as the zero
//! value of the accessor's type).

use std::path::Path;

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub use crate::error::{Error, Result};

const INDENT_WIDTH: usize = 4;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One element node. Attribute equality ignores order; child order matters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    /// Leading text content, trimmed; blank text is stored as `None`.
    pub text: Option<String>,
    pub children: Vec<Element>,
}

// ————————————————————————————————————————————————————————————————————————————
// PARSE / LOAD
// ————————————————————————————————————————————————————————————————————————————

/// Parse markup text and return its root element.
pub fn parse(source: &str) -> Result<Element> {
    let doc = parse_document(source)?;
    Ok(Element::from_node(doc.root_element()))
}

/// Read and parse a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Element> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = parse_document(&source).map_err(|error| Error::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "parsed document");
    Ok(Element::from_node(doc.root_element()))
}

/// Samples may carry a DOCTYPE; entity declarations in it are honored.
fn parse_document(source: &str) -> std::result::Result<roxmltree::Document<'_>, roxmltree::Error> {
    let options = roxmltree::ParsingOptions { allow_dtd: true, ..roxmltree::ParsingOptions::default() };
    roxmltree::Document::parse_with_options(source, options)
}

/// Read a file and require its root element to be named `expected`.
pub fn load_root(path: impl AsRef<Path>, expected: &str) -> Result<Element> {
    let root = load_file(path)?;
    if root.name != expected {
        return Err(Error::MissingRoot {
            expected: expected.to_string(),
            found: root.name,
        });
    }
    Ok(root)
}

/// Write `root` to `path` behind an XML declaration.
pub fn save_file(root: &Element, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let xml = root.to_document_string()?;
    std::fs::write(path, xml).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Self::new(node.tag_name().name());
        for attr in node.attributes() {
            element.attributes.insert(attr.name().to_string(), attr.value().to_string());
        }
        element.text = node
            .text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        element.children = node
            .children()
            .filter(|child| child.is_element())
            .map(Self::from_node)
            .collect();
        element
    }

    // read side

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attr_str(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    pub fn attr_i64(&self, name: &str) -> i64 {
        parse_or_zero(self.attr(name), &self.name, name)
    }

    pub fn attr_f64(&self, name: &str) -> f64 {
        parse_or_zero(self.attr(name), &self.name, name)
    }

    pub fn text_str(&self) -> String {
        self.text.clone().unwrap_or_default()
    }

    pub fn text_i64(&self) -> i64 {
        parse_or_zero(self.text.as_deref(), &self.name, "#text")
    }

    pub fn text_f64(&self) -> f64 {
        parse_or_zero(self.text.as_deref(), &self.name, "#text")
    }

    /// First child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every child element named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    // write side

    pub fn append_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if text.trim().is_empty() { None } else { Some(text) };
    }

    /// Append an empty child element and return it for filling in.
    pub fn append_child(&mut self, name: &str) -> &mut Element {
        let index = self.children.len();
        self.children.push(Element::new(name));
        &mut self.children[index]
    }

    // serialize

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_to(&mut writer)?;
        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Absent reads as zero silently; present but unparsable reads as zero and is logged.
fn parse_or_zero<T: std::str::FromStr + Default>(raw: Option<&str>, element: &str, field: &str) -> T {
    let Some(value) = raw else {
        return T::default();
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::debug!(element, field, value, "unparsable number; reading as zero");
            T::default()
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
