//! View element tree
//!
//! View markup is parsed once into an owned tree. Namespace prefixes are
//! resolved while parsing, so components match on namespace URI and local
//! name regardless of the prefix an author picked. Every element records its
//! root-to-element path of local names (`/report/table/row`).

use std::fmt;

use indexmap::IndexMap;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::error::{RenderError, RenderResult};

/// Local name a component registers to handle every element of its namespace
pub const ANY_LOCAL_NAME: &str = "any";

/// Namespace-qualified element name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI; `None` for elements outside any namespace
    pub namespace: Option<String>,
    /// Local name
    pub local: String,
}

impl QualifiedName {
    /// Name in a namespace
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Name outside any namespace
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// The wildcard name of this name's namespace
    pub fn wildcard(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            local: ANY_LOCAL_NAME.to_string(),
        }
    }
}

/// `{namespace}local`, or just `local` outside any namespace
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, entities resolved
    Text(String),
}

/// A view element with its attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name
    pub name: QualifiedName,
    /// Attributes by name as written, namespace declarations excluded
    pub attributes: IndexMap<String, String>,
    /// Children in document order
    pub children: Vec<Node>,
    /// Root-to-element path of local names
    pub path: String,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: QualifiedName) -> Self {
        let path = format!("/{}", name.local);
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            path,
        }
    }

    /// Builder-style attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style child element; the child's paths are placed under this element
    pub fn with_child(mut self, mut child: Element) -> Self {
        child.reroot(&self.path);
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value by name, ignoring blank values
    pub fn non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).filter(|v| !v.trim().is_empty())
    }

    /// Child elements in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn reroot(&mut self, parent_path: &str) {
        self.path = format!("{parent_path}/{}", self.name.local);
        let path = self.path.clone();
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.reroot(&path);
            }
        }
    }
}

/// A parsed view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDocument {
    /// Document element
    pub root: Element,
}

impl ViewDocument {
    /// Wrap an element tree built in code
    pub fn from_root(mut root: Element) -> Self {
        root.reroot("");
        Self { root }
    }

    /// Parse view markup
    pub fn parse(markup: &str) -> RenderResult<Self> {
        let mut reader = NsReader::from_str(markup);
        reader.check_end_names(true);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event()? {
                (namespace, Event::Start(start)) => {
                    let element = open_element(namespace, &start, open.last())?;
                    open.push(element);
                }
                (namespace, Event::Empty(start)) => {
                    let element = open_element(namespace, &start, open.last())?;
                    close_element(element, &mut open, &mut root)?;
                }
                (_, Event::End(_)) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| RenderError::malformed("unbalanced end tag"))?;
                    close_element(element, &mut open, &mut root)?;
                }
                (_, Event::Text(text)) => {
                    let text = text.unescape()?;
                    push_text(&mut open, text.as_ref())?;
                }
                (_, Event::CData(data)) => {
                    let bytes = data.into_inner();
                    let text = String::from_utf8_lossy(&bytes);
                    push_text(&mut open, text.as_ref())?;
                }
                (_, Event::Eof) => break,
                (_, Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_)) => {}
            }
        }

        if !open.is_empty() {
            return Err(RenderError::malformed("unexpected end of markup"));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| RenderError::malformed("view has no root element"))
    }
}

fn open_element(
    namespace: ResolveResult<'_>,
    start: &BytesStart<'_>,
    parent: Option<&Element>,
) -> RenderResult<Element> {
    let namespace = match namespace {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(RenderError::malformed(format!(
                "element '{}' uses undeclared prefix '{}'",
                String::from_utf8_lossy(start.name().as_ref()),
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let mut attributes = IndexMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }

    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let path = match parent {
        Some(parent) => format!("{}/{local}", parent.path),
        None => format!("/{local}"),
    };
    Ok(Element {
        name: QualifiedName { namespace, local },
        attributes,
        children: Vec::new(),
        path,
    })
}

fn close_element(
    element: Element,
    open: &mut [Element],
    root: &mut Option<Element>,
) -> RenderResult<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(RenderError::malformed("view has more than one root element")),
    }
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) -> RenderResult<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None => Err(RenderError::malformed("text outside the root element")),
    }
}
