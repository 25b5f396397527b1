//! XML data model

use indexmap::IndexMap;

/// XML element: a tag name, ordered attributes, and ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Concatenated direct text content, or `None` when the element holds
    /// no text nodes.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        let mut found = false;
        for node in &self.children {
            if let Node::Text(t) = node {
                out.push_str(t);
                found = true;
            }
        }
        found.then_some(out)
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Iterates the direct element children, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First direct child element with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.name == tag => Some(el),
            _ => None,
        })
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }

    /// All direct child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == tag)
    }

    pub fn children_named_mut(&mut self, tag: &str) -> Vec<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(|node| match node {
                Node::Element(el) if el.name == tag => Some(el),
                _ => None,
            })
            .collect()
    }

    /// Tag names of the direct element children, comments skipped.
    pub fn child_names(&self) -> Vec<String> {
        self.elements().map(|el| el.name.clone()).collect()
    }
}
