//! The parameter store: typed parameter lists over an XML element tree.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::codec::{self, Vocabulary};
use crate::error::{Error, Result};
use crate::value::Value;
use crate::xml::{read_document, write_document, Element, Node};

/// A mutable tree of named parameter lists backed by an XML document.
///
/// The root element's tag is the array name; each direct child is a
/// parameter list, uniquely named by its tag; each list holds parameters
/// whose tags need not be unique. Parameters carry a `type`/`value`
/// attribute pair, free text content, or child parameters.
///
/// All operations are synchronous, in-memory tree walks. The store is not
/// safe for concurrent mutation; callers needing that must serialize
/// access externally.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    root: Element,
}

impl ParameterStore {
    /// Creates a fresh empty document with the given root name.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Element::new(root_name),
        }
    }

    /// Parses a document from a string.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            root: read_document(input.as_bytes())?,
        })
    }

    /// Parses a document from a buffered byte source.
    pub fn from_reader<R: BufRead>(source: R) -> Result<Self> {
        Ok(Self {
            root: read_document(source)?,
        })
    }

    /// Parses a document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading parameter document");
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serializes the document as indented XML with a declaration header.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        write_document(&self.root, sink)
    }

    /// Serializes the document to a string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::Document(e.to_string()))
    }

    /// Writes the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "saving parameter document");
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        fs::write(path, out)?;
        Ok(())
    }

    /// The document's root tag.
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Tag names of all parameter lists, in document order, comments skipped.
    pub fn list_names(&self) -> Vec<String> {
        self.root.child_names()
    }

    /// Adds a new empty parameter list under the root.
    pub fn create_list(&mut self, list: &str) -> Result<()> {
        if self.root.has_child(list) {
            return Err(Error::DuplicateList {
                list: list.to_owned(),
            });
        }
        self.root.push(Node::Element(Element::new(list)));
        Ok(())
    }

    /// Non-throwing existence check for a parameter list.
    pub fn has_list(&self, list: &str) -> bool {
        self.root.has_child(list)
    }

    /// Appends a parameter to a list.
    ///
    /// [`Value::Null`] creates a bare placeholder element; any other value
    /// is written as a `type`/`value` attribute pair in the wide
    /// vocabulary. Duplicate parameter names are permitted.
    pub fn add_parameter(&mut self, list: &str, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let list_el = self.list_mut(list)?;
        let mut element = Element::new(name);
        if !value.is_null() {
            write_value(&mut element, &value, Vocabulary::Wide)?;
        }
        list_el.push(Node::Element(element));
        Ok(())
    }

    /// Existence check for a parameter; the list itself must exist.
    pub fn has_parameter(&self, list: &str, name: &str) -> Result<bool> {
        Ok(self.list(list)?.has_child(name))
    }

    /// Decoded value of the first parameter with the given name.
    pub fn value(&self, list: &str, name: &str) -> Result<Value> {
        let element = find_parameter(self.list(list)?, list, name)?;
        decoded_value(element, list, name)
    }

    /// Like [`value`](Self::value), but returns `default` when the
    /// parameter is absent. A missing list is still an error.
    pub fn value_or(&self, list: &str, name: &str, default: impl Into<Value>) -> Result<Value> {
        match self.list(list)?.child(name) {
            Some(element) => decoded_value(element, list, name),
            None => Ok(default.into()),
        }
    }

    /// Decoded values of every parameter sharing the given name, in
    /// document order. Empty when none match.
    pub fn values(&self, list: &str, name: &str) -> Result<Vec<Value>> {
        self.list(list)?
            .children_named(name)
            .map(|element| decoded_value(element, list, name))
            .collect()
    }

    /// Overwrites a parameter's value, native vocabulary (`int`/`float`).
    ///
    /// The currently stored value is re-decoded to establish its family;
    /// the new value must belong to the same family.
    pub fn set_value(&mut self, list: &str, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_value_in(list, name, &value.into(), Vocabulary::Native)
    }

    /// Overwrites a parameter's value, wide vocabulary (`long`/`double`).
    pub fn set_value_wide(
        &mut self,
        list: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.set_value_in(list, name, &value.into(), Vocabulary::Wide)
    }

    fn set_value_in(
        &mut self,
        list: &str,
        name: &str,
        value: &Value,
        vocabulary: Vocabulary,
    ) -> Result<()> {
        let list_el = self.list_mut(list)?;
        let element = list_el
            .child_mut(name)
            .ok_or_else(|| parameter_not_found(name, list))?;
        check_and_write(element, value, vocabulary, list, name)
    }

    /// Ordered parameter tag names of a list, comments skipped.
    pub fn names(&self, list: &str) -> Result<Vec<String>> {
        Ok(self.list(list)?.child_names())
    }

    /// Ordered child tag names of the first parameter with the given name.
    pub fn child_names(&self, list: &str, name: &str) -> Result<Vec<String>> {
        Ok(find_parameter(self.list(list)?, list, name)?.child_names())
    }

    /// Decoded values, in document order, of every child with the given
    /// tag under the first parameter named `name`.
    pub fn child_values(&self, list: &str, name: &str, child: &str) -> Result<Vec<Value>> {
        let element = find_parameter(self.list(list)?, list, name)?;
        let matches: Vec<&Element> = element.children_named(child).collect();
        if matches.is_empty() {
            return Err(Error::ChildNotFound {
                child: child.to_owned(),
                parameter: name.to_owned(),
                list: list.to_owned(),
            });
        }
        let target = format!("{name}.{child}");
        matches
            .into_iter()
            .map(|el| decoded_value(el, list, &target))
            .collect()
    }

    /// Family-checked overwrite of a child's value, wide vocabulary.
    ///
    /// Requires the parameter name to be unique in the list; with several
    /// instances this fails and the caller must use
    /// [`set_child_value_at`](Self::set_child_value_at).
    pub fn set_child_value(
        &mut self,
        list: &str,
        name: &str,
        child: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        let list_el = self.list_mut(list)?;
        let count = list_el.children_named(name).count();
        if count == 0 {
            return Err(parameter_not_found(name, list));
        }
        if count > 1 {
            return Err(Error::AmbiguousParameter {
                parameter: name.to_owned(),
                list: list.to_owned(),
                count,
            });
        }
        let instance = list_el
            .child_mut(name)
            .ok_or_else(|| parameter_not_found(name, list))?;
        let target = instance
            .child_mut(child)
            .ok_or_else(|| child_not_found(child, name, list))?;
        check_and_write(target, &value, Vocabulary::Wide, list, &format!("{name}.{child}"))
    }

    /// Like [`set_child_value`](Self::set_child_value), but selects the
    /// `index`-th parameter sharing the name instead of requiring
    /// uniqueness.
    pub fn set_child_value_at(
        &mut self,
        list: &str,
        name: &str,
        index: usize,
        child: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        let list_el = self.list_mut(list)?;
        let Some(instance) = list_el.children_named_mut(name).into_iter().nth(index) else {
            return Err(parameter_not_found(&format!("{name}[{index}]"), list));
        };
        let target = instance
            .child_mut(child)
            .ok_or_else(|| child_not_found(child, &format!("{name}[{index}]"), list))?;
        check_and_write(target, &value, Vocabulary::Wide, list, &format!("{name}.{child}"))
    }

    /// Appends a child to every parameter instance sharing `name`.
    ///
    /// A missing parameter is first created as an empty placeholder, and
    /// that placeholder persists even when a later check fails. Beyond the
    /// placeholder a failed call appends nothing: every instance is
    /// validated before any child is attached. An instance carrying a
    /// `value` attribute rejects children; a duplicate child tag on any
    /// instance is an error.
    pub fn add_child(
        &mut self,
        list: &str,
        name: &str,
        child: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        let attrs = if value.is_null() {
            None
        } else {
            Some(codec::encode(&value, Vocabulary::Wide)?)
        };

        let list_el = self.list_mut(list)?;
        if !list_el.has_child(name) {
            list_el.push(Node::Element(Element::new(name)));
        }

        for instance in list_el.children_named(name) {
            if instance.attribute("value").is_some() {
                return Err(Error::InvalidTarget {
                    child: child.to_owned(),
                    parameter: name.to_owned(),
                    list: list.to_owned(),
                });
            }
            if instance.has_child(child) {
                return Err(Error::DuplicateChild {
                    child: child.to_owned(),
                    parameter: name.to_owned(),
                    list: list.to_owned(),
                });
            }
        }

        for instance in list_el.children_named_mut(name) {
            let mut element = Element::new(child);
            if let Some((raw, tag)) = &attrs {
                element.set_attribute("type", *tag);
                element.set_attribute("value", raw.clone());
            }
            instance.push(Node::Element(element));
        }
        Ok(())
    }

    /// The trimmed `value` attribute if present and non-empty, else the
    /// trimmed text content if present and non-empty, else `None`.
    pub fn value_or_text(&self, list: &str, name: &str) -> Result<Option<String>> {
        let element = find_parameter(self.list(list)?, list, name)?;
        if let Some(raw) = element.attribute("value") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_owned()));
            }
        }
        if let Some(text) = element.text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_owned()));
            }
        }
        Ok(None)
    }

    /// The trimmed text content of a parameter; missing text is an error.
    pub fn text(&self, list: &str, name: &str) -> Result<String> {
        let element = find_parameter(self.list(list)?, list, name)?;
        element
            .text()
            .map(|t| t.trim().to_owned())
            .ok_or_else(|| Error::MissingText {
                parameter: name.to_owned(),
                list: list.to_owned(),
            })
    }

    fn list(&self, list: &str) -> Result<&Element> {
        self.root.child(list).ok_or_else(|| Error::ListNotFound {
            list: list.to_owned(),
        })
    }

    fn list_mut(&mut self, list: &str) -> Result<&mut Element> {
        self.root.child_mut(list).ok_or_else(|| Error::ListNotFound {
            list: list.to_owned(),
        })
    }
}

fn find_parameter<'a>(list_el: &'a Element, list: &str, name: &str) -> Result<&'a Element> {
    list_el
        .child(name)
        .ok_or_else(|| parameter_not_found(name, list))
}

fn parameter_not_found(name: &str, list: &str) -> Error {
    Error::ParameterNotFound {
        parameter: name.to_owned(),
        list: list.to_owned(),
    }
}

fn child_not_found(child: &str, name: &str, list: &str) -> Error {
    Error::ChildNotFound {
        child: child.to_owned(),
        parameter: name.to_owned(),
        list: list.to_owned(),
    }
}

/// Decodes an element's stored value under its type tag.
fn decoded_value(element: &Element, list: &str, name: &str) -> Result<Value> {
    let raw = element.attribute("value").ok_or_else(|| Error::MissingValue {
        parameter: name.to_owned(),
        list: list.to_owned(),
    })?;
    codec::decode(raw, element.attribute("type"))
}

/// Re-decodes the stored value to establish its family, then overwrites.
///
/// The family comes from the decode, not the tag alone: untagged values
/// family-check by inference.
fn check_and_write(
    element: &mut Element,
    value: &Value,
    vocabulary: Vocabulary,
    list: &str,
    name: &str,
) -> Result<()> {
    let stored = decoded_value(element, list, name)?;
    let stored_family = stored.family().ok_or(Error::UnsupportedValue)?;
    let supplied_family = value.family().ok_or(Error::UnsupportedValue)?;
    if stored_family != supplied_family {
        return Err(Error::TypeMismatch {
            parameter: name.to_owned(),
            list: list.to_owned(),
            stored: stored_family,
            supplied: supplied_family,
        });
    }
    write_value(element, value, vocabulary)
}

fn write_value(element: &mut Element, value: &Value, vocabulary: Vocabulary) -> Result<()> {
    let (raw, tag) = codec::encode(value, vocabulary)?;
    element.set_attribute("type", tag);
    element.set_attribute("value", raw);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_type_then_value() {
        let mut store = ParameterStore::new("Root");
        store.create_list("Sec").unwrap();
        store.add_parameter("Sec", "n", 3).unwrap();
        let text = store.to_xml_string().unwrap();
        assert!(text.contains(r#"<n type="long" value="3"/>"#));
    }

    #[test]
    fn test_add_child_placeholder_survives_failed_add() {
        let mut store = ParameterStore::new("Root");
        store.create_list("Sec").unwrap();
        // Force a duplicate-child failure on the second call.
        store.add_child("Sec", "P", "x", 1).unwrap();
        assert!(store.add_child("Sec", "P", "x", 2).is_err());

        // A failed first add on a fresh parameter still leaves the
        // placeholder behind.
        store.add_parameter("Sec", "Q", 5).unwrap();
        assert!(matches!(
            store.add_child("Sec", "Q", "x", 1),
            Err(Error::InvalidTarget { .. })
        ));
        assert!(store.has_parameter("Sec", "Q").unwrap());
    }

    #[test]
    fn test_failed_add_child_appends_to_no_instance() {
        let mut store = ParameterStore::new("Root");
        store.create_list("Sec").unwrap();
        store.add_parameter("Sec", "P", Value::Null).unwrap();
        store.add_parameter("Sec", "P", 5).unwrap();

        // Second instance carries a value, so the whole call fails and the
        // first instance must stay untouched.
        assert!(matches!(
            store.add_child("Sec", "P", "x", 1),
            Err(Error::InvalidTarget { .. })
        ));
        assert!(store.child_names("Sec", "P").unwrap().is_empty());
    }
}
