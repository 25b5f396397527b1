//! Tree construction from `quick-xml` events

use std::io::BufRead;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::xml::model::{Element, Node};

/// Reads a document from a source, returning its root element.
///
/// Whitespace-only text nodes are dropped, which keeps indented documents
/// stable under a parse/serialize round trip.
pub fn read_document<R: BufRead>(source: R) -> Result<Element> {
    let mut reader = Reader::from_reader(source);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, Node::Element(element))?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::Document("closing tag without matching opening tag".into())
                })?;
                attach(&mut stack, &mut root, Node::Element(element))?;
            }
            Ok(Event::Text(text)) => {
                let text = text.decode().map_err(quick_xml::Error::from)?;
                if !text.trim().is_empty() {
                    attach(&mut stack, &mut root, Node::Text(text.into_owned()))?;
                }
            }
            Ok(Event::GeneralRef(entity)) => {
                // Entity and character references arrive as their own
                // events, split out of the surrounding text.
                let text = resolve_entity(&entity)?;
                attach(&mut stack, &mut root, Node::Text(text))?;
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                attach(&mut stack, &mut root, Node::Text(text))?;
            }
            Ok(Event::Comment(text)) => {
                // Comment content is carried verbatim; entity references
                // have no meaning inside comments.
                let text = String::from_utf8_lossy(&text).into_owned();
                attach(&mut stack, &mut root, Node::Comment(text))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Parse(e)),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::Document("unterminated element".into()));
    }
    root.ok_or_else(|| Error::Document("no root element".into()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        element.set_attribute(key, value);
    }
    Ok(element)
}

fn resolve_entity(entity: &BytesRef<'_>) -> Result<String> {
    let name = String::from_utf8_lossy(entity).into_owned();
    if let Some(code) = name.strip_prefix('#') {
        let code = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return code
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| Error::Document(format!("invalid character reference {name:?}")));
    }
    resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| Error::Document(format!("unresolved entity reference {name:?}")))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Node) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push(node);
        return Ok(());
    }
    match node {
        Node::Element(element) => {
            if root.is_some() {
                return Err(Error::Document("multiple root elements".into()));
            }
            *root = Some(element);
            Ok(())
        }
        // Comments outside the root are legal; they are not retained.
        Node::Comment(_) => Ok(()),
        Node::Text(_) => Err(Error::Document("text outside root element".into())),
    }
}
