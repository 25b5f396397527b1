//! Indented serialization over `quick-xml`

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::xml::model::{Element, Node};

/// Serializes a tree as indented XML with a declaration header.
pub fn write_document<W: Write>(root: &Element, sink: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(sink, b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::reader::read_document;

    fn to_string(root: &Element) -> String {
        let mut out = Vec::new();
        write_document(root, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_declaration_and_indentation() {
        let mut root = Element::new("Config");
        let mut run = Element::new("Run");
        let mut count = Element::new("count");
        count.set_attribute("type", "long");
        count.set_attribute("value", "3");
        run.push(Node::Element(count));
        root.push(Node::Element(run));

        let text = to_string(&root);
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("\n    <Run>"));
        assert!(text.contains("<count type=\"long\" value=\"3\"/>"));
    }

    #[test]
    fn test_roundtrip_preserves_structure() {
        let mut root = Element::new("r");
        root.set_attribute("note", "a & b");
        let mut p = Element::new("p");
        p.push(Node::Text("x < y".into()));
        p.push(Node::Element(Element::new("q")));
        root.push(Node::Element(p));
        root.push(Node::Comment("remark".into()));

        let reparsed = read_document(to_string(&root).as_bytes()).unwrap();
        assert_eq!(reparsed.attribute("note"), Some("a & b"));
        let p = reparsed.child("p").unwrap();
        assert!(p.text().unwrap().contains("x < y"));
        assert!(p.child("q").is_some());
        assert!(reparsed
            .children
            .iter()
            .any(|n| matches!(n, Node::Comment(c) if c == "remark")));
    }
}
