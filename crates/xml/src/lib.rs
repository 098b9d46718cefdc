//! XML serializer for output trees.
//!
//! Identical trees always render to identical bytes. The `pretty` flag only
//! adds indentation; element and attribute order come from the tree.

use icsr_tree::OutputNode;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{Cursor, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("Failed to write XML: {0}")]
    Write(String),

    #[error("Rendered XML is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Renders `root` as a UTF-8 XML document with a declaration.
pub fn render(root: &OutputNode, pretty: bool) -> Result<Vec<u8>, XmlError> {
    let mut writer = if pretty {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| XmlError::Write(format!("declaration: {}", e)))?;
    write_node(&mut writer, root)?;

    let mut bytes = writer.into_inner().into_inner();
    if pretty {
        bytes.push(b'\n');
    }
    log::debug!("Rendered <{}> to {} bytes", root.name, bytes.len());
    Ok(bytes)
}

/// Like [`render`], returning a `String`.
pub fn render_to_string(root: &OutputNode, pretty: bool) -> Result<String, XmlError> {
    String::from_utf8(render(root, pretty)?).map_err(|e| XmlError::Encoding(e.to_string()))
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &OutputNode) -> Result<(), XmlError> {
    let mut start = BytesStart::new(node.name.as_str());
    for attribute in &node.attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Write(format!("<{}/>: {}", node.name, e)));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Write(format!("<{}>: {}", node.name, e)))?;

    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| XmlError::Write(format!("text of <{}>: {}", node.name, e)))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(|e| XmlError::Write(format!("</{}>: {}", node.name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutputNode {
        OutputNode::new("doc")
            .with_attribute("xmlns", "urn:test")
            .with_child(
                OutputNode::new("id")
                    .with_attribute("extension", "A&B")
                    .with_attribute("root", "1.2"),
            )
            .with_child(OutputNode::new("text").with_text("x < y"))
    }

    #[test]
    fn compact_output_is_exact() {
        let xml = render_to_string(&sample(), false).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><doc xmlns="urn:test"><id extension="A&amp;B" root="1.2"/><text>x &lt; y</text></doc>"#
        );
    }

    #[test]
    fn pretty_output_parses_to_same_content() {
        let pretty = render_to_string(&sample(), true).unwrap();
        assert!(pretty.contains("\n  <id"));

        let doc = roxmltree::Document::parse(&pretty).unwrap();
        let root = doc.root_element();
        let id = root.children().find(|n| n.has_tag_name("id")).unwrap();
        assert_eq!(id.attribute("extension"), Some("A&B"));
        let text = root.children().find(|n| n.has_tag_name("text")).unwrap();
        assert_eq!(text.text(), Some("x < y"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render(&sample(), true).unwrap(), render(&sample(), true).unwrap());
        assert_eq!(render(&sample(), false).unwrap(), render(&sample(), false).unwrap());
    }
}
