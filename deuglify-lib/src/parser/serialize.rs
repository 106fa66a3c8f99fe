//! Writes a `dom_tree::Document` back out as HTML through html5ever's
//! serializer, which takes care of escaping and void elements.

use crate::dom::dom_tree::{Document, Handle, NodeData};
use crate::error::{DeuglifyError, Result};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use std::io;

/// Serializable view of one node and its subtree.
pub struct SerializableHandle<'a>(&'a Handle);

fn serialize_node<S: Serializer>(handle: &Handle, serializer: &mut S) -> io::Result<()> {
    let node = handle.borrow();
    match &node.data {
        NodeData::Element(elem) => {
            serializer.start_elem(
                elem.qual_name.clone(),
                elem.attributes.iter().map(|(name, value)| (name, value.as_str())),
            )?;
            for child in &node.children {
                serialize_node(child, serializer)?;
            }
            serializer.end_elem(elem.qual_name.clone())
        }
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::ProcessingInstruction { target, data } => {
            serializer.write_processing_instruction(target, data)
        }
        NodeData::DocumentRoot => {
            for child in &node.children {
                serialize_node(child, serializer)?;
            }
            Ok(())
        }
    }
}

impl Serialize for SerializableHandle<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_node(self.0, serializer),
            TraversalScope::ChildrenOnly(_) => {
                for child in &self.0.borrow().children {
                    serialize_node(child, serializer)?;
                }
                Ok(())
            }
        }
    }
}

/// The whole document: doctype first, then the tree.
struct SerializableDocument<'a>(&'a Document);

impl Serialize for SerializableDocument<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        if let Some(doctype) = &*self.0.doctype.borrow() {
            serializer.write_doctype(&doctype.name)?;
        }
        SerializableHandle(&self.0.root).serialize(serializer, traversal_scope)
    }
}

/// Serializes the document to an HTML string.
pub fn serialize_document(document: &Document) -> Result<String> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut bytes, &SerializableDocument(document), opts).map_err(DeuglifyError::Serialize)?;
    String::from_utf8(bytes).map_err(|e| DeuglifyError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Serializes a single node, including the node itself.
pub fn serialize_handle(handle: &Handle) -> Result<String> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut bytes, &SerializableHandle(handle), opts).map_err(DeuglifyError::Serialize)?;
    String::from_utf8(bytes).map_err(|e| DeuglifyError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::deuglify_html::create_dom_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_round_trip() {
        let html = "<!DOCTYPE html><html><head><style>.a>.b{color:red}</style></head>\
                    <body><!-- note --><div id=\"x\" class=\"a b\">1 &lt; 2<br></div></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(serialize_document(&document).unwrap(), html);
    }

    #[test]
    fn test_missing_structure_is_filled_in() {
        let document = create_dom_tree("<p class=\"a\">hi</p>");
        assert_eq!(
            serialize_document(&document).unwrap(),
            "<html><head></head><body><p class=\"a\">hi</p></body></html>"
        );
    }

    #[test]
    fn test_single_node() {
        let document = create_dom_tree("<p class=\"a\">hi</p>");
        let html = document.root.borrow().children[0].clone();
        let body = html.borrow().children[1].clone();
        assert_eq!(serialize_handle(&body).unwrap(), "<body><p class=\"a\">hi</p></body>");
    }
}
