//! This module contains functions and types for parsing HTML into a custom DOM tree.
//!
//! It uses html5ever as the HTML parser and builds a DOM tree defined in the
//! `crate::dom::dom_tree` module.

use crate::dom::dom_tree::{self, ElementNode, Handle, Node, NodeData};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use log::debug;
use std::borrow::Cow;
use std::rc::Rc;

/// Creates a DOM tree from the provided HTML content.
///
/// # Arguments
///
/// * `html_content` - A string slice containing the HTML to parse.
///
/// # Returns
///
/// A `dom_tree::Document` representing the parsed HTML.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = DeuglifyTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// A custom TreeSink for building the DOM tree used by the parser.
///
/// It holds the Document being built; parent links live in the nodes.
pub struct DeuglifyTreeSink {
    document: dom_tree::Document,
}

impl DeuglifyTreeSink {
    /// Creates a new `DeuglifyTreeSink` with an empty document.
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
        }
    }
}

impl Default for DeuglifyTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned element name handed back to the tree builder.
#[derive(Debug)]
pub struct DeuglifyElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for DeuglifyElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

/// Appends text to the last child when that child is already a text node.
/// Returns the text back when it could not be merged.
fn merge_text(last: Option<&Handle>, text: StrTendril) -> Option<StrTendril> {
    if let Some(last) = last {
        if let NodeData::Text(existing) = &mut last.borrow_mut().data {
            existing.push_str(&text);
            return None;
        }
    }
    Some(text)
}

impl TreeSink for DeuglifyTreeSink {
    type Handle = Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = DeuglifyElemName
    where
        Self: 'a;

    /// Finalizes and returns the constructed Document.
    fn finish(self) -> Self::Output {
        self.document
    }

    /// html5ever reports every recoverable syntax error here; the tree it
    /// builds is still usable, so they are only logged.
    fn parse_error(&self, msg: Cow<'static, str>) {
        debug!("HTML parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &target.borrow().data {
            NodeData::Element(elem) => DeuglifyElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            _ => panic!("elem_name called on non-element node"),
        }
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> Self::Handle {
        let mut element = ElementNode::new(name.local.to_string(), name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name, attr.value.to_string()))
            .collect();
        dom_tree::create_element(element)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::append_child(parent, node),
            NodeOrText::AppendText(text) => {
                let last = parent.borrow().children.last().cloned();
                if let Some(text) = merge_text(last.as_ref(), text) {
                    dom_tree::append_child(parent, Node::new(NodeData::Text(text.to_string())));
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.borrow().parent.is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Template contents are kept as ordinary children of the template.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    /// Quirks mode does not affect class rewriting.
    fn set_quirks_mode(&self, mode: QuirksMode) {
        debug!("Document quirks mode: {:?}", mode);
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom_tree::insert_before(sibling, node),
            NodeOrText::AppendText(text) => {
                let previous = {
                    let sibling_node = sibling.borrow();
                    let parent = sibling_node.parent.as_ref().and_then(|p| p.upgrade());
                    parent.and_then(|parent| {
                        let parent = parent.borrow();
                        let index = parent.children.iter().position(|c| Rc::ptr_eq(c, sibling))?;
                        index.checked_sub(1).map(|i| parent.children[i].clone())
                    })
                };
                if let Some(text) = merge_text(previous.as_ref(), text) {
                    dom_tree::insert_before(sibling, Node::new(NodeData::Text(text.to_string())));
                }
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut target_node = target.borrow_mut();
        if let Some(elem) = target_node.as_element_mut() {
            for attr in attrs {
                if !elem.attributes.iter().any(|(k, _)| *k == attr.name) {
                    elem.attributes.push((attr.name, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in children {
            child.borrow_mut().parent = None;
            dom_tree::append_child(new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect_structure(node: &Handle, depth: usize, output: &mut String) {
        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::Element(elem) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), elem.tag);
                for child in &node_ref.children {
                    collect_structure(child, depth + 1, output);
                }
            }
            NodeData::Text(text) if !text.trim().is_empty() => {
                *output += &format!("{}{}\n", "  ".repeat(depth), text.trim());
            }
            NodeData::DocumentRoot => {
                for child in &node_ref.children {
                    collect_structure(child, depth, output);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_basic_structure() {
        let document = create_dom_tree(
            "<!DOCTYPE html><html><head><title>Test</title></head><body><h1>Hello</h1><p>World</p></body></html>",
        );
        let mut structure = String::new();
        collect_structure(&document.root, 0, &mut structure);

        let expected = "\
<html>
  <head>
    <title>
      Test
  <body>
    <h1>
      Hello
    <p>
      World
";
        assert_eq!(structure, expected);
        assert_eq!(document.doctype.borrow().as_ref().map(|d| d.name.clone()), Some("html".to_string()));
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let document = create_dom_tree(r#"<a href="/x" class="a b" data-test="1">Link</a>"#);
        let html = document.root.borrow().children[0].clone();
        let body = html.borrow().children[1].clone();
        let link = body.borrow().children[0].clone();

        let link = link.borrow();
        let names: Vec<String> = link
            .as_element()
            .unwrap()
            .attributes
            .iter()
            .map(|(k, _)| k.local.to_string())
            .collect();
        assert_eq!(names, vec!["href", "class", "data-test"]);
        assert_eq!(link.as_element().unwrap().class_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        // The adoption agency algorithm moves nodes around via
        // remove_from_parent / reparent_children.
        let document = create_dom_tree("<p><b>one<i>two</b>three</i></p>");
        let mut structure = String::new();
        collect_structure(&document.root, 0, &mut structure);

        assert!(structure.contains("<b>"));
        assert!(structure.contains("three"));
        assert_eq!(structure.matches("<p>").count(), 1);
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let document = create_dom_tree("<style>.a{}</style>");
        let html = document.root.borrow().children[0].clone();
        let head = html.borrow().children[0].clone();
        let style = head.borrow().children[0].clone();
        assert_eq!(style.borrow().children.len(), 1);
        assert_eq!(dom_tree::text_content(&style), ".a{}");
    }
}
