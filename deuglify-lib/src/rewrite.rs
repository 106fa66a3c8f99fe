//! Applies a class map to a document: class attributes are rewritten to the
//! canonical names and the document's inline styles are replaced by one
//! `<style>` element.

use crate::dom::dom_tree::{self, Document, ElementNode, Handle};
use crate::error::{DeuglifyError, Result};
use crate::parser::dom_indices::DomIndices;
use crate::parser::serialize::serialize_document;
use crate::style::class_mapper::ClassMap;
use log::debug;

/// The document operations the rewriter needs.
pub trait StyledDocument {
    type Element;

    /// Elements that carry a `class` attribute, in document order.
    fn classed_elements(&self) -> Vec<Self::Element>;

    fn class_list(&self, element: &Self::Element) -> Vec<String>;

    fn set_class_list(&mut self, element: &Self::Element, classes: &[String]);

    /// Text of every `<style>` element, in document order.
    fn style_blocks(&self) -> Vec<String>;

    /// Removes every `<style>` element and appends a single new one holding
    /// `css` to the document head.
    fn replace_style_blocks(&mut self, css: &str) -> Result<()>;

    fn serialize(&self) -> Result<String>;
}

impl StyledDocument for Document {
    type Element = Handle;

    fn classed_elements(&self) -> Vec<Handle> {
        DomIndices::build(self).classed
    }

    fn class_list(&self, element: &Handle) -> Vec<String> {
        element
            .borrow()
            .as_element()
            .map(ElementNode::class_list)
            .unwrap_or_default()
    }

    fn set_class_list(&mut self, element: &Handle, classes: &[String]) {
        if let Some(elem) = element.borrow_mut().as_element_mut() {
            elem.set_class_list(classes);
        }
    }

    fn style_blocks(&self) -> Vec<String> {
        DomIndices::build(self)
            .by_tag("style")
            .iter()
            .map(dom_tree::text_content)
            .collect()
    }

    fn replace_style_blocks(&mut self, css: &str) -> Result<()> {
        let indices = DomIndices::build(self);
        let head = indices
            .by_tag("head")
            .first()
            .cloned()
            .ok_or(DeuglifyError::MissingHead)?;

        for style in indices.by_tag("style") {
            dom_tree::detach(style);
        }

        let style = dom_tree::create_element(ElementNode::html("style"));
        dom_tree::set_text_content(&style, css);
        dom_tree::append_child(&head, style);
        Ok(())
    }

    fn serialize(&self) -> Result<String> {
        serialize_document(self)
    }
}

/// Maps each token through `map`, keeping unknown tokens and the order.
pub fn rewrite_class_list(classes: &[String], map: &ClassMap) -> Vec<String> {
    classes
        .iter()
        .map(|class| match map.get(class) {
            Some(descriptor) => descriptor.class_name(),
            None => class.clone(),
        })
        .collect()
}

/// Rewrites every class list in `document` and installs `stylesheet` as its
/// only inline style. Returns how many class tokens were replaced.
pub fn rewrite_document<D: StyledDocument>(
    document: &mut D,
    map: &ClassMap,
    stylesheet: &str,
) -> Result<usize> {
    let mut replaced = 0;

    for element in document.classed_elements() {
        let classes = document.class_list(&element);
        if classes.is_empty() {
            continue;
        }
        let rewritten = rewrite_class_list(&classes, map);
        replaced += classes
            .iter()
            .filter(|class| map.contains(class.as_str()))
            .count();
        document.set_class_list(&element, &rewritten);
    }

    document.replace_style_blocks(stylesheet)?;
    debug!("Replaced {} class tokens", replaced);
    Ok(replaced)
}
