use std::collections::HashMap;

use crate::dom::dom_tree::{Document, Handle, NodeData};

/// Lookup tables over one parsed document.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Maps a lowercase tag name (e.g., "style") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<Handle>>,
    /// Every element carrying a `class` attribute, in document order.
    pub classed: Vec<Handle>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        Self::traverse(&document.root, &mut indices);
        indices
    }

    /// All elements with the given tag, in document order.
    pub fn by_tag(&self, tag: &str) -> &[Handle] {
        self.tag_map
            .get(&tag.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Recursively traverse the DOM tree and populate the indices.
    fn traverse(node: &Handle, indices: &mut DomIndices) {
        let node_ref = node.borrow();
        if let NodeData::Element(elem) = &node_ref.data {
            indices
                .tag_map
                .entry(elem.tag.to_lowercase())
                .or_default()
                .push(Handle::clone(node));

            if elem.attr("class").is_some() {
                indices.classed.push(Handle::clone(node));
            }
        }
        for child in &node_ref.children {
            Self::traverse(child, indices);
        }
    }
}
