use html5ever::{LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    pub type Handle = Rc<RefCell<Node>>;
    pub type WeakHandle = Weak<RefCell<Node>>;

    pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

    #[derive(Debug)]
    pub struct Node {
        pub data: NodeData,
        pub parent: Option<WeakHandle>,
        pub children: Vec<Handle>,
    }

    #[derive(Debug, Clone)]
    pub enum NodeData {
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
        ProcessingInstruction { target: String, data: String },
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// In source order; serialization writes them back in this order.
        pub attributes: Vec<(QualName, String)>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> Handle {
            Rc::new(RefCell::new(Node {
                data,
                parent: None,
                children: Vec::new(),
            }))
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
            match &mut self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: Vec::new(),
            }
        }

        /// An element in the HTML namespace, e.g. a fresh `<style>`.
        pub fn html(tag: &str) -> Self {
            let qual_name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
            ElementNode::new(tag.to_string(), qual_name)
        }

        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(k, _)| (*k.local).eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        /// Replaces the value of `name`, adding the attribute if missing.
        pub fn set_attr(&mut self, name: &str, value: String) {
            match self
                .attributes
                .iter_mut()
                .find(|(k, _)| (*k.local).eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value,
                None => {
                    let key = QualName::new(None, Namespace::from(""), LocalName::from(name));
                    self.attributes.push((key, value));
                }
            }
        }

        pub fn class_list(&self) -> Vec<String> {
            self.attr("class")
                .map(|classes| classes.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        }

        pub fn set_class_list(&mut self, classes: &[String]) {
            self.set_attr("class", classes.join(" "));
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
        }
    }

    pub fn create_element(elem: ElementNode) -> Handle {
        Node::new(NodeData::Element(elem))
    }

    /// Unlinks `child` from its parent, if it has one.
    pub fn detach(child: &Handle) {
        let parent = child.borrow_mut().parent.take().and_then(|weak| weak.upgrade());
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|sibling| !Rc::ptr_eq(sibling, child));
        }
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(parent: &Handle, child: Handle) {
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Moves `child` directly before `sibling`. Does nothing if `sibling`
    /// has no parent.
    pub fn insert_before(sibling: &Handle, child: Handle) {
        let Some(parent) = sibling.borrow().parent.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        detach(&child);
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        let mut parent_node = parent.borrow_mut();
        let index = parent_node
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(node: &Handle) -> String {
        let mut text = String::new();
        collect_text(node, &mut text);
        text
    }

    fn collect_text(node: &Handle, out: &mut String) {
        let node = node.borrow();
        if let NodeData::Text(text) = &node.data {
            out.push_str(text);
        }
        for child in &node.children {
            collect_text(child, out);
        }
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text_content(node: &Handle, text: &str) {
        let children = std::mem::take(&mut node.borrow_mut().children);
        for child in children {
            child.borrow_mut().parent = None;
        }
        append_child(node, Node::new(NodeData::Text(text.to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::dom_tree::*;
    use std::rc::Rc;

    #[test]
    fn test_append_and_detach_keep_parent_links() {
        let doc = new_document();
        let div = create_element(ElementNode::html("div"));
        let span = create_element(ElementNode::html("span"));

        append_child(&doc.root, div.clone());
        append_child(&div, span.clone());
        assert!(Rc::ptr_eq(
            &span.borrow().parent.as_ref().unwrap().upgrade().unwrap(),
            &div
        ));

        // Re-appending moves the node instead of duplicating it.
        append_child(&doc.root, span.clone());
        assert!(div.borrow().children.is_empty());
        assert_eq!(doc.root.borrow().children.len(), 2);

        detach(&span);
        assert_eq!(doc.root.borrow().children.len(), 1);
        assert!(span.borrow().parent.is_none());
    }

    #[test]
    fn test_insert_before() {
        let doc = new_document();
        let a = create_element(ElementNode::html("a"));
        let b = create_element(ElementNode::html("b"));
        append_child(&doc.root, b.clone());
        insert_before(&b, a.clone());

        let tags: Vec<String> = doc
            .root
            .borrow()
            .children
            .iter()
            .map(|c| c.borrow().as_element().unwrap().tag.clone())
            .collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_class_list_round_trip() {
        let mut elem = ElementNode::html("div");
        assert!(elem.class_list().is_empty());

        elem.set_attr("class", "  a   b c ".to_string());
        assert_eq!(elem.class_list(), vec!["a", "b", "c"]);

        elem.set_class_list(&["x".to_string(), "y".to_string()]);
        assert_eq!(elem.attr("class"), Some("x y"));
        assert_eq!(elem.attributes.len(), 1);
    }

    #[test]
    fn test_attribute_names_match_case_insensitively() {
        let mut elem = ElementNode::html("div");
        elem.set_attr("class", "a".to_string());

        assert_eq!(elem.attr("CLASS"), Some("a"));
        elem.set_attr("Class", "b".to_string());
        assert_eq!(elem.attr("class"), Some("b"));
        assert_eq!(elem.attributes.len(), 1);
    }

    #[test]
    fn test_text_content_and_replacement() {
        let style = create_element(ElementNode::html("style"));
        append_child(&style, Node::new(NodeData::Text(".a{".into())));
        append_child(&style, Node::new(NodeData::Text("color:red}".into())));
        assert_eq!(text_content(&style), ".a{color:red}");

        set_text_content(&style, ".b{}");
        assert_eq!(style.borrow().children.len(), 1);
        assert_eq!(text_content(&style), ".b{}");
    }
}
