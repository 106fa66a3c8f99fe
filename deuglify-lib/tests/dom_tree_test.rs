use deuglify_lib::dom::dom_tree::{self, Handle, NodeData};
use deuglify_lib::parser::deuglify_html::create_dom_tree;
use deuglify_lib::parser::serialize::{serialize_document, serialize_handle};
use pretty_assertions::assert_eq;

fn collect_structure(node: &Handle) -> String {
    let mut output = String::new();
    traverse_node(node, 0, &mut output);
    output
}

fn traverse_node(node: &Handle, depth: usize, output: &mut String) {
    let node_ref = node.borrow();
    match &node_ref.data {
        NodeData::DocumentRoot => {
            for child in &node_ref.children {
                traverse_node(child, depth, output);
            }
            return;
        }
        NodeData::Element(elem) => {
            *output += &format!("{}<{}>\n", "  ".repeat(depth), elem.tag);
        }
        NodeData::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                *output += &format!("{}\"{}\"\n", "  ".repeat(depth), trimmed);
            }
        }
        NodeData::Comment(_) | NodeData::ProcessingInstruction { .. } => {}
    }
    for child in &node_ref.children {
        traverse_node(child, depth + 1, output);
    }
}

#[test]
fn test_fragment_gets_implied_structure() {
    let document = create_dom_tree("<p class=\"x\">Hello <b>world</b></p>");

    assert_eq!(
        collect_structure(&document.root),
        "<html>\n  <head>\n  <body>\n    <p>\n      \"Hello\"\n      <b>\n        \"world\"\n"
    );
}

#[test]
fn test_void_elements_and_comments_survive_serialization() {
    let html = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
                <body><!-- keep --><img src=\"a.png\" class=\"q\"><br>tail</body></html>";
    let document = create_dom_tree(html);

    assert_eq!(serialize_document(&document).unwrap(), html);
}

#[test]
fn test_class_list_edits_are_serialized() {
    let document = create_dom_tree("<div id=\"d\" class=\"a   b\">x</div>");
    let div = {
        let html = document.root.borrow().children[0].clone();
        let body = html.borrow().children[1].clone();
        let div = body.borrow().children[0].clone();
        div
    };

    {
        let mut node = div.borrow_mut();
        let elem = node.as_element_mut().unwrap();
        assert_eq!(elem.class_list(), vec!["a".to_string(), "b".to_string()]);
        elem.set_class_list(&["mt-4".to_string(), "md:flex".to_string()]);
    }

    assert_eq!(
        serialize_handle(&div).unwrap(),
        "<div id=\"d\" class=\"mt-4 md:flex\">x</div>"
    );
}

#[test]
fn test_style_text_is_not_escaped() {
    let document = create_dom_tree("<html><head></head><body></body></html>");
    let head = document.root.borrow().children[0].borrow().children[0].clone();

    let style = dom_tree::create_element(dom_tree::ElementNode::html("style"));
    dom_tree::set_text_content(&style, r".md\:flex>a{content:'&'}");
    dom_tree::append_child(&head, style);

    assert_eq!(
        serialize_document(&document).unwrap(),
        r"<html><head><style>.md\:flex>a{content:'&'}</style></head><body></body></html>"
    );
}

#[test]
fn test_deep_nesting_does_not_lose_text() {
    let mut html = String::new();
    for _ in 0..200 {
        html.push_str("<div>");
    }
    html.push_str("Content");
    for _ in 0..200 {
        html.push_str("</div>");
    }

    let document = create_dom_tree(&html);
    let body = document.root.borrow().children[0].borrow().children[1].clone();
    assert_eq!(dom_tree::text_content(&body), "Content");
}
