use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// Parses HTML bytes into a DOM, decoding with the given charset label when
/// one is known to encoding_rs.
pub fn html_to_dom(data: &[u8], document_encoding: String) -> RcDom {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .unwrap()
}

/// Collects elements matching a tag-name path, e.g. `["html", "head"]`;
/// non-element nodes along the way are traversed transparently.
pub fn find_nodes(node: &Handle, node_names: Vec<&str>) -> Vec<Handle> {
    assert!(!node_names.is_empty());

    let mut found_nodes = Vec::new();
    let node_name = node_names[0];

    if node_names.len() == 1 {
        if let NodeData::Element { ref name, .. } = node.data {
            if &*name.local == node_name {
                found_nodes.push(node.clone());
            }
        }

        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    } else if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            let mut new_node_names = node_names;
            new_node_names.remove(0);
            found_nodes.append(&mut find_nodes(node, new_node_names));
        } else {
            for child_node in node.children.borrow().iter() {
                found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
            }
        }
    } else {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    }

    found_nodes
}

pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Sets, overwrites, or (with `None`) removes an attribute.
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    let _ = &attrs_mut[i].value.clear();
                    let _ = &attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            // Add new attribute (since originally the target node didn't have it)
            if let Some(attr_value) = attr_value.clone() {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// Parent of a node, if it is attached; the weak pointer cell is restored
/// after reading so repeated lookups keep working.
pub fn get_parent_node(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|weak| weak.upgrade());
    node.parent.set(weak);
    parent
}

pub fn get_next_sibling(node: &Handle) -> Option<Handle> {
    let parent = get_parent_node(node)?;
    let children = parent.children.borrow();
    let position = children.iter().position(|child| Rc::ptr_eq(child, node))?;
    children.get(position + 1).cloned()
}

/// Swaps `new_node` into `old_node`'s child slot and detaches `old_node`.
/// Returns the replacement, so a traversal can continue from it.
pub fn replace_node(old_node: &Handle, new_node: Handle) -> Handle {
    if let Some(parent) = get_parent_node(old_node) {
        let mut children = parent.children.borrow_mut();
        if let Some(position) = children.iter().position(|child| Rc::ptr_eq(child, old_node)) {
            new_node.parent.set(Some(Rc::downgrade(&parent)));
            old_node.parent.set(None);
            children[position] = new_node.clone();
        }
    }
    new_node
}

pub fn append_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

pub fn insert_before(sibling: &Handle, new_node: &Handle) {
    if let Some(parent) = get_parent_node(sibling) {
        let mut children = parent.children.borrow_mut();
        if let Some(position) = children.iter().position(|child| Rc::ptr_eq(child, sibling)) {
            new_node.parent.set(Some(Rc::downgrade(&parent)));
            children.insert(position, new_node.clone());
        }
    }
}

pub fn detach_node(node: &Handle) {
    if let Some(parent) = get_parent_node(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
        node.parent.set(None);
    }
}

pub fn clear_children(node: &Handle) {
    for child in node.children.borrow_mut().drain(..) {
        child.parent.set(None);
    }
}

/// Deep copy sharing no mutable state with the original; `<template>`
/// contents are copied along.
pub fn clone_node(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(clone_node)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => NodeData::ProcessingInstruction {
            target: target.clone(),
            contents: contents.clone(),
        },
    };

    let clone = Node::new(data);
    for child in node.children.borrow().iter() {
        append_child(&clone, &clone_node(child));
    }
    clone
}

pub fn create_element_node(name: &str, attrs: Vec<Attribute>) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

pub fn create_text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

pub fn create_comment_node(text: &str) -> Handle {
    Node::new(NodeData::Comment {
        contents: StrTendril::from(text),
    })
}

pub fn create_doctype_node(name: &str) -> Handle {
    Node::new(NodeData::Doctype {
        name: StrTendril::from(name),
        public_id: StrTendril::new(),
        system_id: StrTendril::new(),
    })
}

pub fn node_is_blank_text(node: &Handle) -> bool {
    match node.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}
