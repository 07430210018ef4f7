//! Collapses documents nested inside other documents (left behind by import
//! inlining) into one canonical head/body structure.

use html5ever::interface::QualName;
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::core::BundleError;

use super::dom::{
    append_child, clear_children, clone_node, create_comment_node, create_doctype_node,
    get_node_name, get_parent_node, node_is_blank_text, replace_node,
};
use super::serializer::serialize_node;

const MAX_CONTEXT_LEN: usize = 200;

/// Rebuilds `document` as a single HTML5 document with exactly one head and
/// one body, prefixed with a doctype.
///
/// Head-parented nodes are cloned into the destination head in encountered
/// order; every body's non-whitespace children move into the destination
/// body the same way. An import that ended up anywhere other than inside a
/// head cannot be folded into this shape and fails the run, naming the
/// parent of the offending node.
pub fn flatten_document(document: &Handle) -> Result<RcDom, BundleError> {
    let flat_dom = RcDom::default();

    append_child(&flat_dom.document, &create_doctype_node("html"));

    // Document-level comments carry the merged license notices; they come
    // along verbatim
    for child in document.children.borrow().iter() {
        if matches!(child.data, NodeData::Comment { .. }) {
            append_child(&flat_dom.document, &clone_node(child));
        }
    }

    let html_node = create_element(
        &flat_dom,
        QualName::new(None, ns!(), LocalName::from("html")),
        vec![],
    );
    let head_node = create_element(
        &flat_dom,
        QualName::new(None, ns!(), LocalName::from("head")),
        vec![],
    );
    let body_node = create_element(
        &flat_dom,
        QualName::new(None, ns!(), LocalName::from("body")),
        vec![],
    );
    append_child(&flat_dom.document, &html_node);
    append_child(&html_node, &head_node);
    append_child(&html_node, &body_node);

    copy_content(document, &head_node, &body_node);

    if let Some(nested) = find_nested_document(&flat_dom.document) {
        let context = match get_parent_node(&nested) {
            Some(parent) => {
                let preview = clone_node(&parent);
                scrub_nested_documents(&preview);
                truncate_markup(&serialize_node(&preview))
            }
            None => String::from("(detached)"),
        };
        return Err(BundleError::UnsupportedNesting { context });
    }

    Ok(flat_dom)
}

// Head-parented nodes are cloned wholesale; nested Document nodes are
// skipped here and traversed further instead, so only their head and body
// contents transfer. Bodies are emptied right after their children move,
// which keeps the continued walk from duplicating what was just copied.
fn copy_content(node: &Handle, dest_head: &Handle, dest_body: &Handle) {
    if let Some(parent) = get_parent_node(node) {
        if get_node_name(&parent) == Some("head") && !matches!(node.data, NodeData::Document) {
            append_child(dest_head, &clone_node(node));
        }
    }

    if get_node_name(node) == Some("body") {
        for child in node.children.borrow().iter() {
            if !node_is_blank_text(child) {
                append_child(dest_body, &clone_node(child));
            }
        }
        clear_children(node);
    }

    let children: Vec<Handle> = node.children.borrow().clone();
    for child in children.iter() {
        copy_content(child, dest_head, dest_body);
    }
}

fn find_nested_document(root: &Handle) -> Option<Handle> {
    for child in root.children.borrow().iter() {
        if matches!(child.data, NodeData::Document) {
            return Some(child.clone());
        }
        if let Some(found) = find_nested_document(child) {
            return Some(found);
        }
    }
    None
}

// The serializer refuses Document nodes mid-tree, so the diagnostic preview
// swaps them for markers first
fn scrub_nested_documents(node: &Handle) {
    let children: Vec<Handle> = node.children.borrow().clone();
    for child in children.iter() {
        if matches!(child.data, NodeData::Document) {
            replace_node(child, create_comment_node(" nested document "));
        } else {
            scrub_nested_documents(child);
        }
    }
}

fn truncate_markup(markup: &str) -> String {
    if markup.len() > MAX_CONTEXT_LEN {
        let mut end = MAX_CONTEXT_LEN;
        while !markup.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &markup[..end])
    } else {
        markup.to_string()
    }
}
