use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::{BundleError, Session};
use crate::utils::webpath::should_ignore_uri;

use super::dom::{get_next_sibling, get_node_attr, get_parent_node};
use super::inline::{inline_script, is_external_css_link, visit_html_import, visit_stylesheet};
use super::license::collect_license_comment;
use super::rootify::{rootify_attribute, ROOTIFIED_ATTRS};

/// Walks the tree from `root`, letting each visit return a replacement for
/// the node it is standing on. The cursor follows the returned handles, so a
/// hook may swap in a whole parsed subdocument (or an empty placeholder)
/// without derailing the traversal: a replacement with children is descended
/// into, while a leaf replacement is left immediately. Leaving a Document
/// node pops the resolution context.
pub fn transform(session: &mut Session, root: &Handle) -> Result<Handle, BundleError> {
    let mut root: Handle = root.clone();
    let mut node: Handle = root.clone();

    loop {
        let entered = enter_node(session, &node)?;
        if Rc::ptr_eq(&node, &root) {
            root = entered.clone();
        }
        node = entered;

        let first_child = node.children.borrow().first().cloned();
        if let Some(child) = first_child {
            node = child;
            continue;
        }

        loop {
            let left = leave_node(session, &node);
            if Rc::ptr_eq(&node, &root) {
                root = left.clone();
            }
            node = left;

            if Rc::ptr_eq(&node, &root) {
                return Ok(root);
            }

            if let Some(sibling) = get_next_sibling(&node) {
                node = sibling;
                break;
            }

            match get_parent_node(&node) {
                Some(parent) => node = parent,
                None => return Ok(root),
            }
        }
    }
}

fn enter_node(session: &mut Session, node: &Handle) -> Result<Handle, BundleError> {
    match node.data {
        NodeData::Element { ref name, .. } => {
            let mut replacement = node.clone();

            match name.local.as_ref() {
                "link" => {
                    let href = get_node_attr(node, "href").unwrap_or_default();

                    if is_external_css_link(node) && !should_ignore_uri(&href) {
                        replacement = visit_stylesheet(session, node)?;
                    } else if get_node_attr(node, "rel").unwrap_or_default() == "import"
                        && !should_ignore_uri(&href)
                    {
                        replacement = visit_html_import(session, node)?;
                    }
                }
                "script" => {
                    let src = get_node_attr(node, "src").unwrap_or_default();

                    if !should_ignore_uri(&src)
                        && get_node_attr(node, "data-no-inline").is_none()
                    {
                        replacement = inline_script(session, node)?;
                    }
                }
                _ => {}
            }

            // The replacement is rewritten too, so references the hooks just
            // brought in stay valid relative to the output location
            for attr_name in ROOTIFIED_ATTRS {
                rootify_attribute(session, &replacement, attr_name);
            }

            Ok(replacement)
        }
        NodeData::Comment { ref contents } => Ok(collect_license_comment(session, node, contents)),
        _ => Ok(node.clone()),
    }
}

fn leave_node(session: &mut Session, node: &Handle) -> Handle {
    if let NodeData::Document = node.data {
        session.pop_context();
    }
    node.clone()
}
