//! Traversal hooks that swap reference nodes for the content they point at.

use std::sync::LazyLock;

use html5ever::interface::Attribute;
use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;
use tracing::debug;

use crate::core::{BundleError, Session};

use super::dom::{
    append_child, create_element_node, create_text_node, get_child_node_by_name, get_node_attr,
    get_node_name, html_to_dom, replace_node, set_node_attr,
};

// A source map directive is only valid at its original location; the bounds
// exclude occurrences inside string literals
static INLINE_SOURCE_MAP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^"]//# sourceMappingURL=.*[^"]"#).unwrap());

/// True for `<link>` nodes referencing an external stylesheet, in either the
/// `rel=stylesheet` or the `rel=import type=css` shape.
pub fn is_external_css_link(node: &Handle) -> bool {
    if get_node_name(node) != Some("link") {
        return false;
    }

    let href = get_node_attr(node, "href").unwrap_or_default();
    if href.is_empty() {
        return false;
    }

    let rel = get_node_attr(node, "rel").unwrap_or_default();
    if rel == "stylesheet" {
        return true;
    }

    let link_type = get_node_attr(node, "type").unwrap_or_default();
    rel == "import" && (link_type == "css" || link_type == "text/css")
}

/// Replaces `<link rel=import>` with the parsed document it references.
///
/// The referenced document is grafted into the outer tree as a whole
/// Document node; the flattening pass resolves the nesting later. Imports
/// that resolved to an already-inlined webpath collapse to an empty
/// placeholder instead, which is what makes repeated and cyclic imports
/// terminate.
pub fn visit_html_import(session: &mut Session, node: &Handle) -> Result<Handle, BundleError> {
    let href = get_node_attr(node, "href").unwrap_or_default();
    let webpath = session.current().resolve(&href);

    if !session.mark_inlined(webpath.clone()) {
        debug!("eliding repeated import of {}", webpath);
        return Ok(replace_node(node, create_text_node("")));
    }

    debug!("inlining import {}", webpath);
    let data = session.read_webfile(&webpath)?;
    session.push_context(webpath);

    let subdocument = html_to_dom(&data, "".to_string());

    // The link's attributes ride along on the imported document's root
    // element, where later passes still see them
    if let Some(html_node) = get_child_node_by_name(&subdocument.document, "html") {
        if let NodeData::Element { ref attrs, .. } = node.data {
            for attr in attrs.borrow().iter() {
                set_node_attr(&html_node, &attr.name.local, Some(attr.value.to_string()));
            }
        }
    }

    Ok(replace_node(node, subdocument.document))
}

/// Replaces a stylesheet link with a `<style>` element holding the raw text
/// of the referenced file.
pub fn visit_stylesheet(session: &mut Session, node: &Handle) -> Result<Handle, BundleError> {
    let href = get_node_attr(node, "href").unwrap_or_default();
    let webpath = session.current().resolve(&href);

    debug!("inlining stylesheet {}", webpath);
    let css = session.read_webfile(&webpath)?;

    let style_node = create_element_node("style", element_attrs_except(node, &["rel", "href"]));
    append_child(&style_node, &create_text_node(&String::from_utf8_lossy(&css)));

    Ok(replace_node(node, style_node))
}

/// Replaces `<script src=…>` with an inline `<script>` holding the processed
/// source text. Scripts without a `src` pass through untouched; either way
/// the first script seen this run is remembered so the loader bootstrap can
/// be inserted in front of it once traversal is done.
pub fn inline_script(session: &mut Session, node: &Handle) -> Result<Handle, BundleError> {
    let src = get_node_attr(node, "src").unwrap_or_default();

    let result = if src.is_empty() {
        node.clone()
    } else {
        let webpath = session.current().resolve(&src);

        debug!("inlining script {}", webpath);
        let data = session.read_webfile(&webpath)?;
        let mut code = String::from_utf8_lossy(&data).to_string();
        // A literal closing tag inside the source would end the element early
        code = code.replace("</script>", "<\\/script>");
        code = INLINE_SOURCE_MAP_PATTERN.replace_all(&code, "").to_string();

        let script_node = create_element_node("script", element_attrs_except(node, &["src"]));
        append_child(&script_node, &create_text_node(&code));
        replace_node(node, script_node)
    };

    if session.first_script.is_none() {
        session.first_script = Some(result.clone());
    }

    Ok(result)
}

fn element_attrs_except(node: &Handle, excluded: &[&str]) -> Vec<Attribute> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .filter(|attr| !excluded.contains(&attr.name.local.as_ref()))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}
