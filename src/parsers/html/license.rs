//! Collects `@license` comments into one merged notice and drops the rest.

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::core::Session;

use super::dom::{create_comment_node, create_text_node, replace_node};

/// Visits a comment node: the first `@license` comment of the run becomes
/// the anchor that later receives the merged text, every other comment
/// (licensed or not) is removed. License texts are registered in first-seen
/// order, deduplicated by their whitespace-stripped form.
pub fn collect_license_comment(session: &mut Session, node: &Handle, text: &str) -> Handle {
    if text.contains("@license") {
        session.register_license(text);

        if session.license_comment.is_none() {
            session.license_comment = Some(node.clone());
            node.clone()
        } else {
            replace_node(node, create_text_node(""))
        }
    } else {
        replace_node(node, create_text_node(""))
    }
}

/// Overwrites the anchor comment with every registered license, separated by
/// blank lines. Runs once, after the full tree walk.
pub fn merge_licenses(session: &mut Session) {
    if let Some(anchor) = session.license_comment.take() {
        debug!("merging {} unique license notice(s)", session.licenses.len());
        let merged = format!("\n{}\n", session.licenses.join("\n\n"));
        replace_node(&anchor, create_comment_node(&merged));
    }
}
