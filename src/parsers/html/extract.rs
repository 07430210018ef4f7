//! Pulls script content out of the bundled tree into a separate artifact.

use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;

use crate::core::{BundleError, Session};
use crate::utils::webpath::{is_absolute_uri, Webpath};

use super::dom::{
    append_child, create_element_node, detach_node, find_nodes, get_node_attr, set_node_attr,
};
use super::serializer::serialize_node;

/// Collects every script body in document order into one blob, one body per
/// line, removing the elements as it goes. Scripts without a `src`
/// contribute their inline text; on-manifest references contribute their
/// file content. The tree keeps a single loader element referencing
/// `js_path` as the last child of its final body.
///
/// External references survive only when marked `defer` or `async`, and are
/// skipped silently. A blocking external reference fails the run, as does a
/// relative reference the manifest cannot back.
pub fn extract_scripts(
    session: &Session,
    document: &Handle,
    js_path: &Webpath,
) -> Result<String, BundleError> {
    let mut sources = String::new();

    for script_node in find_nodes(document, vec!["html", "script"]) {
        let src = get_node_attr(&script_node, "src").unwrap_or_default();

        let source_content: String = if src.is_empty() {
            inline_text(&script_node)
        } else {
            // References were rootified during traversal, so they resolve
            // from the root
            let webpath = Webpath::root().resolve(&src);

            if session.manifest.contains(&webpath) {
                String::from_utf8_lossy(&session.read_webfile(&webpath)?).to_string()
            } else if is_absolute_uri(&src) {
                if get_node_attr(&script_node, "defer").is_some()
                    || get_node_attr(&script_node, "async").is_some()
                {
                    debug!("leaving deferred remote script {} in place", src);
                    continue;
                }
                return Err(BundleError::BlockingRemoteScript {
                    src,
                    context: serialize_node(&script_node),
                });
            } else {
                return Err(BundleError::UnresolvedReference {
                    path: webpath,
                    referrer: session.current().clone(),
                });
            }
        };

        sources.push_str(&source_content);
        sources.push('\n');
        detach_node(&script_node);
    }

    if let Some(last_body) = find_nodes(document, vec!["html", "body"]).last() {
        let loader_node = create_element_node("script", vec![]);
        set_node_attr(
            &loader_node,
            "src",
            Some(js_path.strip_leading_slash().to_string()),
        );
        append_child(last_body, &loader_node);
    }

    Ok(sources)
}

fn inline_text(node: &Handle) -> String {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            text.push_str(&contents.borrow());
        }
    }
    text
}
