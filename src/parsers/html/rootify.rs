use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::core::Session;
use crate::utils::webpath::{is_absolute_uri, should_ignore_uri, Webpath};

use super::dom::{get_node_attr, set_node_attr};

/// Reference attributes that get rewritten relative to the output location.
pub const ROOTIFIED_ATTRS: &[&str] = &["href", "src", "action", "assetpath"];

/// Rewrites a reference attribute so it stays valid once bundling has moved
/// its surroundings: the value is resolved against the current document,
/// and, if the manifest knows the result, replaced with a path relative to
/// the output document's own directory. Everything else is left alone.
pub fn rootify_attribute(session: &Session, node: &Handle, attr_name: &str) {
    let value = get_node_attr(node, attr_name).unwrap_or_default();
    if value.is_empty() || should_ignore_uri(&value) {
        return;
    }

    let absolute = if is_absolute_uri(&value) {
        Webpath::new(&value)
    } else {
        session.current().resolve(&value)
    };

    if session.manifest.contains(&absolute) {
        let relative = session.output_path().parent().relativize(&absolute);
        debug!("rootifying {}=\"{}\" to \"{}\"", attr_name, value, relative);
        set_node_attr(node, attr_name, Some(relative.to_string()));
    }
}
