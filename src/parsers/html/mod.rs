//! HTML processing: DOM utilities, the mutation-aware tree walker, the
//! inlining/rewriting hooks it drives, and the post-traversal passes.
//!
//! - `dom`: parsing and node-level operations
//! - `walker`: replacement-tolerant traversal
//! - `inline`: import, stylesheet and script inlining hooks
//! - `license`: legal-notice collection and merging
//! - `rootify`: reference-attribute rewriting
//! - `extract`: script extraction into a separate artifact
//! - `flatten`: collapsing nested documents into one head/body
//! - `serializer`: markup output

pub mod dom;
pub mod extract;
pub mod flatten;
pub mod inline;
pub mod license;
pub mod rootify;
pub mod serializer;
pub mod walker;

// Re-export the main public API
pub use dom::{
    find_nodes, get_child_node_by_name, get_node_attr, get_node_name, get_parent_node,
    html_to_dom, set_node_attr,
};
pub use extract::extract_scripts;
pub use flatten::flatten_document;
pub use serializer::serialize_document;
pub use walker::transform;
