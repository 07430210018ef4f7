use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use markup5ever_rcdom::Handle;
use thiserror::Error;
use tracing::info;

use crate::manifest::Manifest;
use crate::parsers::html::dom::{
    append_child, create_element_node, create_text_node, html_to_dom, insert_before,
};
use crate::parsers::html::extract::extract_scripts;
use crate::parsers::html::flatten::flatten_document;
use crate::parsers::html::license::merge_licenses;
use crate::parsers::html::serializer::serialize_document;
use crate::parsers::html::walker::transform;
use crate::utils::webpath::Webpath;

pub const ANSI_COLOR_RED: &str = "\x1b[31m";
pub const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Errors that can abort a bundling run.
///
/// Every variant is fatal: the run is a deterministic all-or-nothing batch
/// transformation, so nothing is retried and no output is committed once any
/// of these occur.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("no manifest entry for {path} (referenced from {referrer})")]
    UnresolvedReference { path: Webpath, referrer: Webpath },

    #[error("nested document outside of a head is not supported; parent of offending node: {context}")]
    UnsupportedNesting { context: String },

    #[error("script refers to a remote resource ({src}) in a blocking way; for correctness of execution, make sure it is async-able or defer-able: {context}")]
    BlockingRemoteScript { src: String, context: String },

    #[error("unable to read {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {}: {detail}", .path.display())]
    Manifest { path: PathBuf, detail: String },
}

/// Configuration for one bundling run.
#[derive(Clone, Debug, Default)]
pub struct BundleOptions {
    /// Logical path of the document to bundle.
    pub input_path: String,
    /// Logical path the bundled document will be served from; reference
    /// attributes are rewritten relative to its parent directory.
    pub output_path: String,
    /// Logical path of the extracted script; empty disables extraction.
    pub js_path: String,
    /// Charset label used to decode inputs and re-encode the output.
    pub charset: Option<String>,
}

/// Run-scoped state threaded through every traversal hook.
///
/// One `Session` is allocated per invocation and dropped afterwards, so
/// repeated runs within one process cannot leak visited-import or license
/// state into each other.
pub struct Session {
    pub options: BundleOptions,
    pub manifest: Manifest,
    input_path: Webpath,
    output_path: Webpath,
    /// Documents currently being processed; the top entry resolves relative
    /// references of whatever content is being visited.
    context: Vec<Webpath>,
    /// Webpaths already inlined this run; repeats are elided.
    inlined: HashSet<Webpath>,
    /// Whitespace-stripped license texts, for deduplication.
    legalese: HashSet<String>,
    /// Unique license texts in first-seen order.
    pub(crate) licenses: Vec<String>,
    pub(crate) first_script: Option<Handle>,
    pub(crate) license_comment: Option<Handle>,
}

impl Session {
    pub fn new(manifest: Manifest, options: BundleOptions) -> Session {
        let input_path = Webpath::new(&options.input_path);
        let output_path = Webpath::new(&options.output_path);

        Session {
            options,
            manifest,
            input_path,
            output_path,
            context: Vec::new(),
            inlined: HashSet::new(),
            legalese: HashSet::new(),
            licenses: Vec::new(),
            first_script: None,
            license_comment: None,
        }
    }

    /// Path of the document whose content is currently being visited.
    pub fn current(&self) -> &Webpath {
        self.context.last().unwrap_or(&self.input_path)
    }

    pub fn output_path(&self) -> &Webpath {
        &self.output_path
    }

    pub(crate) fn push_context(&mut self, webpath: Webpath) {
        self.context.push(webpath);
    }

    pub(crate) fn pop_context(&mut self) {
        self.context.pop();
    }

    /// Records an import as inlined; false means it already was this run.
    pub(crate) fn mark_inlined(&mut self, webpath: Webpath) -> bool {
        self.inlined.insert(webpath)
    }

    pub(crate) fn register_license(&mut self, text: &str) {
        let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if self.legalese.insert(normalized) {
            self.licenses
                .push(text.trim_matches(['\r', '\n']).to_string());
        }
    }

    /// Reads the file backing a logical path, failing fast when the manifest
    /// has no entry or the underlying read does.
    pub fn read_webfile(&self, webpath: &Webpath) -> Result<Vec<u8>, BundleError> {
        let file_path = self
            .manifest
            .get(webpath)
            .ok_or_else(|| BundleError::UnresolvedReference {
                path: webpath.clone(),
                referrer: self.current().clone(),
            })?;

        fs::read(file_path).map_err(|source| BundleError::Storage {
            path: file_path.clone(),
            source,
        })
    }
}

/// Bundles the document at `options.input_path` into a single self-contained
/// HTML document.
///
/// Returns the serialized markup and the extracted script text (empty when
/// extraction is disabled); writing either artifact is left to the caller so
/// nothing hits the filesystem unless the whole pipeline succeeded.
pub fn create_bundled_document(
    manifest: Manifest,
    options: BundleOptions,
) -> Result<(Vec<u8>, String), BundleError> {
    let mut session = Session::new(manifest, options);

    let input_path = Webpath::new(&session.options.input_path);
    session.push_context(input_path.clone());
    session.mark_inlined(input_path.clone());

    let input_data = session.read_webfile(&input_path)?;
    let dom = html_to_dom(
        &input_data,
        session.options.charset.clone().unwrap_or_default(),
    );

    info!("transforming {}", input_path);
    let root = transform(&mut session, &dom.document)?;

    // The bundle carries every dependency already, so the module loader must
    // not go fetching them again at runtime
    if let Some(first_script) = session.first_script.clone() {
        let bootstrap_node = create_element_node("script", vec![]);
        append_child(
            &bootstrap_node,
            &create_text_node("var CLOSURE_NO_DEPS = true;"),
        );
        insert_before(&first_script, &bootstrap_node);
    }

    merge_licenses(&mut session);

    let js_path = Webpath::new(&session.options.js_path);
    let extracted_js = if js_path.is_empty() {
        String::new()
    } else {
        info!("extracting scripts into {}", js_path);
        extract_scripts(&session, &root, &js_path)?
    };

    info!("flattening into a single document");
    let flat_dom = flatten_document(&root)?;

    let html = serialize_document(flat_dom, session.options.charset.clone());
    Ok((html, extracted_js))
}
