// Shared helpers for driving the bundler against on-disk web trees

use std::fs;

use tempfile::TempDir;

use htmlpack::core::{create_bundled_document, BundleError, BundleOptions};
use htmlpack::manifest::Manifest;
use htmlpack::utils::webpath::Webpath;

/// A temporary web tree: files on disk plus the manifest mapping logical
/// paths to them.
pub struct WebTree {
    pub dir: TempDir,
    pub manifest: Manifest,
}

impl WebTree {
    pub fn new() -> WebTree {
        WebTree {
            dir: TempDir::new().unwrap(),
            manifest: Manifest::new(),
        }
    }

    /// Writes `content` under the temp dir and maps `webpath` to it.
    pub fn add(&mut self, webpath: &str, content: &str) -> &mut Self {
        let file_path = self.dir.path().join(webpath.trim_start_matches('/'));
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, content).unwrap();
        self.manifest.insert(Webpath::new(webpath), file_path);
        self
    }

    /// Runs the full pipeline with script extraction disabled.
    pub fn bundle(&self, input: &str, output: &str) -> Result<(String, String), BundleError> {
        self.bundle_with_js(input, output, "")
    }

    pub fn bundle_with_js(
        &self,
        input: &str,
        output: &str,
        js: &str,
    ) -> Result<(String, String), BundleError> {
        let options = BundleOptions {
            input_path: input.to_string(),
            output_path: output.to_string(),
            js_path: js.to_string(),
            charset: None,
        };

        create_bundled_document(self.manifest.clone(), options)
            .map(|(html, js)| (String::from_utf8_lossy(&html).to_string(), js))
    }
}
