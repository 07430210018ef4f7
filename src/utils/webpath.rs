use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Rooted paths as well as anything carrying a URI scheme count as absolute
static ABS_URI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^(?:/|[A-Za-z][A-Za-z0-9+.-]*:)").unwrap());

/// A normalized, build-system-relative identifier for a document or resource,
/// distinct from its real storage location.
///
/// Two webpaths denote the same entity iff their normalized strings match;
/// normalization happens on construction, so equality and hashing operate on
/// the stored value directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Webpath {
    value: String,
}

impl Webpath {
    pub fn new<S: AsRef<str>>(value: S) -> Webpath {
        Webpath {
            value: normalize(value.as_ref()),
        }
    }

    /// The root webpath, used as resolution base for rootified references.
    pub fn root() -> Webpath {
        Webpath {
            value: "/".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.value.starts_with('/')
    }

    /// Containing directory of this webpath ("/" for top-level entries).
    pub fn parent(&self) -> Webpath {
        match self.value.rfind('/') {
            Some(0) => Webpath {
                value: "/".to_string(),
            },
            Some(i) => Webpath {
                value: self.value[..i].to_string(),
            },
            None => Webpath {
                value: String::new(),
            },
        }
    }

    /// Resolves `reference` against this document's location: absolute forms
    /// pass through, everything else is taken relative to the parent
    /// directory, then normalized.
    pub fn resolve(&self, reference: &str) -> Webpath {
        if is_absolute_uri(reference) {
            Webpath::new(reference)
        } else {
            Webpath::new(format!("{}/{}", self.parent().value, reference))
        }
    }

    /// Expresses `other` relative to this directory.
    pub fn relativize(&self, other: &Webpath) -> Webpath {
        let base: Vec<&str> = self.value.split('/').filter(|s| !s.is_empty()).collect();
        let target: Vec<&str> = other.value.split('/').filter(|s| !s.is_empty()).collect();

        let mut common = 0;
        while common < base.len() && common < target.len() && base[common] == target[common] {
            common += 1;
        }

        let mut segments: Vec<&str> = vec![".."; base.len() - common];
        segments.extend(&target[common..]);

        Webpath {
            value: segments.join("/"),
        }
    }

    /// The webpath with its leading separator removed, suitable for use as a
    /// relative reference attribute value.
    pub fn strip_leading_slash(&self) -> &str {
        self.value.strip_prefix('/').unwrap_or(&self.value)
    }
}

impl fmt::Display for Webpath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for Webpath {
    fn from(value: &str) -> Webpath {
        Webpath::new(value)
    }
}

// Collapses "." and ".." segments and squeezes empty ones; ".." segments
// that would climb past the start survive only in relative paths
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&"..") | None => {
                    if !absolute {
                        segments.push("..");
                    }
                }
                Some(_) => {
                    segments.pop();
                }
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");

    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Checks whether a reference is an absolute path or carries a URI scheme.
pub fn is_absolute_uri(value: &str) -> bool {
    ABS_URI_PATTERN.is_match(value)
}

/// References that must be left untouched: fragments, directory and
/// protocol-relative references, non-file schemes, and template bindings
/// whose value only exists at runtime.
pub fn should_ignore_uri(uri: &str) -> bool {
    uri.starts_with('#')
        || uri.ends_with('/')
        || uri.contains("//")
        || uri.starts_with("data:")
        || uri.starts_with("javascript:")
        || uri.starts_with("mailto:")
        || (uri.contains("[[") && uri.contains("]]"))
        || (uri.contains("{{") && uri.contains("}}"))
}
