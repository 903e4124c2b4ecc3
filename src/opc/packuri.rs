//! Provides the PackURI value type and utilities for working with package URIs.
//!
//! A PackURI represents a part name within an OPC package, following the URI format
//! defined by the Open Packaging Conventions.

/// Represents a package URI, which is a partname within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path separators,
/// following the OPC specification. They provide access to various components like
/// the base URI (directory), filename and extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/aasx/aasx-origin")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// # Arguments
    /// * `uri` - The URI string, which must begin with a forward slash
    ///
    /// # Returns
    /// * `Ok(PackURI)` if the URI is valid
    /// * `Err` if the URI doesn't start with a forward slash
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a normalized PackURI from a logical part path.
    ///
    /// A missing leading slash is added and `.` / `..` segments are resolved, so
    /// `aasx/suppl/./doc.pdf` becomes `/aasx/suppl/doc.pdf`.
    pub fn normalized(path: &str) -> Result<Self, String> {
        if path.is_empty() {
            return Err("PackURI must not be empty".to_string());
        }
        let rooted = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self::new(Self::normalize_path(&rooted))
    }

    /// Create a PackURI from a relative reference and a base URI.
    ///
    /// This translates a relative reference (like "../files/doc.pdf") onto a base URI
    /// (like "/aasx/shell") to produce an absolute PackURI (like "/aasx/files/doc.pdf").
    ///
    /// # Arguments
    /// * `base_uri` - The base URI to resolve from
    /// * `relative_ref` - The relative reference to resolve
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let joined = Self::join_paths(base_uri, relative_ref);
        let normalized = Self::normalize_path(&joined);
        Self::new(normalized)
    }

    /// Resolve a target reference that may be absolute or relative.
    ///
    /// Absolute targets (starting with `/`) are only normalized; relative targets are
    /// resolved against `base_uri` like [`PackURI::from_rel_ref`].
    pub fn resolve(base_uri: &str, target: &str) -> Result<Self, String> {
        if target.starts_with('/') {
            Self::new(Self::normalize_path(target))
        } else {
            Self::from_rel_ref(base_uri, target)
        }
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/aasx/shell" for "/aasx/shell/shell.aas.json".
    /// For the package pseudo-partname "/", returns "/".
    pub fn base_uri(&self) -> &str {
        if self.uri == "/" {
            return "/";
        }

        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion of this PackURI.
    ///
    /// For example, "shell.aas.json" for "/aasx/shell/shell.aas.json".
    /// For the package pseudo-partname "/", returns an empty string.
    pub fn filename(&self) -> &str {
        if let Some(pos) = self.uri.rfind('/') {
            &self.uri[pos + 1..]
        } else {
            ""
        }
    }

    /// Get the extension portion of this PackURI.
    ///
    /// For example, "json" for "/aasx/shell/shell.aas.json" (note: no leading period).
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        if let Some(pos) = filename.rfind('.') {
            &filename[pos + 1..]
        } else {
            ""
        }
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the form used as the Zip file membername for the package item.
    /// Returns an empty string for the package pseudo-partname "/".
    pub fn membername(&self) -> &str {
        if self.uri == "/" { "" } else { &self.uri[1..] }
    }

    /// Get the relative reference from a base URI to this PackURI.
    ///
    /// For example, PackURI("/aasx/shell/sm/sm.submodel.json") would return
    /// "sm/sm.submodel.json" for base_uri "/aasx/shell".
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        // Common prefix, but never the filename itself
        let common = from_parts
            .iter()
            .zip(to_parts.iter().take(to_parts.len().saturating_sub(1)))
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = Vec::with_capacity(from_parts.len() + to_parts.len());
        segments.extend(std::iter::repeat_n("..", from_parts.len() - common));
        segments.extend(to_parts.iter().skip(common).copied());
        segments.join("/")
    }

    /// Get the PackURI of the .rels part corresponding to this PackURI.
    ///
    /// For example, "/aasx/_rels/aasx-origin.rels" for "/aasx/aasx-origin", and
    /// "/_rels/.rels" for the package pseudo-partname.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let filename = self.filename();
        let base_uri = self.base_uri();

        let rels_filename = format!("{}.rels", filename);
        let rels_uri_str = if base_uri == "/" {
            format!("/_rels/{}", rels_filename)
        } else {
            format!("{}/_rels/{}", base_uri, rels_filename)
        };

        Self::new(rels_uri_str)
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Helper function to join two paths using forward slashes
    fn join_paths(base: &str, rel: &str) -> String {
        if base.ends_with('/') {
            format!("{}{}", base, rel)
        } else {
            format!("{}/{}", base, rel)
        }
    }

    /// Helper function to normalize a path (resolve ".." and ".")
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();

        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }

        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";
