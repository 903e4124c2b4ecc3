//! Constant values related to the Open Packaging Convention and AASX packages.
//!
//! This module contains content type URIs (like MIME-types) that specify a part's format,
//! XML namespaces, relationship types and the fixed part names used by AASX packages.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // Image content types
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";

    // Payload content types of AAS parts
    pub const APPLICATION_JSON: &str = "application/json";
    pub const TEXT_JSON: &str = "text/json";
    pub const XML: &str = "application/xml";
    pub const TEXT_XML: &str = "text/xml";
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const PDF: &str = "application/pdf";

    // OPC core content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

/// XML namespace URIs used in OPC packages
pub mod namespace {
    /// OPC relationships namespace
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    /// OPC core properties namespace
    pub const OPC_CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., links to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in AASX packages
pub mod relationship_type {
    // Package metadata
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const THUMBNAIL: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail";

    /// Package root to the AASX origin part
    pub const AASX_ORIGIN: &str = "http://www.admin-shell.io/aasx/relationships/aasx-origin";
    /// Origin part to an AAS spec part
    pub const AAS_SPEC: &str = "http://www.admin-shell.io/aasx/relationships/aas-spec";
    /// AAS spec part to a split part (one submodel per part)
    pub const AAS_SPEC_SPLIT: &str = "http://www.admin-shell.io/aasx/relationships/aas-spec-split";
    /// Submodel part to a supplementary file
    pub const AAS_SUPPL: &str = "http://www.admin-shell.io/aasx/relationships/aas-suppl";
}

/// Fixed part names
pub mod part_name {
    /// The AASX origin part, target of the package-level `aasx-origin` relationship
    pub const AASX_ORIGIN: &str = "/aasx/aasx-origin";

    /// Default location of the OPC core properties part
    pub const CORE_PROPERTIES: &str = "/docProps/core.xml";
}
