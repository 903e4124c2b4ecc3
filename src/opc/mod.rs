//! Open Packaging Conventions (OPC) transport.
//!
//! An AASX file is an OPC package: a ZIP archive whose members ("parts") are
//! described by `[Content_Types].xml` and connected by typed relationships stored
//! in `.rels` parts. This module knows nothing about asset administration shells;
//! it only moves parts, content types and relationships in and out of archives.
//!
//! - [`ZipPackageReader`]: content type lookup, relationship traversal, part loading
//! - [`ZipPackageWriter`]: streaming part writer, `.rels` and content types output
//! - [`PackURI`]: part names and relative reference resolution
//! - [`Relationships`]: ordered relationship lists with `rId` allocation
//! - [`CoreProperties`]: package metadata in `/docProps/core.xml`

pub mod constants;
pub mod core_properties;
pub mod error;
pub mod packuri;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

pub use core_properties::CoreProperties;
pub use error::{OpcError, Result};
pub use packuri::PackURI;
pub use phys_pkg::PartCompression;
pub use pkgreader::{SerializedRelationship, ZipPackageReader};
pub use pkgwriter::ZipPackageWriter;
pub use rel::{Relationship, Relationships};
