//! aasx - Reading and writing AASX packages
//!
//! AASX is the exchange format for Asset Administration Shells: an OPC (zip)
//! package that stores shells, submodels, assets and concept descriptions as
//! JSON parts, linked by typed relationships, together with the supplementary
//! files referenced from submodels.
//!
//! # Features
//!
//! - **Reader**: walks the `aasx-origin` / `aas-spec` / `aas-spec-split`
//!   relationship graph, decodes JSON parts into an object store and collects
//!   supplementary files
//! - **Writer**: writes one part per shell and per submodel with friendly part
//!   names, copies supplementary files once, and wires all relationships on close
//! - **OPC transport**: part names, relationships, content types and core
//!   properties on top of a zip archive
//!
//! # Example - Writing and reading a package
//!
//! ```
//! use std::io::Cursor;
//! use aasx::aasx::{AasxReader, AasxWriter, DictSupplementaryFileStore};
//! use aasx::model::{
//!     Asset, AssetAdministrationShell, DictObjectStore, Identifier, KeyElements,
//!     ObjectStore, Reference, Submodel,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shell_id = Identifier::iri("http://acplt.org/Shells/Motor");
//! let asset_id = Identifier::iri("http://acplt.org/Assets/Motor");
//! let submodel_id = Identifier::iri("http://acplt.org/Submodels/Nameplate");
//!
//! let mut shell = AssetAdministrationShell::new(
//!     shell_id.clone(),
//!     Reference::to(KeyElements::Asset, &asset_id),
//! );
//! shell.submodels.push(Reference::to(KeyElements::Submodel, &submodel_id));
//!
//! let mut objects = DictObjectStore::new();
//! objects.add(shell.into())?;
//! objects.add(Asset::new(asset_id).into())?;
//! objects.add(Submodel::new(submodel_id).into())?;
//! let files = DictSupplementaryFileStore::new();
//!
//! // Write
//! let mut writer = AasxWriter::new(Cursor::new(Vec::new()))?;
//! writer.write_aas(&shell_id, &objects, &files)?;
//! let data = writer.close()?.into_inner();
//!
//! // Read back
//! let mut read = DictObjectStore::new();
//! let mut read_files = DictSupplementaryFileStore::new();
//! let ids = AasxReader::from_bytes(data)?.read_into(&mut read, &mut read_files)?;
//! assert_eq!(ids.len(), 3);
//! # Ok(())
//! # }
//! ```

/// AASX package reader, writer and supplementary file stores
pub mod aasx;

/// Shared helpers (XML escaping, byte order marks)
pub mod common;

/// Object model of the asset administration shell and its JSON codec
pub mod model;

/// Open Packaging Conventions transport
pub mod opc;

pub use aasx::{AasxError, AasxReader, AasxWriter, DictSupplementaryFileStore, WriterOptions};
pub use model::{DictObjectStore, Identifier, ObjectStore};
