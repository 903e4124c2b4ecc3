//! AASX package reading and writing.
//!
//! An AASX package is an OPC package with a fixed relationship layout:
//!
//! ```text
//! package root --aasx-origin--> /aasx/aasx-origin
//!   --aas-spec--> /aasx/{shell}/{shell}.aas.json
//!     --aas-spec-split--> /aasx/{shell}/{submodel}/{submodel}.submodel.json
//!       --aas-suppl--> supplementary files
//! ```
//!
//! [`AasxReader`] walks this graph into an [`ObjectStore`](crate::model::ObjectStore)
//! and a [`SupplementaryFileStore`]; [`AasxWriter`] builds it from them.

pub mod error;
pub mod files;
pub mod naming;
pub mod options;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::{AasxError, Result};
pub use files::{DictSupplementaryFileStore, SupplementaryFileStore};
pub use naming::NameFriendlyfier;
pub use options::WriterOptions;
pub use reader::AasxReader;
pub use writer::AasxWriter;
