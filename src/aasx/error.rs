//! Error types for AASX package reading and writing.

use crate::model::{Identifier, ModelError};
use crate::opc::OpcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AasxError {
    /// The file is not a valid OPC (zip) package
    #[error("Not a valid OPC package: {0}")]
    InvalidPackage(#[source] OpcError),

    /// A required relationship is absent
    #[error("Not a valid AASX package: {0} relationship is missing")]
    MissingRelationship(&'static str),

    /// A part's payload format cannot be decoded
    #[error("Unsupported content type '{content_type}' and extension '{extension}' of AASX part {part}")]
    UnsupportedContent {
        part: String,
        content_type: String,
        extension: String,
    },

    /// A singleton part was written twice
    #[error("{0} has already been written")]
    RepeatedWrite(&'static str),

    /// The requested identifiable does not exist or has the wrong kind
    #[error("No asset administration shell with id {0} in the object store")]
    NotFound(Identifier),

    /// The writer has already been finalized
    #[error("AASX writer is already closed")]
    Closed,

    #[error("OPC error: {0}")]
    Opc(#[from] OpcError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AasxError>;
