//! Error types for OPC package operations.
//!
//! Malformed XML in any package part (bad syntax, attributes or text that is
//! not UTF-8) is reported uniformly as [`OpcError::XmlError`].

use quick_xml::events::attributes::AttrError;
use std::str::Utf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Part already written: {0}")]
    DuplicatePart(String),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("Malformed package XML: {0}")]
    XmlError(String),

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OpcError {
    fn from(err: quick_xml::Error) -> Self {
        OpcError::XmlError(err.to_string())
    }
}

impl From<AttrError> for OpcError {
    fn from(err: AttrError) -> Self {
        OpcError::XmlError(format!("invalid attribute: {}", err))
    }
}

impl From<Utf8Error> for OpcError {
    fn from(err: Utf8Error) -> Self {
        OpcError::XmlError(format!("text is not UTF-8: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
