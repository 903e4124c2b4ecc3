//! Shared helpers used by the OPC transport and the JSON codec.

pub mod bom;
pub mod xml;
