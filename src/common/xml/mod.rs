//! XML text helpers for hand-written package XML.

pub mod escape;

pub use escape::{escape_xml, unescape_xml};
