//! Relationship-related objects for OPC packages.
//!
//! Relationships are buffered per source part while a package is written and
//! serialized to the source's `.rels` part in insertion order.

use crate::common::xml::escape_xml;
use crate::opc::constants::namespace;
use crate::opc::packuri::PackURI;

/// A single relationship from a source part to a target part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target part reference, relative to the source's directory
    target_ref: String,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// Ordered collection of relationships from a single source.
///
/// Relationship IDs are allocated sequentially ("rId1", "rId2", ...) and only need
/// to be unique within this one collection.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    /// Relationships in insertion order
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    ///
    /// # Arguments
    /// * `base_uri` - Base URI for resolving relative references
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: Vec::new(),
        }
    }

    /// Create an empty collection for relationships sourced at `source`.
    pub fn for_source(source: &PackURI) -> Self {
        Self::new(source.base_uri().to_string())
    }

    /// Add an internal relationship to a target part.
    ///
    /// The target is stored as a reference relative to this collection's base URI.
    /// Returns the newly added relationship.
    pub fn add(&mut self, reltype: &str, target: &PackURI) -> &Relationship {
        let target_ref = target.relative_ref(&self.base_uri);
        let rel = Relationship::new(self.next_r_id(), reltype.to_string(), target_ref);
        self.push(rel)
    }

    fn push(&mut self, rel: Relationship) -> &Relationship {
        self.rels.push(rel);
        &self.rels[self.rels.len() - 1]
    }

    /// Get the next available relationship ID.
    ///
    /// Generates IDs in the format "rId1", "rId2", etc., filling in gaps
    /// if any exist.
    fn next_r_id(&self) -> String {
        let mut used_numbers: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| rel.r_id().strip_prefix("rId")?.parse::<u32>().ok())
            .collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to XML format.
    ///
    /// Generates the XML for a .rels file, preserving insertion order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<Relationships xmlns="{}">"#,
            namespace::OPC_RELATIONSHIPS
        ));
        xml.push('\n');

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"  <Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref())
            ));
            xml.push('\n');
        }

        xml.push_str("</Relationships>");

        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}
