//! Low-level, read-only API to a serialized Open Packaging Convention (OPC) package.
//!
//! This module provides the [`ZipPackageReader`] for navigating OPC packages: content
//! type lookup, relationship resolution and part loading. Relationships are parsed on
//! demand per source part, so only the parts actually visited are ever decompressed.

use crate::opc::constants::{part_name, relationship_type, target_mode};
use crate::opc::core_properties::CoreProperties;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{PACKAGE_URI, PackURI};
use crate::opc::phys_pkg::PhysPkgReader;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Serialized relationship as read from a .rels file.
///
/// Contains all relationship information in string form, before the target
/// reference is resolved against the source part's base URI.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    /// Base URI for resolving relative references
    pub base_uri: String,

    /// Relationship ID (e.g., "rId1")
    pub r_id: String,

    /// Relationship type URI
    pub reltype: String,

    /// Target reference (relative URI, absolute part name or external URL)
    pub target_ref: String,

    /// Target mode (Internal or External)
    pub target_mode: String,
}

impl SerializedRelationship {
    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    /// Get the target partname for internal relationships.
    ///
    /// Resolves the target reference against the base URI to produce an absolute
    /// PackURI. Absolute targets (as written by some tools) are accepted as-is.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(
                "Cannot get target_partname for external relationship".to_string(),
            ));
        }
        PackURI::resolve(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override elements
/// from [Content_Types].xml.
#[derive(Debug, Default)]
struct ContentTypeMap {
    /// Maps lowercase file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps lowercase partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from [Content_Types].xml.
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let entry_kind = match e.local_name().as_ref() {
                        b"Default" => Some((b"Extension".as_slice(), true)),
                        b"Override" => Some((b"PartName".as_slice(), false)),
                        _ => None,
                    };

                    if let Some((key_attr, is_default)) = entry_kind {
                        let mut key = None;
                        let mut content_type = None;
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == key_attr {
                                key = Some(attr.unescape_value()?.to_string());
                            } else if attr.key.as_ref() == b"ContentType" {
                                content_type = Some(attr.unescape_value()?.to_string());
                            }
                        }

                        if let (Some(key), Some(ct)) = (key, content_type) {
                            let key = key.to_lowercase();
                            if is_default {
                                map.defaults.insert(key, ct);
                            } else {
                                map.overrides.insert(key, ct);
                            }
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Get the content type for a partname.
    ///
    /// Checks for an override first, then falls back to the default based on the
    /// file extension. Part names are compared case-insensitively as OPC requires.
    fn get(&self, pack_uri: &PackURI) -> Option<&str> {
        self.overrides
            .get(&pack_uri.as_str().to_lowercase())
            .or_else(|| self.defaults.get(&pack_uri.ext().to_lowercase()))
            .map(String::as_str)
    }
}

/// Package reader that provides access to parts and relationships of a ZIP-based
/// OPC package.
///
/// This is the transport the AASX reader is built on: it knows nothing about AAS
/// semantics, only about parts, content types and typed relationships.
pub struct ZipPackageReader<R: Read + Seek> {
    /// Physical package
    phys: PhysPkgReader<R>,

    /// Parsed [Content_Types].xml
    content_types: ContentTypeMap,
}

impl ZipPackageReader<File> {
    /// Open an OPC package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }
}

impl<R: Read + Seek> ZipPackageReader<R> {
    /// Open an OPC package from a seekable reader.
    pub fn new(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::new(reader)?)
    }

    /// Wrap a physical package, parsing its content types.
    ///
    /// A package without `[Content_Types].xml` is not an OPC package.
    pub fn from_phys_reader(mut phys: PhysPkgReader<R>) -> Result<Self> {
        let content_types = ContentTypeMap::from_xml(&phys.content_types_xml()?)?;
        Ok(Self {
            phys,
            content_types,
        })
    }

    /// Get the declared content type of a part.
    ///
    /// Returns an empty string if neither an override nor an extension default
    /// matches the part.
    pub fn get_content_type(&self, part: &PackURI) -> &str {
        self.content_types.get(part).unwrap_or("")
    }

    /// Read a part's full content.
    pub fn blob_for(&mut self, part: &PackURI) -> Result<Vec<u8>> {
        self.phys.blob_for(part)
    }

    /// Open a part as a byte stream.
    pub fn open_part(&mut self, part: &PackURI) -> Result<Cursor<Vec<u8>>> {
        Ok(Cursor::new(self.phys.blob_for(part)?))
    }

    /// Load the serialized relationships of a source part, or of the package itself
    /// when `source` is `None`.
    pub fn srels_for(
        &mut self,
        source: Option<&PackURI>,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let package_uri;
        let source = match source {
            Some(source) => source,
            None => {
                package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
                &package_uri
            },
        };

        match self.phys.rels_xml_for(source)? {
            Some(xml) => parse_rels_xml(&xml, source.base_uri()),
            None => Ok(SmallVec::new()),
        }
    }

    /// Group the internal relationship targets of a source by relationship type.
    ///
    /// Targets keep the order in which they appear in the .rels part. Types that do
    /// not occur are simply absent from the map.
    pub fn get_related_parts_by_type(
        &mut self,
        source: Option<&PackURI>,
    ) -> Result<HashMap<String, Vec<PackURI>>> {
        let mut related: HashMap<String, Vec<PackURI>> = HashMap::new();
        for srel in self.srels_for(source)? {
            if srel.is_external() {
                continue;
            }
            let target = srel.target_partname()?;
            related.entry(srel.reltype).or_default().push(target);
        }
        Ok(related)
    }

    /// Read the package's core properties.
    ///
    /// Follows the package-level core-properties relationship, falling back to the
    /// default location. Fails with [`OpcError::RelationshipNotFound`] if the package
    /// has no core properties at all.
    pub fn get_core_properties(&mut self) -> Result<CoreProperties> {
        let mut related = self.get_related_parts_by_type(None)?;
        let part = match related
            .remove(relationship_type::CORE_PROPERTIES)
            .and_then(|targets| targets.into_iter().next())
        {
            Some(part) => part,
            None => {
                let fallback =
                    PackURI::new(part_name::CORE_PROPERTIES).map_err(OpcError::InvalidPackUri)?;
                if !self.phys.contains(&fallback) {
                    return Err(OpcError::RelationshipNotFound(
                        relationship_type::CORE_PROPERTIES.to_string(),
                    ));
                }
                fallback
            },
        };

        let xml = self.phys.blob_for(&part)?;
        CoreProperties::from_xml(std::str::from_utf8(&xml)?)
    }

    /// Check whether the package contains a part.
    pub fn contains(&self, part: &PackURI) -> bool {
        self.phys.contains(part)
    }

    /// Release the underlying package.
    pub fn close(self) {}
}

/// Parse relationships XML into SerializedRelationship structs.
fn parse_rels_xml(
    rels_xml: &[u8],
    base_uri: &str,
) -> Result<SmallVec<[SerializedRelationship; 8]>> {
    let mut srels = SmallVec::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut target_mode = target_mode::INTERNAL.to_string();

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => target_mode = attr.unescape_value()?.to_string(),
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        srels.push(SerializedRelationship {
                            base_uri: base_uri.to_string(),
                            r_id: id,
                            reltype: rt,
                            target_ref: tr,
                            target_mode,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(srels)
}
