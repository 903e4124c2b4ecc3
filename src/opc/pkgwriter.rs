//! Streaming package writer for OPC packages.
//!
//! Parts are written to the ZIP archive as soon as they are opened; the
//! `[Content_Types].xml` part is assembled from every part's declared content
//! type and written when the package is closed.

use crate::common::xml::escape_xml;
use crate::opc::constants::{content_type as ct, namespace};
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::opc::phys_pkg::{PartCompression, PhysPkgWriter};
use crate::opc::rel::Relationships;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

/// Package writer that serializes parts and relationships into a ZIP-based OPC package.
///
/// Each part name can be written only once. Relationships are written as regular
/// `.rels` parts through [`ZipPackageWriter::write_relationships`].
pub struct ZipPackageWriter<W: Write + Seek> {
    /// Physical package
    phys: PhysPkgWriter<W>,

    /// Content types of all written parts
    content_types: ContentTypesItem,

    /// Part names written so far (lowercase, OPC part names are case-insensitive)
    written: HashSet<String>,
}

impl ZipPackageWriter<File> {
    /// Create a package file at `path`, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P, compression: PartCompression) -> Result<Self> {
        Ok(Self::new(File::create(path)?, compression))
    }
}

impl<W: Write + Seek> ZipPackageWriter<W> {
    /// Create a package writer on top of a seekable sink.
    pub fn new(sink: W, compression: PartCompression) -> Self {
        Self {
            phys: PhysPkgWriter::new(sink, compression),
            content_types: ContentTypesItem::new(),
            written: HashSet::new(),
        }
    }

    /// Check whether a part has already been written.
    pub fn contains(&self, partname: &PackURI) -> bool {
        self.written.contains(&partname.as_str().to_lowercase())
    }

    /// Start a new part and return a sink for its content.
    ///
    /// The part is complete when the next part is opened or the package is closed.
    pub fn open_part(&mut self, partname: &PackURI, content_type: &str) -> Result<&mut impl Write> {
        self.register(partname, content_type)?;
        self.phys.start(partname)
    }

    /// Start a new part with an explicit compression method.
    pub fn open_part_with(
        &mut self,
        partname: &PackURI,
        content_type: &str,
        compression: PartCompression,
    ) -> Result<&mut impl Write> {
        self.register(partname, content_type)?;
        self.phys.start_with(partname, compression)
    }

    /// Write a complete part in one go.
    pub fn write_part(&mut self, partname: &PackURI, content_type: &str, blob: &[u8]) -> Result<()> {
        self.open_part(partname, content_type)?.write_all(blob)?;
        Ok(())
    }

    /// Write the relationships of a source part, or of the package itself when
    /// `source` is `None`.
    pub fn write_relationships(
        &mut self,
        rels: &Relationships,
        source: Option<&PackURI>,
    ) -> Result<()> {
        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let rels_uri = source
            .unwrap_or(&package_uri)
            .rels_uri()
            .map_err(OpcError::InvalidPackUri)?;
        self.write_part(&rels_uri, ct::OPC_RELATIONSHIPS, rels.to_xml().as_bytes())
    }

    /// Write `[Content_Types].xml`, finish the ZIP archive and return the sink.
    pub fn close(self) -> Result<W> {
        let mut phys = self.phys;
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        phys.write(&content_types_uri, self.content_types.to_xml().as_bytes())?;
        phys.finish()
    }

    fn register(&mut self, partname: &PackURI, content_type: &str) -> Result<()> {
        if !self.written.insert(partname.as_str().to_lowercase()) {
            return Err(OpcError::DuplicatePart(partname.to_string()));
        }
        self.content_types.add_content_type(partname, content_type);
        Ok(())
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
#[derive(Debug)]
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    /// Create a new ContentTypesItem with the relationships default.
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    /// Add a content type for a part.
    ///
    /// The first part with a given extension claims the extension's Default
    /// element; later parts whose content type differs get an Override.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_lowercase();

        if ext.is_empty() {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
            return;
        }

        match self.defaults.get(&ext) {
            Some(existing) if existing == content_type => {},
            Some(_) => {
                self.overrides
                    .insert(partname.to_string(), content_type.to_string());
            },
            None => {
                self.defaults.insert(ext, content_type.to_string());
            },
        }
    }

    /// Generate the XML for [Content_Types].xml.
    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES));
        xml.push('\n');

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
            xml.push('\n');
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
            xml.push('\n');
        }

        xml.push_str("</Types>");

        xml
    }
}
