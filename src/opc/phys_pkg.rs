//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading and writing of OPC packages as ZIP
//! archives. Higher layers only ever talk in [`PackURI`]s; the translation to ZIP
//! member names happens here.

use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Physical package reader that provides access to parts in a ZIP-based OPC package.
///
/// Part contents are decompressed on demand; nothing is cached, so every call to
/// [`PhysPkgReader::blob_for`] re-reads the member from the archive.
pub struct PhysPkgReader<R: Read + Seek> {
    /// The underlying ZIP archive
    archive: ZipArchive<R>,
}

impl PhysPkgReader<File> {
    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist, isn't a valid ZIP file,
    /// or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> PhysPkgReader<R> {
    /// Create a new PhysPkgReader from a seekable reader.
    ///
    /// Parses the ZIP central directory; fails if the stream is not a ZIP archive.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Get the binary content for a part by its PackURI.
    pub fn blob_for(&mut self, pack_uri: &PackURI) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(pack_uri.membername()) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(OpcError::PartNotFound(pack_uri.to_string()));
            },
            Err(e) => return Err(e.into()),
        };

        let mut blob = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut blob)?;
        Ok(blob)
    }

    /// Get the [Content_Types].xml content.
    ///
    /// This is a required part of every OPC package that maps parts to content types.
    pub fn content_types_xml(&mut self) -> Result<Vec<u8>> {
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        self.blob_for(&content_types_uri)
    }

    /// Get the relationships XML for a specific source URI.
    ///
    /// Relationships files are stored in _rels directories and have a .rels extension.
    /// Returns None if the source has no relationships file.
    pub fn rels_xml_for(&mut self, source_uri: &PackURI) -> Result<Option<Vec<u8>>> {
        let rels_uri = source_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;

        match self.blob_for(&rels_uri) {
            Ok(blob) => Ok(Some(blob)),
            Err(OpcError::PartNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get the number of members in the package.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the package is empty.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Check if a specific member exists in the package.
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        let membername = pack_uri.membername();
        self.archive.file_names().any(|name| name == membername)
    }
}

/// How part data is stored inside the ZIP archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartCompression {
    /// Deflate compression (the default for all parts)
    #[default]
    Deflated,
    /// No compression; useful for already-compressed supplementary files
    Stored,
}

impl PartCompression {
    fn file_options(self) -> SimpleFileOptions {
        let method = match self {
            PartCompression::Deflated => CompressionMethod::Deflated,
            PartCompression::Stored => CompressionMethod::Stored,
        };
        SimpleFileOptions::default().compression_method(method)
    }
}

/// Physical package writer for creating OPC packages.
///
/// Handles the low-level writing of parts to a ZIP archive. Parts are written
/// sequentially: starting a new part finishes the previous one.
pub struct PhysPkgWriter<W: Write + Seek> {
    /// The underlying ZIP archive writer
    archive: ZipWriter<W>,

    /// Compression used by [`PhysPkgWriter::start`] and [`PhysPkgWriter::write`]
    compression: PartCompression,
}

impl<W: Write + Seek> PhysPkgWriter<W> {
    /// Create a new package writer on top of a seekable sink.
    pub fn new(sink: W, compression: PartCompression) -> Self {
        Self {
            archive: ZipWriter::new(sink),
            compression,
        }
    }

    /// Start a new member for the part and return a sink for its content.
    pub fn start(&mut self, pack_uri: &PackURI) -> Result<&mut ZipWriter<W>> {
        self.start_with(pack_uri, self.compression)
    }

    /// Start a new member with an explicit compression method.
    pub fn start_with(
        &mut self,
        pack_uri: &PackURI,
        compression: PartCompression,
    ) -> Result<&mut ZipWriter<W>> {
        self.archive
            .start_file(pack_uri.membername(), compression.file_options())?;
        Ok(&mut self.archive)
    }

    /// Write a complete part to the package with the default compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.start(pack_uri)?.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the sink.
    ///
    /// Consumes the writer after writing the ZIP central directory.
    pub fn finish(self) -> Result<W> {
        Ok(self.archive.finish()?)
    }
}
