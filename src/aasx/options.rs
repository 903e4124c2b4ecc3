//! Writer configuration.

use crate::opc::PartCompression;

/// Options for [`AasxWriter`](super::AasxWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Compression of AAS and metadata parts
    pub compression: PartCompression,

    /// Compression of supplementary files and the thumbnail
    pub file_compression: PartCompression,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compression: PartCompression::Deflated,
            file_compression: PartCompression::Deflated,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression of AAS and metadata parts.
    pub fn compression(mut self, compression: PartCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the compression of supplementary files, e.g. `Stored` for files
    /// that are already compressed.
    pub fn file_compression(mut self, compression: PartCompression) -> Self {
        self.file_compression = compression;
        self
    }
}
