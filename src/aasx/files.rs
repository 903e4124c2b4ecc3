//! Stores for supplementary files bundled with AASX packages.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

/// Keyed blob store for supplementary files.
///
/// Names are absolute part names inside the package (e.g. `/aasx/suppl/manual.pdf`).
pub trait SupplementaryFileStore {
    /// Store the content of `file` under `name`, replacing any previous entry.
    fn add_file(&mut self, name: &str, file: &mut dyn Read, content_type: &str) -> io::Result<()>;

    /// Content type of a stored file.
    fn get_content_type(&self, name: &str) -> Option<&str>;

    /// Copy the content of a stored file into `sink`.
    fn write_file(&self, name: &str, sink: &mut dyn Write) -> io::Result<()>;

    fn contains(&self, name: &str) -> bool;
}

/// In-memory [`SupplementaryFileStore`] holding `(content, content type)` per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictSupplementaryFileStore {
    files: BTreeMap<String, (Vec<u8>, String)>,
}

impl DictSupplementaryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored file's content.
    pub fn get_file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|(data, _)| data.as_slice())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over stored file names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl SupplementaryFileStore for DictSupplementaryFileStore {
    fn add_file(&mut self, name: &str, file: &mut dyn Read, content_type: &str) -> io::Result<()> {
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        self.files
            .insert(name.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn get_content_type(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(|(_, ct)| ct.as_str())
    }

    fn write_file(&self, name: &str, sink: &mut dyn Write) -> io::Result<()> {
        let (data, _) = self.files.get(name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no supplementary file {}", name),
            )
        })?;
        sink.write_all(data)
    }

    fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}
