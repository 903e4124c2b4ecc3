//! Reading AASX packages into object and file stores.

use super::error::{AasxError, Result};
use super::files::SupplementaryFileStore;
use crate::model::{
    DictObjectStore, File, Identifiable, Identifier, ObjectStore, Submodel, map_files,
    read_aas_json_file,
};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{CoreProperties, OpcError, PackURI, ZipPackageReader};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// Reader for AASX packages.
///
/// The package's relationship graph is walked from the root: the `aasx-origin`
/// part, every `aas-spec` part it points to, and every `aas-spec-split` part of
/// those. Each part is decoded and its identifiables are added to a caller
/// supplied [`ObjectStore`]; files referenced from submodels are copied into a
/// [`SupplementaryFileStore`].
///
/// ```no_run
/// use aasx::aasx::{AasxReader, DictSupplementaryFileStore};
/// use aasx::model::DictObjectStore;
///
/// # fn main() -> Result<(), aasx::aasx::AasxError> {
/// let mut objects = DictObjectStore::new();
/// let mut files = DictSupplementaryFileStore::new();
///
/// let mut reader = AasxReader::open("motor.aasx")?;
/// let ids = reader.read_into(&mut objects, &mut files)?;
/// println!("read {} objects and {} files", ids.len(), files.len());
/// # Ok(())
/// # }
/// ```
pub struct AasxReader<R: Read + Seek> {
    package: ZipPackageReader<R>,
}

impl AasxReader<fs::File> {
    /// Open an AASX package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening AASX package for reading");
        let package = ZipPackageReader::open(path).map_err(AasxError::InvalidPackage)?;
        Ok(Self { package })
    }
}

impl AasxReader<Cursor<Vec<u8>>> {
    /// Read an AASX package held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> AasxReader<R> {
    /// Read an AASX package from a seekable stream.
    pub fn from_reader(reader: R) -> Result<Self> {
        let package = ZipPackageReader::new(reader).map_err(AasxError::InvalidPackage)?;
        Ok(Self { package })
    }

    /// Read the package's OPC core properties.
    pub fn get_core_properties(&mut self) -> Result<CoreProperties> {
        match self.package.get_core_properties() {
            Err(OpcError::RelationshipNotFound(_)) => {
                Err(AasxError::MissingRelationship(rt::CORE_PROPERTIES))
            },
            other => Ok(other?),
        }
    }

    /// Read the package thumbnail, if there is one.
    pub fn get_thumbnail(&mut self) -> Result<Option<Vec<u8>>> {
        let mut related = self.package.get_related_parts_by_type(None)?;
        let Some(part) = related
            .remove(rt::THUMBNAIL)
            .and_then(|parts| parts.into_iter().next())
        else {
            return Ok(None);
        };
        Ok(Some(self.package.blob_for(&part)?))
    }

    /// Read every identifiable of the package into `object_store`.
    ///
    /// Objects whose identifier is already in `object_store` are skipped with a
    /// warning; the first one seen wins. File elements of submodels are rewritten
    /// to absolute part names and the referenced parts are copied into
    /// `file_store` unless it already holds them.
    ///
    /// Returns the identifiers of all objects added by this call. On error,
    /// objects added before the failure remain in the store.
    pub fn read_into<S, F>(
        &mut self,
        object_store: &mut S,
        file_store: &mut F,
    ) -> Result<HashSet<Identifier>>
    where
        S: ObjectStore + ?Sized,
        F: SupplementaryFileStore + ?Sized,
    {
        let origin = self
            .package
            .get_related_parts_by_type(None)?
            .remove(rt::AASX_ORIGIN)
            .and_then(|parts| parts.into_iter().next())
            .ok_or(AasxError::MissingRelationship(rt::AASX_ORIGIN))?;

        let aas_parts = self
            .package
            .get_related_parts_by_type(Some(&origin))?
            .remove(rt::AAS_SPEC)
            .ok_or(AasxError::MissingRelationship(rt::AAS_SPEC))?;

        let mut read_identifiables = HashSet::new();
        for aas_part in aas_parts {
            self.read_part_into(&aas_part, object_store, file_store, &mut read_identifiables)?;

            let split_parts = self
                .package
                .get_related_parts_by_type(Some(&aas_part))?
                .remove(rt::AAS_SPEC_SPLIT)
                .unwrap_or_default();
            for split_part in split_parts {
                self.read_part_into(&split_part, object_store, file_store, &mut read_identifiables)?;
            }
        }

        Ok(read_identifiables)
    }

    /// Release the package.
    pub fn close(self) {
        self.package.close();
    }

    fn read_part_into<S, F>(
        &mut self,
        part: &PackURI,
        object_store: &mut S,
        file_store: &mut F,
        read_identifiables: &mut HashSet<Identifier>,
    ) -> Result<()>
    where
        S: ObjectStore + ?Sized,
        F: SupplementaryFileStore + ?Sized,
    {
        for obj in self.parse_part(part)? {
            let id = obj.identification().clone();
            if read_identifiables.contains(&id) {
                continue;
            }
            if object_store.contains(&id) {
                warn!(
                    part = %part,
                    "Skipping {}, since an object with the same id is already contained in the object store",
                    obj
                );
                continue;
            }

            let obj = match obj {
                Identifiable::Submodel(submodel) => Identifiable::Submodel(
                    self.collect_supplementary_files(part, &submodel, file_store)?,
                ),
                other => other,
            };
            object_store.add(obj)?;
            read_identifiables.insert(id);
        }
        Ok(())
    }

    /// Decode a part according to its content type.
    fn parse_part(&mut self, part: &PackURI) -> Result<DictObjectStore> {
        let content_type = self.package.get_content_type(part).to_string();
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let extension = part.ext().to_ascii_lowercase();

        let unsupported = || AasxError::UnsupportedContent {
            part: part.to_string(),
            content_type: content_type.clone(),
            extension: extension.clone(),
        };

        match media_type.as_str() {
            ct::APPLICATION_JSON | ct::TEXT_JSON => {},
            "" if extension == "json" => {},
            ct::XML | ct::TEXT_XML => {
                debug!(part = %part, "XML payloads are not supported");
                return Err(unsupported());
            },
            "" if extension == "xml" => {
                debug!(part = %part, "XML payloads are not supported");
                return Err(unsupported());
            },
            _ => return Err(unsupported()),
        }

        debug!(part = %part, "Parsing AAS objects from JSON part");
        let stream = self.package.open_part(part)?;
        Ok(read_aas_json_file(stream)?)
    }

    /// Rewrite the File values of a submodel to absolute part names and copy the
    /// referenced parts into the file store.
    fn collect_supplementary_files<F>(
        &mut self,
        part: &PackURI,
        submodel: &Submodel,
        file_store: &mut F,
    ) -> Result<Submodel>
    where
        F: SupplementaryFileStore + ?Sized,
    {
        map_files(submodel, |file| -> Result<File> {
            let Some(value) = &file.value else {
                return Ok(file.clone());
            };

            let absolute = PackURI::resolve(part.base_uri(), value).map_err(OpcError::InvalidPackUri)?;
            if !file_store.contains(absolute.as_str()) {
                debug!(file = %absolute, "Reading supplementary file from AASX package");
                let mut stream = self.package.open_part(&absolute)?;
                let content_type = self.package.get_content_type(&absolute).to_string();
                file_store.add_file(absolute.as_str(), &mut stream, &content_type)?;
            }

            Ok(File {
                value: Some(absolute.to_string()),
                ..file.clone()
            })
        })
    }
}
