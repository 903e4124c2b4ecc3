//! Writing AASX packages.

use super::error::{AasxError, Result};
use super::files::SupplementaryFileStore;
use super::naming::NameFriendlyfier;
use super::options::WriterOptions;
use crate::model::traversal::files;
use crate::model::{
    DictObjectStore, File, Identifiable, Identifier, ObjectStore, Submodel, map_files,
    write_aas_json_file,
};
use crate::opc::constants::{content_type as ct, part_name, relationship_type as rt};
use crate::opc::{CoreProperties, OpcError, PackURI, Relationships, ZipPackageWriter};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Seek, Write};
use std::path::Path;
use tracing::{debug, error, warn};

/// Writer for AASX packages.
///
/// Parts are streamed into the archive as they are produced. Relationships are
/// collected per source part and written once, together with the package
/// relationships and `[Content_Types].xml`, when the writer is closed. A writer
/// dropped without [`AasxWriter::close`] finalizes the package on a best-effort
/// basis.
///
/// ```no_run
/// use aasx::aasx::{AasxWriter, DictSupplementaryFileStore};
/// use aasx::model::{DictObjectStore, Identifier};
///
/// # fn main() -> Result<(), aasx::aasx::AasxError> {
/// let objects = DictObjectStore::new();
/// let files = DictSupplementaryFileStore::new();
///
/// let mut writer = AasxWriter::create("motor.aasx")?;
/// writer.write_aas(&Identifier::iri("http://acplt.org/Shells/Motor"), &objects, &files)?;
/// writer.close()?;
/// # Ok(())
/// # }
/// ```
pub struct AasxWriter<W: Write + Seek> {
    /// Package transport; `None` once finalized
    package: Option<ZipPackageWriter<W>>,

    options: WriterOptions,

    /// Shell parts, targets of the origin's `aas-spec` relationships
    aas_parts: Vec<PackURI>,

    /// Buffered relationships per source part
    part_rels: BTreeMap<PackURI, Relationships>,

    properties_part: Option<PackURI>,
    thumbnail_part: Option<PackURI>,

    /// Names of shell folders
    aas_namer: NameFriendlyfier,
}

impl AasxWriter<fs::File> {
    /// Create an AASX package file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Creating AASX package");
        Self::new(fs::File::create(path)?)
    }
}

impl<W: Write + Seek> AasxWriter<W> {
    /// Start a new package on `sink` with default options.
    pub fn new(sink: W) -> Result<Self> {
        Self::with_options(sink, WriterOptions::default())
    }

    /// Start a new package on `sink`.
    ///
    /// The empty `aasx-origin` part is written immediately.
    pub fn with_options(sink: W, options: WriterOptions) -> Result<Self> {
        let mut package = ZipPackageWriter::new(sink, options.compression);

        debug!("Creating AASX origin part");
        package.write_part(&origin_part()?, ct::TEXT_PLAIN, b"")?;

        Ok(Self {
            package: Some(package),
            options,
            aas_parts: Vec::new(),
            part_rels: BTreeMap::new(),
            properties_part: None,
            thumbnail_part: None,
            aas_namer: NameFriendlyfier::new(),
        })
    }

    /// Write a shell and its submodels.
    ///
    /// The shell is written to `/aasx/{shell}/{shell}.aas.json` together with its
    /// asset and the concept descriptions of its concept dictionaries, as far as
    /// they are found in `object_store`. Every submodel found in `object_store`
    /// gets its own part `/aasx/{shell}/{submodel}/{submodel}.submodel.json`;
    /// missing ones are skipped. Files referenced by the submodels are copied from
    /// `file_store`, which is keyed by the File values as given. Relative values
    /// are taken relative to the package root; the submodel parts store the
    /// resulting absolute part names.
    pub fn write_aas<S, F>(
        &mut self,
        aas_id: &Identifier,
        object_store: &S,
        file_store: &F,
    ) -> Result<()>
    where
        S: ObjectStore + ?Sized,
        F: SupplementaryFileStore + ?Sized,
    {
        let shell = object_store
            .get_identifiable(aas_id)
            .and_then(Identifiable::as_shell)
            .ok_or_else(|| AasxError::NotFound(aas_id.clone()))?;

        let mut bundle = DictObjectStore::new();
        bundle.add(shell.clone().into())?;

        match shell.asset.resolve(object_store) {
            Some(asset) if !bundle.contains(asset.identification()) => bundle.add(asset.clone())?,
            Some(_) => {},
            None => debug!(aas = %aas_id, "Asset not in object store, not adding it to the package"),
        }

        for dictionary in &shell.concept_dictionaries {
            for cd_ref in &dictionary.concept_descriptions {
                // The same description may be listed in several dictionaries
                match cd_ref.resolve(object_store) {
                    Some(cd) if !bundle.contains(cd.identification()) => bundle.add(cd.clone())?,
                    Some(_) => {},
                    None => debug!(
                        aas = %aas_id,
                        "Concept description not in object store, not adding it to the package"
                    ),
                }
            }
        }

        let aas_name = self.aas_namer.get_friendly_name(aas_id);
        let aas_part = PackURI::new(format!("/aasx/{0}/{0}.aas.json", aas_name))
            .map_err(OpcError::InvalidPackUri)?;

        debug!(aas = %aas_id, part = %aas_part, "Writing AAS part");
        self.write_json_part(&aas_part, &bundle)?;
        self.aas_parts.push(aas_part.clone());

        let mut submodel_namer = NameFriendlyfier::new();
        for submodel_ref in &shell.submodels {
            let Some(submodel) = submodel_ref
                .resolve(object_store)
                .and_then(Identifiable::as_submodel)
            else {
                debug!(aas = %aas_id, "Submodel not in object store, not adding it to the package");
                continue;
            };

            let submodel_name = submodel_namer.get_friendly_name(&submodel.identification);
            let submodel_part = PackURI::new(format!(
                "/aasx/{0}/{1}/{1}.submodel.json",
                aas_name, submodel_name
            ))
            .map_err(OpcError::InvalidPackUri)?;

            self.write_submodel_part(file_store, submodel, &submodel_part)?;
            self.add_relationship(&aas_part, rt::AAS_SPEC_SPLIT, &submodel_part);
        }

        Ok(())
    }

    fn write_submodel_part<F>(
        &mut self,
        file_store: &F,
        submodel: &Submodel,
        part: &PackURI,
    ) -> Result<()>
    where
        F: SupplementaryFileStore + ?Sized,
    {
        debug!(submodel = %submodel.identification, part = %part, "Writing submodel part");

        // File values are stored as the part names the files are written to
        let encoded = map_files(submodel, |file| -> Result<File> {
            let Some(value) = &file.value else {
                return Ok(file.clone());
            };
            let file_part = PackURI::normalized(value).map_err(OpcError::InvalidPackUri)?;
            Ok(File {
                value: Some(file_part.to_string()),
                ..file.clone()
            })
        })?;

        let mut bundle = DictObjectStore::new();
        bundle.add(encoded.into())?;
        self.write_json_part(part, &bundle)?;

        let file_compression = self.options.file_compression;
        for file in files(submodel) {
            let Some(file_name) = file.value.as_deref() else {
                continue;
            };
            let Some(content_type) = file_store.get_content_type(file_name) else {
                warn!(
                    file = file_name,
                    submodel = %submodel.identification,
                    "Could not find file {} in file store, referenced from {}",
                    file_name,
                    file.id_short
                );
                continue;
            };

            let file_part = PackURI::normalized(file_name).map_err(OpcError::InvalidPackUri)?;
            let package = self.package()?;
            if !package.contains(&file_part) {
                debug!(file = %file_part, "Writing supplementary file");
                let sink = package.open_part_with(&file_part, content_type, file_compression)?;
                file_store.write_file(file_name, sink)?;
            }
            self.add_relationship(part, rt::AAS_SUPPL, &file_part);
        }

        Ok(())
    }

    /// Write the package's OPC core properties. Can be called only once.
    pub fn write_core_properties(&mut self, core_properties: &CoreProperties) -> Result<()> {
        if self.properties_part.is_some() {
            return Err(AasxError::RepeatedWrite("Core properties"));
        }

        debug!("Writing core properties");
        let part = PackURI::new(part_name::CORE_PROPERTIES).map_err(OpcError::InvalidPackUri)?;
        self.package()?.write_part(
            &part,
            ct::OPC_CORE_PROPERTIES,
            core_properties.to_xml().as_bytes(),
        )?;
        self.properties_part = Some(part);
        Ok(())
    }

    /// Write the package thumbnail to the part `name`. Can be called only once.
    pub fn write_thumbnail(&mut self, name: &str, data: &[u8], content_type: &str) -> Result<()> {
        if self.thumbnail_part.is_some() {
            return Err(AasxError::RepeatedWrite("Package thumbnail"));
        }

        let part = PackURI::normalized(name).map_err(OpcError::InvalidPackUri)?;
        let compression = self.options.file_compression;
        debug!(part = %part, "Writing package thumbnail");
        self.package()?
            .open_part_with(&part, content_type, compression)?
            .write_all(data)?;
        self.thumbnail_part = Some(part);
        Ok(())
    }

    /// Write all relationships and finish the package, returning the sink.
    pub fn close(mut self) -> Result<W> {
        self.finalize()?.ok_or(AasxError::Closed)
    }

    fn package(&mut self) -> Result<&mut ZipPackageWriter<W>> {
        self.package.as_mut().ok_or(AasxError::Closed)
    }

    fn write_json_part(&mut self, part: &PackURI, bundle: &DictObjectStore) -> Result<()> {
        let sink = self.package()?.open_part(part, ct::APPLICATION_JSON)?;
        write_aas_json_file(sink, bundle)?;
        Ok(())
    }

    fn add_relationship(&mut self, source: &PackURI, reltype: &str, target: &PackURI) {
        self.part_rels
            .entry(source.clone())
            .or_insert_with(|| Relationships::for_source(source))
            .add(reltype, target);
    }

    /// Flush buffered relationships and close the package. Returns `None` if the
    /// package was already finalized.
    fn finalize(&mut self) -> Result<Option<W>> {
        let Some(mut package) = self.package.take() else {
            return Ok(None);
        };
        let origin = origin_part()?;

        debug!(count = self.aas_parts.len(), "Writing aas-spec relationships");
        let mut origin_rels = Relationships::for_source(&origin);
        for aas_part in &self.aas_parts {
            origin_rels.add(rt::AAS_SPEC, aas_part);
        }
        package.write_relationships(&origin_rels, Some(&origin))?;

        for (source, rels) in std::mem::take(&mut self.part_rels) {
            package.write_relationships(&rels, Some(&source))?;
        }

        debug!("Writing package relationships");
        let mut package_rels = Relationships::default();
        package_rels.add(rt::AASX_ORIGIN, &origin);
        if let Some(ref part) = self.properties_part {
            package_rels.add(rt::CORE_PROPERTIES, part);
        }
        if let Some(ref part) = self.thumbnail_part {
            package_rels.add(rt::THUMBNAIL, part);
        }
        package.write_relationships(&package_rels, None)?;

        Ok(Some(package.close()?))
    }
}

impl<W: Write + Seek> Drop for AasxWriter<W> {
    fn drop(&mut self) {
        if self.package.is_none() {
            return;
        }
        if let Err(e) = self.finalize() {
            error!(error = %e, "Failed to finalize AASX package on drop");
        }
    }
}

fn origin_part() -> Result<PackURI> {
    Ok(PackURI::new(part_name::AASX_ORIGIN).map_err(OpcError::InvalidPackUri)?)
}
