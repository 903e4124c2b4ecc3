//! JSON codec for AAS documents.
//!
//! A document groups identifiables by kind:
//!
//! ```json
//! {
//!   "assetAdministrationShells": [],
//!   "assets": [],
//!   "submodels": [],
//!   "conceptDescriptions": []
//! }
//! ```
//!
//! Missing arrays are treated as empty when decoding.

use super::store::{DictObjectStore, ObjectStore};
use super::{
    Asset, AssetAdministrationShell, ConceptDescription, Identifiable, ModelError, Result, Submodel,
};
use crate::common::bom::{BomKind, detect_bom, strip_utf8_bom};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct AasDocument {
    asset_administration_shells: Vec<AssetAdministrationShell>,
    assets: Vec<Asset>,
    submodels: Vec<Submodel>,
    concept_descriptions: Vec<ConceptDescription>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct AasDocumentRef<'a> {
    asset_administration_shells: Vec<&'a AssetAdministrationShell>,
    assets: Vec<&'a Asset>,
    submodels: Vec<&'a Submodel>,
    concept_descriptions: Vec<&'a ConceptDescription>,
}

/// Decode a JSON document into a new object store.
///
/// A leading UTF-8 byte order mark is ignored; documents marked as UTF-16 or
/// UTF-32 are rejected. Two objects with the same identifier in one document
/// are rejected as well.
pub fn read_aas_json_file<R: Read>(mut reader: R) -> Result<DictObjectStore> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if let Some(kind) = detect_bom(&data).filter(|kind| *kind != BomKind::Utf8) {
        return Err(ModelError::UnsupportedEncoding(kind));
    }

    let document: AasDocument = serde_json::from_slice(strip_utf8_bom(&data))?;

    let mut store = DictObjectStore::new();
    let objects = document
        .asset_administration_shells
        .into_iter()
        .map(Identifiable::from)
        .chain(document.assets.into_iter().map(Identifiable::from))
        .chain(document.submodels.into_iter().map(Identifiable::from))
        .chain(document.concept_descriptions.into_iter().map(Identifiable::from));
    for obj in objects {
        store.add(obj)?;
    }
    Ok(store)
}

/// Encode every object of a store as one JSON document.
pub fn write_aas_json_file<W: Write, S: ObjectStore + ?Sized>(writer: W, store: &S) -> Result<()> {
    let mut document = AasDocumentRef::default();
    for obj in store.iter() {
        match obj {
            Identifiable::AssetAdministrationShell(shell) => {
                document.asset_administration_shells.push(shell)
            },
            Identifiable::Asset(asset) => document.assets.push(asset),
            Identifiable::Submodel(submodel) => document.submodels.push(submodel),
            Identifiable::ConceptDescription(cd) => document.concept_descriptions.push(cd),
        }
    }
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}
