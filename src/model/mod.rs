//! Compact asset administration shell object model.
//!
//! Only the parts of the metamodel the packaging engine needs are represented:
//! identifiable objects (shells, assets, submodels, concept descriptions),
//! references between them, and the submodel elements that can carry
//! supplementary files. No field-level validation is performed.

pub mod json;
pub mod store;
pub mod traversal;

pub use json::{read_aas_json_file, write_aas_json_file};
pub use store::{DictObjectStore, ObjectStore};
pub use traversal::{map_files, walk_submodel};

use crate::common::bom::BomKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by object stores and the JSON codec.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Identifiable with id {0} is already stored")]
    DuplicateIdentifier(Identifier),

    #[error("Unsupported text encoding ({0:?} byte order mark)")]
    UnsupportedEncoding(BomKind),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Kind of a global identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentifierType {
    #[serde(rename = "IRI")]
    Iri,
    #[serde(rename = "IRDI")]
    Irdi,
    Custom,
}

impl IdentifierType {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierType::Iri => "IRI",
            IdentifierType::Irdi => "IRDI",
            IdentifierType::Custom => "Custom",
        }
    }
}

/// Global identifier of an [`Identifiable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub id: String,
    pub id_type: IdentifierType,
}

impl Identifier {
    pub fn new(id: impl Into<String>, id_type: IdentifierType) -> Self {
        Self {
            id: id.into(),
            id_type,
        }
    }

    /// Shorthand for an IRI identifier.
    pub fn iri(id: impl Into<String>) -> Self {
        Self::new(id, IdentifierType::Iri)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id_type.as_str(), self.id)
    }
}

/// Type of the element a [`Key`] points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyElements {
    AssetAdministrationShell,
    Asset,
    Submodel,
    ConceptDescription,
    ConceptDictionary,
    SubmodelElement,
    GlobalReference,
    FragmentReference,
}

/// Kind of the value of a [`Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "IRI")]
    Iri,
    #[serde(rename = "IRDI")]
    Irdi,
    Custom,
    IdShort,
    FragmentId,
}

impl From<IdentifierType> for KeyType {
    fn from(id_type: IdentifierType) -> Self {
        match id_type {
            IdentifierType::Iri => KeyType::Iri,
            IdentifierType::Irdi => KeyType::Irdi,
            IdentifierType::Custom => KeyType::Custom,
        }
    }
}

impl KeyType {
    /// Identifier type of a key that addresses an identifiable, if any.
    pub fn identifier_type(self) -> Option<IdentifierType> {
        match self {
            KeyType::Iri => Some(IdentifierType::Iri),
            KeyType::Irdi => Some(IdentifierType::Irdi),
            KeyType::Custom => Some(IdentifierType::Custom),
            KeyType::IdShort | KeyType::FragmentId => None,
        }
    }
}

/// One step of a [`Reference`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(rename = "type")]
    pub key_type: KeyElements,
    pub local: bool,
    pub value: String,
    pub id_type: KeyType,
}

/// Ordered list of keys pointing at a model element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Reference {
    pub keys: Vec<Key>,
}

impl Reference {
    /// Build a single-key reference to an identifiable of the given kind.
    pub fn to(kind: KeyElements, id: &Identifier) -> Self {
        Self {
            keys: vec![Key {
                key_type: kind,
                local: true,
                value: id.id.clone(),
                id_type: id.id_type.into(),
            }],
        }
    }

    /// Identifier addressed by the first key, if that key holds a global id.
    pub fn identifier(&self) -> Option<Identifier> {
        let key = self.keys.first()?;
        let id_type = key.id_type.identifier_type()?;
        Some(Identifier::new(key.value.clone(), id_type))
    }

    /// Resolve the reference in an object store.
    ///
    /// Returns `None` when the target is missing or is not of the kind the
    /// reference claims.
    pub fn resolve<'a, S: ObjectStore + ?Sized>(&self, store: &'a S) -> Option<&'a Identifiable> {
        let kind = self.keys.first()?.key_type;
        let found = store.get_identifiable(&self.identifier()?)?;
        (found.kind() == kind).then_some(found)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetKind {
    Type,
    #[default]
    Instance,
}

/// Physical or logical asset described by a shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub identification: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default)]
    pub kind: AssetKind,
}

impl Asset {
    pub fn new(identification: Identifier) -> Self {
        Self {
            identification,
            id_short: None,
            kind: AssetKind::default(),
        }
    }
}

/// Named set of concept description references held by a shell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDictionary {
    pub id_short: String,
    #[serde(default)]
    pub concept_descriptions: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAdministrationShell {
    pub identification: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    pub asset: Reference,
    #[serde(default)]
    pub submodels: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept_dictionaries: Vec<ConceptDictionary>,
}

impl AssetAdministrationShell {
    pub fn new(identification: Identifier, asset: Reference) -> Self {
        Self {
            identification,
            id_short: None,
            asset,
            submodels: Vec::new(),
            concept_dictionaries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submodel {
    pub identification: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default)]
    pub submodel_elements: Vec<SubmodelElement>,
}

impl Submodel {
    pub fn new(identification: Identifier) -> Self {
        Self {
            identification,
            id_short: None,
            submodel_elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDescription {
    pub identification: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
}

impl ConceptDescription {
    pub fn new(identification: Identifier) -> Self {
        Self {
            identification,
            id_short: None,
        }
    }
}

/// Element of a submodel, tagged with `modelType` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modelType")]
pub enum SubmodelElement {
    Property(Property),
    File(File),
    Blob(Blob),
    SubmodelElementCollection(SubmodelElementCollection),
    Entity(Entity),
}

impl SubmodelElement {
    pub fn id_short(&self) -> &str {
        match self {
            SubmodelElement::Property(e) => &e.id_short,
            SubmodelElement::File(e) => &e.id_short,
            SubmodelElement::Blob(e) => &e.id_short,
            SubmodelElement::SubmodelElementCollection(e) => &e.id_short,
            SubmodelElement::Entity(e) => &e.id_short,
        }
    }

    /// Nested elements of container elements.
    pub fn children(&self) -> Option<&[SubmodelElement]> {
        match self {
            SubmodelElement::SubmodelElementCollection(c) => Some(&c.value),
            SubmodelElement::Entity(e) => Some(&e.statements),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id_short: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Reference to a supplementary file by its path inside the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id_short: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl File {
    pub fn new(id_short: impl Into<String>, mime_type: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id_short: id_short.into(),
            mime_type: mime_type.into(),
            value,
        }
    }
}

/// Inline binary content, base64 encoded in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub id_short: String,
    pub mime_type: String,
    #[serde(default, with = "blob_serde", skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelElementCollection {
    pub id_short: String,
    #[serde(default)]
    pub ordered: bool,
    #[serde(default)]
    pub value: Vec<SubmodelElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    CoManagedEntity,
    SelfManagedEntity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id_short: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub statements: Vec<SubmodelElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Reference>,
}

mod blob_serde {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_str(&BASE64_STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| {
                BASE64_STANDARD
                    .decode(encoded)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

/// Any object addressable by an [`Identifier`].
#[derive(Debug, Clone, PartialEq)]
pub enum Identifiable {
    AssetAdministrationShell(AssetAdministrationShell),
    Asset(Asset),
    Submodel(Submodel),
    ConceptDescription(ConceptDescription),
}

impl Identifiable {
    pub fn identification(&self) -> &Identifier {
        match self {
            Identifiable::AssetAdministrationShell(o) => &o.identification,
            Identifiable::Asset(o) => &o.identification,
            Identifiable::Submodel(o) => &o.identification,
            Identifiable::ConceptDescription(o) => &o.identification,
        }
    }

    /// Key type used to reference this object.
    pub fn kind(&self) -> KeyElements {
        match self {
            Identifiable::AssetAdministrationShell(_) => KeyElements::AssetAdministrationShell,
            Identifiable::Asset(_) => KeyElements::Asset,
            Identifiable::Submodel(_) => KeyElements::Submodel,
            Identifiable::ConceptDescription(_) => KeyElements::ConceptDescription,
        }
    }

    pub fn as_shell(&self) -> Option<&AssetAdministrationShell> {
        match self {
            Identifiable::AssetAdministrationShell(shell) => Some(shell),
            _ => None,
        }
    }

    pub fn as_submodel(&self) -> Option<&Submodel> {
        match self {
            Identifiable::Submodel(submodel) => Some(submodel),
            _ => None,
        }
    }
}

impl fmt::Display for Identifiable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.kind(), self.identification())
    }
}

impl From<AssetAdministrationShell> for Identifiable {
    fn from(shell: AssetAdministrationShell) -> Self {
        Identifiable::AssetAdministrationShell(shell)
    }
}

impl From<Asset> for Identifiable {
    fn from(asset: Asset) -> Self {
        Identifiable::Asset(asset)
    }
}

impl From<Submodel> for Identifiable {
    fn from(submodel: Submodel) -> Self {
        Identifiable::Submodel(submodel)
    }
}

impl From<ConceptDescription> for Identifiable {
    fn from(cd: ConceptDescription) -> Self {
        Identifiable::ConceptDescription(cd)
    }
}
