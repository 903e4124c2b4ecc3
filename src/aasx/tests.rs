use super::*;
use crate::model::{
    Asset, AssetAdministrationShell, ConceptDescription, ConceptDictionary, DictObjectStore,
    Entity, EntityType, File, Identifiable, Identifier, KeyElements, ObjectStore, Property,
    Reference, Submodel, SubmodelElement, SubmodelElementCollection,
};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{
    CoreProperties, OpcError, PackURI, PartCompression, Relationships, ZipPackageReader,
    ZipPackageWriter,
};
use std::collections::HashSet;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

const SHELL: &str = "http://acplt.org/Shells/Motor";
const ASSET: &str = "http://acplt.org/Assets/Motor";
const DOCS: &str = "http://acplt.org/Submodels/Documentation";
const NAMEPLATE: &str = "http://acplt.org/Submodels/Nameplate";
const CD_VOLTAGE: &str = "http://acplt.org/CD/Voltage";
const MANUAL: &str = "/aasx/suppl/manual.pdf";
const MANUAL_BYTES: &[u8] = b"%PDF-1.4 manual";

const SHELL_PART: &str = "/aasx/http___acplt_org_Shells_Motor/http___acplt_org_Shells_Motor.aas.json";
const DOCS_PART: &str = "/aasx/http___acplt_org_Shells_Motor/http___acplt_org_Submodels_Documentation/http___acplt_org_Submodels_Documentation.submodel.json";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn id(s: &str) -> Identifier {
    Identifier::iri(s)
}

fn file_element(id_short: &str, value: Option<&str>) -> SubmodelElement {
    SubmodelElement::File(File::new(id_short, "application/pdf", value.map(String::from)))
}

fn shell(shell_id: &str, submodels: &[&str]) -> AssetAdministrationShell {
    let asset = Reference::to(KeyElements::Asset, &id(ASSET));
    let mut shell = AssetAdministrationShell::new(id(shell_id), asset);
    shell.id_short = Some("Motor".to_string());
    shell.submodels = submodels
        .iter()
        .map(|sm| Reference::to(KeyElements::Submodel, &id(sm)))
        .collect();
    shell
}

/// A shell with an asset, two stored submodels, one dangling submodel reference
/// and a concept dictionary listing the same description twice plus a missing one.
fn example_store() -> DictObjectStore {
    let mut store = DictObjectStore::new();

    let mut motor = shell(SHELL, &[DOCS, NAMEPLATE, "http://acplt.org/Submodels/Missing"]);
    let voltage = Reference::to(KeyElements::ConceptDescription, &id(CD_VOLTAGE));
    motor.concept_dictionaries = vec![
        ConceptDictionary {
            id_short: "Electrical".to_string(),
            concept_descriptions: vec![
                voltage.clone(),
                Reference::to(KeyElements::ConceptDescription, &id("http://acplt.org/CD/Missing")),
            ],
        },
        ConceptDictionary {
            id_short: "Duplicates".to_string(),
            concept_descriptions: vec![voltage],
        },
    ];
    store.add(motor.into()).unwrap();
    store.add(Asset::new(id(ASSET)).into()).unwrap();
    store.add(ConceptDescription::new(id(CD_VOLTAGE)).into()).unwrap();

    let mut docs = Submodel::new(id(DOCS));
    docs.submodel_elements = vec![
        SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
            id_short: "Manuals".to_string(),
            ordered: true,
            value: vec![file_element("OperatingManual", Some(MANUAL))],
        }),
        file_element("NotYetAvailable", None),
    ];
    store.add(docs.into()).unwrap();

    let mut nameplate = Submodel::new(id(NAMEPLATE));
    nameplate.submodel_elements = vec![SubmodelElement::Property(Property {
        id_short: "ManufacturerName".to_string(),
        value_type: "string".to_string(),
        value: Some("ACPLT".to_string()),
    })];
    store.add(nameplate.into()).unwrap();

    // Never referenced by any shell
    store.add(Submodel::new(id("http://acplt.org/Submodels/Unrelated")).into()).unwrap();
    store
}

fn example_files() -> DictSupplementaryFileStore {
    let mut files = DictSupplementaryFileStore::new();
    files
        .add_file(MANUAL, &mut &MANUAL_BYTES[..], ct::PDF)
        .unwrap();
    files
}

fn write_example() -> Vec<u8> {
    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    writer.close().unwrap().into_inner()
}

/// Build a package by hand: `parts` are (name, content type, content), `rels` are
/// (source, relationship type, target) with `None` for the package root.
fn craft_package(parts: &[(&str, &str, &[u8])], rels: &[(Option<&str>, &str, &str)]) -> Vec<u8> {
    let mut package = ZipPackageWriter::new(Cursor::new(Vec::new()), PartCompression::Deflated);
    for (name, content_type, content) in parts {
        package
            .write_part(&PackURI::new(*name).unwrap(), content_type, content)
            .unwrap();
    }

    let mut sources: Vec<Option<&str>> = Vec::new();
    for (source, _, _) in rels {
        if !sources.contains(source) {
            sources.push(*source);
        }
    }
    for source in sources {
        let source_uri = source.map(|s| PackURI::new(s).unwrap());
        let mut list = match &source_uri {
            Some(uri) => Relationships::for_source(uri),
            None => Relationships::default(),
        };
        for (_, reltype, target) in rels.iter().filter(|(s, _, _)| *s == source) {
            list.add(reltype, &PackURI::new(*target).unwrap());
        }
        package.write_relationships(&list, source_uri.as_ref()).unwrap();
    }

    package.close().unwrap().into_inner()
}

#[test]
fn test_round_trip() {
    init_tracing();
    let source = example_store();
    let data = write_example();

    let mut objects = DictObjectStore::new();
    let mut files = DictSupplementaryFileStore::new();
    let mut reader = AasxReader::from_bytes(data).unwrap();
    let ids = reader.read_into(&mut objects, &mut files).unwrap();

    let expected: HashSet<Identifier> = [SHELL, ASSET, CD_VOLTAGE, DOCS, NAMEPLATE]
        .into_iter()
        .map(id)
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(objects.len(), expected.len());
    for identifier in &expected {
        assert_eq!(
            objects.get_identifiable(identifier),
            source.get_identifiable(identifier),
            "{} differs after round trip",
            identifier
        );
    }

    assert_eq!(files.names().collect::<Vec<_>>(), [MANUAL]);
    assert_eq!(files.get_file(MANUAL), Some(MANUAL_BYTES));
    assert_eq!(files.get_content_type(MANUAL), Some(ct::PDF));

    assert!(reader.get_thumbnail().unwrap().is_none());
    assert!(matches!(
        reader.get_core_properties(),
        Err(AasxError::MissingRelationship(rt::CORE_PROPERTIES))
    ));
    reader.close();
}

#[test]
fn test_round_trip_through_trait_objects() {
    let source = example_store();
    let files = example_files();
    let source_store: &dyn ObjectStore = &source;
    let source_files: &dyn SupplementaryFileStore = &files;

    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id(SHELL), source_store, source_files).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut objects = DictObjectStore::new();
    let mut read_files = DictSupplementaryFileStore::new();
    let target: &mut dyn ObjectStore = &mut objects;
    let target_files: &mut dyn SupplementaryFileStore = &mut read_files;
    let ids = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(target, target_files)
        .unwrap();

    assert_eq!(ids.len(), 5);
    assert_eq!(objects.len(), 5);
    assert_eq!(read_files.get_file(MANUAL), Some(MANUAL_BYTES));
}

#[test]
fn test_part_names_and_relationships() {
    let mut package = ZipPackageReader::new(Cursor::new(write_example())).unwrap();

    let origin = PackURI::new("/aasx/aasx-origin").unwrap();
    let root = package.get_related_parts_by_type(None).unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root[rt::AASX_ORIGIN], vec![origin.clone()]);
    assert_eq!(package.get_content_type(&origin), ct::TEXT_PLAIN);

    let shell_part = PackURI::new(SHELL_PART).unwrap();
    let from_origin = package.get_related_parts_by_type(Some(&origin)).unwrap();
    assert_eq!(from_origin[rt::AAS_SPEC], vec![shell_part.clone()]);
    assert_eq!(package.get_content_type(&shell_part), ct::APPLICATION_JSON);

    let split = package.srels_for(Some(&shell_part)).unwrap();
    let ids: Vec<&str> = split.iter().map(|r| r.r_id.as_str()).collect();
    assert_eq!(ids, ["rId1", "rId2"]);
    let targets: Vec<String> = split
        .iter()
        .map(|r| r.target_partname().unwrap().to_string())
        .collect();
    assert_eq!(
        targets,
        [
            DOCS_PART,
            "/aasx/http___acplt_org_Shells_Motor/http___acplt_org_Submodels_Nameplate/http___acplt_org_Submodels_Nameplate.submodel.json",
        ]
    );

    let docs_part = PackURI::new(DOCS_PART).unwrap();
    let suppl = package.get_related_parts_by_type(Some(&docs_part)).unwrap();
    assert_eq!(suppl[rt::AAS_SUPPL], vec![PackURI::new(MANUAL).unwrap()]);
    assert_eq!(package.get_content_type(&PackURI::new(MANUAL).unwrap()), ct::PDF);
}

#[test]
fn test_shell_part_bundles_asset_and_concept_descriptions() {
    let mut package = ZipPackageReader::new(Cursor::new(write_example())).unwrap();
    let stream = package.open_part(&PackURI::new(SHELL_PART).unwrap()).unwrap();
    let bundle = crate::model::read_aas_json_file(stream).unwrap();

    let kinds: Vec<KeyElements> = bundle.iter().map(Identifiable::kind).collect();
    assert_eq!(bundle.len(), 3);
    assert!(kinds.contains(&KeyElements::AssetAdministrationShell));
    assert!(kinds.contains(&KeyElements::Asset));
    assert!(kinds.contains(&KeyElements::ConceptDescription));
}

#[test]
fn test_duplicates_first_seen_wins() {
    init_tracing();

    // Two shells bundling the same asset
    let mut source = example_store();
    source.add(shell("http://acplt.org/Shells/Spare", &[]).into()).unwrap();
    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id(SHELL), &source, &example_files()).unwrap();
    writer.write_aas(&id("http://acplt.org/Shells/Spare"), &source, &example_files()).unwrap();
    let data = writer.close().unwrap().into_inner();

    // The destination already knows the nameplate submodel
    let mut existing = Submodel::new(id(NAMEPLATE));
    existing.id_short = Some("AlreadyThere".to_string());
    let mut objects = DictObjectStore::new();
    objects.add(existing.clone().into()).unwrap();

    let mut files = DictSupplementaryFileStore::new();
    let ids = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut objects, &mut files)
        .unwrap();

    assert!(ids.contains(&id(ASSET)));
    assert!(ids.contains(&id("http://acplt.org/Shells/Spare")));
    assert!(!ids.contains(&id(NAMEPLATE)));
    assert_eq!(ids.len(), 5);
    assert_eq!(
        objects.get_identifiable(&id(NAMEPLATE)),
        Some(&Identifiable::Submodel(existing))
    );
}

#[test]
fn test_conflicting_definitions_keep_first() {
    let first = r#"{
        "assetAdministrationShells": [{
            "identification": {"id": "urn:shell", "idType": "IRI"},
            "idShort": "First",
            "asset": {"keys": []}
        }],
        "assets": [{"identification": {"id": "urn:asset", "idType": "IRI"}, "idShort": "FromPackage"}]
    }"#;
    let second = r#"{"assetAdministrationShells": [{
        "identification": {"id": "urn:shell", "idType": "IRI"},
        "idShort": "Second",
        "asset": {"keys": []}
    }]}"#;
    let data = craft_package(
        &[
            ("/aasx/aasx-origin", ct::TEXT_PLAIN, &b""[..]),
            ("/aasx/a/a.aas.json", ct::APPLICATION_JSON, first.as_bytes()),
            ("/aasx/b/b.aas.json", ct::APPLICATION_JSON, second.as_bytes()),
        ],
        &[
            (None, rt::AASX_ORIGIN, "/aasx/aasx-origin"),
            (Some("/aasx/aasx-origin"), rt::AAS_SPEC, "/aasx/a/a.aas.json"),
            (Some("/aasx/aasx-origin"), rt::AAS_SPEC, "/aasx/b/b.aas.json"),
        ],
    );

    let mut existing = Asset::new(id("urn:asset"));
    existing.id_short = Some("Existing".to_string());
    let mut objects = DictObjectStore::new();
    objects.add(existing.clone().into()).unwrap();

    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let ids = tracing::subscriber::with_default(subscriber, || {
        AasxReader::from_bytes(data)
            .unwrap()
            .read_into(&mut objects, &mut DictSupplementaryFileStore::new())
            .unwrap()
    });

    assert_eq!(ids, HashSet::from([id("urn:shell")]));
    let shell = objects
        .get_identifiable(&id("urn:shell"))
        .and_then(Identifiable::as_shell)
        .unwrap();
    assert_eq!(shell.id_short.as_deref(), Some("First"));
    assert_eq!(
        objects.get_identifiable(&id("urn:asset")),
        Some(&Identifiable::Asset(existing))
    );

    // Only the object already in the store is reported
    let logs = logs.contents();
    assert!(logs.contains("Asset[IRI:urn:asset]"), "{}", logs);
    assert!(logs.contains("already contained in the object store"), "{}", logs);
    assert!(!logs.contains("AssetAdministrationShell["), "{}", logs);
}

#[test]
fn test_missing_origin() {
    let data = craft_package(
        &[("/aasx/a/a.aas.json", ct::APPLICATION_JSON, &b"{}"[..])],
        &[],
    );

    let mut objects = DictObjectStore::new();
    let result = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut objects, &mut DictSupplementaryFileStore::new());

    assert!(matches!(
        result,
        Err(AasxError::MissingRelationship(rt::AASX_ORIGIN))
    ));
    assert!(objects.is_empty());
}

#[test]
fn test_origin_without_shells() {
    let data = AasxWriter::new(Cursor::new(Vec::new()))
        .unwrap()
        .close()
        .unwrap()
        .into_inner();

    let result = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new());
    assert!(matches!(
        result,
        Err(AasxError::MissingRelationship(rt::AAS_SPEC))
    ));
}

#[test]
fn test_not_a_package() {
    assert!(matches!(
        AasxReader::from_bytes(b"PK but not really".to_vec()),
        Err(AasxError::InvalidPackage(_))
    ));

    // A zip archive without [Content_Types].xml is not an OPC package either
    let mut zip = crate::opc::phys_pkg::PhysPkgWriter::new(
        Cursor::new(Vec::new()),
        PartCompression::Deflated,
    );
    zip.write(&PackURI::new("/readme.txt").unwrap(), &b"hello"[..]).unwrap();
    let data = zip.finish().unwrap().into_inner();
    assert!(matches!(
        AasxReader::from_bytes(data),
        Err(AasxError::InvalidPackage(OpcError::PartNotFound(_)))
    ));
}

#[test]
fn test_repeated_singleton_writes() {
    let props = CoreProperties::new().title("Motor").creator("ACPLT");
    let thumbnail: &[u8] = &[0x89, b'P', b'N', b'G'];

    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_core_properties(&props).unwrap();
    assert!(matches!(
        writer.write_core_properties(&CoreProperties::new().title("Other")),
        Err(AasxError::RepeatedWrite(_))
    ));

    writer.write_thumbnail("/thumbnail.png", thumbnail, ct::PNG).unwrap();
    assert!(matches!(
        writer.write_thumbnail("/other.png", b"x", ct::PNG),
        Err(AasxError::RepeatedWrite(_))
    ));
    writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut reader = AasxReader::from_bytes(data.clone()).unwrap();
    assert_eq!(reader.get_core_properties().unwrap(), props);
    assert_eq!(reader.get_thumbnail().unwrap().as_deref(), Some(thumbnail));

    // Package relationships in write order, ids sequential
    let mut package = ZipPackageReader::new(Cursor::new(data)).unwrap();
    let root: Vec<(String, String)> = package
        .srels_for(None)
        .unwrap()
        .into_iter()
        .map(|r| (r.r_id, r.reltype))
        .collect();
    assert_eq!(
        root,
        [
            ("rId1".to_string(), rt::AASX_ORIGIN.to_string()),
            ("rId2".to_string(), rt::CORE_PROPERTIES.to_string()),
            ("rId3".to_string(), rt::THUMBNAIL.to_string()),
        ]
    );
    assert!(!package.contains(&PackURI::new("/other.png").unwrap()));
}

#[test]
fn test_xml_and_unknown_parts_rejected() {
    let rels = |target: &'static str| {
        vec![
            (None, rt::AASX_ORIGIN, "/aasx/aasx-origin"),
            (Some("/aasx/aasx-origin"), rt::AAS_SPEC, target),
        ]
    };

    let xml = craft_package(
        &[
            ("/aasx/aasx-origin", ct::TEXT_PLAIN, &b""[..]),
            ("/aasx/s/s.aas.xml", "application/xml; charset=utf-8", &b"<aasenv/>"[..]),
        ],
        &rels("/aasx/s/s.aas.xml"),
    );
    let result = AasxReader::from_bytes(xml)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new());
    assert!(matches!(
        result,
        Err(AasxError::UnsupportedContent { ref extension, .. }) if extension == "xml"
    ));

    let binary = craft_package(
        &[
            ("/aasx/aasx-origin", ct::TEXT_PLAIN, &b""[..]),
            ("/aasx/s/s.aas.bin", "application/octet-stream", &b"\x00"[..]),
        ],
        &rels("/aasx/s/s.aas.bin"),
    );
    let result = AasxReader::from_bytes(binary)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new());
    match result {
        Err(AasxError::UnsupportedContent {
            part,
            content_type,
            extension,
        }) => {
            assert_eq!(part, "/aasx/s/s.aas.bin");
            assert_eq!(content_type, "application/octet-stream");
            assert_eq!(extension, "bin");
        },
        other => panic!("expected UnsupportedContent, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_relative_file_values_are_resolved() {
    let submodel = r#"{"submodels": [{
        "identification": {"id": "urn:sm", "idType": "IRI"},
        "submodelElements": [
            {"modelType": "Entity", "idShort": "Pump", "entityType": "SelfManagedEntity", "statements": [
                {"modelType": "File", "idShort": "Sheet", "mimeType": "application/pdf", "value": "../files/./sheet.pdf"}
            ]},
            {"modelType": "File", "idShort": "Photo", "mimeType": "image/png", "value": "/aasx/files/photo.png"}
        ]
    }]}"#;
    let shell = r#"{"assetAdministrationShells": [{
        "identification": {"id": "urn:shell", "idType": "IRI"},
        "asset": {"keys": []}
    }]}"#;

    // Content types are compared without parameters and case-insensitively
    let data = craft_package(
        &[
            ("/aasx/aasx-origin", ct::TEXT_PLAIN, &b""[..]),
            ("/aasx/s/s.aas.json", ct::TEXT_JSON, shell.as_bytes()),
            ("/aasx/s/m/m.submodel.json", "Application/JSON; charset=utf-8", submodel.as_bytes()),
            ("/aasx/s/files/sheet.pdf", ct::PDF, &b"sheet"[..]),
            ("/aasx/files/photo.png", ct::PNG, &b"photo"[..]),
        ],
        &[
            (None, rt::AASX_ORIGIN, "/aasx/aasx-origin"),
            (Some("/aasx/aasx-origin"), rt::AAS_SPEC, "/aasx/s/s.aas.json"),
            (Some("/aasx/s/s.aas.json"), rt::AAS_SPEC_SPLIT, "/aasx/s/m/m.submodel.json"),
        ],
    );

    let mut objects = DictObjectStore::new();
    let mut files = DictSupplementaryFileStore::new();
    // A file already in the store is not overwritten
    files
        .add_file("/aasx/files/photo.png", &mut &b"local photo"[..], ct::PNG)
        .unwrap();

    AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut objects, &mut files)
        .unwrap();

    let submodel = objects
        .get_identifiable(&id("urn:sm"))
        .and_then(Identifiable::as_submodel)
        .unwrap();
    let values: Vec<&str> = crate::model::traversal::files(submodel)
        .filter_map(|f| f.value.as_deref())
        .collect();
    assert_eq!(values, ["/aasx/s/files/sheet.pdf", "/aasx/files/photo.png"]);
    assert!(matches!(
        &submodel.submodel_elements[0],
        SubmodelElement::Entity(Entity { entity_type: EntityType::SelfManagedEntity, .. })
    ));

    assert_eq!(files.get_file("/aasx/s/files/sheet.pdf"), Some(&b"sheet"[..]));
    assert_eq!(files.get_content_type("/aasx/s/files/sheet.pdf"), Some(ct::PDF));
    assert_eq!(files.get_file("/aasx/files/photo.png"), Some(&b"local photo"[..]));
}

#[test]
fn test_file_missing_from_store_is_skipped() {
    init_tracing();
    let data = {
        let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
        writer
            .write_aas(&id(SHELL), &example_store(), &DictSupplementaryFileStore::new())
            .unwrap();
        writer.close().unwrap().into_inner()
    };

    let mut package = ZipPackageReader::new(Cursor::new(data.clone())).unwrap();
    assert!(!package.contains(&PackURI::new(MANUAL).unwrap()));
    let docs_part = PackURI::new(DOCS_PART).unwrap();
    assert!(package.srels_for(Some(&docs_part)).unwrap().is_empty());

    // The submodel still references the file, which the reader cannot find
    let result = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new());
    assert!(matches!(
        result,
        Err(AasxError::Opc(OpcError::PartNotFound(ref part))) if part == MANUAL
    ));
}

#[test]
fn test_file_referenced_twice_is_written_once() {
    let mut store = DictObjectStore::new();
    store
        .add(shell(SHELL, &[DOCS, NAMEPLATE]).into())
        .unwrap();
    for sm in [DOCS, NAMEPLATE] {
        let mut submodel = Submodel::new(id(sm));
        submodel.submodel_elements = vec![
            file_element("First", Some(MANUAL)),
            file_element("Second", Some("aasx/suppl/../suppl/manual.pdf")),
        ];
        store.add(submodel.into()).unwrap();
    }
    let mut files = example_files();
    files
        .add_file("aasx/suppl/../suppl/manual.pdf", &mut &MANUAL_BYTES[..], ct::PDF)
        .unwrap();

    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id(SHELL), &store, &files).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut package = ZipPackageReader::new(Cursor::new(data)).unwrap();
    let docs_part = PackURI::new(DOCS_PART).unwrap();
    let suppl = package.srels_for(Some(&docs_part)).unwrap();
    assert_eq!(suppl.len(), 2);
    for rel in &suppl {
        assert_eq!(rel.target_partname().unwrap().as_str(), MANUAL);
    }
    assert_eq!(
        package.blob_for(&PackURI::new(MANUAL).unwrap()).unwrap(),
        MANUAL_BYTES
    );
}

#[test]
fn test_relative_file_values_round_trip() {
    let relative = "aasx/suppl/manual.pdf";
    let mut store = DictObjectStore::new();
    store.add(shell(SHELL, &[DOCS]).into()).unwrap();
    let mut docs = Submodel::new(id(DOCS));
    docs.submodel_elements = vec![file_element("OperatingManual", Some(relative))];
    store.add(docs.into()).unwrap();
    let mut files = DictSupplementaryFileStore::new();
    files.add_file(relative, &mut &MANUAL_BYTES[..], ct::PDF).unwrap();

    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id(SHELL), &store, &files).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut objects = DictObjectStore::new();
    let mut read_files = DictSupplementaryFileStore::new();
    AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut objects, &mut read_files)
        .unwrap();

    let submodel = objects
        .get_identifiable(&id(DOCS))
        .and_then(Identifiable::as_submodel)
        .unwrap();
    let values: Vec<&str> = crate::model::traversal::files(submodel)
        .filter_map(|f| f.value.as_deref())
        .collect();
    assert_eq!(values, [MANUAL]);
    assert_eq!(read_files.get_file(MANUAL), Some(MANUAL_BYTES));
    assert_eq!(read_files.get_content_type(MANUAL), Some(ct::PDF));
}

#[test]
fn test_write_unknown_shell() {
    let store = example_store();
    let files = DictSupplementaryFileStore::new();
    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();

    assert!(matches!(
        writer.write_aas(&id("http://acplt.org/Shells/Nope"), &store, &files),
        Err(AasxError::NotFound(_))
    ));
    // Exists, but is not a shell
    assert!(matches!(
        writer.write_aas(&id(DOCS), &store, &files),
        Err(AasxError::NotFound(ref missing)) if *missing == id(DOCS)
    ));
}

#[test]
fn test_shell_name_collisions() {
    let mut store = DictObjectStore::new();
    store.add(shell("urn:motor+1", &[]).into()).unwrap();
    store.add(shell("urn:motor-1", &[]).into()).unwrap();

    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id("urn:motor+1"), &store, &DictSupplementaryFileStore::new()).unwrap();
    writer.write_aas(&id("urn:motor-1"), &store, &DictSupplementaryFileStore::new()).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut package = ZipPackageReader::new(Cursor::new(data)).unwrap();
    let origin = PackURI::new("/aasx/aasx-origin").unwrap();
    let shells = package.get_related_parts_by_type(Some(&origin)).unwrap();
    assert_eq!(
        shells[rt::AAS_SPEC],
        vec![
            PackURI::new("/aasx/urn_motor_1/urn_motor_1.aas.json").unwrap(),
            PackURI::new("/aasx/urn_motor_1_1/urn_motor_1_1.aas.json").unwrap(),
        ]
    );
}

#[test]
fn test_names_differing_only_in_case() {
    let mut store = DictObjectStore::new();
    store.add(shell("urn:Motor", &["urn:Sm", "urn:sm"]).into()).unwrap();
    store.add(shell("urn:motor", &[]).into()).unwrap();
    store.add(Submodel::new(id("urn:Sm")).into()).unwrap();
    store.add(Submodel::new(id("urn:sm")).into()).unwrap();

    let files = DictSupplementaryFileStore::new();
    let mut writer = AasxWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_aas(&id("urn:Motor"), &store, &files).unwrap();
    writer.write_aas(&id("urn:motor"), &store, &files).unwrap();
    let data = writer.close().unwrap().into_inner();

    let mut package = ZipPackageReader::new(Cursor::new(data.clone())).unwrap();
    let origin = PackURI::new("/aasx/aasx-origin").unwrap();
    let shell_part = PackURI::new("/aasx/urn_Motor/urn_Motor.aas.json").unwrap();
    let shells = package.get_related_parts_by_type(Some(&origin)).unwrap();
    assert_eq!(
        shells[rt::AAS_SPEC],
        vec![
            shell_part.clone(),
            PackURI::new("/aasx/urn_motor_1/urn_motor_1.aas.json").unwrap(),
        ]
    );
    let split = package.get_related_parts_by_type(Some(&shell_part)).unwrap();
    assert_eq!(
        split[rt::AAS_SPEC_SPLIT],
        vec![
            PackURI::new("/aasx/urn_Motor/urn_Sm/urn_Sm.submodel.json").unwrap(),
            PackURI::new("/aasx/urn_Motor/urn_sm_1/urn_sm_1.submodel.json").unwrap(),
        ]
    );

    let ids = AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new())
        .unwrap();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_drop_without_close_finalizes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.aasx");

    {
        let mut writer = AasxWriter::create(&path).unwrap();
        writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    }

    let mut objects = DictObjectStore::new();
    let mut files = DictSupplementaryFileStore::new();
    let ids = AasxReader::open(&path)
        .unwrap()
        .read_into(&mut objects, &mut files)
        .unwrap();
    assert_eq!(ids.len(), 5);
    assert!(files.contains(MANUAL));
}

#[test]
fn test_drop_into_borrowed_buffer() {
    let mut buffer = Vec::new();
    {
        let mut writer = AasxWriter::new(Cursor::new(&mut buffer)).unwrap();
        writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    }

    let mut reader = AasxReader::from_reader(Cursor::new(buffer)).unwrap();
    let ids = reader
        .read_into(&mut DictObjectStore::new(), &mut DictSupplementaryFileStore::new())
        .unwrap();
    assert!(ids.contains(&id(SHELL)));
}

#[test]
fn test_stored_compression() {
    let options = WriterOptions::new()
        .compression(PartCompression::Stored)
        .file_compression(PartCompression::Stored);
    let mut writer = AasxWriter::with_options(Cursor::new(Vec::new()), options).unwrap();
    writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    let data = writer.close().unwrap().into_inner();

    // Stored members keep their bytes verbatim inside the archive
    assert!(data.windows(MANUAL_BYTES.len()).any(|w| w == MANUAL_BYTES));

    let mut files = DictSupplementaryFileStore::new();
    AasxReader::from_bytes(data)
        .unwrap()
        .read_into(&mut DictObjectStore::new(), &mut files)
        .unwrap();
    assert_eq!(files.get_file(MANUAL), Some(MANUAL_BYTES));
}

#[test]
fn test_file_based_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("motor.aasx");

    let mut writer = AasxWriter::create(&path).unwrap();
    writer.write_aas(&id(SHELL), &example_store(), &example_files()).unwrap();
    writer.close().unwrap();

    let mut reader = AasxReader::open(&path).unwrap();
    let mut objects = DictObjectStore::new();
    reader
        .read_into(&mut objects, &mut DictSupplementaryFileStore::new())
        .unwrap();
    assert!(objects.contains(&id(DOCS)));

    assert!(matches!(
        AasxReader::open(dir.path().join("missing.aasx")),
        Err(AasxError::InvalidPackage(OpcError::PackageNotFound(_)))
    ));
}
