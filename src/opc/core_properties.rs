//! OPC core properties (package metadata).
//!
//! Core properties are stored in the `/docProps/core.xml` part and linked from the
//! package root with the core-properties relationship. They follow the Dublin Core
//! metadata standard plus the OPC-specific `cp:` extensions.

use crate::common::xml::{escape_xml, unescape_xml};
use crate::opc::constants::namespace;
use crate::opc::error::{OpcError, Result};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Package core properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    /// Package title
    pub title: Option<String>,
    /// Package subject
    pub subject: Option<String>,
    /// Creator/author
    pub creator: Option<String>,
    /// Keywords (comma-separated)
    pub keywords: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Last modified by
    pub last_modified_by: Option<String>,
    /// Category
    pub category: Option<String>,
    /// Content status (e.g., "Draft", "Final")
    pub content_status: Option<String>,
    /// Unique identifier of the package
    pub identifier: Option<String>,
    /// Language
    pub language: Option<String>,
    /// Revision number
    pub revision: Option<String>,
    /// Version string
    pub version: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
    /// Last printed date
    pub last_printed: Option<DateTime<Utc>>,
}

impl CoreProperties {
    /// Create a new empty set of core properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the subject.
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the creator/author.
    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    /// Set the keywords.
    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the package identifier.
    pub fn identifier(mut self, identifier: &str) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    /// Set the version.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set the creation date.
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Set the modification date.
    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Generate core.xml content for this properties set.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(&format!(
            r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            namespace::OPC_CORE_PROPERTIES
        ));

        let text_elements = [
            ("cp:category", &self.category),
            ("cp:contentStatus", &self.content_status),
            ("dc:creator", &self.creator),
            ("dc:description", &self.description),
            ("dc:identifier", &self.identifier),
            ("cp:keywords", &self.keywords),
            ("dc:language", &self.language),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("cp:revision", &self.revision),
            ("dc:subject", &self.subject),
            ("dc:title", &self.title),
            ("cp:version", &self.version),
        ];
        for (tag, value) in text_elements {
            if let Some(value) = value {
                xml.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(value)));
            }
        }

        // W3CDTF dates carry an xsi:type, lastPrinted does not
        let dates = [
            ("dcterms:created", &self.created),
            ("dcterms:modified", &self.modified),
        ];
        for (tag, value) in dates {
            if let Some(value) = value {
                xml.push_str(&format!(
                    r#"<{tag} xsi:type="dcterms:W3CDTF">{}</{tag}>"#,
                    value.to_rfc3339()
                ));
            }
        }
        if let Some(ref printed) = self.last_printed {
            xml.push_str(&format!(
                "<cp:lastPrinted>{}</cp:lastPrinted>",
                printed.to_rfc3339()
            ));
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }

    /// Parse core properties from core.xml content.
    ///
    /// Unknown elements are skipped; dates that cannot be parsed are ignored.
    pub fn from_xml(xml: &str) -> Result<Self> {
        // No text trimming: entity references split text into several events
        let mut reader = Reader::from_str(xml);

        let mut props = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    if name == b"coreProperties" {
                        buf.clear();
                        continue;
                    }
                    let text = read_text_element(&mut reader)?;
                    match name.as_slice() {
                        b"title" => props.title = text,
                        b"subject" => props.subject = text,
                        b"creator" => props.creator = text,
                        b"keywords" => props.keywords = text,
                        b"description" => props.description = text,
                        b"lastModifiedBy" => props.last_modified_by = text,
                        b"category" => props.category = text,
                        b"contentStatus" => props.content_status = text,
                        b"identifier" => props.identifier = text,
                        b"language" => props.language = text,
                        b"revision" => props.revision = text,
                        b"version" => props.version = text,
                        b"created" => props.created = text.as_deref().and_then(parse_datetime),
                        b"modified" => props.modified = text.as_deref().and_then(parse_datetime),
                        b"lastPrinted" => {
                            props.last_printed = text.as_deref().and_then(parse_datetime)
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Core properties parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(props)
    }
}

/// Read the text content of the element whose start tag was just consumed.
fn read_text_element(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                text.push_str(&unescape_xml(std::str::from_utf8(e.as_ref())?));
            },
            Ok(Event::GeneralRef(e)) => {
                let entity = format!("&{};", std::str::from_utf8(&e)?);
                text.push_str(&unescape_xml(&entity));
            },
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OpcError::XmlError(format!(
                    "Core properties parse error: {}",
                    e
                )));
            },
            _ => {},
        }
        buf.clear();
    }

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Parse an ISO 8601 datetime string into a DateTime<Utc>.
///
/// Supports formats like:
/// - 2023-10-10T14:30:00Z
/// - 2023-10-10T14:30:00.1234567Z
/// - 2023-10-10T14:30:00
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"]
        .into_iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}
