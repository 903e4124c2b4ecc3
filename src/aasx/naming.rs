//! Friendly part names derived from identifiers.

use crate::model::Identifier;
use std::collections::HashSet;

/// Generates unique, URI-safe names from identifiers.
///
/// Every character outside `[A-Za-z0-9]` (including any non-ASCII character) is
/// replaced with `_`. If the result was already issued by this instance, `_1`,
/// `_2`, ... is appended until the name is unique. Names are compared
/// case-insensitively, like OPC part names. Issued names are never
/// released, so calling [`NameFriendlyfier::get_friendly_name`] twice with the
/// same identifier yields two different names.
///
/// ```
/// use aasx::aasx::NameFriendlyfier;
/// use aasx::model::Identifier;
///
/// let mut namer = NameFriendlyfier::new();
/// assert_eq!(
///     namer.get_friendly_name(&Identifier::iri("http://example.com/AAS-a")),
///     "http___example_com_AAS_a"
/// );
/// assert_eq!(
///     namer.get_friendly_name(&Identifier::iri("http://example.com/AAS+a")),
///     "http___example_com_AAS_a_1"
/// );
/// ```
#[derive(Debug, Default)]
pub struct NameFriendlyfier {
    /// Lowercased names issued so far
    issued_names: HashSet<String>,
}

impl NameFriendlyfier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new friendly name for `identifier`.
    pub fn get_friendly_name(&mut self, identifier: &Identifier) -> String {
        let raw_name: String = identifier
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        let mut name = raw_name.clone();
        let mut suffix = 1u32;
        while !self.issued_names.insert(name.to_ascii_lowercase()) {
            name = format!("{}_{}", raw_name, suffix);
            suffix += 1;
        }
        name
    }

    /// Number of names issued so far.
    pub fn len(&self) -> usize {
        self.issued_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued_names.is_empty()
    }
}
