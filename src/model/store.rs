//! Object stores holding identifiables by their identifier.

use super::{Identifiable, Identifier, ModelError, Result};
use std::collections::BTreeMap;

/// Collection of identifiable objects, keyed by identification.
///
/// The trait is object safe, so readers and writers accept `dyn ObjectStore`.
pub trait ObjectStore {
    /// Add an object. Fails if an object with the same identifier is stored.
    fn add(&mut self, obj: Identifiable) -> Result<()>;

    /// Look up an object by identifier.
    fn get_identifiable(&self, id: &Identifier) -> Option<&Identifiable>;

    fn contains(&self, id: &Identifier) -> bool {
        self.get_identifiable(id).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Identifiable> + '_>;
}

/// In-memory object store ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictObjectStore {
    objects: BTreeMap<Identifier, Identifiable>,
}

impl DictObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return an object.
    pub fn remove(&mut self, id: &Identifier) -> Option<Identifiable> {
        self.objects.remove(id)
    }
}

impl ObjectStore for DictObjectStore {
    fn add(&mut self, obj: Identifiable) -> Result<()> {
        let id = obj.identification().clone();
        if self.objects.contains_key(&id) {
            return Err(ModelError::DuplicateIdentifier(id));
        }
        self.objects.insert(id, obj);
        Ok(())
    }

    fn get_identifiable(&self, id: &Identifier) -> Option<&Identifiable> {
        self.objects.get(id)
    }

    fn contains(&self, id: &Identifier) -> bool {
        self.objects.contains_key(id)
    }

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Identifiable> + '_> {
        Box::new(self.objects.values())
    }
}

impl IntoIterator for DictObjectStore {
    type Item = Identifiable;
    type IntoIter = std::collections::btree_map::IntoValues<Identifier, Identifiable>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_values()
    }
}
