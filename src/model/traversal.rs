//! Recursive traversal of submodel elements.

use super::{Entity, File, Submodel, SubmodelElement, SubmodelElementCollection};

/// Depth-first, pre-order iterator over all elements of a submodel.
pub struct SubmodelWalker<'a> {
    stack: Vec<std::slice::Iter<'a, SubmodelElement>>,
}

impl<'a> Iterator for SubmodelWalker<'a> {
    type Item = &'a SubmodelElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(element) => {
                    if let Some(children) = element.children() {
                        self.stack.push(children.iter());
                    }
                    return Some(element);
                },
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

/// Walk every element of a submodel, descending into collections and entities.
pub fn walk_submodel(submodel: &Submodel) -> SubmodelWalker<'_> {
    SubmodelWalker {
        stack: vec![submodel.submodel_elements.iter()],
    }
}

/// Iterate over the File elements of a submodel.
pub fn files(submodel: &Submodel) -> impl Iterator<Item = &File> {
    walk_submodel(submodel).filter_map(|element| match element {
        SubmodelElement::File(file) => Some(file),
        _ => None,
    })
}

/// Rebuild a submodel with every File element replaced by `f(file)`.
///
/// Elements are visited in the same order as [`walk_submodel`]; the first error
/// aborts the rebuild.
pub fn map_files<E, F>(submodel: &Submodel, mut f: F) -> Result<Submodel, E>
where
    F: FnMut(&File) -> Result<File, E>,
{
    Ok(Submodel {
        identification: submodel.identification.clone(),
        id_short: submodel.id_short.clone(),
        submodel_elements: map_elements(&submodel.submodel_elements, &mut f)?,
    })
}

fn map_elements<E, F>(elements: &[SubmodelElement], f: &mut F) -> Result<Vec<SubmodelElement>, E>
where
    F: FnMut(&File) -> Result<File, E>,
{
    elements
        .iter()
        .map(|element| -> Result<SubmodelElement, E> {
            Ok(match element {
                SubmodelElement::File(file) => SubmodelElement::File(f(file)?),
                SubmodelElement::SubmodelElementCollection(c) => {
                    SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
                        id_short: c.id_short.clone(),
                        ordered: c.ordered,
                        value: map_elements(&c.value, f)?,
                    })
                },
                SubmodelElement::Entity(e) => SubmodelElement::Entity(Entity {
                    id_short: e.id_short.clone(),
                    entity_type: e.entity_type,
                    statements: map_elements(&e.statements, f)?,
                    asset: e.asset.clone(),
                }),
                other => other.clone(),
            })
        })
        .collect()
}
