//! Entity and relation embedding tables with their id dictionaries.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1};

use crate::errors::{Result, SubstError};

/// Bidirectional `id <-> name` dictionary of one embedding table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMapping {
    by_name: HashMap<String, usize>,
    by_id: BTreeMap<usize, String>,
}

impl IdMapping {
    /// Build from `(id, name)` pairs.
    ///
    /// A repeated id keeps its last name. A name listed under several ids
    /// resolves to the id whose entry comes last, ids ordered by first appearance.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut ordered: IndexMap<usize, String> = IndexMap::new();
        for (id, name) in pairs {
            ordered.insert(id, name.into());
        }
        let by_name = ordered.iter().map(|(&id, name)| (name.clone(), id)).collect();
        let by_id = ordered.into_iter().collect();
        Self { by_name, by_id }
    }

    /// Build from names listed in id order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_pairs(names.into_iter().enumerate())
    }

    /// Row id of a name.
    pub fn id(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Name stored under a row id.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// `(id, name)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.by_id.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Largest id, if any.
    pub fn max_id(&self) -> Option<usize> {
        self.by_id.keys().next_back().copied()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Entity and relation embeddings sharing one vector space.
#[derive(Debug, Clone)]
pub struct EmbeddingSpace {
    entities: Array2<f64>,
    entity_ids: IdMapping,
    relations: Array2<f64>,
    relation_ids: IdMapping,
}

impl EmbeddingSpace {
    /// Pair matrices with their dictionaries, checking ids fit and dimensions agree.
    pub fn new(
        entities: Array2<f64>,
        entity_ids: IdMapping,
        relations: Array2<f64>,
        relation_ids: IdMapping,
    ) -> Result<Self> {
        if entities.ncols() != relations.ncols() {
            return Err(SubstError::Embedding(format!(
                "entity dimension {} differs from relation dimension {}",
                entities.ncols(),
                relations.ncols()
            )));
        }
        check_ids("entity", &entity_ids, entities.nrows())?;
        check_ids("relation", &relation_ids, relations.nrows())?;

        Ok(Self {
            entities,
            entity_ids,
            relations,
            relation_ids,
        })
    }

    /// Vector dimension.
    pub fn dim(&self) -> usize {
        self.entities.ncols()
    }

    /// Embedding of a named entity.
    pub fn entity(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let id = self
            .entity_ids
            .id(name)
            .ok_or_else(|| SubstError::UnknownEntity(name.to_string()))?;
        Ok(self.entities.row(id))
    }

    /// Embedding of a named relation.
    pub fn relation(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let id = self
            .relation_ids
            .id(name)
            .ok_or_else(|| SubstError::UnknownRelation(name.to_string()))?;
        Ok(self.relations.row(id))
    }

    /// Full entity matrix.
    pub fn entities(&self) -> &Array2<f64> {
        &self.entities
    }

    /// Entity dictionary.
    pub fn entity_ids(&self) -> &IdMapping {
        &self.entity_ids
    }

    /// Relation dictionary.
    pub fn relation_ids(&self) -> &IdMapping {
        &self.relation_ids
    }
}

fn check_ids(kind: &str, ids: &IdMapping, rows: usize) -> Result<()> {
    match ids.max_id() {
        Some(max) if max >= rows => Err(SubstError::Embedding(format!(
            "{} id {} outside matrix with {} rows",
            kind, max, rows
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mapping_is_bidirectional() {
        let ids = IdMapping::from_pairs([(1, "milk"), (0, "egg")]);
        assert_eq!(ids.id("milk"), Some(1));
        assert_eq!(ids.name(0), Some("egg"));
        assert_eq!(ids.iter().map(|(_, n)| n).collect::<Vec<_>>(), ["egg", "milk"]);
        assert_eq!(ids.max_id(), Some(1));
    }

    #[test]
    fn repeated_names_resolve_to_the_last_entry() {
        let ids = IdMapping::from_pairs([(5, "egg"), (1, "egg"), (3, "milk")]);
        assert_eq!(ids.id("egg"), Some(1));
        assert_eq!(ids.name(5), Some("egg"));

        let ids = IdMapping::from_pairs([(0, "egg"), (1, "milk"), (0, "flour")]);
        assert_eq!(ids.name(0), Some("flour"));
        assert_eq!(ids.id("flour"), Some(0));
        assert_eq!(ids.id("egg"), None);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn ids_past_the_matrix_are_rejected() {
        let err = EmbeddingSpace::new(
            array![[1.0, 0.0]],
            IdMapping::from_pairs([(0, "egg"), (3, "milk")]),
            array![[0.0, 1.0]],
            IdMapping::from_names(["mix"]),
        )
        .unwrap_err();
        assert!(matches!(err, SubstError::Embedding(_)));
    }

    #[test]
    fn dimensions_must_agree() {
        let err = EmbeddingSpace::new(
            array![[1.0, 0.0]],
            IdMapping::from_names(["egg"]),
            array![[0.0, 1.0, 0.0]],
            IdMapping::from_names(["mix"]),
        )
        .unwrap_err();
        assert!(matches!(err, SubstError::Embedding(_)));
    }

    #[test]
    fn lookups_fail_fast() {
        let space = EmbeddingSpace::new(
            array![[1.0, 0.0]],
            IdMapping::from_names(["egg"]),
            array![[0.0, 1.0]],
            IdMapping::from_names(["mix"]),
        )
        .unwrap();
        assert_eq!(space.entity("egg").unwrap().to_vec(), vec![1.0, 0.0]);
        assert!(matches!(space.entity("mix"), Err(SubstError::UnknownEntity(_))));
        assert!(matches!(space.relation("egg"), Err(SubstError::UnknownRelation(_))));
    }
}
