//! Raw ingredient -> canonical category table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SubstError};

/// Mapping from raw ingredient strings to canonical categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categorisation {
    map: IndexMap<String, String>,
}

impl Categorisation {
    /// Wrap an existing mapping.
    pub fn new(map: IndexMap<String, String>) -> Self {
        Self { map }
    }

    /// Category of a raw ingredient.
    pub fn category(&self, ingredient: &str) -> Result<&str> {
        self.map
            .get(ingredient)
            .map(String::as_str)
            .ok_or_else(|| SubstError::UnmappedIngredient(ingredient.to_string()))
    }

    /// Replace every raw ingredient of a recipe by its category.
    ///
    /// `None` when any ingredient is unmapped, so the recipe can be skipped.
    pub fn canonicalize<I, S>(&self, ingredients: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ingredients
            .into_iter()
            .map(|i| self.map.get(i.as_ref()).cloned())
            .collect()
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = indexmap::IndexSet::new();
        for c in self.map.values() {
            seen.insert(c.as_str());
        }
        seen.into_iter().collect()
    }

    /// Add or overwrite one mapping.
    pub fn insert(&mut self, ingredient: impl Into<String>, category: impl Into<String>) {
        self.map.insert(ingredient.into(), category.into());
    }

    /// Merge another table in; its entries win on conflict.
    pub fn extend(&mut self, other: Categorisation) {
        self.map.extend(other.map);
    }

    /// Number of mapped ingredients.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for Categorisation {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Categorisation {
        [
            ("boneless chicken breast", "chicken"),
            ("1 cup of milk", "milk"),
            ("chicken thigh", "chicken"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
    }

    #[test]
    fn canonicalize_maps_or_rejects_whole_recipe() {
        let c = table();
        assert_eq!(
            c.canonicalize(["1 cup of milk", "chicken thigh"]),
            Some(vec!["milk".to_string(), "chicken".to_string()])
        );
        assert_eq!(c.canonicalize(["1 cup of milk", "saffron"]), None);
    }

    #[test]
    fn categories_are_distinct() {
        assert_eq!(table().categories(), ["chicken", "milk"]);
    }

    #[test]
    fn later_tables_win_on_merge() {
        let mut c = table();
        let mut other = Categorisation::default();
        other.insert("chicken thigh", "poultry");
        c.extend(other);
        assert_eq!(c.category("chicken thigh").unwrap(), "poultry");
        assert_eq!(c.len(), 3);
    }
}
