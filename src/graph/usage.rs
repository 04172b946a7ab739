use indexmap::IndexMap;
use ndarray::Array1;

use crate::errors::{Result, SubstError};
use crate::graph::RecipeData;

/// Number of recipes using each ingredient.
///
/// Insertion order (first appearance over the recipe corpus) is the row/column
/// order of every ingredient-indexed matrix and vector in the crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts {
    counts: IndexMap<String, u32>,
}

impl UsageCounts {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count ingredient membership over every recipe, in recipe order.
    pub fn from_recipes<'a, I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = &'a RecipeData>,
    {
        Self::from_ingredient_sets(recipes.into_iter().map(|r| r.ingredients.iter()))
    }

    /// Count membership over plain ingredient collections.
    pub fn from_ingredient_sets<I, J, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut usage = Self::new();
        for set in sets {
            for ingredient in set {
                usage.add(ingredient.as_ref());
            }
        }
        usage
    }

    fn add(&mut self, ingredient: &str) {
        match self.counts.get_mut(ingredient) {
            Some(c) => *c += 1,
            None => {
                self.counts.insert(ingredient.to_string(), 1);
            }
        }
    }

    /// Stable row index of an ingredient.
    pub fn position(&self, ingredient: &str) -> Result<usize> {
        self.counts
            .get_index_of(ingredient)
            .ok_or_else(|| SubstError::UnknownIngredient(ingredient.to_string()))
    }

    /// Usage count, zero for unseen ingredients.
    pub fn count(&self, ingredient: &str) -> u32 {
        self.counts.get(ingredient).copied().unwrap_or(0)
    }

    /// Whether the ingredient appears in some recipe.
    pub fn contains(&self, ingredient: &str) -> bool {
        self.counts.contains_key(ingredient)
    }

    /// Ingredient names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }

    /// `(ingredient, count)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Counts as a float vector in index order.
    pub fn counts_vector(&self) -> Array1<f64> {
        self.counts.values().map(|&c| f64::from(c)).collect()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of distinct ingredients.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no ingredient was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
