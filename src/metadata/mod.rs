//! Category metadata: raw ingredient categorisation and weighted one-hot similarity.

pub mod categorisation;
pub mod matrix;

pub use categorisation::Categorisation;
pub use matrix::{MetadataMatrix, MetadataTable};

use ndarray::Array1;

use crate::errors::Result;
use crate::graph::UsageCounts;

/// Metadata similarity projected from categories onto raw ingredients.
#[derive(Debug, Clone)]
pub struct MetadataSimilarity {
    matrix: MetadataMatrix,
    categorisation: Categorisation,
}

impl MetadataSimilarity {
    /// Combine a built matrix with the raw-ingredient categorisation.
    pub fn new(matrix: MetadataMatrix, categorisation: Categorisation) -> Self {
        Self {
            matrix,
            categorisation,
        }
    }

    /// Weighted one-hot matrix.
    pub fn matrix(&self) -> &MetadataMatrix {
        &self.matrix
    }

    /// Raw ingredient -> category table.
    pub fn categorisation(&self) -> &Categorisation {
        &self.categorisation
    }

    /// Similarity of `ingredient`'s category to every ingredient in `usage`.
    ///
    /// Each ingredient inherits the score of its own category, so the result is
    /// aligned with the usage ordering.
    pub fn similarities(&self, ingredient: &str, usage: &UsageCounts) -> Result<Array1<f64>> {
        let category = self.categorisation.category(ingredient)?;
        let per_category = self.matrix.similarity_to(category)?;

        usage
            .names()
            .map(|name| {
                let c = self.categorisation.category(name)?;
                Ok(per_category[self.matrix.row_of(c)?])
            })
            .collect::<Result<Vec<_>>>()
            .map(Array1::from)
    }
}
