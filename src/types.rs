//! Common core types shared by every similarity signal.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::graph::UsageCounts;

/// Similarity score. All signals are reported in `f64`.
pub type Score = f64;

/// `(ingredient, score)` pairs, highest score first.
pub type Ranking = Vec<(String, Score)>;

/// Closed set of substitute metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityMetric {
    /// Cosine over raw co-occurrence rows.
    SimpleCosine,
    /// Cosine over usage-normalised rows restricted to the target recipe's ingredients.
    TargetCosine,
    /// Substituted recipe vector against the un-substituted one.
    IngredientOutput,
    /// Substituted recipe vector against the recipe entity's embedding.
    RecipeOutput,
    /// Ingredient embedding against every other ingredient embedding.
    IndividualIngredient,
    /// Weighted one-hot category metadata cosine.
    MetadataWeighted,
}

impl SimilarityMetric {
    /// Every metric, in declaration order.
    pub const ALL: [SimilarityMetric; 6] = [
        SimilarityMetric::SimpleCosine,
        SimilarityMetric::TargetCosine,
        SimilarityMetric::IngredientOutput,
        SimilarityMetric::RecipeOutput,
        SimilarityMetric::IndividualIngredient,
        SimilarityMetric::MetadataWeighted,
    ];

    /// Whether the metric needs a recipe id to be evaluated.
    pub fn needs_recipe(self) -> bool {
        matches!(
            self,
            SimilarityMetric::TargetCosine
                | SimilarityMetric::IngredientOutput
                | SimilarityMetric::RecipeOutput
        )
    }
}

/// Result of a substitute query.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstituteScores {
    /// One score per ingredient, aligned with the usage ordering.
    Dense(Array1<Score>),
    /// Already ranked `(ingredient, score)` pairs.
    Ranked(Ranking),
}

impl SubstituteScores {
    /// Convert into a ranking, labelling dense scores with the usage ordering.
    pub fn into_ranking(self, usage: &UsageCounts) -> Ranking {
        match self {
            SubstituteScores::Ranked(r) => r,
            SubstituteScores::Dense(v) => rank_descending(
                usage
                    .names()
                    .zip(v.iter())
                    .map(|(name, &s)| (name.to_string(), s))
                    .collect(),
            ),
        }
    }

    /// Number of scored candidates.
    pub fn len(&self) -> usize {
        match self {
            SubstituteScores::Dense(v) => v.len(),
            SubstituteScores::Ranked(r) => r.len(),
        }
    }

    /// Whether no candidate was scored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sort descending by score. Stable, so ties keep input order.
pub fn rank_descending(mut scored: Ranking) -> Ranking {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}
