//! Recursive TransE-style scoring of operation trees.

use std::collections::HashSet;

use ndarray::Array1;

use crate::errors::{Result, SubstError};
use crate::kg::{EmbeddingSpace, OperationTree};
use crate::similarity::{cosine, cosine_against_rows};
use crate::types::{rank_descending, Ranking};

/// Both knowledge-graph rankings of one substitution query.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionRankings {
    /// Substituted vector against the un-substituted derived vector.
    pub to_calculated: Ranking,
    /// Substituted vector against the recipe entity's own embedding.
    pub to_recipe: Ranking,
}

/// Scores operation trees against an embedding space.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphScorer {
    space: EmbeddingSpace,
}

impl KnowledgeGraphScorer {
    /// Wrap an embedding space.
    pub fn new(space: EmbeddingSpace) -> Self {
        Self { space }
    }

    /// Underlying embeddings.
    pub fn space(&self) -> &EmbeddingSpace {
        &self.space
    }

    /// Derived vector of `tree`.
    ///
    /// Every leaf equal to `remove` is looked up as `replace` instead, when given.
    /// An internal node is the mean of its children plus its relation vector.
    pub fn score(
        &self,
        tree: &OperationTree,
        remove: &str,
        replace: Option<&str>,
    ) -> Result<Array1<f64>> {
        match tree {
            OperationTree::Leaf(name) => {
                let entity = match replace {
                    Some(r) if name == remove => r,
                    _ => name.as_str(),
                };
                Ok(self.space.entity(entity)?.to_owned())
            }
            OperationTree::Relation { name, children } => {
                let relation = self.space.relation(name)?;
                if children.is_empty() {
                    return Err(SubstError::MalformedTree(format!(
                        "relation {} has no operands",
                        name
                    )));
                }

                let mut acc = Array1::<f64>::zeros(self.space.dim());
                for child in children {
                    acc += &self.score(child, remove, replace)?;
                }
                acc /= children.len() as f64;
                acc += &relation;
                Ok(acc)
            }
        }
    }

    /// Candidates ranked by how close substituting them keeps the derived vector.
    pub fn ingredient_output_similarity<I, S>(
        &self,
        tree: &OperationTree,
        ingredient: &str,
        candidates: I,
    ) -> Result<Ranking>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = self.score(tree, ingredient, None)?;
        let mut scored = Vec::new();
        for cand in candidates {
            let cand = cand.as_ref();
            let v = self.score(tree, ingredient, Some(cand))?;
            scored.push((cand.to_string(), cosine(base.view(), v.view())?));
        }
        Ok(rank_descending(scored))
    }

    /// Candidates ranked by how close substituting them brings the derived
    /// vector to the embedding of `target_recipe`.
    pub fn recipe_output_similarity<I, S>(
        &self,
        target_recipe: &str,
        tree: &OperationTree,
        ingredient: &str,
        candidates: I,
    ) -> Result<Ranking>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let recipe = self.space.entity(target_recipe)?;
        let mut scored = Vec::new();
        for cand in candidates {
            let cand = cand.as_ref();
            let v = self.score(tree, ingredient, Some(cand))?;
            scored.push((cand.to_string(), cosine(recipe, v.view())?));
        }
        Ok(rank_descending(scored))
    }

    /// Both rankings from one pass over the candidates.
    pub fn substitution_rankings<I, S>(
        &self,
        target_recipe: &str,
        tree: &OperationTree,
        ingredient: &str,
        candidates: I,
    ) -> Result<SubstitutionRankings>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = self.score(tree, ingredient, None)?;
        let recipe = self.space.entity(target_recipe)?;

        let mut to_calculated = Vec::new();
        let mut to_recipe = Vec::new();
        for cand in candidates {
            let cand = cand.as_ref();
            let v = self.score(tree, ingredient, Some(cand))?;
            to_calculated.push((cand.to_string(), cosine(base.view(), v.view())?));
            to_recipe.push((cand.to_string(), cosine(recipe, v.view())?));
        }

        Ok(SubstitutionRankings {
            to_calculated: rank_descending(to_calculated),
            to_recipe: rank_descending(to_recipe),
        })
    }

    /// Entities in `pool` ranked by cosine of their own embedding to `target`'s.
    ///
    /// Tree structure is ignored. Before ranking, entities are visited in id order.
    pub fn individual_ingredient_similarity<I, S>(&self, target: &str, pool: I) -> Result<Ranking>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pool: HashSet<String> = pool.into_iter().map(|s| s.as_ref().to_string()).collect();
        let target_vec = self.space.entity(target)?;
        let sims = cosine_against_rows(target_vec, self.space.entities().view())?;

        let scored = self
            .space
            .entity_ids()
            .iter()
            .filter(|(_, name)| pool.contains(*name))
            .map(|(id, name)| (name.to_string(), sims[id]))
            .collect();
        Ok(rank_descending(scored))
    }
}
