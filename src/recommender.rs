//! Owns every loaded structure and routes substitute queries to a metric.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::config::{DataLayout, RecommenderConfig};
use crate::corpus;
use crate::errors::{Result, SubstError};
use crate::graph::{parse_graph_tree, RecipeData, RecipeGraphData, UsageCounts};
use crate::kg::{EmbeddingSpace, KnowledgeGraphScorer, OperationTree};
use crate::metadata::{Categorisation, MetadataMatrix, MetadataSimilarity, MetadataTable};
use crate::similarity::{recipe_indicator, CooccurrenceMatrix};
use crate::types::{Ranking, SimilarityMetric, SubstituteScores};

/// Deserialised inputs, before any component is built.
#[derive(Debug, Clone)]
pub struct RecommenderInputs {
    /// Ingredient vocabulary.
    pub vocabulary: IndexSet<String>,
    /// Recipe id -> raw graph.
    pub recipe_graphs: IndexMap<String, RecipeGraphData>,
    /// Entity and relation embeddings with their dictionaries.
    pub embeddings: EmbeddingSpace,
    /// Operation key -> tree, all splits merged.
    pub operations: IndexMap<String, OperationTree>,
    /// Raw ingredient -> category.
    pub categorisation: Categorisation,
    /// Category -> field -> value.
    pub metadata: MetadataTable,
}

/// Substitute recommender.
///
/// Built once; every query afterwards is a pure function of the loaded data.
#[derive(Debug, Clone)]
pub struct Recommender {
    recipes: IndexMap<String, RecipeData>,
    usage: UsageCounts,
    cooccurrence: CooccurrenceMatrix,
    scorer: KnowledgeGraphScorer,
    operations: IndexMap<String, OperationTree>,
    metadata: MetadataSimilarity,
    layout: DataLayout,
}

impl Recommender {
    /// Read every artifact named by `config` and build all components.
    pub fn load(config: &RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let layout = &config.layout;
        let triple_dir = config.triple_data_dir();
        let model_dir = config.model_dir();

        let vocabulary = corpus::load_vocabulary(config.data_dir.join(&layout.ingredients_file))?;
        let recipe_graphs = corpus::load_recipe_graphs(config.data_dir.join(&layout.recipes_file))?;
        info!(
            ingredients = vocabulary.len(),
            recipes = recipe_graphs.len(),
            "loaded vocabulary and recipe graphs"
        );

        let entity_ids = corpus::load_id_dictionary(triple_dir.join(&layout.entities_file))?;
        let relation_ids = corpus::load_id_dictionary(triple_dir.join(&layout.relations_file))?;
        let entities =
            corpus::load_embedding_matrix(model_dir.join(&layout.entity_embedding_file))?;
        let relations =
            corpus::load_embedding_matrix(model_dir.join(&layout.relation_embedding_file))?;
        info!(
            model = %config.model,
            entities = entity_ids.len(),
            relations = relation_ids.len(),
            dim = entities.ncols(),
            "loaded embeddings"
        );
        let embeddings = EmbeddingSpace::new(entities, entity_ids, relations, relation_ids)?;

        let operations = corpus::load_operation_splits(&triple_dir, &layout.operation_splits)?;
        info!(operations = operations.len(), "loaded operation trees");

        let categorisation = corpus::load_categorisation(&config.categorisation_path)?;
        let metadata = corpus::load_metadata_table(&config.metadata_path)?;
        info!(
            mapped = categorisation.len(),
            categories = metadata.len(),
            "loaded categorisation and metadata"
        );

        Self::from_inputs(
            RecommenderInputs {
                vocabulary,
                recipe_graphs,
                embeddings,
                operations,
                categorisation,
                metadata,
            },
            config,
        )
    }

    /// Build every component from in-memory inputs.
    pub fn from_inputs(inputs: RecommenderInputs, config: &RecommenderConfig) -> Result<Self> {
        let recipes = parse_graph_tree(
            &inputs.recipe_graphs,
            &inputs.vocabulary,
            &config.predicate_prefix,
        );
        let usage = UsageCounts::from_recipes(recipes.values());
        let cooccurrence =
            CooccurrenceMatrix::build(recipes.values().map(|r| r.ingredients.iter()), &usage)?;

        let matrix = MetadataMatrix::build(
            &inputs.metadata,
            &config.metadata_weights,
            &config.catch_all_marker,
        )?;
        let metadata = MetadataSimilarity::new(matrix, inputs.categorisation);

        info!(
            recipes = recipes.len(),
            used_ingredients = usage.len(),
            "recommender ready"
        );
        Ok(Self {
            recipes,
            usage,
            cooccurrence,
            scorer: KnowledgeGraphScorer::new(inputs.embeddings),
            operations: inputs.operations,
            metadata,
            layout: config.layout.clone(),
        })
    }

    /// Score every candidate ingredient as a substitute for `ingredient` in `recipe_id`.
    ///
    /// Co-occurrence and metadata metrics return dense vectors in usage order;
    /// knowledge-graph metrics return rankings. `recipe_id` is ignored by metrics
    /// that do not need a recipe.
    pub fn evaluate_substitutes(
        &self,
        ingredient: &str,
        metric: SimilarityMetric,
        recipe_id: &str,
    ) -> Result<SubstituteScores> {
        debug!(ingredient, ?metric, recipe_id, "evaluating substitutes");
        let scores = match metric {
            SimilarityMetric::SimpleCosine => {
                let idx = self.usage.position(ingredient)?;
                SubstituteScores::Dense(self.cooccurrence.cosine_row(idx)?)
            }
            SimilarityMetric::TargetCosine => {
                let recipe = self.recipe(recipe_id)?;
                let indicator = recipe_indicator(&recipe.ingredients, &self.usage)?;
                let idx = self.usage.position(ingredient)?;
                SubstituteScores::Dense(self.cooccurrence.target_weighted_cosine(
                    &self.usage,
                    indicator.view(),
                    idx,
                )?)
            }
            SimilarityMetric::IngredientOutput => {
                let key = self.layout.recipe_output_key(recipe_id);
                let tree = self.operation(&key)?;
                SubstituteScores::Ranked(self.scorer.ingredient_output_similarity(
                    tree,
                    ingredient,
                    self.usage.names(),
                )?)
            }
            SimilarityMetric::RecipeOutput => {
                let key = self.layout.recipe_output_key(recipe_id);
                let tree = self.operation(&key)?;
                SubstituteScores::Ranked(self.scorer.recipe_output_similarity(
                    &key,
                    tree,
                    ingredient,
                    self.usage.names(),
                )?)
            }
            SimilarityMetric::IndividualIngredient => SubstituteScores::Ranked(
                self.scorer
                    .individual_ingredient_similarity(ingredient, self.usage.names())?,
            ),
            SimilarityMetric::MetadataWeighted => {
                SubstituteScores::Dense(self.metadata.similarities(ingredient, &self.usage)?)
            }
        };
        Ok(scores)
    }

    /// `evaluate_substitutes` as `(ingredient, score)` pairs, best first.
    pub fn rank_substitutes(
        &self,
        ingredient: &str,
        metric: SimilarityMetric,
        recipe_id: &str,
    ) -> Result<Ranking> {
        Ok(self
            .evaluate_substitutes(ingredient, metric, recipe_id)?
            .into_ranking(&self.usage))
    }

    /// Parsed recipe by id.
    pub fn recipe(&self, recipe_id: &str) -> Result<&RecipeData> {
        self.recipes
            .get(recipe_id)
            .ok_or_else(|| SubstError::UnknownRecipe(recipe_id.to_string()))
    }

    /// Operation tree by key.
    pub fn operation(&self, key: &str) -> Result<&OperationTree> {
        self.operations
            .get(key)
            .ok_or_else(|| SubstError::UnknownRecipe(key.to_string()))
    }

    /// Every parsed recipe.
    pub fn recipes(&self) -> &IndexMap<String, RecipeData> {
        &self.recipes
    }

    /// Usage counts and the ingredient ordering.
    pub fn usage(&self) -> &UsageCounts {
        &self.usage
    }

    /// Co-occurrence matrix.
    pub fn cooccurrence(&self) -> &CooccurrenceMatrix {
        &self.cooccurrence
    }

    /// Knowledge-graph scorer.
    pub fn scorer(&self) -> &KnowledgeGraphScorer {
        &self.scorer
    }

    /// Metadata similarity.
    pub fn metadata(&self) -> &MetadataSimilarity {
        &self.metadata
    }
}
