//! Configuration for the load phase and metadata weighting.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SubstError};

/// Reserved prefix marking action nodes in recipe graphs.
pub const PREDICATE_PREFIX: &str = "pred_";

/// Column marker for catch-all metadata values that are dropped.
pub const CATCH_ALL_MARKER: &str = "other";

/// File names inside the recommender data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayout {
    /// JSON array with the ingredient vocabulary.
    pub ingredients_file: String,
    /// JSON object recipe id -> `{edges: [...]}`.
    pub recipes_file: String,
    /// Directory holding id dictionaries and operation splits.
    pub triple_data_dir: String,
    /// Entity `index<TAB>name` dictionary.
    pub entities_file: String,
    /// Relation `index<TAB>name` dictionary.
    pub relations_file: String,
    /// Directory holding one sub-directory per trained model.
    pub models_dir: String,
    /// Entity embedding matrix inside the model directory.
    pub entity_embedding_file: String,
    /// Relation embedding matrix inside the model directory.
    pub relation_embedding_file: String,
    /// Operation splits, read as `<split>.txt` and merged in order.
    pub operation_splits: Vec<String>,
    /// Prefix of the operation key of a recipe's output entity.
    pub recipe_output_prefix: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            ingredients_file: "ingredient_list.json".into(),
            recipes_file: "recipe_tree_data.json".into(),
            triple_data_dir: "triple_data".into(),
            entities_file: "entities.dict".into(),
            relations_file: "relations.dict".into(),
            models_dir: "models".into(),
            entity_embedding_file: "entity_embedding.npy".into(),
            relation_embedding_file: "relation_embedding.npy".into(),
            operation_splits: vec!["train".into(), "valid".into(), "test".into()],
            recipe_output_prefix: "RECIPE_OUTPUT_".into(),
        }
    }
}

impl DataLayout {
    /// Operation key of a recipe's output entity, e.g. `RECIPE_OUTPUT_42`.
    pub fn recipe_output_key(&self, recipe_id: &str) -> String {
        format!("{}{}", self.recipe_output_prefix, recipe_id)
    }
}

/// Configuration for loading and querying the recommender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Root of the recommender data directory.
    pub data_dir: PathBuf,
    /// Model sub-directory under `models/`.
    pub model: String,
    /// Raw ingredient -> category JSON object.
    pub categorisation_path: PathBuf,
    /// Category -> field -> value JSON object.
    pub metadata_path: PathBuf,
    /// Weight applied to every one-hot column of a metadata field.
    pub metadata_weights: IndexMap<String, f64>,
    /// Prefix of predicate nodes in recipe graphs.
    #[serde(default = "default_predicate_prefix")]
    pub predicate_prefix: String,
    /// Metadata columns containing this marker are dropped.
    #[serde(default = "default_catch_all_marker")]
    pub catch_all_marker: String,
    /// Data directory file names.
    #[serde(default)]
    pub layout: DataLayout,
}

fn default_predicate_prefix() -> String {
    PREDICATE_PREFIX.into()
}

fn default_catch_all_marker() -> String {
    CATCH_ALL_MARKER.into()
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            model: String::new(),
            categorisation_path: PathBuf::from("categorisation.json"),
            metadata_path: PathBuf::from("metadata.json"),
            metadata_weights: IndexMap::new(),
            predicate_prefix: default_predicate_prefix(),
            catch_all_marker: default_catch_all_marker(),
            layout: DataLayout::default(),
        }
    }
}

impl RecommenderConfig {
    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the load phase cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(SubstError::Config("model name is empty".into()));
        }
        if self.predicate_prefix.is_empty() {
            return Err(SubstError::Config("predicate prefix is empty".into()));
        }
        if let Some((field, w)) = self.metadata_weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(SubstError::Config(format!(
                "weight for {} is not finite: {}",
                field, w
            )));
        }
        Ok(())
    }

    /// Directory holding the configured model's embeddings.
    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join(&self.layout.models_dir).join(&self.model)
    }

    /// Directory holding id dictionaries and operation splits.
    pub fn triple_data_dir(&self) -> PathBuf {
        self.data_dir.join(&self.layout.triple_data_dir)
    }
}
