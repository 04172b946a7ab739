//! Error types for ingsub-core.

use thiserror::Error;

/// Top-level error type for substitute recommendation.
#[derive(Debug, Error)]
pub enum SubstError {
    /// Ingredient has no position in the usage ordering.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(String),

    /// Ingredient is not one of the recipe's own ingredients.
    #[error("ingredient {0} not in recipe")]
    IngredientNotInRecipe(String),

    /// No recipe graph or operation tree under this id.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Entity name without an embedding row.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Relation name without an embedding row.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// Raw ingredient missing from the categorisation table.
    #[error("ingredient {0} has no category mapping")]
    UnmappedIngredient(String),

    /// Category missing from the metadata matrix.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Metadata field without a configured weight.
    #[error("no weight configured for metadata field {0}")]
    MissingWeight(String),

    /// Operation tree that is neither a leaf nor a single-relation node.
    #[error("malformed operation tree: {0}")]
    MalformedTree(String),

    /// Embedding matrix and id mapping disagree.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vectors of different lengths were combined.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    Dimension {
        /// Length required by the left operand.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// Row index outside a matrix.
    #[error("index {index} out of range for {len} rows")]
    Index {
        /// Requested row.
        index: usize,
        /// Number of rows available.
        len: usize,
    },

    /// Configuration-related errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input artifact.
    #[error("corpus error: {0}")]
    Corpus(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// `.npy` read error.
    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

/// Result type for ingsub-core operations.
pub type Result<T> = std::result::Result<T, SubstError>;
