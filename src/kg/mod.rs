//! Knowledge-graph scoring over TransE-style entity and relation embeddings.
//!
//! A recipe's derived vector is computed from its operation tree: a leaf is an
//! entity embedding, an internal node is the mean of its children plus the
//! relation embedding. Substituting one ingredient and comparing the derived
//! vectors ranks candidate substitutes.

pub mod embedding;
pub mod scorer;
pub mod tree;

pub use embedding::{EmbeddingSpace, IdMapping};
pub use scorer::{KnowledgeGraphScorer, SubstitutionRankings};
pub use tree::OperationTree;
