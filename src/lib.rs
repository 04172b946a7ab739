#![forbid(unsafe_code)]
#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]

//! # ingsub-core
//!
//! Core library for recommending ingredient substitutes:
//! - recipe operation graphs parsed into per-recipe ingredient sets
//! - ingredient co-occurrence matrix with cosine similarity queries
//! - TransE-style recipe scoring over operation trees with one ingredient swapped
//! - weighted one-hot category metadata similarity
//!
//! Everything is built once during a load phase and is read-only afterwards,
//! so every query is a deterministic function of its inputs.

pub mod config;
/// Load-phase readers for every external artifact.
pub mod corpus;
pub mod errors;
pub mod graph;
/// Keyword based ingredient grouping.
pub mod grouping;
pub mod kg;
pub mod metadata;
/// Substitute recommender combining every similarity signal.
pub mod recommender;
pub mod similarity;
pub mod types;

pub use config::{DataLayout, RecommenderConfig};
pub use errors::{Result, SubstError};
pub use graph::{parse_graph_tree, RecipeData, RecipeGraph, RecipeGraphData, UsageCounts};
pub use kg::{EmbeddingSpace, IdMapping, KnowledgeGraphScorer, OperationTree, SubstitutionRankings};
pub use metadata::{Categorisation, MetadataMatrix, MetadataSimilarity, MetadataTable};
pub use recommender::{Recommender, RecommenderInputs};
pub use similarity::CooccurrenceMatrix;
pub use types::{Ranking, Score, SimilarityMetric, SubstituteScores};
