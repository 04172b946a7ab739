//! Recipe operation graphs: ingredient extraction and usage counting.

pub mod recipe;
/// Corpus-wide ingredient usage and the stable index ordering.
pub mod usage;

pub use recipe::{parse_graph_tree, RecipeData, RecipeGraph, RecipeGraphData};
pub use usage::UsageCounts;
