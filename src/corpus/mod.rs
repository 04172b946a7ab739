//! Readers for the recommender's external artifacts.
//!
//! Each function deserialises one file; none of them interprets the data.

pub mod loader;

pub use loader::{
    load_categorisation, load_embedding_matrix, load_id_dictionary, load_metadata_table,
    load_operation_splits, load_operations, load_recipe_graphs, load_vocabulary,
};
