//! Recipe graph construction and per-recipe ingredient sets.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SubstError};

/// Raw graph of one recipe as stored in the recipe corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeGraphData {
    /// `(source, target)` node id pairs.
    pub edges: Vec<(String, String)>,
}

/// Directed preparation-step graph of a single recipe.
///
/// Node ids are either ingredient names or predicate nodes (`pred_<verb>`).
/// Parallel edges collapse into one.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    inner: DiGraph<String, ()>,
    id_to_node: HashMap<String, NodeIndex>,
}

impl RecipeGraph {
    /// Build a graph from an edge list. Nodes are numbered in order of first appearance.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::default();
        for (src, dst) in edges {
            let a = graph.node(src.as_ref());
            let b = graph.node(dst.as_ref());
            graph.inner.update_edge(a, b, ());
        }
        graph
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.id_to_node.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(id.to_string());
        self.id_to_node.insert(id.to_string(), idx);
        idx
    }

    /// Access the underlying petgraph graph.
    pub fn inner(&self) -> &DiGraph<String, ()> {
        &self.inner
    }

    /// Node ids in order of first appearance.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.node_indices().map(move |i| self.inner[i].as_str())
    }

    /// Whether the graph has a node with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Successors of `idx` in edge-insertion order.
    fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks the adjacency list newest-first
        let mut out: Vec<_> = self
            .inner
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.reverse();
        out
    }

    /// Depth-first traversal from `start`, returning every node that gained at
    /// least one tree child, in discovery order. `None` if `start` is not a node.
    pub fn dfs_branch_nodes(&self, start: &str) -> Option<Vec<&str>> {
        let root = *self.id_to_node.get(start)?;

        let mut visited = vec![false; self.inner.node_count()];
        visited[root.index()] = true;
        let mut branches = IndexSet::new();
        let mut stack = vec![(root, self.successors(root), 0usize)];

        while let Some((parent, children, cursor)) = stack.last_mut() {
            let parent = *parent;
            let mut next = None;
            while *cursor < children.len() {
                let child = children[*cursor];
                *cursor += 1;
                if !visited[child.index()] {
                    next = Some(child);
                    break;
                }
            }

            match next {
                Some(child) => {
                    visited[child.index()] = true;
                    branches.insert(parent);
                    let grandchildren = self.successors(child);
                    stack.push((child, grandchildren, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }

        Some(
            branches
                .into_iter()
                .map(|i| self.inner[i].as_str())
                .collect(),
        )
    }
}

/// A parsed recipe: its graph plus the vocabulary ingredients it uses.
#[derive(Debug, Clone)]
pub struct RecipeData {
    /// Preparation-step graph.
    pub graph: RecipeGraph,
    /// Vocabulary ingredients among the graph's nodes, in node order.
    pub ingredients: IndexSet<String>,
}

impl RecipeData {
    /// Actions applied downstream of `ingredient`.
    ///
    /// Every node other than `ingredient` that branches during a depth-first
    /// walk from it contributes the segment after its first `_`.
    pub fn ingredient_actions(&self, ingredient: &str) -> Result<IndexSet<String>> {
        if !self.ingredients.contains(ingredient) {
            return Err(SubstError::IngredientNotInRecipe(ingredient.to_string()));
        }
        let branches = self
            .graph
            .dfs_branch_nodes(ingredient)
            .ok_or_else(|| SubstError::IngredientNotInRecipe(ingredient.to_string()))?;

        Ok(branches
            .into_iter()
            .filter(|node| *node != ingredient)
            .map(|node| node.split('_').nth(1).unwrap_or(node).to_string())
            .collect())
    }
}

/// Parse every recipe graph and extract its ingredient set.
///
/// A node is an ingredient when it does not carry `predicate_prefix` and is in
/// `vocabulary`. Recipe order is preserved.
pub fn parse_graph_tree(
    graph_tree: &IndexMap<String, RecipeGraphData>,
    vocabulary: &IndexSet<String>,
    predicate_prefix: &str,
) -> IndexMap<String, RecipeData> {
    graph_tree
        .iter()
        .map(|(recipe_id, data)| {
            let graph = RecipeGraph::from_edges(data.edges.iter().map(|(a, b)| (a, b)));
            let ingredients = graph
                .node_ids()
                .filter(|node| !node.starts_with(predicate_prefix) && vocabulary.contains(*node))
                .map(str::to_string)
                .collect();
            (recipe_id.clone(), RecipeData { graph, ingredients })
        })
        .collect()
}
