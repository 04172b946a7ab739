//! Recipe operation trees.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SubstError;

/// How a recipe's vector is derived from entities and relations.
///
/// In JSON a leaf is a string and an internal node is an object with exactly
/// one key, the relation name, mapping to a non-empty array of subtrees:
/// `{"mix": ["egg", {"heat": ["milk", "sugar"]}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum OperationTree {
    /// Entity identifier.
    Leaf(String),
    /// Relation applied to the mean of its children.
    Relation {
        /// Relation name.
        name: String,
        /// Operand subtrees.
        children: Vec<OperationTree>,
    },
}

impl OperationTree {
    /// Leaf for an entity.
    pub fn leaf(name: impl Into<String>) -> Self {
        OperationTree::Leaf(name.into())
    }

    /// Internal node for a relation.
    pub fn relation(name: impl Into<String>, children: Vec<OperationTree>) -> Self {
        OperationTree::Relation {
            name: name.into(),
            children,
        }
    }

    /// Whether some leaf, however deep, names `entity`.
    pub fn contains_leaf(&self, entity: &str) -> bool {
        match self {
            OperationTree::Leaf(name) => name == entity,
            OperationTree::Relation { children, .. } => {
                children.iter().any(|c| c.contains_leaf(entity))
            }
        }
    }

    /// Leaf names in depth-first order, duplicates kept.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            OperationTree::Leaf(name) => out.push(name),
            OperationTree::Relation { children, .. } => {
                for c in children {
                    c.collect_leaves(out);
                }
            }
        }
    }

    /// Number of relation levels above the deepest leaf.
    pub fn depth(&self) -> usize {
        match self {
            OperationTree::Leaf(_) => 0,
            OperationTree::Relation { children, .. } => {
                1 + children.iter().map(OperationTree::depth).max().unwrap_or(0)
            }
        }
    }
}

impl TryFrom<Value> for OperationTree {
    type Error = SubstError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => Ok(OperationTree::Leaf(name)),
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(SubstError::MalformedTree(format!(
                        "expected exactly one relation key, found {}",
                        map.len()
                    )));
                }
                let (name, operands) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| SubstError::MalformedTree("empty relation node".into()))?;

                let items = match operands {
                    Value::Array(items) => items,
                    other => {
                        return Err(SubstError::MalformedTree(format!(
                            "operands of {} are not a list: {}",
                            name, other
                        )))
                    }
                };
                if items.is_empty() {
                    return Err(SubstError::MalformedTree(format!(
                        "relation {} has no operands",
                        name
                    )));
                }

                let children = items
                    .into_iter()
                    .map(OperationTree::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OperationTree::Relation { name, children })
            }
            other => Err(SubstError::MalformedTree(format!(
                "expected entity name or relation object, found {}",
                other
            ))),
        }
    }
}

impl From<OperationTree> for Value {
    fn from(tree: OperationTree) -> Self {
        match tree {
            OperationTree::Leaf(name) => Value::String(name),
            OperationTree::Relation { name, children } => {
                let mut map = Map::new();
                map.insert(
                    name,
                    Value::Array(children.into_iter().map(Value::from).collect()),
                );
                Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_relations() {
        let tree: OperationTree =
            serde_json::from_value(json!({"bake": ["egg", {"mix": ["milk", "flour"]}]})).unwrap();
        assert_eq!(
            tree,
            OperationTree::relation(
                "bake",
                vec![
                    OperationTree::leaf("egg"),
                    OperationTree::relation(
                        "mix",
                        vec![OperationTree::leaf("milk"), OperationTree::leaf("flour")]
                    ),
                ]
            )
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaves(), ["egg", "milk", "flour"]);
        assert!(tree.contains_leaf("flour"));
        assert!(!tree.contains_leaf("mix"));
    }

    #[test]
    fn two_relation_keys_are_malformed() {
        let err = OperationTree::try_from(json!({"a": ["x"], "b": ["y"]})).unwrap_err();
        assert!(matches!(err, SubstError::MalformedTree(_)));
    }

    #[test]
    fn non_list_operands_are_malformed() {
        assert!(OperationTree::try_from(json!({"a": "x"})).is_err());
        assert!(OperationTree::try_from(json!({"a": []})).is_err());
        assert!(OperationTree::try_from(json!(42)).is_err());
        assert!(OperationTree::try_from(json!({})).is_err());
    }

    #[test]
    fn deep_errors_surface_through_serde() {
        let res: Result<OperationTree, _> =
            serde_json::from_value(json!({"a": ["x", {"b": [1]}]}));
        assert!(res.is_err());
    }

    #[test]
    fn serializes_back_to_the_same_shape() {
        let raw = json!({"fry": [{"chop": ["onion"]}, "oil"]});
        let tree = OperationTree::try_from(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&tree).unwrap(), raw);
    }
}
