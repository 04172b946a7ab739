//! Assign raw ingredient strings to keyword groups.
//!
//! Groups and their sub-group keywords are plain configuration, so category
//! sets can be swapped without touching the matcher.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::metadata::Categorisation;

/// Name of the bucket for ingredients matching no keyword.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Group -> sub-group keywords, tried in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingConfig {
    /// Groups in priority order.
    pub groups: IndexMap<String, Vec<String>>,
}

impl GroupingConfig {
    /// Read a `{group: [keyword, ...]}` JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }
}

/// Group -> sub-group -> member ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientGrouping {
    /// Grouped ingredients, groups and sub-groups in configuration order.
    pub groups: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl IngredientGrouping {
    fn empty(config: &GroupingConfig) -> Self {
        let mut groups: IndexMap<String, IndexMap<String, Vec<String>>> = config
            .groups
            .iter()
            .map(|(group, subs)| {
                let subs = subs.iter().map(|s| (s.clone(), Vec::new())).collect();
                (group.clone(), subs)
            })
            .collect();
        groups
            .entry(UNCATEGORIZED.to_string())
            .or_default()
            .entry(UNCATEGORIZED.to_string())
            .or_default();
        Self { groups }
    }

    /// Members of one sub-group.
    pub fn members(&self, group: &str, sub_group: &str) -> &[String] {
        self.groups
            .get(group)
            .and_then(|subs| subs.get(sub_group))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ingredients no keyword matched.
    pub fn uncategorized(&self) -> &[String] {
        self.members(UNCATEGORIZED, UNCATEGORIZED)
    }

    /// Ingredient -> sub-group mapping.
    pub fn invert(&self) -> Categorisation {
        let mut out = Categorisation::default();
        for subs in self.groups.values() {
            for (sub_group, members) in subs {
                for ingredient in members {
                    out.insert(ingredient.clone(), sub_group.clone());
                }
            }
        }
        out
    }
}

/// Whether `ingredient` belongs to the sub-group named by `keyword`.
///
/// A multi-word keyword matches as a substring or when each of its words occurs
/// in the ingredient. A single word must occur inside some token of the
/// ingredient that starts with the same character.
pub fn is_part_of_group(keyword: &str, ingredient: &str) -> bool {
    if keyword.contains(' ') {
        if ingredient.contains(keyword) {
            return true;
        }
        return keyword
            .split_whitespace()
            .all(|word| ingredient.contains(word));
    }

    let first = match keyword.chars().next() {
        Some(c) => c,
        None => return false,
    };
    ingredient
        .split(' ')
        .any(|token| token.contains(keyword) && token.starts_with(first))
}

/// Put every ingredient into the first matching sub-group, in configuration order.
pub fn group_ingredients<I, S>(ingredients: I, config: &GroupingConfig) -> IngredientGrouping
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut grouping = IngredientGrouping::empty(config);

    for ingredient in ingredients {
        let ingredient = ingredient.as_ref();
        let hit = config.groups.iter().find_map(|(group, subs)| {
            subs.iter()
                .find(|sub| is_part_of_group(sub, ingredient))
                .map(|sub| (group.as_str(), sub.as_str()))
        });
        let (group, sub) = hit.unwrap_or((UNCATEGORIZED, UNCATEGORIZED));

        if let Some(members) = grouping
            .groups
            .get_mut(group)
            .and_then(|subs| subs.get_mut(sub))
        {
            members.push(ingredient.to_string());
        }
    }

    grouping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GroupingConfig {
        serde_json::from_str(
            r#"{
                "dairy": ["sour cream", "milk", "cheese"],
                "meat": ["chicken", "beef"],
                "vegetable": ["onion", "cream corn"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn single_word_keyword_must_start_a_token() {
        assert!(is_part_of_group("milk", "skim milk"));
        assert!(!is_part_of_group("milk", "buttermilk powder"));
        assert!(is_part_of_group("onion", "onions, diced"));
        assert!(!is_part_of_group("", "anything"));
    }

    #[test]
    fn multi_word_keyword_matches_by_words() {
        assert!(is_part_of_group("sour cream", "light sour cream"));
        assert!(is_part_of_group("sour cream", "cream, sour"));
        assert!(!is_part_of_group("sour cream", "heavy cream"));
    }

    #[test]
    fn first_matching_group_wins() {
        let grouping = group_ingredients(
            ["chicken milk broth", "ground beef", "red onion", "saffron"],
            &config(),
        );
        assert_eq!(grouping.members("dairy", "milk"), ["chicken milk broth"]);
        assert_eq!(grouping.members("meat", "beef"), ["ground beef"]);
        assert_eq!(grouping.members("vegetable", "onion"), ["red onion"]);
        assert_eq!(grouping.uncategorized(), ["saffron"]);
        assert!(grouping.members("meat", "chicken").is_empty());
    }

    #[test]
    fn config_reads_from_a_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, serde_json::to_string(&config()).unwrap()).unwrap();

        let loaded = GroupingConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config());
        assert_eq!(
            loaded.groups.keys().collect::<Vec<_>>(),
            ["dairy", "meat", "vegetable"]
        );

        std::fs::write(&path, r#"{"dairy": "milk"}"#).unwrap();
        assert!(matches!(
            GroupingConfig::from_json_file(&path),
            Err(crate::errors::SubstError::Serde(_))
        ));
    }

    #[test]
    fn inverted_grouping_is_a_categorisation() {
        let grouping = group_ingredients(["whole milk", "beef stock", "kale"], &config());
        let cat = grouping.invert();
        assert_eq!(cat.category("whole milk").unwrap(), "milk");
        assert_eq!(cat.category("beef stock").unwrap(), "beef");
        assert_eq!(cat.category("kale").unwrap(), UNCATEGORIZED);
    }
}
