//! Weighted one-hot encoding of category metadata.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use ndarray::{Array1, Array2};
use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SubstError};
use crate::similarity::cosine_against_rows;

/// Category -> attribute field -> attribute value.
pub type MetadataTable = IndexMap<String, IndexMap<String, Value>>;

/// One row per category, one column per `field_value` pair.
///
/// A column holds the field's weight where the category has that value and
/// zero elsewhere. Columns whose name contains the catch-all marker are dropped.
#[derive(Debug, Clone)]
pub struct MetadataMatrix {
    categories: IndexSet<String>,
    columns: Vec<String>,
    values: Array2<f64>,
}

fn value_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl MetadataMatrix {
    /// Encode `table`. Every field with at least one value needs a weight.
    pub fn build(
        table: &MetadataTable,
        weights: &IndexMap<String, f64>,
        catch_all: &str,
    ) -> Result<Self> {
        // field -> sorted distinct values, fields in first-appearance order
        let mut fields: IndexMap<&str, BTreeSet<String>> = IndexMap::new();
        for attrs in table.values() {
            for (field, value) in attrs {
                let entry = fields.entry(field.as_str()).or_default();
                if let Some(label) = value_label(value) {
                    entry.insert(label);
                }
            }
        }

        let mut columns = Vec::new();
        let mut column_keys = Vec::new();
        for (field, values) in &fields {
            if values.is_empty() {
                continue;
            }
            let weight = *weights
                .get(*field)
                .ok_or_else(|| SubstError::MissingWeight(field.to_string()))?;
            for value in values {
                let name = format!("{}_{}", field, value);
                if name.contains(catch_all) {
                    continue;
                }
                columns.push(name);
                column_keys.push((*field, value.as_str(), weight));
            }
        }

        let categories: IndexSet<String> = table.keys().cloned().collect();
        let mut values = Array2::zeros((categories.len(), columns.len()));
        for (row, attrs) in table.values().enumerate() {
            for (col, (field, value, weight)) in column_keys.iter().enumerate() {
                let hit = attrs
                    .get(*field)
                    .and_then(value_label)
                    .is_some_and(|label| label == *value);
                if hit {
                    values[[row, col]] = *weight;
                }
            }
        }

        debug!(
            categories = categories.len(),
            columns = columns.len(),
            "built metadata matrix"
        );
        Ok(Self {
            categories,
            columns,
            values,
        })
    }

    /// Row of a category.
    pub fn row_of(&self, category: &str) -> Result<usize> {
        self.categories
            .get_index_of(category)
            .ok_or_else(|| SubstError::UnknownCategory(category.to_string()))
    }

    /// Cosine similarity of `category`'s row against every category row.
    pub fn similarity_to(&self, category: &str) -> Result<Array1<f64>> {
        let row = self.row_of(category)?;
        cosine_against_rows(self.values.row(row), self.values.view())
    }

    /// Category names in row order.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.iter().map(String::as_str)
    }

    /// Column names (`field_value`) in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Weighted one-hot values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
