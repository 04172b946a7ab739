use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use crate::errors::{Result, SubstError};
use crate::graph::UsageCounts;
use crate::similarity::cosine_against_rows;

/// Square matrix of recipe counts per ingredient pair.
///
/// Rows and columns follow the `UsageCounts` ordering. The diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CooccurrenceMatrix {
    counts: Array2<u32>,
}

impl CooccurrenceMatrix {
    /// Count, for every ordered pair of distinct ingredients, the recipes using both.
    pub fn build<I, J, S>(ingredient_sets: I, usage: &UsageCounts) -> Result<Self>
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let n = usage.len();
        let mut counts = Array2::<u32>::zeros((n, n));
        let mut recipes = 0usize;

        for set in ingredient_sets {
            let mut idx = set
                .into_iter()
                .map(|ing| usage.position(ing.as_ref()))
                .collect::<Result<Vec<_>>>()?;
            idx.sort_unstable();
            idx.dedup();

            for &a in &idx {
                for &b in &idx {
                    if a != b {
                        counts[[a, b]] += 1;
                    }
                }
            }
            recipes += 1;
        }

        debug!(ingredients = n, recipes, "built co-occurrence matrix");
        Ok(Self { counts })
    }

    /// Raw counts.
    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }

    /// Count of recipes containing both ingredients at positions `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        self.counts.get([i, j]).copied()
    }

    /// Number of ingredient rows.
    pub fn len(&self) -> usize {
        self.counts.nrows()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_row(&self, idx: usize) -> Result<()> {
        if idx >= self.len() {
            return Err(SubstError::Index {
                index: idx,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Cosine similarity of row `idx` against every row, itself included.
    pub fn cosine_row(&self, idx: usize) -> Result<Array1<f64>> {
        self.check_row(idx)?;
        let m = self.counts.mapv(f64::from);
        cosine_against_rows(m.row(idx), m.view())
    }

    /// Cosine similarity restricted to a target recipe's ingredients.
    ///
    /// Each row is divided by its ingredient's usage count, then every column
    /// is multiplied by `indicator` so ingredients outside the target recipe
    /// are zeroed before the cosine.
    pub fn target_weighted_cosine(
        &self,
        usage: &UsageCounts,
        indicator: ArrayView1<'_, f64>,
        idx: usize,
    ) -> Result<Array1<f64>> {
        self.check_row(idx)?;
        if usage.len() != self.len() {
            return Err(SubstError::Dimension {
                expected: self.len(),
                found: usage.len(),
            });
        }
        if indicator.len() != self.len() {
            return Err(SubstError::Dimension {
                expected: self.len(),
                found: indicator.len(),
            });
        }

        let totals = usage.counts_vector();
        let mut prob = self.counts.mapv(f64::from);
        for (mut row, &total) in prob.axis_iter_mut(Axis(0)).zip(totals.iter()) {
            if total > 0.0 {
                row /= total;
            }
            row *= &indicator;
        }

        cosine_against_rows(prob.row(idx), prob.view())
    }
}

/// 0/1 vector over the usage ordering marking a recipe's ingredients.
pub fn recipe_indicator<I, S>(ingredients: I, usage: &UsageCounts) -> Result<Array1<f64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut v = Array1::zeros(usage.len());
    for ing in ingredients {
        v[usage.position(ing.as_ref())?] = 1.0;
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (UsageCounts, CooccurrenceMatrix) {
        let sets = vec![vec!["egg", "milk"], vec!["egg", "flour"]];
        let usage = UsageCounts::from_ingredient_sets(sets.clone());
        let m = CooccurrenceMatrix::build(sets, &usage).unwrap();
        (usage, m)
    }

    #[test]
    fn counts_pairs_of_distinct_ingredients() {
        let (usage, m) = fixture();
        let egg = usage.position("egg").unwrap();
        let milk = usage.position("milk").unwrap();
        let flour = usage.position("flour").unwrap();
        assert_eq!(m.get(egg, milk), Some(1));
        assert_eq!(m.get(egg, flour), Some(1));
        assert_eq!(m.get(milk, flour), Some(0));
        assert_eq!(m.get(egg, egg), Some(0));
    }

    #[test]
    fn matrix_is_symmetric() {
        let sets = vec![
            vec!["a", "b", "c"],
            vec!["a", "c"],
            vec!["b"],
            vec![],
            vec!["c", "d", "a"],
        ];
        let usage = UsageCounts::from_ingredient_sets(sets.clone());
        let m = CooccurrenceMatrix::build(sets, &usage).unwrap();
        assert_eq!(m.counts(), &m.counts().t());
        let a = usage.position("a").unwrap();
        let c = usage.position("c").unwrap();
        assert_eq!(m.get(a, c), Some(3));
    }

    #[test]
    fn unknown_ingredient_fails_build() {
        let usage = UsageCounts::from_ingredient_sets([vec!["egg"]]);
        let err = CooccurrenceMatrix::build([vec!["egg", "tofu"]], &usage).unwrap_err();
        assert!(matches!(err, SubstError::UnknownIngredient(_)));
    }

    #[test]
    fn self_similarity_is_one() {
        let (usage, m) = fixture();
        for name in usage.names() {
            let i = usage.position(name).unwrap();
            let sims = m.cosine_row(i).unwrap();
            assert!((sims[i] - 1.0).abs() < 1e-12, "{} -> {}", name, sims[i]);
        }
    }

    #[test]
    fn milk_and_flour_share_context() {
        let (usage, m) = fixture();
        let milk = usage.position("milk").unwrap();
        let flour = usage.position("flour").unwrap();
        let egg = usage.position("egg").unwrap();
        let sims = m.cosine_row(milk).unwrap();
        // both only co-occur with egg
        assert!((sims[flour] - 1.0).abs() < 1e-12);
        assert_eq!(sims[egg], 0.0);
    }

    #[test]
    fn row_out_of_range() {
        let (_, m) = fixture();
        assert!(matches!(m.cosine_row(3), Err(SubstError::Index { index: 3, len: 3 })));
    }

    #[test]
    fn target_weighting_drops_foreign_columns() {
        let sets = vec![
            vec!["egg", "milk", "sugar"],
            vec!["egg", "butter"],
            vec!["butter", "sugar"],
            vec!["milk", "sugar"],
        ];
        let usage = UsageCounts::from_ingredient_sets(sets.clone());
        let m = CooccurrenceMatrix::build(sets, &usage).unwrap();

        let target = recipe_indicator(["egg", "sugar"], &usage).unwrap();
        let butter = usage.position("butter").unwrap();
        let milk = usage.position("milk").unwrap();
        let sims = m
            .target_weighted_cosine(&usage, target.view(), butter)
            .unwrap();

        // butter: egg 1/2, sugar 1/2 ; milk: egg 1/2, sugar 2/2
        let expected = (0.25 + 0.5) / ((0.5f64).sqrt() * (1.25f64).sqrt());
        assert!((sims[milk] - expected).abs() < 1e-12);
        assert!((sims[butter] - 1.0).abs() < 1e-12);

        // rows with no mass on the target columns score zero
        let sugar = usage.position("sugar").unwrap();
        let only_sugar = recipe_indicator(["sugar"], &usage).unwrap();
        let sims = m
            .target_weighted_cosine(&usage, only_sugar.view(), sugar)
            .unwrap();
        assert!(sims.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn indicator_length_is_checked() {
        let (usage, m) = fixture();
        let short = Array1::zeros(2);
        assert!(matches!(
            m.target_weighted_cosine(&usage, short.view(), 0),
            Err(SubstError::Dimension { .. })
        ));
    }
}
