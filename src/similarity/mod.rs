//! Cosine similarity kernels and the ingredient co-occurrence model.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::errors::{Result, SubstError};

/// Ingredient co-occurrence matrix and its similarity queries.
pub mod cooccurrence;

pub use cooccurrence::{recipe_indicator, CooccurrenceMatrix};

/// Cosine similarity of two vectors. Zero vectors score `0.0` against everything.
pub fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SubstError::Dimension {
            expected: a.len(),
            found: b.len(),
        });
    }
    let na = a.dot(&a).sqrt();
    let nb = b.dot(&b).sqrt();
    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    Ok(a.dot(&b) / (na * nb))
}

/// Cosine similarity of `query` against every row of `rows`.
pub fn cosine_against_rows(
    query: ArrayView1<'_, f64>,
    rows: ArrayView2<'_, f64>,
) -> Result<Array1<f64>> {
    if rows.ncols() != query.len() {
        return Err(SubstError::Dimension {
            expected: query.len(),
            found: rows.ncols(),
        });
    }

    let qn = query.dot(&query).sqrt();
    Ok(rows
        .outer_iter()
        .map(|row| {
            let rn = row.dot(&row).sqrt();
            if qn == 0.0 || rn == 0.0 {
                0.0
            } else {
                row.dot(&query) / (qn * rn)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn parallel_and_orthogonal() {
        let a = array![1.0, 2.0, 0.0];
        let b = array![2.0, 4.0, 0.0];
        let c = array![0.0, 0.0, 3.0];
        assert!((cosine(a.view(), b.view()).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(cosine(a.view(), c.view()).unwrap(), 0.0);
    }

    #[test]
    fn zero_rows_score_zero() {
        let rows = array![[0.0, 0.0], [1.0, 1.0]];
        let sims = cosine_against_rows(rows.row(0), rows.view()).unwrap();
        assert_eq!(sims.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let rows = array![[1.0, 0.0]];
        let q = array![1.0, 0.0, 0.0];
        assert!(matches!(
            cosine_against_rows(q.view(), rows.view()),
            Err(SubstError::Dimension { expected: 3, found: 2 })
        ));
    }
}
