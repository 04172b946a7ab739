//! JSON, JSONL, `index<TAB>name`, and `.npy` readers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use ndarray::Array2;
use ndarray_npy::{ReadNpyError, ReadNpyExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{Result, SubstError};
use crate::graph::RecipeGraphData;
use crate::kg::{IdMapping, OperationTree};
use crate::metadata::{Categorisation, MetadataTable};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Ingredient vocabulary from a JSON array of names.
pub fn load_vocabulary(path: impl AsRef<Path>) -> Result<IndexSet<String>> {
    let names: Vec<String> = read_json(path.as_ref())?;
    Ok(names.into_iter().collect())
}

/// Recipe id -> raw graph, in file order.
pub fn load_recipe_graphs(path: impl AsRef<Path>) -> Result<IndexMap<String, RecipeGraphData>> {
    read_json(path.as_ref())
}

/// Raw ingredient -> category.
pub fn load_categorisation(path: impl AsRef<Path>) -> Result<Categorisation> {
    read_json(path.as_ref())
}

/// Category -> field -> value.
pub fn load_metadata_table(path: impl AsRef<Path>) -> Result<MetadataTable> {
    read_json(path.as_ref())
}

/// `index<TAB>name` lines. Blank lines are skipped.
pub fn load_id_dictionary(path: impl AsRef<Path>) -> Result<IdMapping> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut pairs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (index, name) = line.split_once('\t').ok_or_else(|| {
            SubstError::Corpus(format!(
                "{}:{}: expected index<TAB>name",
                path.display(),
                lineno + 1
            ))
        })?;
        let index: usize = index.trim().parse().map_err(|_| {
            SubstError::Corpus(format!(
                "{}:{}: bad index {:?}",
                path.display(),
                lineno + 1,
                index
            ))
        })?;
        pairs.push((index, name.to_string()));
    }

    debug!(path = %path.display(), entries = pairs.len(), "loaded id dictionary");
    Ok(IdMapping::from_pairs(pairs))
}

/// 2-D `.npy` matrix stored as `f32` or `f64`, widened to `f64`.
pub fn load_embedding_matrix(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let path = path.as_ref();
    match Array2::<f32>::read_npy(File::open(path)?) {
        Ok(m) => Ok(m.mapv(f64::from)),
        Err(ReadNpyError::WrongDescriptor(_)) => {
            Ok(Array2::<f64>::read_npy(File::open(path)?)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// One JSONL file of `{key: tree}` objects. Later keys override earlier ones.
pub fn load_operations(path: impl AsRef<Path>) -> Result<IndexMap<String, OperationTree>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut out = IndexMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entries: IndexMap<String, OperationTree> = serde_json::from_str(&line)?;
        out.extend(entries);
    }
    Ok(out)
}

/// Merge `<split>.txt` operation files from `dir`, in split order.
pub fn load_operation_splits<S: AsRef<str>>(
    dir: impl AsRef<Path>,
    splits: &[S],
) -> Result<IndexMap<String, OperationTree>> {
    let dir = dir.as_ref();
    let mut out = IndexMap::new();
    for split in splits {
        let path = dir.join(format!("{}.txt", split.as_ref()));
        let ops = load_operations(&path)?;
        debug!(path = %path.display(), operations = ops.len(), "loaded operation split");
        out.extend(ops);
    }
    Ok(out)
}
