//! Benchmark co-occurrence construction and recursive tree scoring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ingsub_core::{
    CooccurrenceMatrix, EmbeddingSpace, IdMapping, KnowledgeGraphScorer, OperationTree,
    UsageCounts,
};

const INGREDIENTS: usize = 400;
const RECIPES: usize = 2_000;
const DIM: usize = 64;

/// Seeded random ingredient sets of 3 to 12 ingredients.
fn synthetic_recipes(seed: u64) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..RECIPES)
        .map(|_| {
            let size = rng.gen_range(3..13);
            (0..size)
                .map(|_| format!("ing{}", rng.gen_range(0..INGREDIENTS)))
                .collect()
        })
        .collect()
}

fn synthetic_space() -> EmbeddingSpace {
    let entities = Array2::from_shape_fn((INGREDIENTS, DIM), |(i, j)| {
        ((i * 31 + j * 7) % 97) as f64 / 97.0
    });
    let relations = Array2::from_shape_fn((4, DIM), |(i, j)| ((i + j) % 5) as f64 / 50.0);
    EmbeddingSpace::new(
        entities,
        IdMapping::from_names((0..INGREDIENTS).map(|i| format!("ing{}", i))),
        relations,
        IdMapping::from_names(["mix", "bake", "fold", "whisk"]),
    )
    .unwrap()
}

fn synthetic_tree() -> OperationTree {
    let leaf = |i: usize| OperationTree::leaf(format!("ing{}", i));
    OperationTree::relation(
        "bake",
        vec![
            OperationTree::relation("mix", vec![leaf(1), leaf(2), leaf(3)]),
            OperationTree::relation(
                "fold",
                vec![
                    leaf(4),
                    OperationTree::relation("whisk", vec![leaf(1), leaf(5)]),
                ],
            ),
            leaf(6),
        ],
    )
}

fn bench_cooccurrence(c: &mut Criterion) {
    let recipes = synthetic_recipes(42);
    let usage = UsageCounts::from_ingredient_sets(recipes.iter());

    c.bench_function("build_cooccurrence_matrix", |b| {
        b.iter(|| {
            let m = CooccurrenceMatrix::build(recipes.iter(), &usage).unwrap();
            black_box(m);
        });
    });

    let m = CooccurrenceMatrix::build(recipes.iter(), &usage).unwrap();
    c.bench_function("cosine_row", |b| {
        b.iter(|| black_box(m.cosine_row(black_box(0)).unwrap()));
    });
}

fn bench_scorer(c: &mut Criterion) {
    let scorer = KnowledgeGraphScorer::new(synthetic_space());
    let tree = synthetic_tree();
    let pool: Vec<String> = (0..INGREDIENTS).map(|i| format!("ing{}", i)).collect();

    c.bench_function("score_tree_substituted", |b| {
        b.iter(|| black_box(scorer.score(&tree, "ing1", Some("ing9")).unwrap()));
    });

    c.bench_function("ingredient_output_ranking", |b| {
        b.iter(|| {
            black_box(
                scorer
                    .ingredient_output_similarity(&tree, "ing1", pool.iter())
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_cooccurrence, bench_scorer);
criterion_main!(benches);
