use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use merkle_inclusion::MerkleTree;
use std::hint::black_box;

fn values(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("value-{i}")).collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for count in [1_000, 10_000, 100_000] {
        let input = values(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| MerkleTree::build(black_box(input.as_slice())).unwrap());
        });
    }
    group.finish();
}

fn bench_prove_and_verify(c: &mut Criterion) {
    let input = values(100_000);
    let tree = MerkleTree::build(&input).unwrap();

    c.bench_function("prove", |b| {
        b.iter(|| tree.get_proof(black_box("value-54321")).unwrap());
    });

    let proof = tree.get_proof("value-54321").unwrap();
    c.bench_function("verify", |b| {
        b.iter(|| MerkleTree::verify(tree.root(), black_box("value-54321"), &proof));
    });
}

criterion_group!(benches, bench_build, bench_prove_and_verify);
criterion_main!(benches);
