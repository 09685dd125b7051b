use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use permwalk_core::{perm, ChoiceTable, GeneratorTable, Token, WalkExecutor};

/// Left shift, right shift, and the (0 1) swap on `n` points.
fn lrx(n: usize) -> GeneratorTable {
    let left: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let right = perm::inverse(&left);
    let mut swap = perm::identity(n);
    swap.swap(0, 1);
    GeneratorTable::from_perms(&[left, right, swap], n).unwrap()
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_fill");
    let (num_walks, walks_len) = (4096usize, 64usize);

    for &n in &[16usize, 64] {
        let gens = lrx(n);
        let central: Vec<Token> = (0..n as Token).collect();
        // Deterministic choices so every thread count fills the same batch.
        let choices = ChoiceTable::from_seed(num_walks, walks_len, gens.num_gens(), 2024).unwrap();
        group.throughput(Throughput::Elements((num_walks * walks_len * n) as u64));

        for &threads in &[0usize, 2, 4, 8] {
            let exec = WalkExecutor::new(threads);
            group.bench_function(BenchmarkId::new(format!("n={n}"), format!("threads={threads}")), |b| {
                b.iter(|| black_box(exec.execute(black_box(&gens), &central, &choices).unwrap()));
            });
        }
    }
    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("choice_sample");
    for &num_walks in &[1024usize, 16384] {
        group.throughput(Throughput::Elements((num_walks * 63) as u64));
        group.bench_function(BenchmarkId::new("chacha8", num_walks), |b| {
            b.iter(|| black_box(ChoiceTable::from_seed(num_walks, 64, 3, 7).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill, bench_sample);
criterion_main!(benches);
