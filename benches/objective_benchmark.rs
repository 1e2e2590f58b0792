use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tulana::algorithms::RandomSearch;
use tulana::benchmarks::BenchmarkRegistry;
use tulana::core::InstrumentedObjective;
use tulana::traits::{MinimizeOptions, Minimizer, Objective};
use tulana::DVector;

fn objective_benchmark(c: &mut Criterion) {
    let registry = BenchmarkRegistry::standard();
    let benchmark = registry.lookup("branin").unwrap();
    let mut group = c.benchmark_group("instrumented objective");
    for noise_level in [0.0, 0.1] {
        group.bench_with_input(
            BenchmarkId::new("100 evaluations", noise_level),
            &noise_level,
            |b, &noise_level| {
                let x = DVector::from_vec(vec![1.0, 1.0]);
                b.iter(|| {
                    let mut objective = InstrumentedObjective::new(benchmark, noise_level, 0);
                    for _ in 0..100 {
                        black_box(objective.evaluate(&x).unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

fn random_search_benchmark(c: &mut Criterion) {
    let registry = BenchmarkRegistry::standard();
    let benchmark = registry.lookup("hart6").unwrap();
    let mut group = c.benchmark_group("random search");
    for max_calls in [100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("hart6", max_calls),
            &max_calls,
            |b, &max_calls| {
                let options = MinimizeOptions { max_calls, seed: 0 };
                b.iter(|| {
                    let mut objective = InstrumentedObjective::new(benchmark, 0.1, 0);
                    let report = RandomSearch::default()
                        .minimize(&mut objective, benchmark.space(), &options)
                        .unwrap();
                    black_box(report);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, objective_benchmark, random_search_benchmark);
criterion_main!(benches);
