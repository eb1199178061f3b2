use criterion::{criterion_group, criterion_main, Criterion};
use lumicam::registry::Registry;
use std::sync::Arc;
use std::thread;

pub fn benchmark_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    group.bench_function("register_unregister", |b| {
        let registry = Registry::new();
        b.iter(|| {
            let id = registry.register(0u32);
            registry.unregister(id);
        })
    });

    group.bench_function("lookup_hit", |b| {
        let registry = Registry::new();
        let id = registry.register(0u32);
        b.iter(|| registry.lookup(id))
    });

    group.bench_function("lookup_miss", |b| {
        let registry: Registry<u32> = Registry::new();
        b.iter(|| registry.lookup(u32::MAX))
    });

    for threads in [2, 4, 8] {
        group.bench_with_input(
            format!("contended/{}threads", threads),
            &threads,
            |b, &threads| {
                let registry = Arc::new(Registry::new());
                b.iter(|| {
                    let workers: Vec<_> = (0..threads)
                        .map(|_| {
                            let registry = Arc::clone(&registry);
                            thread::spawn(move || {
                                for _ in 0..100 {
                                    let id = registry.register(0u32);
                                    registry.lookup(id);
                                    registry.unregister(id);
                                }
                            })
                        })
                        .collect();
                    for worker in workers {
                        worker.join().unwrap();
                    }
                })
            },
        );
    }
}

criterion_group!(benches, benchmark_registry);
criterion_main!(benches);
