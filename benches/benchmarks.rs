use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use json_db::JsonDb;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("json_db_bench_{}_{}.json", name, size))
}

fn bench_set_get_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_get_delete");
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("manual", size), &size, |b, &size| {
            let path = bench_path("sgd", size);
            let _ = std::fs::remove_file(&path);
            let mut db = JsonDb::builder(&path).write_on_mutate(false).build().unwrap();
            b.iter(|| {
                for i in 0..size {
                    let _ = db.set(format!("k{i}"), i).unwrap();
                }
                for i in 0..size {
                    black_box(db.get(&format!("k{i}")));
                }
                for i in 0..size {
                    let _ = db.delete(&format!("k{i}")).unwrap();
                }
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("blocking", size), &size, |b, &size| {
            let path = bench_path("sync", size);
            let _ = std::fs::remove_file(&path);
            let mut db = JsonDb::builder(&path).write_on_mutate(false).build().unwrap();
            for i in 0..size {
                db.set(format!("k{i}"), i).unwrap();
            }
            b.iter(|| db.sync().unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_extend(c: &mut Criterion) {
    let mut group = c.benchmark_group("extend");
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("manual", size), &size, |b, &size| {
            let path = bench_path("extend", size);
            let _ = std::fs::remove_file(&path);
            let mut db = JsonDb::builder(&path).write_on_mutate(false).build().unwrap();
            let batch: Vec<(String, i32)> = (0..size).map(|i| (format!("k{i}"), i as i32)).collect();
            b.iter(|| db.extend(batch.clone()).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(benches, bench_set_get_delete, bench_sync, bench_extend);
criterion_main!(benches);
