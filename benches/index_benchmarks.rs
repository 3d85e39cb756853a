use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupescan::duplicates::{FileClassifier, HashIndex, Item, ScanPipeline};
use dupescan::scanner::{Hasher, Walker};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, format!("content of file {}", i)).expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}

// 1. Directory Walking Benchmarks
fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> roughly 150 files
    let roots = [temp_dir.path().to_path_buf()];

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(&roots, &[]).unwrap();
            let mut objects = 0usize;
            walker
                .walk(|object| {
                    black_box(object.identity());
                    objects += 1;
                    false
                })
                .unwrap();
            black_box(objects);
        })
    });
}

// 2. Digest Benchmarks
fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher");
    let hasher = Hasher::new();

    for size_kb in [1, 1024, 10240] {
        // 1KB, 1MB, 10MB
        let data = vec![b'a'; size_kb * 1024];
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bench_file.dat");
        fs::write(&file_path, &data).expect("Failed to write bench file");

        group.bench_with_input(format!("blake3_{}KB", size_kb), &file_path, |b, path| {
            b.iter(|| {
                let digest = hasher.digest_file(path).unwrap();
                black_box(digest);
            });
        });
    }
    group.finish();
}

// 3. Index Fold Benchmarks
fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");

    for item_count in [100usize, 10_000] {
        // Every fourth item collides with its neighbor, so the index
        // exercises both insertion paths and group growth.
        let items: Vec<Item> = (0..item_count)
            .map(|i| {
                Item::new(
                    PathBuf::from(format!("/bench/obj_{}", i)),
                    format!("digest_{}", i / 4 * 4),
                )
            })
            .collect();

        group.bench_with_input(format!("add_{}_items", item_count), &items, |b, items| {
            b.iter(|| {
                let mut index = HashIndex::new();
                for item in items {
                    index.add(item.clone());
                }
                black_box(index);
            });
        });
    }
    group.finish();
}

// 4. Full Pipeline Benchmark
fn bench_pipeline(c: &mut Criterion) {
    let temp_dir = setup_test_dir(3, 10); // ~70 files
                                          // Create some duplicates
    let src = temp_dir.path().join("file_0.txt");
    for i in 1..10 {
        let dst = temp_dir.path().join(format!("dup_{}.txt", i));
        fs::copy(&src, &dst).expect("Failed to copy duplicate");
    }

    let pipeline = ScanPipeline::new(FileClassifier::new());
    let roots = [temp_dir.path().to_path_buf()];

    c.bench_function("pipeline_approx_80_files", |b| {
        b.iter(|| {
            let results = pipeline.scan(&roots, &[]).unwrap();
            black_box(results);
        })
    });
}

criterion_group!(
    benches,
    bench_walker,
    bench_hasher,
    bench_index,
    bench_pipeline
);
criterion_main!(benches);
