// Benchmark: tree building and proof replay throughput
// - Measures elements/sec for root construction across tree sizes
// - Measures multi-proof verification and batch appends at fixed shapes
//
// Run:
//   cargo bench --bench proof_bench
//   cargo bench --bench proof_bench --features rayon   (parallel leaf hashing)
//
// Notes:
// - Uses Criterion for robust statistics.
// - Elements are generated deterministically (no rand dep) so runs are
//   reproducible; witnesses are derived once outside the hot loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use compact_merkle::{append_many, verify_multi, Element, HashMode, Tree};

// ---- bench parameters ---------------------------------------------------------

/// Tree sizes to sweep for root construction.
const TREE_SIZES: &[usize] = &[256, 1024, 4096, 16384];

/// Claimed-element counts for multi-proof verification over a 4096 tree.
/// Kept modest: widely spread index sets converge slowly, and the step
/// bitmaps cap a replay at 256 steps.
const CLAIM_COUNTS: &[usize] = &[2, 8, 16];

/// Batch sizes for appends onto a 4095-element tree (worst-case frontier).
const APPEND_COUNTS: &[usize] = &[1, 16, 256];

// ---- helpers ------------------------------------------------------------------

/// Deterministic, cheap filler so results are reproducible.
fn make_elements(count: usize) -> Vec<Element> {
    let mut out = Vec::with_capacity(count);
    let mut x: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..count {
        let mut e = [0u8; 32];
        for chunk in e.chunks_mut(8) {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            chunk.copy_from_slice(&x.to_le_bytes());
        }
        out.push(e);
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_root");
    for &size in TREE_SIZES {
        let elements = make_elements(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("sorted/{size}"), |b| {
            b.iter(|| {
                let tree = Tree::from_elements(HashMode::SortedPair, black_box(&elements));
                black_box(tree.root())
            })
        });
    }
    group.finish();
}

fn bench_verify_multi(c: &mut Criterion) {
    let elements = make_elements(4096);
    let tree = Tree::from_elements(HashMode::SortedPair, &elements);
    let root = tree.root();

    let mut group = c.benchmark_group("verify_multi_4096");
    for &k in CLAIM_COUNTS {
        // Spread the claimed indices across the tree, descending.
        let indices: Vec<u32> = (0..k).map(|i| (4095 - i * (4096 / k)) as u32).collect();
        let witness = tree.prove_multi(&indices).expect("proof");
        let claimed: Vec<Element> = indices.iter().map(|&i| elements[i as usize]).collect();

        group.throughput(Throughput::Elements(k as u64));
        group.bench_function(format!("claimed/{k}"), |b| {
            b.iter(|| {
                assert!(verify_multi(
                    black_box(&root),
                    black_box(&claimed),
                    black_box(&witness)
                ))
            })
        });
    }
    group.finish();
}

fn bench_append_many(c: &mut Criterion) {
    // 4095 = 0b1111_1111_1111: twelve frontier nodes, the deepest fold.
    let elements = make_elements(4095);
    let tree = Tree::from_elements(HashMode::SortedPair, &elements);
    let root = tree.root();
    let witness = tree.prove_append();

    let mut group = c.benchmark_group("append_many_4095");
    for &k in APPEND_COUNTS {
        let appended = make_elements(k);
        group.throughput(Throughput::Elements(k as u64));
        group.bench_function(format!("appended/{k}"), |b| {
            b.iter(|| {
                append_many(
                    HashMode::SortedPair,
                    black_box(&root),
                    black_box(&appended),
                    black_box(&witness),
                )
                .expect("append")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_verify_multi, bench_append_many);
criterion_main!(benches);
