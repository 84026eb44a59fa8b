//! Performance benchmarks for cloudtree

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cloudtree::test_utils::TestTree;
use cloudtree::{FilterConfig, IndexWriter, TreeFormatter, TreeWalker, WalkerConfig, should_exclude};
use std::path::Path;

fn bench_should_exclude(c: &mut Criterion) {
    let defaults = FilterConfig::default();
    let with_keywords = FilterConfig::default().with_keywords(["draft", "old", "backup copy"]);
    let path = Path::new("/data/site");

    let mut group = c.benchmark_group("should_exclude");

    group.bench_function("kept_file", |b| {
        b.iter(|| should_exclude(black_box("report_final.pdf"), false, path, &defaults))
    });

    group.bench_function("excluded_extension", |b| {
        b.iter(|| should_exclude(black_box("scan_0001.e57"), false, path, &defaults))
    });

    group.bench_function("point_cloud_dir", |b| {
        b.iter(|| should_exclude(black_box("Point Cloud 03"), true, path, &defaults))
    });

    group.bench_function("keywords", |b| {
        b.iter(|| should_exclude(black_box("Backup Copy of plan.dwg"), false, path, &with_keywords))
    });

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let filters = FilterConfig::default();
    let mut group = c.benchmark_group("walk");

    // Small tree (100 files)
    let small = TestTree::new();
    small.populate(10, 100);
    group.bench_function("small_tree_100_files", |b| {
        let walker = TreeWalker::new(&filters, WalkerConfig::default());
        b.iter(|| walker.walk(black_box(small.path())))
    });

    // Larger tree (2000 files)
    let large = TestTree::new();
    large.populate(50, 2000);
    group.bench_function("large_tree_2000_files", |b| {
        let walker = TreeWalker::new(&filters, WalkerConfig::default());
        b.iter(|| walker.walk(black_box(large.path())))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let filters = FilterConfig::default();
    let tree = TestTree::new();
    tree.populate(50, 2000);
    let walk = TreeWalker::new(&filters, WalkerConfig::default())
        .walk(tree.path())
        .unwrap();

    let mut group = c.benchmark_group("render");

    group.bench_function("tree_text", |b| {
        let formatter = TreeFormatter::new();
        b.iter(|| formatter.format(black_box(&walk)))
    });

    group.bench_function("tsv_index", |b| {
        let writer = IndexWriter::new();
        b.iter(|| writer.format(black_box(&walk)))
    });

    group.finish();
}

criterion_group!(benches, bench_should_exclude, bench_walk, bench_render);
criterion_main!(benches);
