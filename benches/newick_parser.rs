use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use phylomesa::{Tree, parse_newick, write_newick};
use std::hint::black_box;
use std::path::PathBuf;

/// Balanced tree over `tip_count` tips with unit branch lengths.
fn balanced(tip_count: usize) -> String {
    let mut clades: Vec<String> = (0..tip_count).map(|i| format!("T{i}:1")).collect();
    while clades.len() > 2 {
        clades = clades
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => format!("({a},{b}):1"),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    format!("({});", clades.join(","))
}

fn caterpillar(tip_count: usize) -> String {
    let mut newick = String::new();
    for i in 0..tip_count - 1 {
        newick.push_str(&format!("(T{i}:1,"));
    }
    newick.push_str(&format!("T{}:1", tip_count - 1));
    newick.push_str(&"):1".repeat(tip_count - 1));
    newick.push(';');
    newick
}

fn prepare_test_data() -> Vec<(String, String)> {
    let mut test_data = Vec::new();
    for tip_count in [100, 1_000, 10_000] {
        test_data.push((format!("balanced_{tip_count}"), balanced(tip_count)));
        test_data.push((format!("caterpillar_{tip_count}"), caterpillar(tip_count)));
    }
    test_data
}

fn bench_newick_parser(c: &mut Criterion) {
    let test_data = prepare_test_data();

    let mut group = c.benchmark_group("newick_parser");
    let _ = group.sample_size(30);

    for (name, newick_string) in &test_data {
        let _ = group.throughput(Throughput::Bytes(newick_string.len() as u64));

        let _ = group.bench_with_input(
            BenchmarkId::new("parse_newick", name),
            newick_string,
            |b, newick| {
                b.iter(|| {
                    let _ = black_box(parse_newick(newick.clone()));
                });
            },
        );

        let tree: Tree = match newick_string.parse() {
            Ok(tree) => tree,
            Err(err) => panic!("benchmark input {name} does not parse: {err}"),
        };
        let _ = group.bench_with_input(BenchmarkId::new("write_newick", name), &tree, |b, tree| {
            b.iter(|| black_box(write_newick(tree, None)));
        });
        let _ = group.bench_with_input(BenchmarkId::new("phylo_age", name), &tree, |b, tree| {
            b.iter(|| black_box(tree.phylo_age()));
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = {
        let mut criterion = Criterion::default();
        let benchmark_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("benchmark_results");
        criterion = criterion.output_directory(&benchmark_dir);
        criterion = criterion.warm_up_time(std::time::Duration::from_millis(500));
        criterion = criterion.measurement_time(std::time::Duration::from_secs(5));
        criterion
    };
    targets = bench_newick_parser
);
criterion_main!(benches);
