//! Benchmarks for parsing and cycle detection
//!
//! Uses layered include graphs with back edges, similar in shape to
//! real header dependency graphs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depgraph::{CycleFinder, DirectedGraph, Node};

/// Create a layered graph: each node includes a few nodes from the next
/// layer, and every `back_edge_every`-th node includes one from layer 0.
fn create_layered_graph(layers: usize, width: usize, back_edge_every: usize) -> DirectedGraph {
    let nodes = layers * width;
    let mut graph = DirectedGraph::with_capacity(nodes, nodes * 3 + nodes / back_edge_every);
    graph.set_name("bench").unwrap();
    let id = |layer: usize, i: usize| format!("h{}_{}", layer, i);

    for layer in 0..layers {
        for i in 0..width {
            graph
                .add_node(Node::with_label(id(layer, i), format!("<h{}_{}>", layer, i)))
                .unwrap();
        }
    }

    let mut count = 0;
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for k in 0..3 {
                graph
                    .add_edge(id(layer, i), id(layer + 1, (i + k) % width))
                    .unwrap();
            }
            count += 1;
            if count % back_edge_every == 0 {
                graph.add_edge(id(layer + 1, i), id(0, i)).unwrap();
            }
        }
    }

    graph
}

/// Benchmark parsing serialized graphs
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_parse");

    for size in [10, 50, 100].iter() {
        let text = create_layered_graph(*size, 10, 7).to_dot();
        group.bench_with_input(BenchmarkId::new("layers", size), &text, |b, text| {
            b.iter(|| DirectedGraph::from_dot(black_box(text)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark cycle witnesses for every node
fn bench_find_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_cycles_in_graph");

    for size in [10, 30, 60].iter() {
        let graph = create_layered_graph(*size, 10, 7);
        group.bench_with_input(BenchmarkId::new("layers", size), &graph, |b, graph| {
            b.iter(|| CycleFinder::new(black_box(graph)).find_cycles_in_graph());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_find_cycles);
criterion_main!(benches);
