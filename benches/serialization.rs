use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use wax::{entry, parse, render, to_node, Node};

#[derive(Serialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

#[derive(Serialize, Clone)]
struct Deployment {
    id: u32,
    region: String,
    healthy: bool,
    metadata: Metadata,
    tags: Vec<String>,
}

/// A document with `sections` sections of ten bindings each, two levels deep.
fn build_node(sections: usize) -> Node {
    let mut node = Node::new();
    for s in 0..sections {
        for k in 0..10 {
            let path = format!("section{}.sub{}.key{}", s, k % 2, k);
            node.set(&path, entry!({ "id": k as i64, "label": format!("value {}", k) }))
                .unwrap();
        }
        node.set_comment(&format!("section{}", s), format!("section number {}", s))
            .unwrap();
    }
    node
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for size in [10, 50, 100, 500].iter() {
        let node = build_node(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| render(black_box(&node)))
        });
    }
    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [10, 50, 100, 500].iter() {
        let text = render(&build_node(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_dotted_lookup(c: &mut Criterion) {
    let node = build_node(100);
    c.bench_function("dotted_lookup", |b| {
        b.iter(|| node.get(black_box("section57.sub1.key9")))
    });
}

fn benchmark_flat_iteration(c: &mut Criterion) {
    let node = build_node(100);
    c.bench_function("flat_iteration", |b| {
        b.iter(|| node.flat().iter().count())
    });
}

fn benchmark_struct_to_node(c: &mut Criterion) {
    let deployment = Deployment {
        id: 42,
        region: "eu-west-1".to_string(),
        healthy: true,
        metadata: Metadata {
            created: "2024-01-01".to_string(),
            updated: "2024-06-01".to_string(),
            version: 7,
        },
        tags: vec!["prod".to_string(), "blue".to_string()],
    };
    c.bench_function("struct_to_node", |b| {
        b.iter(|| to_node(black_box(&deployment)))
    });
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let node = build_node(50);
    let mut group = c.benchmark_group("format_comparison");
    group.bench_function("wax", |b| b.iter(|| render(black_box(&node))));
    group.bench_function("json", |b| {
        b.iter(|| serde_json::to_string(black_box(&node)))
    });
    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let node = build_node(50);
    c.bench_function("roundtrip", |b| {
        b.iter(|| {
            let text = render(black_box(&node)).unwrap();
            parse(&text).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_render,
    benchmark_parse,
    benchmark_dotted_lookup,
    benchmark_flat_iteration,
    benchmark_struct_to_node,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);

criterion_main!(benches);
