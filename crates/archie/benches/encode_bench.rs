use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

fn make_doc(rows: usize) -> serde_json::Value {
    let people: Vec<_> = (0..rows)
        .map(|i| {
            json!({
                "name": format!("person {i}"),
                "bio": format!("line one\nline two: {i}\n* not a bullet"),
                "tags": ["a", "b", "c"],
            })
        })
        .collect();
    json!({"title": "Benchmark", "meta": {"rows": rows.to_string()}, "people": people})
}

pub fn encode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_json_to_archieml");
    for rows in [10usize, 1000] {
        let doc = make_doc(rows);
        let value = archie_rs::DocValue::try_from(doc.clone()).unwrap();
        let size = archie_rs::encode_value_to_string(&value, &archie_rs::Options::default())
            .unwrap()
            .len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("value::{rows}"), |b| {
            b.iter(|| {
                black_box(
                    archie_rs::encode_value_to_string(&value, &archie_rs::Options::default())
                        .unwrap(),
                )
            })
        });
        group.bench_function(format!("serde::{rows}"), |b| {
            b.iter(|| {
                black_box(archie_rs::encode_to_string(&doc, &archie_rs::Options::default()).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, encode_benchmarks);
criterion_main!(benches);
