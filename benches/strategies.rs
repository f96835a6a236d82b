use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gvk_scan::gvk::pipeline::{extract_identifiers, Strategy};
use gvk_scan::gvk::testing::SAMPLE;

/// A stream of `count` manifests, each hiding markers inside scalars
fn generated_stream(count: usize) -> String {
    let mut stream = String::new();
    for i in 0..count {
        stream.push_str(&format!(
            r#"apiVersion: apps/v{i}
kind: Deployment
metadata:
  name: app-{i}
  labels: {{app: web, tier: "{i}"}}
spec:
  template:
    spec:
      containers:
      - name: main
        args:
        - |
          ---
          not a boundary
        env:
        - name: NOTE
          value: "multi
          ---
          line"
---
"#
        ));
    }
    stream
}

fn bench_sample(c: &mut Criterion) {
    for strategy in Strategy::ALL {
        c.bench_function(&format!("sample_{}", strategy.name()), |b| {
            b.iter(|| extract_identifiers(black_box(SAMPLE), strategy).unwrap())
        });
    }
}

fn bench_generated_stream(c: &mut Criterion) {
    let stream = generated_stream(200);
    for strategy in Strategy::ALL {
        c.bench_function(&format!("stream_200_{}", strategy.name()), |b| {
            b.iter(|| extract_identifiers(black_box(&stream), strategy).unwrap())
        });
    }
}

criterion_group!(benches, bench_sample, bench_generated_stream);
criterion_main!(benches);
