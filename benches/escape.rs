#[macro_use]
extern crate criterion;
extern crate brocoli;
extern crate num;

use brocoli::{Camera, Coloration, EscapeRenderer, FractalParameters, Size};
use criterion::{black_box, Criterion};
use num::Complex;

fn camera() -> Camera {
    Camera::new(Size(160, 120), Complex::new(-0.75, 0.0), 3.0).unwrap()
}

fn bench_kinds(c: &mut Criterion) {
    for kind in Coloration::ALL.iter() {
        let renderer = EscapeRenderer::new(camera(), *kind, 256, 20_000.0, None).unwrap();
        c.bench_function(&format!("escape/{}", kind), move |b| {
            b.iter(|| black_box(renderer.render(4).unwrap()))
        });
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut parameters = FractalParameters::new(camera());
    parameters.bins = 8;
    parameters.normalize_quantiles = true;
    let raw = parameters.compute(4).unwrap();
    c.bench_function("pipeline/preprocess+normalize", move |b| {
        b.iter(|| black_box(parameters.normalize(parameters.preprocess(raw.clone()))))
    });
}

criterion_group!(benches, bench_kinds, bench_pipeline);
criterion_main!(benches);
