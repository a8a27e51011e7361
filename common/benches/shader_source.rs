use criterion::{criterion_group, criterion_main, Criterion};

use glquad_common::shader_source::ShaderSource;

pub fn shader_source(c: &mut Criterion) {
    let body = "    gl_Position = position;\n".repeat(512);
    let text = format!("#shader vertex\n{body}#shader fragment\n{body}");

    c.bench_function("shader_source", |b| b.iter(|| ShaderSource::parse(&text)));
}

criterion_group!(benches, shader_source);
criterion_main!(benches);
