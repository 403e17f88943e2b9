use criterion::{criterion_group, criterion_main, Criterion};
use ms2::{lexer, parser::parse_program, token::TokenTable, typer::typecheck};
use std::hint::black_box;

static INPUT: &str = concat!(
    include_str!("../../samples/basic.ms2"),
    include_str!("../../samples/control_flow.ms2"),
    include_str!("../../samples/functions.ms2"),
);

fn parser(tokens: &TokenTable) {
    let program = parse_program(tokens).unwrap();
    _ = black_box(program);
}

fn criterion_benchmark(c: &mut Criterion) {
    let tokens = lexer::tokenize(INPUT).unwrap().tokens;

    c.bench_function("parser", |b| {
        b.iter(|| {
            black_box(parser(black_box(&tokens)));
        });
    });

    let program = parse_program(&tokens).unwrap();
    c.bench_function("typer", |b| {
        b.iter(|| {
            _ = black_box(typecheck(black_box(&program)).unwrap());
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
