//! Benchmarks for the flatten/unflatten hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use h5bridge::{detect, flatten, unflatten_floats, unflatten_ints, Value};

const U: usize = 10_000;
const V: usize = 4;

fn make_int_tuples() -> Value {
    Value::seq(
        (0..U)
            .map(|i| {
                Value::tuple(
                    (0..V)
                        .map(|j| Value::Int((i * V + j) as i64))
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>(),
    )
}

fn make_float_seq() -> Value {
    Value::seq(
        (0..U * V)
            .map(|i| Value::Float(i as f64 * 0.5))
            .collect::<Vec<_>>(),
    )
}

fn bench_flatten_int_tuples(c: &mut Criterion) {
    let input = make_int_tuples();
    c.bench_function("flatten_10k_x4_int_tuples", |b| {
        b.iter(|| {
            let shape = detect(black_box(&input)).unwrap();
            flatten(black_box(&input), &shape).unwrap()
        })
    });
}

fn bench_flatten_float_seq(c: &mut Criterion) {
    let input = make_float_seq();
    c.bench_function("flatten_40k_floats", |b| {
        b.iter(|| {
            let shape = detect(black_box(&input)).unwrap();
            flatten(black_box(&input), &shape).unwrap()
        })
    });
}

fn bench_unflatten(c: &mut Criterion) {
    let ints: Vec<i32> = (0..(U * V) as i32).collect();
    let floats: Vec<f64> = (0..U * V).map(|i| i as f64 * 0.5).collect();

    c.bench_function("unflatten_40k_ints", |b| {
        b.iter(|| unflatten_ints(black_box(&ints), ints.len()))
    });
    c.bench_function("unflatten_40k_floats", |b| {
        b.iter(|| unflatten_floats(black_box(&floats), floats.len()))
    });
}

criterion_group!(
    benches,
    bench_flatten_int_tuples,
    bench_flatten_float_seq,
    bench_unflatten
);
criterion_main!(benches);
