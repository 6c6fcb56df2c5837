use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use hookline::{decode, Arg, Callback, Hooks, Value};

fn make_filter_chain(len: i32) -> Hooks {
    let hooks = Hooks::default();
    hooks.define_function(
        "inc",
        Callback::new(|a| Value::from(a[0].as_float().unwrap_or(0.0) + 1.0)),
    );

    // Spread filters over a handful of priorities so bucket iteration is exercised.
    for i in 0..len {
        hooks
            .filter(format!("chain.f{i}::{}", i % 8), [Arg::from("inc")])
            .unwrap();
    }
    hooks
}

fn bench_apply_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    for len in [1, 16, 128] {
        let hooks = make_filter_chain(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(format!("chain_{len}"), |b| {
            b.iter(|| hooks.apply(black_box("chain"), Value::Float(0.0), &[]));
        });
    }
    group.finish();
}

fn bench_run_actions(c: &mut Criterion) {
    let hooks = Hooks::default();
    for i in 0..64 {
        hooks
            .action(format!("tick.a{i}?2::{}", i % 4), [Arg::action(|args| {
                black_box(args.len());
            })])
            .unwrap();
    }
    let args = [Value::Int(1), Value::Int(2), Value::Int(3)];

    c.bench_function("run/actions_64", |b| {
        b.iter(|| hooks.run(black_box("tick"), &args));
    });
    c.bench_function("run/by_name", |b| {
        b.iter(|| hooks.run_by_name(black_box("tick"), black_box("a63"), &args));
    });
}

fn bench_bind_and_once(c: &mut Criterion) {
    c.bench_function("bind/run_once_16", |b| {
        let hooks = Hooks::default();
        b.iter(|| {
            for i in 0..16 {
                hooks.action(format!("burst.h{i}"), [Arg::action(|_| {})]).unwrap();
            }
            hooks.run_once("burst", &[])
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("syntax/decode", |b| {
        b.iter(|| decode(black_box("calculate.pow?2::1")).unwrap());
    });
}

criterion_group!(
    benches,
    bench_apply_chain,
    bench_run_actions,
    bench_bind_and_once,
    bench_decode
);
criterion_main!(benches);
