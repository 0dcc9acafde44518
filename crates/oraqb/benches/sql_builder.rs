use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use oraqb::prelude::*;
use oraqb::Select;

/// SELECT col0, col1, ... FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> Select {
    let cols: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut q = select().select(&cols).from("t", None);
    for (i, col) in cols.iter().enumerate() {
        q = if i == 0 {
            q.where_(col, "=", Param::int(i as i64))
        } else {
            q.and_where(col, "=", Param::int(i as i64))
        };
    }
    q
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.build()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).build()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = select()
                    .from("t", None)
                    .where_("id", "IN", Param::int(values.as_slice()));
                black_box(q.build())
            });
        });
    }

    group.finish();
}

fn bench_insert_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_batch");

    for rows in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let q = insert("users").records((0..rows).map(|i| {
                    Record::new()
                        .value("id", Param::int(i))
                        .value("name", Param::string(format!("user{i}")))
                        .value("active", 1)
                }));
                black_box(q.build())
            });
        });
    }

    group.finish();
}

fn bench_union_chain(c: &mut Criterion) {
    c.bench_function("sql_builder/union_chain_10", |b| {
        b.iter(|| {
            let mut q = select()
                .select(&["id"])
                .from("t0", None)
                .where_("k", "=", Param::int(0));
            for i in 1..10 {
                q = q
                    .union_all()
                    .select(&["id"])
                    .from(&format!("t{i}"), None)
                    .where_("k", "=", Param::int(i));
            }
            black_box(q.build())
        });
    });
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_in_list,
    bench_insert_batch,
    bench_union_chain
);
criterion_main!(benches);
