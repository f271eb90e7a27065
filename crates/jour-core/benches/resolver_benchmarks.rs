use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jour_core::models::TaskDefinition;
use jour_core::recurrence::Recurrence;
use jour_core::resolver;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// A reproducible mix of one-off and recurring definitions.
fn synthetic_library(count: usize) -> Vec<TaskDefinition> {
    let mut rng = fastrand::Rng::with_seed(0x6a6f_7572);
    let rules = ["daily", "weekly", "monthly", "yearly"];

    (0..count)
        .map(|i| {
            let mut def = TaskDefinition {
                title: format!("Definition {}", i),
                date_planned: Some(base_date() + Duration::days(rng.i64(0..365))),
                ..Default::default()
            };
            if rng.bool() {
                def.is_recurring = true;
                if rng.u8(0..5) == 0 {
                    def.recurrence_rule = Some("custom".to_string());
                    def.recurrence_days = Some(r#"["monday","thursday"]"#.to_string());
                } else {
                    def.recurrence_rule = Some(rules[rng.usize(0..rules.len())].to_string());
                }
            }
            def
        })
        .collect()
}

fn bench_rule_parsing(c: &mut Criterion) {
    let stored: Vec<(&str, Option<&str>)> = vec![
        ("daily", None),
        ("weekly", None),
        ("monthly", None),
        ("yearly", None),
        ("custom", Some(r#"["monday","wednesday","friday"]"#)),
    ];

    let mut group = c.benchmark_group("rule_parsing");

    for (rule, days) in stored {
        group.bench_with_input(BenchmarkId::new("rule", rule), &days, |b, days| {
            b.iter(|| Recurrence::from_parts(black_box(rule), black_box(*days)).unwrap())
        });
    }
    group.finish();
}

fn bench_rule_evaluation_over_year(c: &mut Criterion) {
    let anchor = base_date();
    let days: Vec<NaiveDate> = (0..365).map(|i| anchor + Duration::days(i)).collect();
    let rules = vec![
        ("daily", Recurrence::Daily),
        ("weekly", Recurrence::Weekly),
        ("monthly", Recurrence::Monthly),
        ("yearly", Recurrence::Yearly),
        (
            "custom",
            Recurrence::from_parts("custom", Some(r#"["monday","thursday"]"#)).unwrap(),
        ),
    ];

    let mut group = c.benchmark_group("rule_evaluation_year");

    for (name, rule) in rules {
        group.bench_with_input(BenchmarkId::new("rule", name), &rule, |b, rule| {
            b.iter(|| {
                days.iter()
                    .filter(|day| rule.is_active_on(black_box(anchor), **day))
                    .count()
            })
        });
    }
    group.finish();
}

fn bench_single_day_resolution(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let mut group = c.benchmark_group("single_day_resolution");

    for size in [10, 100, 1000].iter() {
        let library = synthetic_library(*size);
        group.bench_with_input(
            BenchmarkId::new("definitions", size),
            &library,
            |b, library| b.iter(|| resolver::occurrences_for_date(black_box(date), black_box(library))),
        );
    }
    group.finish();
}

fn bench_range_resolution(c: &mut Criterion) {
    let library = synthetic_library(100);
    let start = base_date();

    let mut group = c.benchmark_group("range_resolution");

    for days in [7i64, 30, 90, 365].iter() {
        let end = start + Duration::days(days - 1);
        group.bench_with_input(BenchmarkId::new("days", days), days, |b, _| {
            b.iter(|| {
                resolver::occurrences_in_range(black_box(start), black_box(end), black_box(&library))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_rule_parsing,
    bench_rule_evaluation_over_year,
    bench_single_day_resolution,
    bench_range_resolution
);
criterion_main!(benches);
