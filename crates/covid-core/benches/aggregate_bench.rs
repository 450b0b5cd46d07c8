use chrono::{Duration, NaiveDate};
use covid_core::{aggregate_by_country, aggregate_monthly, read_records, AggregateQuery, RawRecord};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};

/// Daily rows for `countries` countries plus a World row per day.
fn gen_rows(countries: usize, days: i64) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut v = Vec::with_capacity(countries * days as usize);
    for day in 0..days {
        let date = start + Duration::days(day);
        let mut world = 0.0;
        for c in 0..countries {
            let cases = ((day as f64 * 0.03 + c as f64).sin() * 1_000.0).abs().round();
            world += cases;
            let iso = format!("C{c:03}");
            v.push(RawRecord::new(iso.clone(), Some(iso.as_str()), date).with_cases(cases).with_deaths((cases / 50.0).round()));
        }
        v.push(RawRecord::new("World", Some("OWID_WRL"), date).with_cases(world));
    }
    v
}

fn to_csv(rows: &[RawRecord]) -> String {
    let mut s = String::from("iso_code,location,date,new_cases,new_deaths\n");
    for r in rows {
        s.push_str(&format!(
            "{},{},{},{},{}\n",
            r.iso_code.as_deref().unwrap_or(""),
            r.location,
            r.date,
            r.new_cases.map(|v| v.to_string()).unwrap_or_default(),
            r.new_deaths.map(|v| v.to_string()).unwrap_or_default(),
        ));
    }
    s
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for &countries in &[50usize, 200usize] {
        let rows = gen_rows(countries, 1_200);
        group.bench_with_input(BenchmarkId::new("monthly_world", countries), &rows, |b, rows| {
            let q = AggregateQuery::location("World");
            b.iter(|| black_box(aggregate_monthly(rows, &q)));
        });
        group.bench_with_input(BenchmarkId::new("by_country", countries), &rows, |b, rows| {
            let q = AggregateQuery::countries();
            b.iter(|| black_box(aggregate_by_country(rows, &q)));
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let csv = to_csv(&gen_rows(100, 1_200));
    c.bench_function("read_records_120k", |b| {
        b.iter(|| black_box(read_records(csv.as_bytes()).unwrap()));
    });
}

criterion_group!(benches, bench_aggregate, bench_load);
criterion_main!(benches);
