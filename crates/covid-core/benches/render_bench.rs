use anyhow::Result;
use chrono::{Duration, NaiveDate};
use covid_core::{
    aggregate_by_country, aggregate_monthly, parse_countries, AggregateQuery, BarChart, ChoroplethMap, MapSettings,
    RawRecord, RenderOptions, SelectionContext, SelectionState, Tooltip,
};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn world_rows(days: i64) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let v = (i as f64 * 0.05).sin().abs() * 5e5 + i as f64;
            RawRecord::new("World", Some("OWID_WRL"), start + Duration::days(i))
                .with_cases(v)
                .with_deaths(v / 80.0)
        })
        .collect()
}

/// `n` x `n` grid of square countries covering the globe.
fn grid_geojson(n: usize) -> String {
    let mut features = Vec::with_capacity(n * n);
    let (w, h) = (360.0 / n as f64, 160.0 / n as f64);
    for i in 0..n {
        for j in 0..n {
            let (x0, y0) = (-180.0 + i as f64 * w, -80.0 + j as f64 * h);
            features.push(format!(
                r#"{{"type":"Feature","id":"C{i}_{j}","properties":{{"name":"C{i}_{j}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#,
                x1 = x0 + w,
                y1 = y0 + h,
            ));
        }
    }
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png_bytes");
    let rows = world_rows(1_200);
    group.bench_function("linked_bars", |b| {
        let ctx = SelectionContext::new(SelectionState::default());
        let data = aggregate_monthly(&rows, &AggregateQuery::location("World"));
        let chart = BarChart::linked(data, ctx, Tooltip::new(), RenderOptions::linked_bars().without_labels(), 0).unwrap();
        let at = chart.settled_at();
        b.iter(|| -> Result<()> {
            let bytes = chart.render_png(at)?;
            black_box(bytes);
            Ok(())
        });
    });
    for &n in &[10usize, 30usize] {
        group.bench_function(format!("map_{}", n * n), |b| {
            let countries = parse_countries(&grid_geojson(n)).unwrap();
            let ctx = SelectionContext::new(SelectionState::default());
            let data = aggregate_by_country(&rows, &AggregateQuery::countries());
            let map = ChoroplethMap::new(&countries, data, ctx, Tooltip::new(), RenderOptions::map().without_labels(), MapSettings::default());
            b.iter(|| -> Result<()> {
                let bytes = map.render_png()?;
                black_box(bytes);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
