// File: crates/covid-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders deterministic, label-free bar chart and map frames to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

mod common;

use std::path::PathBuf;

use common::{countries, mk, records};
use covid_core::{
    aggregate_by_country, aggregate_monthly, AggregateQuery, BarChart, ChoroplethMap, MapSettings, RenderOptions,
    SelectionContext, SelectionState, Tooltip,
};

fn bars_bytes() -> Vec<u8> {
    let ctx = SelectionContext::new(SelectionState { current_month: mk(2020, 2), ..SelectionState::default() });
    let data = aggregate_monthly(&records(), &AggregateQuery::location("World"));
    // avoid text nondeterminism across platforms
    let opts = RenderOptions::linked_bars().without_labels();
    let chart = BarChart::linked(data, ctx, Tooltip::new(), opts, 0).expect("chart");
    chart.render_png(chart.settled_at()).expect("render bars")
}

fn map_bytes() -> Vec<u8> {
    let ctx = SelectionContext::new(SelectionState::default());
    let data = aggregate_by_country(&records(), &AggregateQuery::countries());
    let opts = RenderOptions::map().without_labels();
    let map = ChoroplethMap::new(&countries(), data, ctx, Tooltip::new(), opts, MapSettings::default());
    map.render_png().expect("render map")
}

fn check_snapshot(name: &str, bytes: &[u8]) {
    let snap_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_linked_bars() {
    check_snapshot("linked_bars.png", &bars_bytes());
}

#[test]
fn golden_choropleth() {
    check_snapshot("choropleth.png", &map_bytes());
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(bars_bytes(), bars_bytes());
    assert_eq!(map_bytes(), map_bytes());
}
