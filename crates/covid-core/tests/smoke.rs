// File: crates/covid-core/tests/smoke.rs
// Purpose: End-to-end render smoke tests writing PNGs for every widget.

mod common;

use common::{countries, records};
use covid_core::{Dashboard, DashboardConfig, Metric};

const PNG_MAGIC: [u8; 4] = [137, 80, 78, 71];

#[test]
fn render_dashboard_pngs() {
    let cfg = DashboardConfig::default();
    let mut dash = Dashboard::from_parts(&cfg, &records(), &countries(), 0).unwrap();
    let settled = dash.bars().settled_at();

    let out = std::path::PathBuf::from("target/test_out/smoke");
    let written = dash.render_to_dir(&out, settled).expect("render should succeed");
    assert_eq!(written.len(), 3);
    for path in &written {
        let meta = std::fs::metadata(path).expect("output exists");
        assert!(meta.len() > 0, "png should be non-empty");
    }

    // Mid-transition frame with a hover tooltip visible
    dash.select_metric(Metric::Deaths, settled);
    let map_top = dash.bars().options().height as f32;
    dash.pointer_move(480.0, map_top + 250.0, settled);
    let bytes = dash.bars().render_png(settled + 300).expect("render bytes");
    assert!(bytes.starts_with(&PNG_MAGIC), "should be PNG header");
    let bytes = dash.map().render_png().expect("render map bytes");
    assert!(bytes.starts_with(&PNG_MAGIC), "should be PNG header");
}

#[test]
fn decoded_png_has_surface_size() {
    let cfg = DashboardConfig::default();
    let dash = Dashboard::from_parts(&cfg, &records(), &countries(), 0).unwrap();
    let bytes = dash.map().render_png().unwrap();
    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!((img.width(), img.height()), (960, 500));

    let overview = dash.overview().unwrap().render_png(10_000).unwrap();
    let img = image::load_from_memory(&overview).expect("decode").to_rgba8();
    assert_eq!((img.width(), img.height()), (800, 400));
}
