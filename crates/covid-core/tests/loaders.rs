// File: crates/covid-core/tests/loaders.rs
// Purpose: CSV coercion, GeoJSON parsing, projection and region hit testing.

mod common;

use common::d;
use covid_core::geo::ProjectedCountry;
use covid_core::{load_records, parse_countries, read_records, ChartError, Metric, NaturalEarth};

#[test]
fn csv_cells_are_coerced_once() {
    let csv = "\
iso_code,continent,location,date,total_cases,new_cases,new_deaths
AAA,Europe,Alphaland,2021-01-04,10,3000,20
,,World,2021-01-05,10,abc,NaN
OWID_WRL,,World,2021-01-06,10,inf,
BBB,Asia,Betaland,not-a-date,10,1,1
BBB,Asia,Betaland,2021-01-07,10, 12.5 ,-3
";
    let rows = read_records(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 4, "row with a bad date is dropped");

    assert_eq!(rows[0].iso_code.as_deref(), Some("AAA"));
    assert_eq!(rows[0].date, d(2021, 1, 4));
    assert_eq!(rows[0].new_cases, Some(3000.0));

    assert_eq!(rows[1].iso_code, None);
    assert_eq!(rows[1].location, "World");
    assert_eq!(rows[1].new_cases, None);
    assert_eq!(rows[1].new_deaths, None);

    assert_eq!(rows[2].new_cases, None, "infinite values are missing");
    assert_eq!(rows[3].value(Metric::Cases), Some(12.5));
    assert_eq!(rows[3].value(Metric::Deaths), Some(-3.0));
}

#[test]
fn headers_match_case_insensitively() {
    let csv = "Location,DATE,New_Cases,new_deaths\nWorld,2020-03-01,4,1\n";
    let rows = read_records(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].iso_code, None);
}

#[test]
fn missing_column_is_an_error() {
    let csv = "location,date,new_cases\nWorld,2020-03-01,4\n";
    match read_records(csv.as_bytes()) {
        Err(ChartError::MissingColumn(name)) => assert_eq!(name, "new_deaths"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn unreadable_file_reports_path() {
    let err = load_records("target/test_out/does-not-exist.csv").unwrap_err();
    assert!(matches!(err, ChartError::DataLoad { .. }));
    assert!(err.to_string().contains("does-not-exist.csv"));
}

#[test]
fn geojson_features_become_countries() {
    let countries = common::countries();
    let codes = countries.iter().map(|c| c.iso.as_str()).collect::<Vec<_>>();
    assert_eq!(codes, vec!["AAA", "BBB", "CCC"]);
    assert_eq!(countries[0].label(), "Alphaland");
    assert_eq!(countries[1].polygons.len(), 1);
    assert_eq!(countries[0].polygons[0][0].len(), 5);
}

#[test]
fn unusable_features_are_skipped() {
    let json = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","id":"PNT","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},
        {"type":"Feature","properties":{"name":"Nowhere"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}},
        {"type":"Feature","id":250,"properties":null,
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
    ]}"#;
    let countries = parse_countries(json).unwrap();
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].iso, "250");
    assert_eq!(countries[0].label(), "250");
}

#[test]
fn malformed_geojson_is_an_error() {
    assert!(matches!(parse_countries("{\"features\": 3}"), Err(ChartError::Geo(_))));
}

#[test]
fn natural_earth_centers_origin_and_keeps_north_up() {
    let p = NaturalEarth::centered(160.0, 960, 500);
    assert_eq!(p.project(0.0, 0.0), (480.0, 250.0));
    let (x, _) = p.project(180.0, 0.0);
    assert!((x - (480.0 + std::f32::consts::PI * 0.8707 * 160.0)).abs() < 0.01);
    let (_, y_north) = p.project(0.0, 45.0);
    let (_, y_south) = p.project(0.0, -45.0);
    assert!(y_north < 250.0 && y_south > 250.0);
    assert!(((250.0 - y_north) - (y_south - 250.0)).abs() < 1e-3);
}

#[test]
fn projected_regions_hit_test_with_holes() {
    let json = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","id":"RNG","properties":{"name":"Ring"},
         "geometry":{"type":"Polygon","coordinates":[
            [[-20,-20],[20,-20],[20,20],[-20,20],[-20,-20]],
            [[-5,-5],[5,-5],[5,5],[-5,5],[-5,-5]]]}}
    ]}"#;
    let countries = parse_countries(json).unwrap();
    let p = NaturalEarth::centered(160.0, 960, 500);
    let proj = ProjectedCountry::project(&countries[0], &p);
    assert_eq!(proj.rings.len(), 2);
    let (cx, cy) = p.project(0.0, 0.0);
    assert!(!proj.contains(cx, cy), "inside the hole");
    let (x, y) = p.project(12.0, 0.0);
    assert!(proj.contains(x, y));
    let (x, y) = p.project(40.0, 0.0);
    assert!(!proj.contains(x, y));
}
