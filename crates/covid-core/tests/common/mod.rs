// File: crates/covid-core/tests/common/mod.rs
// Purpose: Small in-memory fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use covid_core::{parse_countries, Country, MonthKey, RawRecord};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn mk(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

pub fn row(location: &str, iso: Option<&str>, date: NaiveDate, cases: Option<f64>, deaths: Option<f64>) -> RawRecord {
    RawRecord { location: location.to_owned(), iso_code: iso.map(str::to_owned), date, new_cases: cases, new_deaths: deaths }
}

/// World totals for 2020-01..2020-03 plus two countries reporting in 2021-01.
///
/// World: Jan cases 15 deaths 1, Feb cases 100 deaths 4, Mar cases 40 deaths 10.
/// AAA 2021-01: cases 5000, deaths 50. BBB 2021-01: cases 0, deaths 0.
pub fn records() -> Vec<RawRecord> {
    vec![
        row("World", Some("OWID_WRL"), d(2020, 1, 1), Some(10.0), Some(1.0)),
        row("World", Some("OWID_WRL"), d(2020, 1, 15), Some(5.0), None),
        row("World", Some("OWID_WRL"), d(2020, 2, 3), Some(60.0), Some(4.0)),
        row("World", Some("OWID_WRL"), d(2020, 2, 29), Some(40.0), None),
        row("World", Some("OWID_WRL"), d(2020, 3, 10), Some(40.0), Some(10.0)),
        row("Alphaland", Some("AAA"), d(2021, 1, 4), Some(3000.0), Some(20.0)),
        row("Alphaland", Some("AAA"), d(2021, 1, 20), Some(2000.0), Some(30.0)),
        row("Betaland", Some("BBB"), d(2021, 1, 9), Some(0.0), Some(0.0)),
        row("Betaland", Some("BBB"), d(2021, 2, 9), Some(700.0), Some(7.0)),
    ]
}

/// Three square countries: AAA around (0, 0), BBB around (50, 10), CCC around (-100, 40).
/// CCC never appears in `records()`.
pub const GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": "AAA", "properties": {"name": "Alphaland"},
     "geometry": {"type": "Polygon", "coordinates": [[[-10,-10],[10,-10],[10,10],[-10,10],[-10,-10]]]}},
    {"type": "Feature", "id": "BBB", "properties": {"name": "Betaland"},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[40,0],[60,0],[60,20],[40,20],[40,0]]]]}},
    {"type": "Feature", "properties": {"name": "Gammaland", "iso_a3": "CCC"},
     "geometry": {"type": "Polygon", "coordinates": [[[-110,30],[-90,30],[-90,50],[-110,50],[-110,30]]]}}
  ]
}"#;

pub fn countries() -> Vec<Country> {
    parse_countries(GEOJSON).unwrap()
}
