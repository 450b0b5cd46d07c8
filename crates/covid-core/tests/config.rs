// File: crates/covid-core/tests/config.rs
// Purpose: Config defaults, partial JSON overrides and validation errors.

mod common;

use common::{d, mk};
use covid_core::{ChartError, DashboardConfig, Metric, Scope, ZeroPolicy};

#[test]
fn defaults_match_the_published_dashboard() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.location, "World");
    assert_eq!(cfg.initial_month, mk(2021, 1));
    assert_eq!(cfg.initial_metric, Metric::Cases);
    assert_eq!((cfg.overview.start, cfg.overview.end), (d(2019, 12, 1), d(2023, 5, 1)));
    assert_eq!(cfg.map.cases_ceiling, 1e6);
    assert_eq!(cfg.map.zero_policy, ZeroPolicy::LowestBin);
    assert_eq!(cfg.theme().name, "light");
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = DashboardConfig::from_json_str(
        r#"{
            "initial_month": "2020-11",
            "initial_metric": "new_deaths",
            "map": { "deaths_ceiling": 50000, "zero_policy": "no_data" },
            "theme": "dark"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.initial_month, mk(2020, 11));
    assert_eq!(cfg.initial_metric, Metric::Deaths);
    assert_eq!(cfg.map.deaths_ceiling, 5e4);
    assert_eq!(cfg.map.cases_ceiling, 1e6);
    assert_eq!(cfg.map.zero_policy, ZeroPolicy::NoData);
    assert_eq!(cfg.theme().name, "dark");
    assert_eq!(cfg.location, "World");
}

#[test]
fn queries_follow_the_config() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.linked_query().scope, Scope::Location("World".to_owned()));
    let q = cfg.overview_query();
    assert_eq!(q.range, Some((d(2019, 12, 1), d(2023, 5, 1))));
    assert_eq!(q.positive_only, Some(Metric::Cases));
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"initial_month": "2021-13"}"#,
        r#"{"map": {"cases_ceiling": 0.5}}"#,
        r#"{"map": {"projection_scale": -1}}"#,
        r#"{"overview": {"start": "2023-01-01", "end": "2022-01-01"}}"#,
        r#"{"location": "  "}"#,
        r#"{"initial_metric": "hospitalizations"}"#,
    ] {
        assert!(
            matches!(DashboardConfig::from_json_str(json), Err(ChartError::Config(_))),
            "accepted {json}"
        );
    }
}

#[test]
fn unknown_theme_falls_back_to_light() {
    let cfg = DashboardConfig { theme: "neon".to_owned(), ..DashboardConfig::default() };
    assert_eq!(cfg.theme().name, "light");
}

#[test]
fn metric_parses_from_short_and_column_names() {
    assert_eq!("deaths".parse::<Metric>().unwrap(), Metric::Deaths);
    assert_eq!("new_cases".parse::<Metric>().unwrap(), Metric::Cases);
    assert!("other".parse::<Metric>().is_err());
}
