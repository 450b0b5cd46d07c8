// File: crates/covid-core/src/lib.rs
// Summary: Core library entry point; exports loading, aggregation, scales, the selection bus and widgets.

pub mod aggregate;
pub mod axis;
pub mod bar_chart;
pub mod choropleth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod geo;
pub mod geometry;
pub mod raster;
pub mod record;
pub mod scale;
pub mod selection;
pub mod text;
pub mod theme;
pub mod tooltip;
pub mod transition;
pub mod types;

pub use aggregate::{aggregate_by_country, aggregate_monthly, AggregateQuery, CountryMonthly, MonthKey, MonthlyAggregate, Scope};
pub use bar_chart::{Bar, BarChart, BarChartStyle, BarLayout};
pub use choropleth::{ChoroplethMap, MapSettings, RegionFill, ZeroPolicy};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ChartError, Result};
pub use geo::{load_countries, parse_countries, Country, NaturalEarth};
pub use raster::RenderOptions;
pub use record::{load_records, read_records, Metric, RawRecord};
pub use scale::{ColorScale, TimeScale, ValueScale};
pub use selection::{SelectionContext, SelectionEvent, SelectionState, Subscription};
pub use theme::Theme;
pub use tooltip::Tooltip;
