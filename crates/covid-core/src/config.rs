// File: crates/covid-core/src/config.rs
// Summary: Dashboard configuration (JSON, every field defaulted) and its validation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{AggregateQuery, MonthKey};
use crate::choropleth::MapSettings;
use crate::error::{ChartError, Result};
use crate::record::Metric;
use crate::selection::{SelectionState, DEFAULT_MONTH};
use crate::theme::{self, Theme};

/// Date window and location of the overview chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Only months with a positive value of this metric are counted.
    pub metric: Metric,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2019, 12, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap_or(NaiveDate::MAX),
            metric: Metric::Cases,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Case/death table.
    pub data_path: PathBuf,
    /// Country boundaries keyed by ISO code.
    pub geo_path: PathBuf,
    /// Location aggregated by the bar charts.
    pub location: String,
    pub initial_month: MonthKey,
    pub initial_metric: Metric,
    pub overview: OverviewConfig,
    pub map: MapSettings,
    /// Theme preset name ("light" or "dark").
    pub theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/owid-covid-data.csv"),
            geo_path: PathBuf::from("data/world.geojson"),
            location: "World".to_owned(),
            initial_month: DEFAULT_MONTH,
            initial_metric: Metric::Cases,
            overview: OverviewConfig::default(),
            map: MapSettings::default(),
            theme: "light".to_owned(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ChartError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::DataLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json_str(&text)?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overview.start > self.overview.end {
            return Err(ChartError::Config(format!(
                "overview start {} is after end {}",
                self.overview.start, self.overview.end
            )));
        }
        for (name, v) in [("cases_ceiling", self.map.cases_ceiling), ("deaths_ceiling", self.map.deaths_ceiling)] {
            if !v.is_finite() || v <= 1.0 {
                return Err(ChartError::Config(format!("{name} must be a finite number above 1, got {v}")));
            }
        }
        if !self.map.projection_scale.is_finite() || self.map.projection_scale <= 0.0 {
            return Err(ChartError::Config("projection_scale must be positive".to_owned()));
        }
        if self.location.trim().is_empty() {
            return Err(ChartError::Config("location must not be empty".to_owned()));
        }
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }

    pub fn initial_selection(&self) -> SelectionState {
        SelectionState { current_month: self.initial_month, current_metric: self.initial_metric }
    }

    /// Rows feeding the linked bar chart.
    pub fn linked_query(&self) -> AggregateQuery {
        AggregateQuery::location(self.location.clone())
    }

    /// Rows feeding the overview chart.
    pub fn overview_query(&self) -> AggregateQuery {
        AggregateQuery::location(self.location.clone())
            .between(self.overview.start, self.overview.end)
            .positive(self.overview.metric)
    }
}
