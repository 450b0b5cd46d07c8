// File: crates/covid-core/src/record.rs
// Summary: Typed input rows and the CSV loader that coerces them once at load time.
// Notes:
// - Unparseable or non-finite numerics become `None` and count as zero later on.
// - Rows whose date cannot be parsed are dropped (and counted in the log).

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ChartError, Result};

/// Which numeric column a chart encodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    #[serde(rename = "new_cases")]
    Cases,
    #[serde(rename = "new_deaths")]
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Cases, Metric::Deaths];

    /// Column / wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Metric::Cases => "new_cases",
            Metric::Deaths => "new_deaths",
        }
    }

    /// Tooltip label.
    pub const fn label(self) -> &'static str {
        match self {
            Metric::Cases => "New Cases",
            Metric::Deaths => "New Deaths",
        }
    }

    /// Entry text of the metric selector.
    pub const fn selector_label(self) -> &'static str {
        match self {
            Metric::Cases => "New confirmed cases",
            Metric::Deaths => "New confirmed deaths",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "new_cases" | "cases" => Ok(Metric::Cases),
            "new_deaths" | "deaths" => Ok(Metric::Deaths),
            other => Err(ChartError::Config(format!("unknown metric `{other}`"))),
        }
    }
}

/// One coerced input row.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub location: String,
    /// ISO country code; `None` when the cell is empty.
    pub iso_code: Option<String>,
    pub date: NaiveDate,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
}

impl RawRecord {
    pub fn new(location: impl Into<String>, iso_code: Option<&str>, date: NaiveDate) -> Self {
        Self {
            location: location.into(),
            iso_code: iso_code.filter(|s| !s.is_empty()).map(str::to_owned),
            date,
            new_cases: None,
            new_deaths: None,
        }
    }

    pub fn with_cases(mut self, v: f64) -> Self {
        self.new_cases = finite(v);
        self
    }

    pub fn with_deaths(mut self, v: f64) -> Self {
        self.new_deaths = finite(v);
        self
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cases => self.new_cases,
            Metric::Deaths => self.new_deaths,
        }
    }
}

#[inline]
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Parse a numeric cell; empty, malformed, NaN and infinite all yield `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().and_then(finite)
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell.trim(), "%Y-%m-%d").ok()
}

/// Load records from a CSV file on disk.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ChartError::DataLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    info!(path = %path.display(), rows = records.len(), "loaded case records");
    Ok(records)
}

/// Read records from any CSV source. Extra columns are ignored.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    debug!(?headers, "csv headers");

    let idx = |name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(ChartError::MissingColumn(name))
    };
    let i_location = idx("location")?;
    let i_date = idx("date")?;
    let i_cases = idx("new_cases")?;
    let i_deaths = idx("new_deaths")?;
    // Only the map needs country codes.
    let i_iso = headers.iter().position(|h| h == "iso_code");

    let mut out = Vec::new();
    let mut dropped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let Some(date) = rec.get(i_date).and_then(parse_date) else {
            dropped += 1;
            continue;
        };
        let cell = |i: usize| rec.get(i).unwrap_or("");
        out.push(RawRecord {
            location: cell(i_location).trim().to_owned(),
            iso_code: i_iso
                .map(|i| cell(i).trim())
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            date,
            new_cases: parse_number(cell(i_cases)),
            new_deaths: parse_number(cell(i_deaths)),
        });
    }
    if dropped > 0 {
        warn!(dropped, "rows without a parseable date were skipped");
    }
    Ok(out)
}
