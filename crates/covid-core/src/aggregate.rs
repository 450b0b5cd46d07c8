// File: crates/covid-core/src/aggregate.rs
// Summary: Month keys and grouped-sum aggregation (global per month, per country per month).

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChartError;
use crate::record::{Metric, RawRecord};

/// Calendar month, ordered chronologically. Formats as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `1 <= month <= 12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// For constants; a month outside 1..=12 fails at compile time.
    pub const fn from_parts(year: i32, month: u32) -> Self {
        assert!(month >= 1 && month <= 12, "month out of range");
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub const fn year(&self) -> i32 { self.year }
    pub const fn month(&self) -> u32 { self.month }

    /// First day of the month; the representative date of an aggregate.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Shift by `n` months (negative goes back).
    pub fn add_months(&self, n: i32) -> Self {
        let idx = self.year * 12 + (self.month as i32 - 1) + n;
        Self { year: idx.div_euclid(12), month: idx.rem_euclid(12) as u32 + 1 }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ChartError::Config(format!("invalid month `{s}`, expected YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year = y.parse::<i32>().map_err(|_| bad())?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        MonthKey::new(year, month).ok_or_else(bad)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ChartError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<MonthKey> for String {
    fn from(m: MonthKey) -> Self { m.to_string() }
}

/// Summed statistics for one month (optionally scoped to one country).
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    /// First day of `month`.
    pub date: NaiveDate,
    pub cases: f64,
    pub deaths: f64,
}

impl MonthlyAggregate {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
        }
    }
}

/// Which rows take part in an aggregation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Rows whose `location` equals the name exactly (e.g. "World").
    Location(String),
    /// Rows that carry a country code.
    AnyCountry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateQuery {
    pub scope: Scope,
    /// Inclusive date range.
    pub range: Option<(NaiveDate, NaiveDate)>,
    /// Keep only rows whose value for this metric is present and `> 0`.
    pub positive_only: Option<Metric>,
}

impl AggregateQuery {
    pub fn location(name: impl Into<String>) -> Self {
        Self { scope: Scope::Location(name.into()), range: None, positive_only: None }
    }

    pub fn countries() -> Self {
        Self { scope: Scope::AnyCountry, range: None, positive_only: None }
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn positive(mut self, metric: Metric) -> Self {
        self.positive_only = Some(metric);
        self
    }

    pub fn matches(&self, r: &RawRecord) -> bool {
        let in_scope = match &self.scope {
            Scope::Location(name) => r.location == *name,
            Scope::AnyCountry => r.iso_code.is_some(),
        };
        if !in_scope {
            return false;
        }
        if let Some((start, end)) = self.range {
            if r.date < start || r.date > end {
                return false;
            }
        }
        match self.positive_only {
            Some(metric) => r.value(metric).is_some_and(|v| v > 0.0),
            None => true,
        }
    }
}

#[derive(Default)]
struct Bucket {
    cases: Vec<f64>,
    deaths: Vec<f64>,
}

impl Bucket {
    fn push(&mut self, r: &RawRecord) {
        self.cases.extend(r.new_cases);
        self.deaths.extend(r.new_deaths);
    }

    fn finish(self, month: MonthKey) -> MonthlyAggregate {
        MonthlyAggregate {
            month,
            date: month.first_day(),
            cases: canonical_sum(self.cases),
            deaths: canonical_sum(self.deaths),
        }
    }
}

/// Sum in a fixed order so the result does not depend on input order.
fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Group matching rows by month and sum cases and deaths.
/// Output is ascending by month; empty input yields an empty vector.
pub fn aggregate_monthly<'a, I>(records: I, query: &AggregateQuery) -> Vec<MonthlyAggregate>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut groups: BTreeMap<MonthKey, Bucket> = BTreeMap::new();
    for r in records.into_iter().filter(|r| query.matches(r)) {
        groups.entry(MonthKey::from_date(r.date)).or_default().push(r);
    }
    let out = groups
        .into_iter()
        .map(|(month, bucket)| bucket.finish(month))
        .collect::<Vec<_>>();
    debug!(scope = ?query.scope, months = out.len(), "aggregated monthly totals");
    out
}

/// Per-country monthly totals: month -> ISO code -> aggregate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryMonthly {
    by_month: BTreeMap<MonthKey, BTreeMap<String, MonthlyAggregate>>,
}

impl CountryMonthly {
    pub fn get(&self, month: MonthKey, iso: &str) -> Option<&MonthlyAggregate> {
        self.by_month.get(&month)?.get(iso)
    }

    pub fn month(&self, month: MonthKey) -> Option<&BTreeMap<String, MonthlyAggregate>> {
        self.by_month.get(&month)
    }

    /// Months with data, ascending.
    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.by_month.keys().copied()
    }

    /// Largest value of `metric` across all countries and months.
    pub fn max_value(&self, metric: Metric) -> f64 {
        self.by_month
            .values()
            .flat_map(|m| m.values())
            .map(|a| a.value(metric))
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool { self.by_month.is_empty() }
}

/// Group rows by (month, country code) and sum. Rows without a code are skipped
/// regardless of the query scope.
pub fn aggregate_by_country<'a, I>(records: I, query: &AggregateQuery) -> CountryMonthly
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut groups: BTreeMap<MonthKey, BTreeMap<String, Bucket>> = BTreeMap::new();
    for r in records.into_iter().filter(|r| query.matches(r)) {
        let Some(iso) = r.iso_code.as_deref() else { continue };
        groups
            .entry(MonthKey::from_date(r.date))
            .or_default()
            .entry(iso.to_owned())
            .or_default()
            .push(r);
    }
    let by_month = groups
        .into_iter()
        .map(|(month, countries)| {
            let countries = countries
                .into_iter()
                .map(|(iso, bucket)| (iso, bucket.finish(month)))
                .collect();
            (month, countries)
        })
        .collect::<BTreeMap<_, _>>();
    debug!(months = by_month.len(), "aggregated per-country totals");
    CountryMonthly { by_month }
}
