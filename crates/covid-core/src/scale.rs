// File: crates/covid-core/src/scale.rs
// Summary: Time (X) and value (Y) scales with nice domains and ticks, plus the log color scale.

use chrono::{Datelike, NaiveDate};
use skia_safe as skia;

use crate::aggregate::{MonthKey, MonthlyAggregate};
use crate::record::Metric;
use crate::theme::Ramp;

/// Horizontal time scale mapping `[start, end]` dates to `[left_px, right_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f32,
    pub right_px: f32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeScale {
    pub fn new(left_px: f32, right_px: f32, start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self { left_px, right_px, start, end }
    }

    /// Domain = extent of the aggregates' representative dates.
    /// Returns `None` for an empty slice.
    pub fn from_aggregates(data: &[MonthlyAggregate], left_px: f32, right_px: f32) -> Option<Self> {
        let min = data.iter().map(|d| d.date).min()?;
        let max = data.iter().map(|d| d.date).max()?;
        Some(Self::new(left_px, right_px, min, max))
    }

    fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    #[inline]
    pub fn to_px(&self, date: NaiveDate) -> f32 {
        let span = self.span_days();
        if span == 0 {
            // single-date domain maps to the middle of the range
            return (self.left_px + self.right_px) * 0.5;
        }
        let t = (date - self.start).num_days() as f64 / span as f64;
        self.left_px + t as f32 * (self.right_px - self.left_px)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> NaiveDate {
        let w = self.right_px - self.left_px;
        if w.abs() < f32::EPSILON {
            return self.start;
        }
        let t = ((px - self.left_px) / w) as f64;
        let days = (t * self.span_days() as f64).round() as i64;
        self.start + chrono::Duration::days(days)
    }

    /// Month-start ticks inside the domain. The step is the smallest of
    /// 1, 2, 3, 6, 12, 24, 60, 120 months that yields at most `count` ticks,
    /// aligned to calendar multiples of the step.
    pub fn month_ticks(&self, count: usize) -> Vec<NaiveDate> {
        const STEPS: [i32; 8] = [1, 2, 3, 6, 12, 24, 60, 120];
        let count = count.max(1);
        let first = first_month_start_on_or_after(self.start);
        let last = MonthKey::from_date(self.end);
        let months = month_index(last) - month_index(first) + 1;
        let step = STEPS
            .iter()
            .copied()
            .find(|s| (months.max(0) as usize).div_ceil(*s as usize) <= count)
            .unwrap_or(120);

        let mut out = Vec::new();
        let mut m = first;
        while m <= last {
            if month_index(m).rem_euclid(step) == 0 {
                out.push(m.first_day());
            }
            m = m.add_months(1);
        }
        out
    }

    /// January 1st of each year inside the domain.
    pub fn year_ticks(&self) -> Vec<NaiveDate> {
        (self.start.year()..=self.end.year())
            .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .filter(|d| *d >= self.start && *d <= self.end)
            .collect()
    }
}

fn first_month_start_on_or_after(date: NaiveDate) -> MonthKey {
    let m = MonthKey::from_date(date);
    if date.day() == 1 { m } else { m.add_months(1) }
}

fn month_index(m: MonthKey) -> i32 {
    m.year() * 12 + m.month() as i32 - 1
}

/// Label a month tick the way multi-scale time axes do: the year on January, else the month name.
pub fn format_month_tick(date: NaiveDate) -> String {
    if date.month() == 1 {
        date.format("%Y").to_string()
    } else {
        date.format("%B").to_string()
    }
}

/// Vertical value scale mapping `[vmin, vmax]` to `[bottom_px, top_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: f64, vmax: f64) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax };
        if !(s.vmax - s.vmin).is_finite() || (s.vmax - s.vmin).abs() < 1e-12 {
            s.vmax = s.vmin + 1.0;
        }
        s
    }

    /// `[0, max]` for the given metric, extended to a nice bound (10 ticks).
    pub fn for_metric(data: &[MonthlyAggregate], metric: Metric, top_px: f32, bottom_px: f32) -> Self {
        let max = data.iter().map(|d| d.value(metric)).fold(0.0, f64::max);
        let mut s = Self::new_linear(top_px, bottom_px, 0.0, max);
        s.nice(10);
        s
    }

    #[inline]
    pub fn to_px(&self, y: f64) -> f32 {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.bottom_px - ((y - self.vmin) / span) as f32 * (self.bottom_px - self.top_px)
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> f64 {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.vmin + ((self.bottom_px - py) / (self.bottom_px - self.top_px)) as f64 * span
    }

    /// Extend the domain outwards to multiples of a 1/2/5 x 10^k tick step.
    pub fn nice(&mut self, count: usize) {
        let (mut start, mut stop) = (self.vmin, self.vmax);
        let mut prev = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prev || !step.is_finite() || step <= 0.0 {
                break;
            }
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
            prev = step;
        }
        self.vmin = start;
        self.vmax = stop;
    }

    /// Tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let step = tick_increment(self.vmin, self.vmax, count);
        if !step.is_finite() || step <= 0.0 {
            return vec![self.vmin];
        }
        let lo = (self.vmin / step).ceil() as i64;
        let hi = (self.vmax / step).floor() as i64;
        (lo..=hi).map(|i| i as f64 * step).collect()
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        tick_increment(self.vmin, self.vmax, count)
    }
}

/// Step from the 1/2/5 ladder that splits `[start, stop]` into about `count` intervals.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if step <= 0.0 || !step.is_finite() {
        return f64::NAN;
    }
    let power = step.log10().floor();
    let base = 10f64.powf(power);
    let error = step / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Sequential logarithmic color scale over `[floor, ceiling]`.
/// Inputs below the floor (including zero and negatives) take the first color,
/// inputs above the ceiling the last.
#[derive(Clone, Copy, Debug)]
pub struct ColorScale {
    floor: f64,
    ceiling: f64,
    ramp: Ramp,
}

impl ColorScale {
    pub const FLOOR: f64 = 1.0;

    pub fn new_log(ceiling: f64, ramp: Ramp) -> Self {
        let floor = Self::FLOOR;
        let ceiling = if ceiling.is_finite() && ceiling > floor { ceiling } else { floor * 10.0 };
        Self { floor, ceiling, ramp }
    }

    pub fn domain(&self) -> (f64, f64) { (self.floor, self.ceiling) }

    /// Position of `v` along the ramp in `[0, 1]`.
    pub fn normalize(&self, v: f64) -> f64 {
        // NaN and -inf fall to the floor, +inf saturates
        let v = v.max(self.floor);
        let (lo, hi) = (self.floor.ln(), self.ceiling.ln());
        ((v.ln() - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    pub fn color(&self, v: f64) -> skia::Color {
        self.ramp.at(self.normalize(v))
    }
}
