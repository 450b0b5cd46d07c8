// File: crates/covid-core/src/choropleth.rs
// Summary: Choropleth widget: per-country fill for the selected month and metric,
//          month label, hover tooltip, redraw on selection changes.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use skia_safe as skia;
use tracing::debug;

use crate::aggregate::{CountryMonthly, MonthKey};
use crate::error::Result;
use crate::format::format_or_na;
use crate::geo::{Country, NaturalEarth, ProjectedCountry};
use crate::raster::{fill_paint, render_png_bytes, stroke_paint, RenderOptions};
use crate::record::Metric;
use crate::scale::ColorScale;
use crate::selection::{SelectionContext, SelectionEvent, Subscription};
use crate::text::{Anchor, TextShaper};
use crate::tooltip::Tooltip;

const STROKE_WIDTH: f32 = 0.5;
const LABEL_SIZE: f32 = 18.0;

/// How a country that is present in the month's data but has no positive
/// value is colored. Countries absent from the month are always neutral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Floor the value to the scale minimum and use the first color.
    #[default]
    LowestBin,
    /// Treat as missing and use the neutral fill.
    NoData,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Color scale ceiling for cases.
    pub cases_ceiling: f64,
    /// Color scale ceiling for deaths.
    pub deaths_ceiling: f64,
    pub zero_policy: ZeroPolicy,
    pub projection_scale: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self { cases_ceiling: 1e6, deaths_ceiling: 1e4, zero_policy: ZeroPolicy::LowestBin, projection_scale: 160.0 }
    }
}

/// What a region is filled with, before turning it into a color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionFill {
    NoData,
    Value(f64),
}

pub struct ChoroplethMap {
    countries: Vec<ProjectedCountry>,
    data: CountryMonthly,
    opts: RenderOptions,
    settings: MapSettings,
    cases_scale: ColorScale,
    deaths_scale: ColorScale,
    month: MonthKey,
    metric: Metric,
    fills: Vec<skia::Color>,
    redraws: u64,
    ctx: Rc<SelectionContext>,
    subscription: Subscription,
    tooltip: Tooltip,
    hovered: Option<usize>,
    page_origin: (f32, f32),
    shaper: TextShaper,
}

impl ChoroplethMap {
    /// Project the boundaries and subscribe to the selection. The initial
    /// month and metric come from the context.
    pub fn new(
        countries: &[Country],
        data: CountryMonthly,
        ctx: Rc<SelectionContext>,
        tooltip: Tooltip,
        opts: RenderOptions,
        settings: MapSettings,
    ) -> Self {
        let projection = NaturalEarth::centered(settings.projection_scale, opts.width, opts.height);
        let countries = countries
            .iter()
            .map(|c| ProjectedCountry::project(c, &projection))
            .collect::<Vec<_>>();
        let subscription = ctx.subscribe("choropleth");
        let state = ctx.state();
        let mut map = Self {
            countries,
            data,
            opts,
            settings,
            cases_scale: ColorScale::new_log(settings.cases_ceiling, opts.theme.map_ramp(Metric::Cases)),
            deaths_scale: ColorScale::new_log(settings.deaths_ceiling, opts.theme.map_ramp(Metric::Deaths)),
            month: state.current_month,
            metric: state.current_metric,
            fills: Vec::new(),
            redraws: 0,
            ctx,
            subscription,
            tooltip,
            hovered: None,
            page_origin: (0.0, 0.0),
            shaper: TextShaper::new(),
        };
        map.redraw();
        map
    }

    pub fn month(&self) -> MonthKey { self.month }
    pub fn metric(&self) -> Metric { self.metric }
    pub fn countries(&self) -> &[ProjectedCountry] { &self.countries }
    pub fn settings(&self) -> &MapSettings { &self.settings }
    pub fn options(&self) -> &RenderOptions { &self.opts }
    pub fn context(&self) -> &Rc<SelectionContext> { &self.ctx }

    /// Caption drawn in the top-left corner, e.g. `2021-01 (New Cases)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.month, self.metric.label())
    }

    /// Number of full recolors so far (the initial draw counts as one).
    pub fn redraw_count(&self) -> u64 { self.redraws }

    pub fn set_page_origin(&mut self, origin: (f32, f32)) {
        self.page_origin = origin;
    }

    pub fn color_scale(&self, metric: Metric) -> &ColorScale {
        match metric {
            Metric::Cases => &self.cases_scale,
            Metric::Deaths => &self.deaths_scale,
        }
    }

    /// Show `month`, recoloring every region.
    pub fn update_month(&mut self, month: MonthKey) {
        self.month = month;
        self.redraw();
    }

    /// Color by `metric`, recoloring every region.
    pub fn update_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.redraw();
    }

    /// Apply pending selection events.
    pub fn sync(&mut self) {
        for event in self.subscription.drain() {
            match event {
                SelectionEvent::MonthChanged(m) => self.update_month(m),
                SelectionEvent::MetricChanged(m) => self.update_metric(m),
            }
        }
    }

    fn redraw(&mut self) {
        self.fills = (0..self.countries.len())
            .map(|i| self.color_for(self.region_fill(&self.countries[i].iso)))
            .collect();
        self.redraws += 1;
        if let Some(i) = self.hovered {
            self.tooltip.show(self.tooltip_lines(i));
        }
        let with_data = self.data.month(self.month).map_or(0, |m| m.len());
        debug!(month = %self.month, metric = %self.metric, with_data, "map recolored");
    }

    /// Data-side fill decision for a country code under the current selection.
    pub fn region_fill(&self, iso: &str) -> RegionFill {
        match self.data.get(self.month, iso) {
            None => RegionFill::NoData,
            Some(agg) => {
                let v = agg.value(self.metric);
                if v > 0.0 {
                    RegionFill::Value(v)
                } else {
                    match self.settings.zero_policy {
                        ZeroPolicy::LowestBin => RegionFill::Value(ColorScale::FLOOR),
                        ZeroPolicy::NoData => RegionFill::NoData,
                    }
                }
            }
        }
    }

    fn color_for(&self, fill: RegionFill) -> skia::Color {
        match fill {
            RegionFill::NoData => self.opts.theme.map_neutral,
            RegionFill::Value(v) => self.color_scale(self.metric).color(v),
        }
    }

    /// Current fill of the region with code `iso`, if it is on the map.
    pub fn fill_of(&self, iso: &str) -> Option<skia::Color> {
        let i = self.countries.iter().position(|c| c.iso == iso)?;
        self.fills.get(i).copied()
    }

    /// Topmost region under the pointer.
    pub fn country_at(&self, px: f32, py: f32) -> Option<&ProjectedCountry> {
        self.index_at(px, py).map(|i| &self.countries[i])
    }

    fn index_at(&self, px: f32, py: f32) -> Option<usize> {
        self.countries.iter().rposition(|c| c.contains(px, py))
    }

    fn tooltip_lines(&self, i: usize) -> Vec<String> {
        let c = &self.countries[i];
        let agg = self.data.get(self.month, &c.iso);
        vec![
            c.name.clone(),
            format!("Cases: {}", format_or_na(agg.map(|a| a.cases))),
            format!("Deaths: {}", format_or_na(agg.map(|a| a.deaths))),
        ]
    }

    pub fn on_pointer_move(&mut self, px: f32, py: f32, page_x: f32, page_y: f32) {
        match self.index_at(px, py) {
            Some(i) => {
                if self.hovered != Some(i) {
                    self.tooltip.show(self.tooltip_lines(i));
                }
                self.hovered = Some(i);
                self.tooltip.move_to(page_x, page_y);
            }
            None => self.on_pointer_leave(),
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.hovered.take().is_some() {
            self.tooltip.hide();
        }
    }

    pub fn draw(&self, canvas: &skia::Canvas) {
        let theme = &self.opts.theme;
        let stroke = stroke_paint(theme.map_stroke, STROKE_WIDTH);
        for (country, fill) in self.countries.iter().zip(&self.fills) {
            #[allow(deprecated)]
            let mut path = skia::Path::new();
            path.set_fill_type(skia::PathFillType::EvenOdd);
            for ring in &country.rings {
                let Some((&first, rest)) = ring.split_first() else { continue };
                path.move_to(first);
                for &p in rest {
                    path.line_to(p);
                }
                path.close();
            }
            canvas.draw_path(&path, &fill_paint(*fill));
            canvas.draw_path(&path, &stroke);
        }
        if self.opts.draw_labels {
            self.shaper.draw(canvas, &self.label(), 20.0, 20.0 + LABEL_SIZE, LABEL_SIZE, theme.axis_label, Anchor::Start);
        }
        self.tooltip.draw(canvas, &self.shaper, theme, self.page_origin);
    }

    pub fn render_png(&self) -> Result<Vec<u8>> {
        render_png_bytes(&self.opts, |canvas| self.draw(canvas))
    }
}
