// File: crates/covid-core/src/bar_chart.rs
// Summary: Monthly bar chart widget: enter/update transitions, month highlight, hover tooltip,
//          and selection publishing when linked to a `SelectionContext`.
// Notes:
// - Bars are keyed by month; geometry is sampled from the running transition at a
//   caller-supplied timestamp, so rendering and hit testing agree on what is on screen.
// - Negative monthly totals are drawn as empty bars on the baseline.

use std::rc::Rc;

use skia_safe as skia;
use tracing::debug;

use crate::aggregate::{MonthKey, MonthlyAggregate};
use crate::axis::{Axis, TimeTicks};
use crate::error::{ChartError, Result};
use crate::format::format_count;
use crate::geometry::{lerp, RectF};
use crate::raster::{fill_paint, render_png_bytes, stroke_paint, RenderOptions};
use crate::record::Metric;
use crate::scale::{TimeScale, ValueScale};
use crate::selection::{SelectionContext, SelectionEvent, Subscription};
use crate::text::TextShaper;
use crate::tooltip::Tooltip;
use crate::transition::{lerp_color, Transition};
use crate::types::{PlotRect, AXIS_TRANSITION_MS, TRANSITION_MS};

const HIGHLIGHT_STROKE: f32 = 3.0;

/// Horizontal placement of a bar relative to its month's x position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarLayout {
    /// Bar starts at the month; width = plot width / n - 1.
    Leading,
    /// Bar centred on the month; width = 90% of plot width / n.
    Centered,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarChartStyle {
    pub layout: BarLayout,
    pub time_ticks: TimeTicks,
    /// Fixed fill; `None` colors by metric.
    pub fixed_fill: Option<skia::Color>,
}

impl BarChartStyle {
    /// Metric-switchable chart linked to the map.
    pub fn linked() -> Self {
        Self { layout: BarLayout::Leading, time_ticks: TimeTicks::Months(10), fixed_fill: None }
    }

    /// Static monthly cases overview with yearly ticks.
    pub fn overview(fill: skia::Color) -> Self {
        Self { layout: BarLayout::Centered, time_ticks: TimeTicks::Years, fixed_fill: Some(fill) }
    }
}

/// One bar as drawn at a given instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub month: MonthKey,
    pub rect: RectF,
    pub fill: skia::Color,
    pub highlighted: bool,
}

#[derive(Clone, Copy, Debug)]
struct BarTween {
    x: f32,
    width: f32,
    from_y: f32,
    from_h: f32,
    to_y: f32,
    to_h: f32,
    from_fill: skia::Color,
    to_fill: skia::Color,
}

impl BarTween {
    fn sample(&self, t: f32) -> (f32, f32, skia::Color) {
        (
            lerp(self.from_y, self.to_y, t),
            lerp(self.from_h, self.to_h, t),
            lerp_color(self.from_fill, self.to_fill, t),
        )
    }
}

struct Link {
    ctx: Rc<SelectionContext>,
    subscription: Subscription,
}

pub struct BarChart {
    data: Vec<MonthlyAggregate>,
    opts: RenderOptions,
    style: BarChartStyle,
    plot: PlotRect,
    x: TimeScale,
    y: ValueScale,
    prev_y: ValueScale,
    metric: Metric,
    highlighted: Option<MonthKey>,
    hovered: Option<MonthKey>,
    tweens: Vec<BarTween>,
    bars_transition: Transition,
    axis_transition: Transition,
    link: Option<Link>,
    tooltip: Tooltip,
    /// Page position of the surface's top-left corner.
    page_origin: (f32, f32),
    shaper: TextShaper,
}

impl BarChart {
    /// Bar chart that follows and publishes the shared selection. Subscribes
    /// immediately; the initial metric and highlight come from the context.
    pub fn linked(
        data: Vec<MonthlyAggregate>,
        ctx: Rc<SelectionContext>,
        tooltip: Tooltip,
        opts: RenderOptions,
        now_ms: u64,
    ) -> Result<Self> {
        let subscription = ctx.subscribe("bar_chart");
        let state = ctx.state();
        let mut chart = Self::build(data, opts, BarChartStyle::linked(), state.current_metric, tooltip, now_ms)?;
        chart.highlighted = Some(state.current_month);
        chart.link = Some(Link { ctx, subscription });
        Ok(chart)
    }

    /// Standalone chart of one metric; not connected to any selection.
    pub fn standalone(
        data: Vec<MonthlyAggregate>,
        metric: Metric,
        style: BarChartStyle,
        opts: RenderOptions,
        now_ms: u64,
    ) -> Result<Self> {
        Self::build(data, opts, style, metric, Tooltip::new(), now_ms)
    }

    fn build(
        data: Vec<MonthlyAggregate>,
        opts: RenderOptions,
        style: BarChartStyle,
        metric: Metric,
        tooltip: Tooltip,
        now_ms: u64,
    ) -> Result<Self> {
        let plot = PlotRect::inset(opts.width, opts.height, opts.insets);
        let x = TimeScale::from_aggregates(&data, plot.left, plot.right).ok_or(ChartError::EmptyAggregation)?;
        let y = ValueScale::for_metric(&data, metric, plot.top, plot.bottom);
        let mut chart = Self {
            data,
            opts,
            style,
            plot,
            x,
            y,
            prev_y: y,
            metric,
            highlighted: None,
            hovered: None,
            tweens: Vec::new(),
            bars_transition: Transition::new(now_ms, TRANSITION_MS),
            axis_transition: Transition::new(now_ms, 0),
            link: None,
            tooltip,
            page_origin: (0.0, 0.0),
            shaper: TextShaper::new(),
        };
        chart.enter();
        Ok(chart)
    }

    /// Initial bars: grow from zero height at the baseline.
    fn enter(&mut self) {
        let baseline = self.y.to_px(0.0);
        let fill = self.fill_for(self.metric);
        self.tweens = self
            .data
            .iter()
            .map(|d| {
                let (x, width) = self.bar_x(d);
                let (to_y, to_h) = self.bar_y(d.value(self.metric));
                BarTween { x, width, from_y: baseline, from_h: 0.0, to_y, to_h, from_fill: fill, to_fill: fill }
            })
            .collect();
        debug!(bars = self.tweens.len(), metric = %self.metric, "bars entered");
    }

    fn fill_for(&self, metric: Metric) -> skia::Color {
        self.style.fixed_fill.unwrap_or_else(|| self.opts.theme.bar_fill(metric))
    }

    fn bar_x(&self, d: &MonthlyAggregate) -> (f32, f32) {
        let n = self.data.len().max(1) as f32;
        let x = self.x.to_px(d.date);
        match self.style.layout {
            BarLayout::Leading => (x, (self.plot.width() / n - 1.0).max(0.0)),
            BarLayout::Centered => {
                let w = self.plot.width() / n;
                (x - w / 2.0, w * 0.9)
            }
        }
    }

    fn bar_y(&self, value: f64) -> (f32, f32) {
        let baseline = self.y.to_px(0.0);
        let top = self.y.to_px(value.max(0.0));
        (top, baseline - top)
    }

    pub fn metric(&self) -> Metric { self.metric }
    pub fn highlighted(&self) -> Option<MonthKey> { self.highlighted }
    pub fn data(&self) -> &[MonthlyAggregate] { &self.data }
    pub fn time_scale(&self) -> &TimeScale { &self.x }
    pub fn value_scale(&self) -> &ValueScale { &self.y }
    pub fn options(&self) -> &RenderOptions { &self.opts }

    pub fn set_page_origin(&mut self, origin: (f32, f32)) {
        self.page_origin = origin;
    }

    /// Entries of the metric selector, in display order.
    pub fn selector_options(&self) -> [(Metric, &'static str); 2] {
        Metric::ALL.map(|m| (m, m.selector_label()))
    }

    /// Time at which every running transition has finished.
    pub fn settled_at(&self) -> u64 {
        self.bars_transition.end_ms().max(self.axis_transition.end_ms())
    }

    /// Re-encode bars with `metric`: new nice y domain, fill and height
    /// transition from their current on-screen state.
    pub fn set_metric(&mut self, metric: Metric, now_ms: u64) {
        let t = self.bars_transition.progress(now_ms);
        let current_y = self.axis_scale(now_ms);
        self.metric = metric;
        self.prev_y = current_y;
        self.y = ValueScale::for_metric(&self.data, metric, self.plot.top, self.plot.bottom);
        let to_fill = self.fill_for(metric);

        let targets = self
            .data
            .iter()
            .map(|d| self.bar_y(d.value(metric)))
            .collect::<Vec<_>>();
        for (tw, (to_y, to_h)) in self.tweens.iter_mut().zip(targets) {
            let (y, h, fill) = tw.sample(t);
            *tw = BarTween { from_y: y, from_h: h, from_fill: fill, to_y, to_h, to_fill, ..*tw };
        }
        self.bars_transition = Transition::new(now_ms, TRANSITION_MS);
        self.axis_transition = Transition::new(now_ms, AXIS_TRANSITION_MS);
        if let Some(month) = self.hovered {
            self.tooltip.show(self.tooltip_lines(month));
        }
        debug!(%metric, vmax = self.y.vmax, "bar metric changed");
    }

    /// Stroke the bar of `month` (and no other).
    pub fn highlight_bar(&mut self, month: MonthKey) {
        self.highlighted = Some(month);
    }

    /// Apply pending selection events.
    pub fn sync(&mut self, now_ms: u64) {
        let Some(link) = &self.link else { return };
        for event in link.subscription.drain() {
            match event {
                SelectionEvent::MonthChanged(m) => self.highlight_bar(m),
                SelectionEvent::MetricChanged(m) if m != self.metric => self.set_metric(m, now_ms),
                SelectionEvent::MetricChanged(_) => {}
            }
        }
    }

    /// Metric selector changed.
    pub fn on_metric_selected(&mut self, metric: Metric, now_ms: u64) {
        match &self.link {
            Some(link) => {
                link.ctx.select_metric(metric);
                self.sync(now_ms);
            }
            None => {
                if metric != self.metric {
                    self.set_metric(metric, now_ms);
                }
            }
        }
    }

    /// Click at plot pixel coordinates. Selects the clicked bar's month when linked.
    pub fn on_click(&mut self, px: f32, py: f32, now_ms: u64) -> Option<MonthKey> {
        let month = self.bar_at(px, py, now_ms)?;
        if let Some(link) = &self.link {
            link.ctx.select_month(month);
            self.sync(now_ms);
        }
        Some(month)
    }

    /// Pointer moved over the chart. `page_*` position the shared tooltip.
    pub fn on_pointer_move(&mut self, px: f32, py: f32, page_x: f32, page_y: f32, now_ms: u64) {
        let hit = self.bar_at(px, py, now_ms);
        match (self.hovered, hit) {
            (_, Some(month)) => {
                if self.hovered != Some(month) {
                    self.tooltip.show(self.tooltip_lines(month));
                }
                self.hovered = Some(month);
                self.tooltip.move_to(page_x, page_y);
            }
            (Some(_), None) => self.on_pointer_leave(),
            (None, None) => {}
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.hovered.take().is_some() {
            self.tooltip.hide();
        }
    }

    fn tooltip_lines(&self, month: MonthKey) -> Vec<String> {
        let value = self
            .data
            .iter()
            .find(|d| d.month == month)
            .map(|d| d.value(self.metric))
            .unwrap_or(0.0);
        vec![month.to_string(), format!("{}: {}", self.metric.label(), format_count(value))]
    }

    /// Bars as drawn at `now_ms`.
    pub fn frame(&self, now_ms: u64) -> Vec<Bar> {
        let t = self.bars_transition.progress(now_ms);
        self.data
            .iter()
            .zip(&self.tweens)
            .map(|(d, tw)| {
                let (y, h, fill) = tw.sample(t);
                Bar {
                    month: d.month,
                    rect: RectF::from_xywh(tw.x, y, tw.width, h),
                    fill,
                    highlighted: self.highlighted == Some(d.month),
                }
            })
            .collect()
    }

    /// Topmost bar under the pointer (later bars paint over earlier ones).
    pub fn bar_at(&self, px: f32, py: f32, now_ms: u64) -> Option<MonthKey> {
        self.frame(now_ms)
            .into_iter()
            .rev()
            .find(|b| b.rect.contains(px, py))
            .map(|b| b.month)
    }

    fn axis_scale(&self, now_ms: u64) -> ValueScale {
        let t = self.axis_transition.progress(now_ms) as f64;
        let vmin = self.prev_y.vmin + (self.y.vmin - self.prev_y.vmin) * t;
        let vmax = self.prev_y.vmax + (self.y.vmax - self.prev_y.vmax) * t;
        ValueScale::new_linear(self.y.top_px, self.y.bottom_px, vmin, vmax)
    }

    pub fn draw(&self, canvas: &skia::Canvas, now_ms: u64) {
        let theme = &self.opts.theme;
        let labels = self.opts.draw_labels;

        Axis::bottom_time(&self.x, self.plot.bottom, self.style.time_ticks).draw(canvas, &self.shaper, theme, labels);
        Axis::left_values(&self.axis_scale(now_ms), self.plot.left, 10).draw(canvas, &self.shaper, theme, labels);

        let highlight = stroke_paint(theme.highlight, HIGHLIGHT_STROKE);
        for bar in self.frame(now_ms) {
            let r = skia::Rect::from_ltrb(bar.rect.left, bar.rect.top, bar.rect.right, bar.rect.bottom);
            canvas.draw_rect(r, &fill_paint(bar.fill));
            if bar.highlighted {
                canvas.draw_rect(r, &highlight);
            }
        }
        self.tooltip.draw(canvas, &self.shaper, theme, self.page_origin);
    }

    /// Render the chart as it looks at `now_ms` to PNG bytes.
    pub fn render_png(&self, now_ms: u64) -> Result<Vec<u8>> {
        render_png_bytes(&self.opts, |canvas| self.draw(canvas, now_ms))
    }
}
