// File: crates/covid-core/src/dashboard.rs
// Summary: Page composition: shared selection + tooltip, overview chart, linked bar chart and map.
// Notes:
// - The selection context exists before either widget, and each widget subscribes
//   in its constructor, so no selection change can be published unheard.
// - Page layout: linked bars on top, map below; the overview is a separate page.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{info, warn};

use crate::aggregate::{aggregate_by_country, aggregate_monthly, AggregateQuery, MonthKey};
use crate::bar_chart::{BarChart, BarChartStyle};
use crate::choropleth::ChoroplethMap;
use crate::config::DashboardConfig;
use crate::error::{ChartError, Result};
use crate::geo::{load_countries, Country};
use crate::geometry::RectF;
use crate::raster::{write_png, RenderOptions};
use crate::record::{load_records, Metric, RawRecord};
use crate::selection::SelectionContext;
use crate::tooltip::Tooltip;

pub struct Dashboard {
    ctx: Rc<SelectionContext>,
    tooltip: Tooltip,
    overview: Option<BarChart>,
    bars: BarChart,
    map: ChoroplethMap,
    bars_page: RectF,
    map_page: RectF,
}

impl Dashboard {
    /// Read both inputs and build every widget.
    pub fn load(cfg: &DashboardConfig, now_ms: u64) -> Result<Self> {
        cfg.validate()?;
        let records = load_records(&cfg.data_path)?;
        let countries = load_countries(&cfg.geo_path)?;
        Self::from_parts(cfg, &records, &countries, now_ms)
    }

    pub fn from_parts(cfg: &DashboardConfig, records: &[RawRecord], countries: &[Country], now_ms: u64) -> Result<Self> {
        let ctx = SelectionContext::new(cfg.initial_selection());
        let tooltip = Tooltip::new();
        let theme = cfg.theme();

        let overview_data = aggregate_monthly(records, &cfg.overview_query());
        let overview = match BarChart::standalone(
            overview_data,
            cfg.overview.metric,
            BarChartStyle::overview(theme.bar_overview),
            RenderOptions::overview_bars().with_theme(theme),
            now_ms,
        ) {
            Ok(chart) => Some(chart),
            Err(ChartError::EmptyAggregation) => {
                warn!(location = %cfg.location, "no rows in the overview window; overview disabled");
                None
            }
            Err(e) => return Err(e),
        };

        let linked_data = aggregate_monthly(records, &cfg.linked_query());
        let mut bars = BarChart::linked(
            linked_data,
            Rc::clone(&ctx),
            tooltip.clone(),
            RenderOptions::linked_bars().with_theme(theme),
            now_ms,
        )?;

        let country_data = aggregate_by_country(records, &AggregateQuery::countries());
        let mut map = ChoroplethMap::new(
            countries,
            country_data,
            Rc::clone(&ctx),
            tooltip.clone(),
            RenderOptions::map().with_theme(theme),
            cfg.map,
        );

        let b = bars.options();
        let bars_page = RectF::from_xywh(0.0, 0.0, b.width as f32, b.height as f32);
        let m = map.options();
        let map_page = RectF::from_xywh(0.0, bars_page.bottom, m.width as f32, m.height as f32);
        bars.set_page_origin((bars_page.left, bars_page.top));
        map.set_page_origin((map_page.left, map_page.top));

        info!(
            bars = bars.data().len(),
            regions = map.countries().len(),
            subscribers = ctx.subscriber_count(),
            "dashboard ready"
        );
        Ok(Self { ctx, tooltip, overview, bars, map, bars_page, map_page })
    }

    pub fn context(&self) -> &Rc<SelectionContext> { &self.ctx }
    pub fn tooltip(&self) -> &Tooltip { &self.tooltip }
    pub fn overview(&self) -> Option<&BarChart> { self.overview.as_ref() }
    pub fn bars(&self) -> &BarChart { &self.bars }
    pub fn map(&self) -> &ChoroplethMap { &self.map }

    /// Deliver pending selection events to both widgets.
    pub fn sync(&mut self, now_ms: u64) {
        self.bars.sync(now_ms);
        self.map.sync();
    }

    /// Click on the linked chart, in page coordinates.
    pub fn click(&mut self, page_x: f32, page_y: f32, now_ms: u64) -> Option<MonthKey> {
        if !self.bars_page.contains(page_x, page_y) {
            return None;
        }
        let month = self.bars.on_click(page_x - self.bars_page.left, page_y - self.bars_page.top, now_ms);
        self.sync(now_ms);
        month
    }

    /// Metric selector changed.
    pub fn select_metric(&mut self, metric: Metric, now_ms: u64) {
        self.bars.on_metric_selected(metric, now_ms);
        self.sync(now_ms);
    }

    /// Month chosen from outside the bar chart; the bar highlight follows.
    pub fn select_month(&mut self, month: MonthKey, now_ms: u64) {
        self.ctx.select_month(month);
        self.sync(now_ms);
    }

    /// Route pointer movement (page coordinates) to the widget under it.
    pub fn pointer_move(&mut self, page_x: f32, page_y: f32, now_ms: u64) {
        if self.bars_page.contains(page_x, page_y) {
            self.map.on_pointer_leave();
            let (x, y) = (page_x - self.bars_page.left, page_y - self.bars_page.top);
            self.bars.on_pointer_move(x, y, page_x, page_y, now_ms);
        } else if self.map_page.contains(page_x, page_y) {
            self.bars.on_pointer_leave();
            let (x, y) = (page_x - self.map_page.left, page_y - self.map_page.top);
            self.map.on_pointer_move(x, y, page_x, page_y);
        } else {
            self.pointer_leave();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.bars.on_pointer_leave();
        self.map.on_pointer_leave();
    }

    /// Write `overview.png`, `bars.png` and `map.png` into `dir`.
    pub fn render_to_dir(&self, dir: impl AsRef<Path>, now_ms: u64) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::new();
        if let Some(overview) = &self.overview {
            let path = dir.join("overview.png");
            write_png(&path, &overview.render_png(now_ms)?)?;
            written.push(path);
        }
        let path = dir.join("bars.png");
        write_png(&path, &self.bars.render_png(now_ms)?)?;
        written.push(path);

        let path = dir.join("map.png");
        write_png(&path, &self.map.render_png()?)?;
        written.push(path);

        info!(dir = %dir.display(), files = written.len(), "rendered dashboard");
        Ok(written)
    }
}
