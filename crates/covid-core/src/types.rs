// File: crates/covid-core/src/types.rs
// Summary: Shared layout types and per-widget surface sizes and margins.

/// Linked bar chart surface size in pixels.
pub const BAR_WIDTH: i32 = 960;
pub const BAR_HEIGHT: i32 = 300;

/// Overview bar chart surface size in pixels.
pub const OVERVIEW_WIDTH: i32 = 800;
pub const OVERVIEW_HEIGHT: i32 = 400;

/// Choropleth surface size in pixels.
pub const MAP_WIDTH: i32 = 960;
pub const MAP_HEIGHT: i32 = 500;

/// Bar grow / recolor duration.
pub const TRANSITION_MS: u64 = 800;
/// Y axis re-layout duration on metric change.
pub const AXIS_TRANSITION_MS: u64 = 500;

/// Plot margins inside a widget surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Margins of the linked, metric-switchable bar chart.
    pub const fn linked_bars() -> Self { Self::new(60, 30, 20, 30) }
    /// Margins of the overview bar chart.
    pub const fn overview_bars() -> Self { Self::new(60, 30, 40, 50) }
}

/// Pixel rectangle of a plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotRect {
    pub fn inset(width: i32, height: i32, insets: Insets) -> Self {
        Self {
            left: insets.left as f32,
            top: insets.top as f32,
            right: (width - insets.right as i32) as f32,
            bottom: (height - insets.bottom as i32) as f32,
        }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
}
