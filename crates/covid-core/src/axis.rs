// File: crates/covid-core/src/axis.rs
// Summary: Axis model (domain line, tick marks, labels) built from scales and drawn with Skia.

use skia_safe as skia;

use crate::format::format_tick;
use crate::scale::{format_month_tick, TimeScale, ValueScale};
use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;

const TICK_SIZE: f32 = 6.0;
const TICK_PADDING: f32 = 3.0;
const FONT_SIZE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Bottom,
    Left,
}

/// How a time axis picks its ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeTicks {
    /// Month boundaries, at most this many.
    Months(usize),
    /// One tick per January, labelled with the year.
    Years,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub px: f32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub orientation: Orientation,
    /// y of a bottom axis, x of a left axis.
    pub offset: f32,
    /// Pixel extent of the domain line.
    pub range: (f32, f32),
    pub ticks: Vec<Tick>,
}

impl Axis {
    pub fn bottom_time(x: &TimeScale, y_px: f32, mode: TimeTicks) -> Self {
        let ticks = match mode {
            TimeTicks::Months(count) => x
                .month_ticks(count)
                .into_iter()
                .map(|d| Tick { px: x.to_px(d), label: format_month_tick(d) })
                .collect(),
            TimeTicks::Years => x
                .year_ticks()
                .into_iter()
                .map(|d| Tick { px: x.to_px(d), label: d.format("%Y").to_string() })
                .collect(),
        };
        Self { orientation: Orientation::Bottom, offset: y_px, range: (x.left_px, x.right_px), ticks }
    }

    pub fn left_values(y: &ValueScale, x_px: f32, count: usize) -> Self {
        let step = y.tick_step(count);
        let ticks = y
            .ticks(count)
            .into_iter()
            .map(|v| Tick { px: y.to_px(v), label: format_tick(v, step) })
            .collect();
        Self { orientation: Orientation::Left, offset: x_px, range: (y.bottom_px, y.top_px), ticks }
    }

    pub fn draw(&self, canvas: &skia::Canvas, shaper: &TextShaper, theme: &Theme, draw_labels: bool) {
        let mut line = skia::Paint::default();
        line.set_anti_alias(true);
        line.set_style(skia::paint::Style::Stroke);
        line.set_stroke_width(1.0);
        line.set_color(theme.axis_line);

        let (a, b) = self.range;
        match self.orientation {
            Orientation::Bottom => {
                canvas.draw_line((a, self.offset), (b, self.offset), &line);
                line.set_color(theme.tick);
                for t in &self.ticks {
                    canvas.draw_line((t.px, self.offset), (t.px, self.offset + TICK_SIZE), &line);
                    if draw_labels {
                        let baseline = self.offset + TICK_SIZE + TICK_PADDING + FONT_SIZE;
                        shaper.draw(canvas, &t.label, t.px, baseline, FONT_SIZE, theme.axis_label, Anchor::Middle);
                    }
                }
            }
            Orientation::Left => {
                canvas.draw_line((self.offset, a), (self.offset, b), &line);
                line.set_color(theme.tick);
                for t in &self.ticks {
                    canvas.draw_line((self.offset - TICK_SIZE, t.px), (self.offset, t.px), &line);
                    if draw_labels {
                        let x = self.offset - TICK_SIZE - TICK_PADDING;
                        shaper.draw(canvas, &t.label, x, t.px + FONT_SIZE * 0.35, FONT_SIZE, theme.axis_label, Anchor::End);
                    }
                }
            }
        }
    }
}
