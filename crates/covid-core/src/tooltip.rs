// File: crates/covid-core/src/tooltip.rs
// Summary: One tooltip shared by every widget; hover shows it, move repositions it, out hides it.

use std::cell::RefCell;
use std::rc::Rc;

use skia_safe as skia;

use crate::text::TextShaper;
use crate::theme::Theme;

/// Distance between the pointer and the tooltip's top-left corner.
pub const POINTER_OFFSET: f32 = 15.0;
const FONT_SIZE: f32 = 12.0;
const PADDING: f32 = 6.0;

#[derive(Clone, Debug, Default, PartialEq)]
struct TooltipState {
    visible: bool,
    lines: Vec<String>,
    left: f32,
    top: f32,
}

/// Cheap handle; clones refer to the same tooltip.
#[derive(Clone, Debug, Default)]
pub struct Tooltip {
    inner: Rc<RefCell<TooltipState>>,
}

impl Tooltip {
    pub fn new() -> Self { Self::default() }

    /// Make visible with new content; the first line is the heading.
    pub fn show(&self, lines: Vec<String>) {
        let mut s = self.inner.borrow_mut();
        s.visible = true;
        s.lines = lines;
    }

    /// Follow the pointer (page coordinates).
    pub fn move_to(&self, page_x: f32, page_y: f32) {
        let mut s = self.inner.borrow_mut();
        s.left = page_x + POINTER_OFFSET;
        s.top = page_y + POINTER_OFFSET;
    }

    pub fn hide(&self) {
        self.inner.borrow_mut().visible = false;
    }

    pub fn is_visible(&self) -> bool { self.inner.borrow().visible }
    pub fn lines(&self) -> Vec<String> { self.inner.borrow().lines.clone() }
    pub fn position(&self) -> (f32, f32) {
        let s = self.inner.borrow();
        (s.left, s.top)
    }

    /// Paint the tooltip if visible. `origin` is the page position of the
    /// canvas' top-left corner.
    pub fn draw(&self, canvas: &skia::Canvas, shaper: &TextShaper, theme: &Theme, origin: (f32, f32)) {
        let s = self.inner.borrow();
        if !s.visible || s.lines.is_empty() {
            return;
        }
        let (w, h) = shaper.measure_lines(&s.lines, FONT_SIZE, true);
        let x = s.left - origin.0;
        let y = s.top - origin.1;
        let rect = skia::Rect::from_xywh(x, y, w + PADDING * 2.0, h + PADDING * 2.0);

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_color(theme.tooltip_background);
        canvas.draw_round_rect(rect, 4.0, 4.0, &fill);

        let mut border = skia::Paint::default();
        border.set_anti_alias(true);
        border.set_style(skia::paint::Style::Stroke);
        border.set_stroke_width(1.0);
        border.set_color(theme.tooltip_border);
        canvas.draw_round_rect(rect, 4.0, 4.0, &border);

        shaper.draw_lines(canvas, &s.lines, x + PADDING, y + PADDING, FONT_SIZE, theme.tooltip_text, true);
    }
}
