// File: crates/covid-core/src/text.rs
// Summary: Text shaping for tooltips, labels and ticks using Skia textlayout.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

/// Horizontal anchor of a single text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color, bold: bool) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);
        if bold {
            ts.set_font_style(skia::FontStyle::bold());
        }
        ts
    }

    /// Lay out `lines`; the first line may be bold (tooltip headings).
    pub fn layout_lines(&self, lines: &[String], size: f32, color: skia::Color, bold_first: bool) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        for (i, line) in lines.iter().enumerate() {
            let style = Self::make_style(size, color, bold_first && i == 0);
            builder.push_style(&style);
            if i + 1 < lines.len() {
                builder.add_text(format!("{line}\n"));
            } else {
                builder.add_text(line);
            }
            builder.pop();
        }
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color) -> Paragraph {
        self.layout_lines(&[text.to_owned()], size, color, false)
    }

    /// (width, height) of laid out lines.
    pub fn measure_lines(&self, lines: &[String], size: f32, bold_first: bool) -> (f32, f32) {
        let p = self.layout_lines(lines, size, skia::Color::TRANSPARENT, bold_first);
        (p.longest_line(), p.height())
    }

    /// Draw a single line with its baseline at `y`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: skia::Color, anchor: Anchor) {
        let p = self.layout(text, size, color);
        let w = p.longest_line();
        let left = match anchor {
            Anchor::Start => x,
            Anchor::Middle => x - w * 0.5,
            Anchor::End => x - w,
        };
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(canvas, (left, y - size * 0.8));
    }

    /// Draw lines with their top-left corner at (`x`, `y`).
    pub fn draw_lines(&self, canvas: &skia::Canvas, lines: &[String], x: f32, y: f32, size: f32, color: skia::Color, bold_first: bool) {
        let p = self.layout_lines(lines, size, color, bold_first);
        p.paint(canvas, (x, y));
    }
}
