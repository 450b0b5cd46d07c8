// File: crates/covid-core/src/raster.rs
// Summary: Render options and the headless PNG pipeline using Skia CPU raster surfaces.

use std::path::Path;

use skia_safe as skia;
use tracing::debug;

use crate::error::{ChartError, Result};
use crate::theme::Theme;
use crate::types::{Insets, BAR_HEIGHT, BAR_WIDTH, MAP_HEIGHT, MAP_WIDTH, OVERVIEW_HEIGHT, OVERVIEW_WIDTH};

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub theme: Theme,
    /// Text is the only platform-dependent output; tests turn it off.
    pub draw_labels: bool,
}

impl RenderOptions {
    pub fn linked_bars() -> Self {
        Self { width: BAR_WIDTH, height: BAR_HEIGHT, insets: Insets::linked_bars(), theme: Theme::light(), draw_labels: true }
    }

    pub fn overview_bars() -> Self {
        Self { width: OVERVIEW_WIDTH, height: OVERVIEW_HEIGHT, insets: Insets::overview_bars(), theme: Theme::light(), draw_labels: true }
    }

    pub fn map() -> Self {
        Self { width: MAP_WIDTH, height: MAP_HEIGHT, insets: Insets::new(0, 0, 0, 0), theme: Theme::light(), draw_labels: true }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn without_labels(mut self) -> Self {
        self.draw_labels = false;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self { Self::linked_bars() }
}

/// Draw onto a fresh raster surface (cleared to the theme background) and encode PNG bytes.
pub fn render_png_bytes<F>(opts: &RenderOptions, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&skia::Canvas),
{
    let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
        .ok_or(ChartError::Render("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(opts.theme.background);
    draw(canvas);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or(ChartError::Render("encode PNG failed"))?;
    debug!(width = opts.width, height = opts.height, bytes = data.as_bytes().len(), "rendered png");
    Ok(data.as_bytes().to_vec())
}

/// Write PNG bytes, creating parent directories.
pub fn write_png(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

pub(crate) fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_style(skia::paint::Style::Fill);
    p.set_color(color);
    p
}

pub(crate) fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_style(skia::paint::Style::Stroke);
    p.set_stroke_width(width);
    p.set_color(color);
    p
}
