// File: crates/covid-core/src/theme.rs
// Summary: Light/Dark theming for bar charts and the choropleth, plus sequential color ramps.

use skia_safe as skia;

use crate::record::Metric;

/// Piecewise-linear color ramp over `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct Ramp {
    stops: &'static [[u8; 3]],
}

impl Ramp {
    /// Nine-step white-to-dark-red sequential scheme.
    pub const REDS: Ramp = Ramp {
        stops: &[
            [0xff, 0xf5, 0xf0],
            [0xfe, 0xe0, 0xd2],
            [0xfc, 0xbb, 0xa1],
            [0xfc, 0x92, 0x72],
            [0xfb, 0x6a, 0x4a],
            [0xef, 0x3b, 0x2c],
            [0xcb, 0x18, 0x1d],
            [0xa5, 0x0f, 0x15],
            [0x67, 0x00, 0x0d],
        ],
    };

    /// Nine-step white-to-dark-purple scheme, used for deaths on the dark theme.
    pub const PURPLES: Ramp = Ramp {
        stops: &[
            [0xfc, 0xfb, 0xfd],
            [0xef, 0xed, 0xf5],
            [0xda, 0xda, 0xeb],
            [0xbc, 0xbd, 0xdc],
            [0x9e, 0x9a, 0xc8],
            [0x80, 0x7d, 0xba],
            [0x6a, 0x51, 0xa3],
            [0x54, 0x27, 0x8f],
            [0x3f, 0x00, 0x7d],
        ],
    };

    pub fn at(&self, t: f64) -> skia::Color {
        let n = self.stops.len();
        if n == 0 {
            return skia::Color::BLACK;
        }
        if n == 1 {
            let [r, g, b] = self.stops[0];
            return skia::Color::from_rgb(r, g, b);
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (n - 1) as f64;
        let i = (pos.floor() as usize).min(n - 2);
        let f = pos - i as f64;
        let a = self.stops[i];
        let b = self.stops[i + 1];
        let mix = |x: u8, y: u8| -> u8 { (x as f64 + (y as f64 - x as f64) * f).round() as u8 };
        skia::Color::from_rgb(mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub tick: skia::Color,
    pub bar_cases: skia::Color,
    pub bar_deaths: skia::Color,
    pub bar_overview: skia::Color,
    pub highlight: skia::Color,
    pub map_neutral: skia::Color,
    pub map_stroke: skia::Color,
    pub map_cases: Ramp,
    pub map_deaths: Ramp,
    pub tooltip_background: skia::Color,
    pub tooltip_border: skia::Color,
    pub tooltip_text: skia::Color,
}

impl Theme {
    /// Page-like palette: white background, steelblue/darkred bars, red choropleth.
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            axis_line: skia::Color::from_argb(255, 0, 0, 0),
            axis_label: skia::Color::from_argb(255, 0, 0, 0),
            tick: skia::Color::from_argb(255, 0, 0, 0),
            bar_cases: skia::Color::from_argb(255, 70, 130, 180),   // steelblue
            bar_deaths: skia::Color::from_argb(255, 139, 0, 0),     // darkred
            bar_overview: skia::Color::from_argb(255, 0x69, 0xb3, 0xa2),
            highlight: skia::Color::from_argb(255, 255, 165, 0),    // orange
            map_neutral: skia::Color::from_argb(255, 0xee, 0xee, 0xee),
            map_stroke: skia::Color::from_argb(255, 0x33, 0x33, 0x33),
            map_cases: Ramp::REDS,
            map_deaths: Ramp::REDS,
            tooltip_background: skia::Color::from_argb(240, 255, 255, 255),
            tooltip_border: skia::Color::from_argb(255, 153, 153, 153),
            tooltip_text: skia::Color::from_argb(255, 20, 20, 30),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            tick: skia::Color::from_argb(255, 150, 150, 160),
            bar_cases: skia::Color::from_argb(255, 96, 156, 255),
            bar_deaths: skia::Color::from_argb(255, 220, 80, 80),
            bar_overview: skia::Color::from_argb(255, 40, 200, 120),
            highlight: skia::Color::from_argb(255, 255, 230, 70),
            map_neutral: skia::Color::from_argb(255, 60, 60, 66),
            map_stroke: skia::Color::from_argb(255, 18, 18, 20),
            map_cases: Ramp::REDS,
            map_deaths: Ramp::PURPLES,
            tooltip_background: skia::Color::from_argb(235, 40, 40, 45),
            tooltip_border: skia::Color::from_argb(255, 90, 90, 100),
            tooltip_text: skia::Color::from_argb(255, 235, 235, 245),
        }
    }

    pub fn bar_fill(&self, metric: Metric) -> skia::Color {
        match metric {
            Metric::Cases => self.bar_cases,
            Metric::Deaths => self.bar_deaths,
        }
    }

    pub fn map_ramp(&self, metric: Metric) -> Ramp {
        match metric {
            Metric::Cases => self.map_cases,
            Metric::Deaths => self.map_deaths,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Theme::light() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::light)
}
