// File: crates/covid-core/src/transition.rs
// Summary: Timed, eased transitions sampled by timestamp (fire-and-forget).

use skia_safe as skia;

/// Cubic in-out easing over `[0, 1]`.
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// A transition started at `start_ms` lasting `duration_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Transition {
    pub const fn new(start_ms: u64, duration_ms: u64) -> Self {
        Self { start_ms, duration_ms }
    }

    /// Eased progress at `now_ms`: 0 before start, 1 once finished.
    pub fn progress(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 || now_ms >= self.start_ms + self.duration_ms {
            return 1.0;
        }
        if now_ms <= self.start_ms {
            return 0.0;
        }
        let t = (now_ms - self.start_ms) as f32 / self.duration_ms as f32;
        ease_cubic_in_out(t)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms + self.duration_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Channel-wise RGBA interpolation.
pub fn lerp_color(a: skia::Color, b: skia::Color, t: f32) -> skia::Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * t).round() as u8 };
    skia::Color::from_argb(mix(a.a(), b.a()), mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}
