// File: crates/covid-core/src/format.rs
// Summary: Number formatting for tooltips and axis ticks (en-US grouping).

/// Format with thousands separators and at most three fraction digits,
/// trailing zeros trimmed: `1234567.5` -> `"1,234,567.5"`.
pub fn format_count(v: f64) -> String {
    format_grouped(v, 3)
}

/// Grouped formatting with up to `max_frac` fraction digits.
pub fn format_grouped(v: f64, max_frac: usize) -> String {
    if !v.is_finite() {
        return "N/A".to_owned();
    }
    let fixed = format!("{:.*}", max_frac, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if v < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// Optional value for tooltips; missing values read "N/A".
pub fn format_or_na(v: Option<f64>) -> String {
    v.map(format_count).unwrap_or_else(|| "N/A".to_owned())
}

/// Axis label with as many fraction digits as the tick step needs.
pub fn format_tick(v: f64, step: f64) -> String {
    let digits = if step.is_finite() && step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    format_grouped(v, digits)
}
