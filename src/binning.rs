//! Histogram binning math: interpolated quantiles, "nice" bin-width rounding,
//! the Freedman-Diaconis rule, and axis label formatting.

/// Computes an interpolated quantile from unsorted data.
///
/// Uses the fractional rank `q * (n - 1)` with linear interpolation between
/// the surrounding order statistics. Returns 0.0 for an empty slice; a single
/// element is returned unchanged for any `q`.
pub fn quantile(data: &[f64], q: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let idx = q * (sorted.len() - 1) as f64;
    let below = idx.floor() as usize;
    let above = idx.ceil() as usize;

    if below == above {
        sorted[below]
    } else {
        let fraction = idx - below as f64;
        sorted[below] * (1.0 - fraction) + sorted[above] * fraction
    }
}

/// Snaps a raw bin width to the nearest value of the form {1,2,5,10} x 10^k.
///
/// The mantissa is compared against the thresholds 1.5 / 3.0 / 7.0. Values
/// that are zero or negative snap to 1.0.
pub fn round_to_nice(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }

    let exponent = value.log10().floor() as i32;
    let base = value / 10f64.powi(exponent);

    let nice_base = if base < 1.5 {
        1.0
    } else if base < 3.0 {
        2.0
    } else if base < 7.0 {
        5.0
    } else {
        10.0
    };

    nice_base * 10f64.powi(exponent)
}

/// Freedman-Diaconis bin width: `round_to_nice(2 * IQR / cbrt(n))`.
///
/// Always returns a strictly positive width; a degenerate IQR falls back
/// to a width of 1.0.
pub fn freedman_diaconis(data: &[f64]) -> f64 {
    let q1 = quantile(data, 0.25);
    let q3 = quantile(data, 0.75);
    let iqr = q3 - q1;
    let raw = 2.0 * iqr / (data.len() as f64).cbrt();
    let width = round_to_nice(raw);
    if width <= 0.0 {
        1.0
    } else {
        width
    }
}

/// Number of bins spanning `[min, max]` at the given width.
///
/// `floor((max - min) / width)`, with a fallback of 10 bins when the result
/// would be non-positive or the width is invalid.
pub fn bin_count(min: f64, max: f64, width: f64) -> usize {
    if width <= 0.0 {
        return 10;
    }
    let n = ((max - min) / width) as i64;
    if n < 1 {
        10
    } else {
        n as usize
    }
}

/// Formats a column name for axis display.
///
/// Names of the form `label__unit` become `"label (unit)"` with underscores
/// in the label replaced by spaces; names without the `__` separator are
/// returned unchanged.
pub fn axis_label(column_name: &str) -> String {
    match column_name.split_once("__") {
        Some((base, unit)) => format!("{} ({})", base.replace('_', " "), unit),
        None => column_name.to_string(),
    }
}

/// Extracts the unit suffix from a `label__unit` column name, if present.
pub fn unit(column_name: &str) -> Option<&str> {
    column_name.split_once("__").map(|(_, unit)| unit)
}

/// Y-axis caption for a histogram: `"Entries / <width> <unit>"` when the
/// column carries a unit, plain `"Entries"` otherwise.
pub fn entries_caption(bin_width: f64, column_name: &str) -> String {
    match unit(column_name) {
        Some(u) => format!("Entries / {} {}", format_number(bin_width), u),
        None => "Entries".to_string(),
    }
}

/// Compact float formatting for captions and axis tick labels: trailing
/// zeros trimmed, large/small magnitudes in scientific notation.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e6 || magnitude < 1e-4 {
        format!("{:e}", value)
    } else {
        // Display for f64 already trims trailing zeros (1.0 -> "1").
        let rounded = (value * 1e6).round() / 1e6;
        format!("{}", rounded)
    }
}
