/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percent change from `base` to `current`. `None` when the base is zero.
pub fn percent_change(base: f64, current: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some((current - base) / base * 100.0)
    }
}
