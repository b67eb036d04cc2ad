/// Whole percentage `part / total`, rounded half up. `None` when `total` is 0.
pub fn percent(part: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    // Integer half-up rounding of 100 * part / total.
    let rounded = (200 * part + total) / (2 * total);
    Some(rounded.min(100) as u8)
}

/// Percentage where an empty denominator counts as fully satisfied.
pub fn rate_or_full(part: usize, total: usize) -> u8 {
    percent(part, total).unwrap_or(100)
}

/// Percentage where an empty denominator counts as nothing.
pub fn ratio_or_zero(part: usize, total: usize) -> u8 {
    percent(part, total).unwrap_or(0)
}
