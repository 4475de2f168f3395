//! Given signature length and similarity threshold, choose rows-per-band.
//!
//! A small exhaustive search over `r in [1, W]` minimizing
//! `|W - r * (1/t^r)|`.

/// Chooses `r` minimizing `|width - r * (1 / threshold^r)|` over
/// `r in [1, width]`. `threshold == 0.0` returns `1`.
#[must_use]
pub fn plan(width: u32, threshold: f64) -> u32 {
    if threshold == 0.0 {
        return 1;
    }
    let width_f = f64::from(width);
    let mut best_r = width.max(1);
    let mut best_err = f64::INFINITY;
    for r in 1..=width.max(1) {
        let b = 1.0 / threshold.powi(r as i32);
        if !b.is_finite() {
            continue;
        }
        let err = (width_f - b * f64::from(r)).abs();
        if err < best_err {
            best_r = r;
            best_err = err;
        }
    }
    best_r
}

/// The objective value `|width - r * (1/threshold^r)|` for a chosen `r`,
/// exposed so tests can assert optimality without depending on which of
/// several near-tied `r` the search happened to pick.
#[must_use]
pub fn objective(width: u32, threshold: f64, r: u32) -> f64 {
    if threshold == 0.0 {
        return if r == 1 { 0.0 } else { f64::INFINITY };
    }
    let b = 1.0 / threshold.powi(r as i32);
    (f64::from(width) - b * f64::from(r)).abs()
}
