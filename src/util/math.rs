//! Numeric helpers shared by the descriptor and metric code.

/// Converts a `(distance, angle)` pixel offset into a `(row, col)` displacement.
///
/// Rows grow downwards, so angle 0 is the right-hand neighbor and
/// angle `pi / 2` the neighbor one row below.
pub(crate) fn offset_displacement(distance: usize, angle_rad: f64) -> (isize, isize) {
    let d = distance as f64;
    let drow = (angle_rad.sin() * d).round() as isize;
    let dcol = (angle_rad.cos() * d).round() as isize;
    (drow, dcol)
}

/// Returns `num / den`, treating `0 / 0` as zero.
#[inline]
pub(crate) fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Adds `delta` to `base` and returns the result if it lies in `0..len`.
#[inline]
pub(crate) fn shifted_index(base: usize, delta: isize, len: usize) -> Option<usize> {
    let idx = base.checked_add_signed(delta)?;
    (idx < len).then_some(idx)
}
