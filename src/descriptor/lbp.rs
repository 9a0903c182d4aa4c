//! Uniform local binary pattern histograms.
//!
//! Each pixel is compared with `P = 8` neighbors sampled on a circle of
//! radius one (diagonal samples are bilinearly interpolated, samples outside
//! the image read as zero). A pattern with at most two 0/1 transitions along
//! the neighbor sequence is coded by its number of set bits (`0..=P`); every
//! other pattern gets code `P + 1`. The histogram of codes is normalized to
//! sum to one.

use crate::image::GrayImage;

/// Number of circular neighbors.
const POINTS: usize = 8;
/// Sampling radius in pixels.
const RADIUS: f64 = 1.0;

/// Number of histogram bins (`P + 2`).
pub const LBP_BINS: usize = POINTS + 2;

/// Computes the normalized uniform LBP histogram of `image`.
pub fn uniform_lbp_histogram(image: &GrayImage) -> [f64; LBP_BINS] {
    let offsets = sample_offsets();
    let height = image.height();
    let width = image.width();
    let mut hist = [0u64; LBP_BINS];

    for y in 0..height {
        for x in 0..width {
            let center = f64::from(image.get(x, y).unwrap_or(0));
            let mut bits = [false; POINTS];
            for (bit, &(dr, dc)) in bits.iter_mut().zip(offsets.iter()) {
                let sample = bilinear(image, y as f64 + dr, x as f64 + dc);
                *bit = sample - center >= 0.0;
            }
            hist[uniform_code(&bits)] += 1;
        }
    }

    let total = (width * height) as f64;
    let mut out = [0.0; LBP_BINS];
    for (dst, &count) in out.iter_mut().zip(hist.iter()) {
        *dst = count as f64 / total;
    }
    out
}

fn sample_offsets() -> [(f64, f64); POINTS] {
    let mut offsets = [(0.0, 0.0); POINTS];
    for (p, slot) in offsets.iter_mut().enumerate() {
        let theta = 2.0 * std::f64::consts::PI * p as f64 / POINTS as f64;
        *slot = (
            round5(-RADIUS * theta.sin()),
            round5(RADIUS * theta.cos()),
        );
    }
    offsets
}

fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

fn uniform_code(bits: &[bool; POINTS]) -> usize {
    let transitions = bits.windows(2).filter(|w| w[0] != w[1]).count();
    if transitions <= 2 {
        bits.iter().filter(|&&b| b).count()
    } else {
        POINTS + 1
    }
}

fn pixel_or_zero(image: &GrayImage, r: isize, c: isize) -> f64 {
    if r < 0 || c < 0 {
        return 0.0;
    }
    image
        .get(c as usize, r as usize)
        .map(f64::from)
        .unwrap_or(0.0)
}

fn bilinear(image: &GrayImage, r: f64, c: f64) -> f64 {
    let r0 = r.floor();
    let c0 = c.floor();
    let dr = r - r0;
    let dc = c - c0;
    let (r0, c0) = (r0 as isize, c0 as isize);
    let (r1, c1) = (r.ceil() as isize, c.ceil() as isize);
    // Written as lerps so equal corners reproduce their value exactly.
    let lerp = |a: f64, b: f64, t: f64| a + t * (b - a);
    let top = lerp(pixel_or_zero(image, r0, c0), pixel_or_zero(image, r0, c1), dc);
    let bottom = lerp(pixel_or_zero(image, r1, c0), pixel_or_zero(image, r1, c1), dc);
    lerp(top, bottom, dr)
}

#[cfg(test)]
mod tests {
    use super::{uniform_code, uniform_lbp_histogram, LBP_BINS, POINTS};
    use crate::image::GrayImage;

    #[test]
    fn uniform_codes_count_set_bits() {
        assert_eq!(uniform_code(&[false; POINTS]), 0);
        assert_eq!(uniform_code(&[true; POINTS]), POINTS);
        let bits = [true, true, true, false, false, false, false, false];
        assert_eq!(uniform_code(&bits), 3);
        let noisy = [true, false, true, false, false, false, false, false];
        assert_eq!(uniform_code(&noisy), POINTS + 1);
    }

    #[test]
    fn histogram_sums_to_one() {
        let data: Vec<u8> = (0..64u32).map(|v| ((v * 37) % 256) as u8).collect();
        let img = GrayImage::new(data, 8, 8).unwrap();
        let hist = uniform_lbp_histogram(&img);
        assert_eq!(hist.len(), LBP_BINS);
        let sum: f64 = hist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_interior_pixels_are_all_ones() {
        // Interior pixels of a constant image see equal neighbors, so every
        // bit is set; border pixels read zero padding and are not.
        let img = GrayImage::filled(9, 3, 3).unwrap();
        let hist = uniform_lbp_histogram(&img);
        assert!((hist[POINTS] - 1.0 / 9.0).abs() < 1e-12);
    }
}
