//! Gray-level co-occurrence matrices.
//!
//! For an offset `(distance, angle)` the builder visits every pixel whose
//! displaced neighbor lies inside the image and counts the intensity pair
//! `(pixel, neighbor)`. The neighbor displacement is
//! `(drow, dcol) = (round(sin(angle) * distance), round(cos(angle) * distance))`,
//! so angle 0 pairs each pixel with the one to its right.
//!
//! With `symmetric` set every pair is also counted in the reverse direction,
//! which makes the matrix equal to its transpose. With `normalized` set the
//! counts are divided by their total so the matrix sums to one. An image with
//! no valid pairs (for example a single column with a horizontal offset)
//! yields an all-zero matrix; normalization leaves it at zero.

use crate::image::{GrayImage, FULL_LEVELS};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{offset_displacement, shifted_index};
use crate::util::{TexSearchError, TexSearchResult};

/// Pixel-pair relationship sampled when building a co-occurrence matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    /// Neighbor distance in pixels.
    pub distance: usize,
    /// Direction in radians; 0 is the horizontal neighbor.
    pub angle_rad: f64,
}

impl Offset {
    /// Right-hand neighbor at distance one.
    pub const HORIZONTAL: Offset = Offset {
        distance: 1,
        angle_rad: 0.0,
    };

    /// Creates an offset from a distance and an angle in degrees.
    pub fn from_degrees(distance: usize, angle_deg: f64) -> Self {
        Self {
            distance,
            angle_rad: angle_deg.to_radians(),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::HORIZONTAL
    }
}

/// Co-occurrence construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlcmConfig {
    /// Pixel-pair offset.
    pub offset: Offset,
    /// Count each pair in both directions.
    pub symmetric: bool,
    /// Divide counts by their total.
    pub normalized: bool,
}

impl Default for GlcmConfig {
    fn default() -> Self {
        Self {
            offset: Offset::HORIZONTAL,
            symmetric: true,
            normalized: true,
        }
    }
}

/// `L x L` co-occurrence matrix stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct CoOccurrenceMatrix {
    data: Vec<f64>,
    levels: usize,
    pairs: u64,
}

impl CoOccurrenceMatrix {
    /// Builds a matrix for `image` with the given parameters.
    ///
    /// The matrix has `image.levels()` rows and columns.
    pub fn build(image: &GrayImage, cfg: GlcmConfig) -> TexSearchResult<Self> {
        let width = image.width();
        let height = image.height();
        if width == 0 || height == 0 {
            return Err(TexSearchError::InvalidImage { width, height });
        }
        if cfg.offset.distance == 0 {
            return Err(TexSearchError::InvalidInput("offset distance must be positive"));
        }
        let levels = image.levels();
        let _span = trace_span!("glcm_build", width = width, height = height, levels = levels)
            .entered();

        let (drow, dcol) = offset_displacement(cfg.offset.distance, cfg.offset.angle_rad);
        let mut counts = vec![0u64; levels * levels];
        let mut pairs = 0u64;
        for y in 0..height {
            let Some(ny) = shifted_index(y, drow, height) else {
                continue;
            };
            let (Some(row), Some(neighbor_row)) = (image.row(y), image.row(ny)) else {
                continue;
            };
            for (x, &i) in row.iter().enumerate() {
                let Some(nx) = shifted_index(x, dcol, width) else {
                    continue;
                };
                let j = neighbor_row[nx];
                counts[usize::from(i) * levels + usize::from(j)] += 1;
                pairs += 1;
            }
        }

        if cfg.symmetric {
            for i in 0..levels {
                for j in (i + 1)..levels {
                    let total = counts[i * levels + j] + counts[j * levels + i];
                    counts[i * levels + j] = total;
                    counts[j * levels + i] = total;
                }
                counts[i * levels + i] *= 2;
            }
            pairs *= 2;
        }

        let total = if cfg.normalized && pairs > 0 {
            pairs as f64
        } else {
            1.0
        };
        let data = counts.into_iter().map(|c| c as f64 / total).collect();
        trace_event!("glcm_pairs", pairs = pairs);
        Ok(Self {
            data,
            levels,
            pairs,
        })
    }

    /// Builds the default matrix: horizontal offset, symmetric, normalized.
    pub fn horizontal(image: &GrayImage) -> TexSearchResult<Self> {
        Self::build(image, GlcmConfig::default())
    }

    /// Creates a matrix from raw row-major entries.
    pub fn from_entries(data: Vec<f64>, levels: usize) -> TexSearchResult<Self> {
        if !(1..=FULL_LEVELS).contains(&levels) || data.len() != levels * levels {
            return Err(TexSearchError::InvalidInput(
                "matrix entries must form a square of at most 256 levels",
            ));
        }
        if data.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(TexSearchError::InvalidInput(
                "matrix entries must be finite and non-negative",
            ));
        }
        Ok(Self {
            data,
            levels,
            pairs: 0,
        })
    }

    /// Returns the number of gray levels (rows and columns).
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Returns the number of pairs counted, including mirrored pairs.
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    /// Returns entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.levels || j >= self.levels {
            return None;
        }
        self.data.get(i * self.levels + j).copied()
    }

    /// Returns the row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the sum of all entries.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Returns true if the matrix equals its transpose within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.levels;
        (0..n).all(|i| {
            ((i + 1)..n).all(|j| (self.data[i * n + j] - self.data[j * n + i]).abs() <= tol)
        })
    }

    /// Iterates `(i, j, p(i, j))` over the non-zero entries.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.levels;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p != 0.0)
            .map(move |(idx, &p)| (idx / n, idx % n, p))
    }
}

#[cfg(test)]
mod tests {
    use super::{CoOccurrenceMatrix, GlcmConfig, Offset};
    use crate::image::GrayImage;

    #[test]
    fn horizontal_counts_match_hand_computed_pairs() {
        // 0 0 1
        // 1 2 2
        let img = GrayImage::with_levels(vec![0, 0, 1, 1, 2, 2], 3, 2, 3).unwrap();
        let cfg = GlcmConfig {
            symmetric: false,
            normalized: false,
            ..GlcmConfig::default()
        };
        let m = CoOccurrenceMatrix::build(&img, cfg).unwrap();
        assert_eq!(m.pairs(), 4);
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(0, 1), Some(1.0));
        assert_eq!(m.get(1, 2), Some(1.0));
        assert_eq!(m.get(2, 2), Some(1.0));
        assert_eq!(m.get(1, 0), Some(0.0));
    }

    #[test]
    fn symmetric_flag_mirrors_counts() {
        let img = GrayImage::with_levels(vec![0, 1, 2, 3], 4, 1, 4).unwrap();
        let cfg = GlcmConfig {
            normalized: false,
            ..GlcmConfig::default()
        };
        let m = CoOccurrenceMatrix::build(&img, cfg).unwrap();
        assert_eq!(m.pairs(), 6);
        assert_eq!(m.get(0, 1), Some(1.0));
        assert_eq!(m.get(1, 0), Some(1.0));
        assert!(m.is_symmetric(0.0));
    }

    #[test]
    fn vertical_offset_pairs_rows() {
        let img = GrayImage::with_levels(vec![0, 1, 2, 3], 2, 2, 4).unwrap();
        let cfg = GlcmConfig {
            offset: Offset::from_degrees(1, 90.0),
            symmetric: false,
            normalized: false,
        };
        let m = CoOccurrenceMatrix::build(&img, cfg).unwrap();
        assert_eq!(m.pairs(), 2);
        assert_eq!(m.get(0, 2), Some(1.0));
        assert_eq!(m.get(1, 3), Some(1.0));
    }

    #[test]
    fn single_column_has_no_horizontal_pairs() {
        let img = GrayImage::filled(7, 1, 4).unwrap();
        let m = CoOccurrenceMatrix::horizontal(&img).unwrap();
        assert_eq!(m.pairs(), 0);
        assert_eq!(m.sum(), 0.0);
    }

    #[test]
    fn zero_distance_is_rejected() {
        let img = GrayImage::filled(0, 2, 2).unwrap();
        let cfg = GlcmConfig {
            offset: Offset::from_degrees(0, 0.0),
            ..GlcmConfig::default()
        };
        assert!(CoOccurrenceMatrix::build(&img, cfg).is_err());
    }
}
