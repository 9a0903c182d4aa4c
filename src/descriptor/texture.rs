//! Haralick-style statistics over a co-occurrence matrix.

use crate::glcm::CoOccurrenceMatrix;
use crate::util::math::ratio_or_zero;
use serde::{Deserialize, Serialize};

/// Standard deviations below this are treated as zero.
const STD_EPS: f64 = 1e-15;

/// Number of statistics in a texture signature.
pub const TEXTURE_DIM: usize = 6;

/// Six texture statistics derived from one co-occurrence matrix.
///
/// The positional order (see [`TextureSignature::to_array`]) is fixed:
/// dissimilarity, contrast, correlation, energy, ASM, homogeneity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureSignature {
    pub dissimilarity: f64,
    pub contrast: f64,
    pub correlation: f64,
    pub energy: f64,
    pub asm: f64,
    pub homogeneity: f64,
}

impl TextureSignature {
    /// Labels matching the positional order of [`TextureSignature::to_array`].
    pub const LABELS: [&'static str; TEXTURE_DIM] = [
        "dissimilarity",
        "contrast",
        "correlation",
        "energy",
        "asm",
        "homogeneity",
    ];

    /// Computes all six statistics from `matrix`.
    ///
    /// The matrix is renormalized to unit mass first, so raw counts give the
    /// same result as a normalized matrix. Correlation is 1 when either
    /// marginal has zero variance; an all-zero matrix therefore yields
    /// `[0, 0, 1, 0, 0, 0]`.
    pub fn extract(matrix: &CoOccurrenceMatrix) -> Self {
        let total = matrix.sum();
        let total = if total > 0.0 { total } else { 1.0 };

        let mut dissimilarity = 0.0;
        let mut contrast = 0.0;
        let mut asm = 0.0;
        let mut homogeneity = 0.0;
        let mut mean_i = 0.0;
        let mut mean_j = 0.0;
        for (i, j, p) in matrix.nonzero() {
            let p = p / total;
            let diff = i as f64 - j as f64;
            dissimilarity += p * diff.abs();
            contrast += p * diff * diff;
            asm += p * p;
            homogeneity += p / (1.0 + diff * diff);
            mean_i += p * i as f64;
            mean_j += p * j as f64;
        }

        let mut var_i = 0.0;
        let mut var_j = 0.0;
        let mut cov = 0.0;
        for (i, j, p) in matrix.nonzero() {
            let p = p / total;
            let di = i as f64 - mean_i;
            let dj = j as f64 - mean_j;
            var_i += p * di * di;
            var_j += p * dj * dj;
            cov += p * di * dj;
        }
        let std_i = var_i.sqrt();
        let std_j = var_j.sqrt();
        let correlation = if std_i < STD_EPS || std_j < STD_EPS {
            1.0
        } else {
            ratio_or_zero(cov, std_i * std_j)
        };

        Self {
            dissimilarity,
            contrast,
            correlation,
            energy: asm.sqrt(),
            asm,
            homogeneity,
        }
    }

    /// Returns the statistics in their fixed positional order.
    pub fn to_array(&self) -> [f64; TEXTURE_DIM] {
        [
            self.dissimilarity,
            self.contrast,
            self.correlation,
            self.energy,
            self.asm,
            self.homogeneity,
        ]
    }

    /// Rebuilds a signature from its positional form.
    pub fn from_array(values: [f64; TEXTURE_DIM]) -> Self {
        let [dissimilarity, contrast, correlation, energy, asm, homogeneity] = values;
        Self {
            dissimilarity,
            contrast,
            correlation,
            energy,
            asm,
            homogeneity,
        }
    }
}
