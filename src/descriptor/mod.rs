//! Image signatures.
//!
//! A [`Signature`] is the fixed-length vector compared by the distance
//! metrics. [`DescriptorKind`] selects how it is derived from an image: GLCM
//! texture statistics (the default, six values) or a uniform LBP histogram.

use crate::glcm::{CoOccurrenceMatrix, GlcmConfig};
use crate::image::GrayImage;
use crate::util::{TexSearchError, TexSearchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod lbp;
mod texture;

pub use lbp::{uniform_lbp_histogram, LBP_BINS};
pub use texture::{TextureSignature, TEXTURE_DIM};

/// Fixed-length numeric vector summarizing an image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(Vec<f64>);

impl Signature {
    /// Wraps raw values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the signature has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the components.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Consumes the signature and returns its components.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for Signature {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<TextureSignature> for Signature {
    fn from(value: TextureSignature) -> Self {
        Self(value.to_array().to_vec())
    }
}

/// Descriptor used to turn an image into a [`Signature`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// GLCM statistics at the horizontal offset, symmetric and normalized.
    #[default]
    Glcm,
    /// Uniform local binary pattern histogram.
    Lbp,
}

impl DescriptorKind {
    /// All descriptor kinds.
    pub const ALL: [DescriptorKind; 2] = [DescriptorKind::Glcm, DescriptorKind::Lbp];

    /// Extracts the signature of `image`.
    pub fn extract(self, image: &GrayImage) -> TexSearchResult<Signature> {
        match self {
            DescriptorKind::Glcm => Ok(glcm_signature(image, GlcmConfig::default())?.into()),
            DescriptorKind::Lbp => Ok(Signature::new(uniform_lbp_histogram(image).to_vec())),
        }
    }

    /// Returns the length of signatures produced by this descriptor.
    pub fn dimension(self) -> usize {
        match self {
            DescriptorKind::Glcm => TEXTURE_DIM,
            DescriptorKind::Lbp => LBP_BINS,
        }
    }

    /// Returns the lowercase name used in configs and persisted stores.
    pub fn name(self) -> &'static str {
        match self {
            DescriptorKind::Glcm => "glcm",
            DescriptorKind::Lbp => "lbp",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DescriptorKind {
    type Err = TexSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glcm" => Ok(DescriptorKind::Glcm),
            "lbp" => Ok(DescriptorKind::Lbp),
            _ => Err(TexSearchError::UnknownDescriptor {
                name: s.to_string(),
            }),
        }
    }
}

/// Builds the co-occurrence matrix of `image` and extracts its statistics.
pub fn glcm_signature(image: &GrayImage, cfg: GlcmConfig) -> TexSearchResult<TextureSignature> {
    let matrix = CoOccurrenceMatrix::build(image, cfg)?;
    Ok(TextureSignature::extract(&matrix))
}

#[cfg(test)]
mod tests {
    use super::DescriptorKind;
    use crate::image::GrayImage;

    #[test]
    fn dimensions_match_extracted_lengths() {
        let img = GrayImage::new((0u8..16).map(|v| v * 9).collect(), 4, 4).unwrap();
        for kind in DescriptorKind::ALL {
            let sig = kind.extract(&img).unwrap();
            assert_eq!(sig.len(), kind.dimension(), "{kind}");
        }
    }

    #[test]
    fn names_parse_back() {
        for kind in DescriptorKind::ALL {
            assert_eq!(kind.name().parse::<DescriptorKind>().unwrap(), kind);
        }
        assert!("bit".parse::<DescriptorKind>().is_err());
    }
}
