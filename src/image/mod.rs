//! Quantized grayscale images.
//!
//! `GrayImage` owns a contiguous row-major `u8` buffer together with the
//! number of gray levels `L` its values are quantized to. Every pixel lies in
//! `[0, L - 1]` and both dimensions are at least one; constructors enforce
//! this so downstream code can index matrices by pixel value directly.

use crate::util::{TexSearchError, TexSearchResult};
use std::path::Path;

#[cfg(feature = "image-io")]
pub mod io;

/// Gray-level count of an unquantized 8-bit image.
pub const FULL_LEVELS: usize = 256;

/// Owned grayscale image quantized to a fixed number of gray levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    levels: usize,
}

impl GrayImage {
    /// Creates an 8-bit image with 256 gray levels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> TexSearchResult<Self> {
        Self::with_levels(data, width, height, FULL_LEVELS)
    }

    /// Creates an image whose values are already quantized to `levels`.
    pub fn with_levels(
        data: Vec<u8>,
        width: usize,
        height: usize,
        levels: usize,
    ) -> TexSearchResult<Self> {
        check_levels(levels)?;
        if width == 0 || height == 0 {
            return Err(TexSearchError::InvalidImage { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(TexSearchError::InvalidImage { width, height })?;
        if data.len() != needed {
            return Err(TexSearchError::InvalidImage { width, height });
        }
        if let Some(&value) = data.iter().find(|&&v| usize::from(v) >= levels) {
            return Err(TexSearchError::PixelOutOfRange { value, levels });
        }
        Ok(Self {
            data,
            width,
            height,
            levels,
        })
    }

    /// Creates a constant image filled with `value`.
    pub fn filled(value: u8, width: usize, height: usize) -> TexSearchResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(TexSearchError::InvalidImage { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of gray levels `L`.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Returns the contiguous pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Requantizes the image to `levels` gray levels.
    ///
    /// Value `v` maps to `floor(v * levels / self.levels)`, so equal-width
    /// bins of the current range collapse onto the new range.
    pub fn quantize(&self, levels: usize) -> TexSearchResult<Self> {
        check_levels(levels)?;
        let from = self.levels;
        let data = self
            .data
            .iter()
            .map(|&v| (usize::from(v) * levels / from) as u8)
            .collect();
        Ok(Self {
            data,
            width: self.width,
            height: self.height,
            levels,
        })
    }
}

/// Source of grayscale images.
///
/// Decoding is delegated so the store builder can run over any format. A
/// missing path must map to [`TexSearchError::NotFound`] and unreadable
/// content to [`TexSearchError::ImageDecode`].
pub trait GrayDecoder: Sync {
    /// Decodes the file at `path` into an 8-bit grayscale image.
    fn decode_path(&self, path: &Path) -> TexSearchResult<GrayImage>;

    /// Decodes an in-memory encoded image.
    fn decode_bytes(&self, bytes: &[u8]) -> TexSearchResult<GrayImage>;
}

fn check_levels(levels: usize) -> TexSearchResult<()> {
    if !(2..=FULL_LEVELS).contains(&levels) {
        return Err(TexSearchError::InvalidLevels { levels });
    }
    Ok(())
}
