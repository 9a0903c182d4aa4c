//! Image decoding via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{GrayDecoder, GrayImage};
use crate::util::{TexSearchError, TexSearchResult};
use std::path::Path;

/// Decoder for PNG and JPEG files backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl GrayDecoder for ImageDecoder {
    fn decode_path(&self, path: &Path) -> TexSearchResult<GrayImage> {
        load_gray_image(path)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> TexSearchResult<GrayImage> {
        let img = image::load_from_memory(bytes).map_err(decode_err)?;
        from_dynamic_image(&img)
    }
}

/// Creates an owned image from a grayscale image buffer.
pub fn from_luma_image(img: &image::GrayImage) -> TexSearchResult<GrayImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    GrayImage::new(img.as_raw().clone(), width, height)
}

/// Converts a dynamic image to luma and wraps it.
pub fn from_dynamic_image(img: &image::DynamicImage) -> TexSearchResult<GrayImage> {
    from_luma_image(&img.to_luma8())
}

/// Loads an image from disk and converts it to an 8-bit grayscale image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> TexSearchResult<GrayImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TexSearchError::NotFound {
            path: path.display().to_string(),
        });
    }
    let img = image::open(path).map_err(decode_err)?;
    from_dynamic_image(&img)
}

fn decode_err(err: image::ImageError) -> TexSearchError {
    TexSearchError::ImageDecode {
        reason: err.to_string(),
    }
}
