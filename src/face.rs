//! Face embedding contract.
//!
//! Detection and encoding are not implemented here; callers plug in a
//! [`FaceEncoder`]. When several faces are present only the first one is
//! encoded.

use crate::image::GrayImage;
use crate::metric::Metric;
use crate::util::TexSearchResult;

/// Distance below which two embeddings are considered the same face.
pub const DEFAULT_FACE_TOLERANCE: f64 = 0.6;

/// Fixed-length embedding of one detected face.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceEmbedding(Vec<f64>);

impl FaceEmbedding {
    /// Wraps raw embedding values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Returns the embedding values.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Produces a face embedding from an image.
pub trait FaceEncoder {
    /// Returns the embedding of the first detected face, or `None` if the
    /// image contains no face.
    fn encode(&self, image: &GrayImage) -> Option<FaceEmbedding>;
}

/// Returns true if the Euclidean distance between the embeddings is at most
/// `tolerance`.
pub fn compare_faces(
    reference: &FaceEmbedding,
    candidate: &FaceEmbedding,
    tolerance: f64,
) -> TexSearchResult<bool> {
    let distance = Metric::Euclidean.distance(reference.as_slice(), candidate.as_slice())?;
    Ok(distance <= tolerance)
}

/// Encodes the face in `candidate` and compares it with `reference`.
///
/// Returns `Ok(None)` when no face is found in `candidate`.
pub fn match_face<E>(
    encoder: &E,
    reference: &FaceEmbedding,
    candidate: &GrayImage,
    tolerance: f64,
) -> TexSearchResult<Option<bool>>
where
    E: FaceEncoder + ?Sized,
{
    match encoder.encode(candidate) {
        Some(embedding) => compare_faces(reference, &embedding, tolerance).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_faces, match_face, FaceEmbedding, FaceEncoder, DEFAULT_FACE_TOLERANCE};
    use crate::image::GrayImage;

    /// Treats the mean intensity as a one-value embedding; blank images have no face.
    struct MeanEncoder;

    impl FaceEncoder for MeanEncoder {
        fn encode(&self, image: &GrayImage) -> Option<FaceEmbedding> {
            let sum: f64 = image.data().iter().map(|&v| f64::from(v)).sum();
            if sum == 0.0 {
                return None;
            }
            Some(FaceEmbedding::new(vec![sum / image.data().len() as f64 / 255.0]))
        }
    }

    #[test]
    fn tolerance_is_inclusive() {
        let a = FaceEmbedding::new(vec![0.0, 0.0]);
        let b = FaceEmbedding::new(vec![0.6, 0.0]);
        let c = FaceEmbedding::new(vec![0.61, 0.0]);
        assert!(compare_faces(&a, &b, DEFAULT_FACE_TOLERANCE).unwrap());
        assert!(!compare_faces(&a, &c, DEFAULT_FACE_TOLERANCE).unwrap());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let a = FaceEmbedding::new(vec![0.0; 128]);
        let b = FaceEmbedding::new(vec![0.0; 64]);
        assert!(compare_faces(&a, &b, DEFAULT_FACE_TOLERANCE).is_err());
    }

    #[test]
    fn missing_face_yields_none() {
        let reference = FaceEmbedding::new(vec![0.5]);
        let blank = GrayImage::filled(0, 2, 2).unwrap();
        let gray = GrayImage::filled(128, 2, 2).unwrap();
        assert_eq!(
            match_face(&MeanEncoder, &reference, &blank, DEFAULT_FACE_TOLERANCE).unwrap(),
            None
        );
        assert_eq!(
            match_face(&MeanEncoder, &reference, &gray, DEFAULT_FACE_TOLERANCE).unwrap(),
            Some(true)
        );
    }
}
