//! Texsearch is a content-based image retrieval library built on texture
//! signatures.
//!
//! Images are reduced to gray-level co-occurrence statistics (or a uniform
//! LBP histogram), collected into a [`SignatureStore`], and queried with one
//! or more distance metrics. Store construction and multi-metric queries can
//! run on the rayon pool via the `rayon` feature; `image-io` adds a decoder
//! backed by the `image` crate.

pub mod descriptor;
pub mod face;
pub mod glcm;
pub mod image;
pub mod metric;
pub mod retrieval;
pub mod store;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use descriptor::{glcm_signature, DescriptorKind, Signature, TextureSignature};
pub use face::{compare_faces, FaceEmbedding, FaceEncoder};
pub use glcm::{CoOccurrenceMatrix, GlcmConfig, Offset};
pub use crate::image::{GrayDecoder, GrayImage};
pub use metric::Metric;
pub use retrieval::{
    query, DistanceResult, QueryConfig, QueryMode, QueryResults, RetrievalEngine,
};
pub use store::{BuildReport, CancelToken, SignatureStore, StoreConfig, StoreEntry};
pub use util::{TexSearchError, TexSearchResult};
