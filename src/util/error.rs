//! Error types for texsearch.

use thiserror::Error;

/// Result alias for texsearch operations.
pub type TexSearchResult<T> = std::result::Result<T, TexSearchError>;

/// Errors that can occur while extracting signatures or querying a store.
///
/// Errors from external crates are flattened into `reason` strings so the
/// enum stays comparable in tests.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TexSearchError {
    /// A path passed to a decoder or store loader does not exist.
    #[error("path not found: {path}")]
    NotFound { path: String },
    /// The source could not be decoded as an image.
    #[error("failed to decode image: {reason}")]
    ImageDecode { reason: String },
    /// The grid has zero area or a buffer that does not match its dimensions.
    #[error("invalid image: {width}x{height}")]
    InvalidImage { width: usize, height: usize },
    /// The gray-level count is outside `2..=256`.
    #[error("invalid gray-level count: {levels}")]
    InvalidLevels { levels: usize },
    /// A pixel value lies outside `[0, levels - 1]`.
    #[error("pixel value {value} out of range for {levels} gray levels")]
    PixelOutOfRange { value: u8, levels: usize },
    /// Query and store signatures have different lengths.
    #[error("signature dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// A query was issued against a store with no entries.
    #[error("signature store is empty")]
    EmptyStore,
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Filesystem failure outside of image decoding.
    #[error("i/o error: {reason}")]
    Io { reason: String },
    /// A persisted store could not be parsed or is internally inconsistent.
    #[error("malformed store: {reason}")]
    StoreFormat { reason: String },
    /// A metric name did not match any known metric.
    #[error("unknown metric: {name}")]
    UnknownMetric { name: String },
    /// A descriptor name did not match any known descriptor.
    #[error("unknown descriptor: {name}")]
    UnknownDescriptor { name: String },
    /// A store build was cancelled between files.
    #[error("operation cancelled")]
    Cancelled,
}
