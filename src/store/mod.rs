//! In-memory collection of precomputed signatures.
//!
//! A [`SignatureStore`] pairs every collection image path with its signature
//! explicitly, in the order the images were visited. Stores are built once
//! (see [`SignatureStore::build`]) and then only read; a rebuild produces a
//! fresh value. All entries share one dimension and one descriptor kind.

use crate::descriptor::{DescriptorKind, Signature};
use crate::util::{TexSearchError, TexSearchResult};
use std::path::{Path, PathBuf};

mod builder;
mod persist;

pub use builder::{BuildReport, CancelToken, SkippedFile, StoreConfig, DEFAULT_EXTENSIONS};

/// One collection image and its signature.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreEntry {
    /// Identifier of the image, its path.
    pub path: PathBuf,
    /// Signature computed from the image.
    pub signature: Signature,
}

/// Ordered `(path, signature)` pairs sharing one descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureStore {
    descriptor: DescriptorKind,
    entries: Vec<StoreEntry>,
}

impl SignatureStore {
    /// Creates a store from entries, checking that dimensions agree and
    /// every signature is finite.
    pub fn new(descriptor: DescriptorKind, entries: Vec<StoreEntry>) -> TexSearchResult<Self> {
        if entries.iter().any(|e| !e.signature.is_finite()) {
            return Err(TexSearchError::InvalidInput(
                "signature contains non-finite values",
            ));
        }
        if let Some(first) = entries.first() {
            let expected = first.signature.len();
            if let Some(bad) = entries.iter().find(|e| e.signature.len() != expected) {
                return Err(TexSearchError::DimensionMismatch {
                    expected,
                    got: bad.signature.len(),
                });
            }
        }
        Ok(Self {
            descriptor,
            entries,
        })
    }

    /// Creates a store from parallel path and signature lists.
    pub fn from_parallel(
        descriptor: DescriptorKind,
        paths: Vec<PathBuf>,
        signatures: Vec<Signature>,
    ) -> TexSearchResult<Self> {
        if paths.len() != signatures.len() {
            return Err(TexSearchError::StoreFormat {
                reason: format!(
                    "{} paths but {} signatures",
                    paths.len(),
                    signatures.len()
                ),
            });
        }
        let entries = paths
            .into_iter()
            .zip(signatures)
            .map(|(path, signature)| StoreEntry { path, signature })
            .collect();
        Self::new(descriptor, entries)
    }

    /// Returns the descriptor used for every signature.
    pub fn descriptor(&self) -> DescriptorKind {
        self.descriptor
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the shared signature length, or `None` for an empty store.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.signature.len())
    }

    /// Returns the entries in insertion order.
    pub fn entries(&self) -> &[StoreEntry] {
        &self.entries
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&StoreEntry> {
        self.entries.get(index)
    }

    /// Iterates entry paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.entries.iter().map(|e| e.path.as_path())
    }

    /// Iterates signatures in insertion order.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> + '_ {
        self.entries.iter().map(|e| &e.signature)
    }
}
