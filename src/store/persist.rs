//! JSON persistence for signature stores.
//!
//! The document carries the paths and the signatures as two parallel arrays
//! of equal length, so reloading never depends on re-walking a directory:
//!
//! ```json
//! { "version": 1, "descriptor": "glcm", "paths": ["a.png"], "signatures": [[0.1, ...]] }
//! ```

use crate::descriptor::{DescriptorKind, Signature};
use crate::store::SignatureStore;
use crate::util::{TexSearchError, TexSearchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    descriptor: DescriptorKind,
    paths: Vec<PathBuf>,
    signatures: Vec<Signature>,
}

impl SignatureStore {
    /// Serializes the store to a JSON string.
    pub fn to_json(&self) -> TexSearchResult<String> {
        let doc = StoreDocument {
            version: FORMAT_VERSION,
            descriptor: self.descriptor,
            paths: self.paths().map(Path::to_path_buf).collect(),
            signatures: self.signatures().cloned().collect(),
        };
        serde_json::to_string(&doc).map_err(format_err)
    }

    /// Parses a store from its JSON form.
    pub fn from_json(text: &str) -> TexSearchResult<Self> {
        let doc: StoreDocument = serde_json::from_str(text).map_err(format_err)?;
        if doc.version != FORMAT_VERSION {
            return Err(TexSearchError::StoreFormat {
                reason: format!("unsupported version {}", doc.version),
            });
        }
        let expected = doc.descriptor.dimension();
        if let Some(bad) = doc.signatures.iter().find(|s| s.len() != expected) {
            return Err(TexSearchError::StoreFormat {
                reason: format!(
                    "{} signatures have {expected} values, found one with {}",
                    doc.descriptor,
                    bad.len()
                ),
            });
        }
        Self::from_parallel(doc.descriptor, doc.paths, doc.signatures)
    }

    /// Writes the store to `path` as JSON.
    pub fn save(&self, path: &Path) -> TexSearchResult<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| TexSearchError::Io {
            reason: format!("{}: {err}", path.display()),
        })
    }

    /// Reads a store previously written by [`SignatureStore::save`].
    pub fn load(path: &Path) -> TexSearchResult<Self> {
        if !path.exists() {
            return Err(TexSearchError::NotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path).map_err(|err| TexSearchError::Io {
            reason: format!("{}: {err}", path.display()),
        })?;
        Self::from_json(&text)
    }
}

fn format_err(err: serde_json::Error) -> TexSearchError {
    TexSearchError::StoreFormat {
        reason: err.to_string(),
    }
}
