//! Offline store construction from a directory tree.
//!
//! Files are visited in a deterministic order (entries sorted by file name at
//! every level) and filtered by extension. Each file is decoded and described
//! independently; a file that fails to decode or yields a non-finite or
//! wrongly sized signature is skipped with a warning and the build goes on.
//! With the `rayon` feature and `parallel` set, files are processed on the
//! rayon pool while keeping traversal order in the result.

use crate::descriptor::{DescriptorKind, Signature};
use crate::image::GrayDecoder;
use crate::store::{SignatureStore, StoreEntry};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{TexSearchError, TexSearchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// File extensions treated as images by default.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Store construction parameters.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Descriptor applied to every image.
    pub descriptor: DescriptorKind,
    /// Extensions (without the dot) accepted as images, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Process files on the rayon pool when the `rayon` feature is enabled.
    pub parallel: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            descriptor: DescriptorKind::Glcm,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            parallel: false,
            follow_links: false,
        }
    }
}

impl StoreConfig {
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Shared flag used to cancel a store build between files.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A file left out of a store and the reason why.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a store build: the store plus every skipped file.
#[derive(Clone, Debug)]
pub struct BuildReport {
    pub store: SignatureStore,
    pub skipped: Vec<SkippedFile>,
}

enum FileOutcome {
    Kept(StoreEntry),
    Skipped(SkippedFile),
    Cancelled,
}

impl SignatureStore {
    /// Walks `root` and builds a store of every decodable image.
    pub fn build<D>(root: &Path, decoder: &D, cfg: &StoreConfig) -> TexSearchResult<Self>
    where
        D: GrayDecoder + ?Sized,
    {
        Ok(Self::build_report(root, decoder, cfg, &CancelToken::new())?.store)
    }

    /// Builds a store and reports skipped files; stops early on cancellation.
    pub fn build_report<D>(
        root: &Path,
        decoder: &D,
        cfg: &StoreConfig,
        cancel: &CancelToken,
    ) -> TexSearchResult<BuildReport>
    where
        D: GrayDecoder + ?Sized,
    {
        if !root.exists() {
            return Err(TexSearchError::NotFound {
                path: root.display().to_string(),
            });
        }
        let _span = trace_span!("store_build", descriptor = cfg.descriptor.name()).entered();

        let files = collect_files(root, cfg);
        trace_event!("store_candidates", files = files.len());

        let process = |path: &PathBuf| {
            if cancel.is_cancelled() {
                return FileOutcome::Cancelled;
            }
            describe_file(path, decoder, cfg.descriptor)
        };

        #[cfg(feature = "rayon")]
        let outcomes: Vec<FileOutcome> = if cfg.parallel {
            files.par_iter().map(process).collect()
        } else {
            sequential(&files, process)
        };
        #[cfg(not(feature = "rayon"))]
        let outcomes: Vec<FileOutcome> = sequential(&files, process);

        let mut entries = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Kept(entry) => entries.push(entry),
                FileOutcome::Skipped(file) => skipped.push(file),
                FileOutcome::Cancelled => return Err(TexSearchError::Cancelled),
            }
        }

        trace_event!("store_built", entries = entries.len(), skipped = skipped.len());
        let store = SignatureStore::new(cfg.descriptor, entries)?;
        Ok(BuildReport { store, skipped })
    }
}

fn sequential<F>(files: &[PathBuf], process: F) -> Vec<FileOutcome>
where
    F: Fn(&PathBuf) -> FileOutcome,
{
    let mut out = Vec::with_capacity(files.len());
    for path in files {
        let outcome = process(path);
        let cancelled = matches!(outcome, FileOutcome::Cancelled);
        out.push(outcome);
        if cancelled {
            break;
        }
    }
    out
}

fn collect_files(root: &Path, cfg: &StoreConfig) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(cfg.follow_links)
        .sort_by_file_name();
    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && cfg.accepts(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let reason = err.to_string();
                trace_warn!("skipping unreadable directory entry", reason = reason.as_str());
            }
        }
    }
    files
}

fn describe_file<D>(path: &Path, decoder: &D, descriptor: DescriptorKind) -> FileOutcome
where
    D: GrayDecoder + ?Sized,
{
    let result = decoder
        .decode_path(path)
        .and_then(|image| descriptor.extract(&image));
    file_outcome(path, result, descriptor)
}

fn file_outcome(
    path: &Path,
    extracted: TexSearchResult<Signature>,
    descriptor: DescriptorKind,
) -> FileOutcome {
    match extracted.and_then(|signature| check_signature(signature, descriptor)) {
        Ok(signature) => FileOutcome::Kept(StoreEntry {
            path: path.to_path_buf(),
            signature,
        }),
        Err(err) => {
            let reason = err.to_string();
            let shown = path.display().to_string();
            trace_warn!(
                "skipping file",
                path = shown.as_str(),
                reason = reason.as_str()
            );
            FileOutcome::Skipped(SkippedFile {
                path: path.to_path_buf(),
                reason,
            })
        }
    }
}

fn check_signature(signature: Signature, descriptor: DescriptorKind) -> TexSearchResult<Signature> {
    if signature.len() != descriptor.dimension() {
        return Err(TexSearchError::DimensionMismatch {
            expected: descriptor.dimension(),
            got: signature.len(),
        });
    }
    if !signature.is_finite() {
        return Err(TexSearchError::InvalidInput("signature contains non-finite values"));
    }
    Ok(signature)
}
