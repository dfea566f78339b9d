use crate::config::{BatchOptions, ScanOptions};
use crate::error::QaPdfError;
use crate::extract::{FileOutcome, ReportRegistry};
use crate::extraction::PdfDecoder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress notification sent after each file finishes.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub completed: usize,
    pub total: usize,
    pub file_path: &'a Path,
}

impl Progress<'_> {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

pub type ProgressCallback<'a> = &'a (dyn Fn(Progress<'_>) + Sync);

/// Find candidate report files under `root`, sorted by path.
///
/// Symlinked directories are not descended into. Only an unreadable `root`
/// is an error; unreadable entries below it are logged and skipped.
pub fn collect_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, QaPdfError> {
    let entries = std::fs::read_dir(root)?;
    let mut files = Vec::new();
    walk(entries, options, &mut files);
    files.sort();
    Ok(files)
}

fn walk(entries: std::fs::ReadDir, options: &ScanOptions, out: &mut Vec<PathBuf>) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(error) => {
                tracing::warn!(file = %path.display(), %error, "skipping unreadable entry");
                continue;
            }
        };

        if file_type.is_dir() {
            if options.recursive {
                match std::fs::read_dir(&path) {
                    Ok(sub) => walk(sub, options, out),
                    Err(error) => {
                        tracing::warn!(dir = %path.display(), %error, "skipping unreadable directory")
                    }
                }
            }
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(dir = %path.display(), "not following directory symlink");
        } else if has_extension(&path, options.extension.as_deref()) {
            out.push(path);
        }
    }
}

fn has_extension(path: &Path, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
            .unwrap_or(false),
    }
}

/// Process every file on a worker pool.
///
/// Files are independent; outcomes are returned in input order. With
/// `raise_errors`, the first failure stops new files from being started and
/// is returned; files already in flight finish and are discarded.
pub fn process_files(
    paths: &[PathBuf],
    decoder: &dyn PdfDecoder,
    registry: &ReportRegistry,
    options: &BatchOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<Vec<FileOutcome>, QaPdfError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = options.workers {
        builder = builder.num_threads(workers);
    }
    let pool = builder
        .build()
        .map_err(|e| QaPdfError::WorkerPool(e.to_string()))?;

    let total = paths.len();
    let completed = AtomicUsize::new(0);

    tracing::info!(
        files = total,
        workers = pool.current_num_threads(),
        backend = decoder.backend_name(),
        "processing batch"
    );

    pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let outcome = crate::process_file(path, decoder, registry);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = progress {
                    callback(Progress {
                        completed: done,
                        total,
                        file_path: path,
                    });
                }

                match outcome {
                    FileOutcome::Failed { file_path, error } if options.raise_errors => {
                        Err(QaPdfError::InFile {
                            path: file_path,
                            source: Box::new(error),
                        })
                    }
                    other => Ok(other),
                }
            })
            .collect()
    })
}
