//! Upload and output file lifecycle management

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::errors::Result;

/// Outcome of one retention sweep; deletion failures are diagnostics, not errors
#[derive(Debug, Clone, Default)]
pub struct RetentionReport {
    pub removed: usize,
    pub warnings: Vec<String>,
}

/// Owns the upload and output directory trees
#[derive(Debug, Clone)]
pub struct StorageManager {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl StorageManager {
    /// Create a manager over the two directory roots
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create both directory roots if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Upload directory root
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Output directory root
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write an upload to storage under a collision-free name.
    ///
    /// The stored name is `{uuid}_{original filename}`, so two back-to-back
    /// uploads of the same document coexist independently.
    pub fn persist_upload(&self, bytes: &[u8], original_filename: &str) -> Result<PathBuf> {
        // strip any directory components a client may have sent along
        let basename = Path::new(original_filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| original_filename.to_string());

        let file_id = Uuid::new_v4();
        let stored = self.upload_dir.join(format!("{file_id}_{basename}"));
        std::fs::write(&stored, bytes)?;
        debug!("Stored upload at {}", stored.display());
        Ok(stored)
    }

    /// Delete uploads beyond the `limit` most recently modified PDFs.
    ///
    /// Individual deletion failures are logged and collected; the sweep never
    /// aborts and never fails the current job.
    pub fn enforce_retention(&self, limit: usize) -> RetentionReport {
        let uploads = match pdfs_by_mtime_desc(&self.upload_dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Cannot list upload directory: {}", e);
                let mut report = RetentionReport::default();
                report
                    .warnings
                    .push(format!("cannot list {}: {e}", self.upload_dir.display()));
                return report;
            }
        };

        sweep(&uploads, limit, |path| std::fs::remove_file(path))
    }

    /// Create the per-job output directory `{stem}_{YYYYMMDD_HHMMSS}`.
    ///
    /// A resubmission within the same second lands in the same directory;
    /// creation is idempotent and must not fail for that case.
    pub fn create_output_directory(&self, original_filename: &str) -> Result<PathBuf> {
        let dir = self
            .output_dir
            .join(output_directory_name(original_filename, Local::now()));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Delete everything beyond position `limit` in a newest-first listing.
///
/// A failed deletion becomes a warning and the sweep moves on to the next
/// file; partial failure is tolerated, never fatal.
fn sweep(
    files: &[PathBuf],
    limit: usize,
    mut remove: impl FnMut(&Path) -> std::io::Result<()>,
) -> RetentionReport {
    let mut report = RetentionReport::default();

    for old in files.iter().skip(limit) {
        match remove(old) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!("Cannot delete old upload {}: {}", old.display(), e);
                report
                    .warnings
                    .push(format!("cannot delete {}: {e}", old.display()));
            }
        }
    }

    report
}

/// Derive the per-job directory name from the filename stem and a timestamp
fn output_directory_name(original_filename: &str, now: DateTime<Local>) -> String {
    let stem = Path::new(original_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_filename.to_string());
    format!("{}_{}", stem, now.format("%Y%m%d_%H%M%S"))
}

/// The most recently modified PDF in `dir`, if any.
///
/// Output discovery rests on the per-job directory being exclusively owned by
/// one engine run; keep this scan in one place so that assumption stays easy
/// to audit.
pub fn most_recent_pdf(dir: &Path) -> Option<PathBuf> {
    pdfs_by_mtime_desc(dir).ok()?.into_iter().next()
}

/// All PDFs in `dir`, newest first by modification time
fn pdfs_by_mtime_desc(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !path.is_file() || !is_pdf {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((path, mtime));
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(files.into_iter().map(|(path, _)| path).collect())
}
