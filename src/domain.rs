pub mod executor;
pub mod queue;
pub mod scanner;

pub use executor::{Action, ActionExecutor, ActionOutcome};
pub use queue::ReviewQueue;
pub use scanner::{scan, scan_recent, ScanOptions};

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Preview strategy bucket, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    Pdf,
    Video,
    Executable,
    Other,
}

impl FileCategory {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            // SVG is left out: it needs a vector renderer
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "ico" | "webp" | "tiff" | "tif" => {
                FileCategory::Image
            }

            "pdf" => FileCategory::Pdf,

            "mp4" | "avi" | "mov" | "mkv" | "wmv" | "flv" | "webm" | "m4v" => FileCategory::Video,

            "exe" | "msi" | "app" | "dmg" | "deb" | "rpm" | "pkg" => FileCategory::Executable,

            _ => FileCategory::Other,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Image => "Image",
            FileCategory::Pdf => "PDF",
            FileCategory::Video => "Video",
            FileCategory::Executable => "Application",
            FileCategory::Other => "File",
        }
    }
}

/// Which filesystem timestamp decides whether a file is "recent"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeBasis {
    /// Birth time, falling back to modification time where the platform has none
    #[default]
    Created,
    Modified,
}

/// Snapshot of a file's metadata taken at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size: u64,
    pub category: FileCategory,
}

impl FileRecord {
    pub fn from_path(path: &Path, basis: TimeBasis) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Self::from_metadata(path, &metadata, basis)
    }

    pub(crate) fn from_metadata(
        path: &Path,
        metadata: &fs::Metadata,
        basis: TimeBasis,
    ) -> io::Result<Self> {
        let timestamp = match basis {
            TimeBasis::Created => metadata.created().or_else(|_| metadata.modified())?,
            TimeBasis::Modified => metadata.modified()?,
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(FileRecord {
            path: path.to_path_buf(),
            name,
            created_at: timestamp.into(),
            size: metadata.len(),
            category: FileCategory::from_path(path),
        })
    }
}

/// Lifecycle of a record in the review queue.
///
/// Everything except `Pending` is terminal. Deleted and moved records leave the
/// queue, so only `Pending` and `Kept` are ever observed on a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Kept,
    Deleted,
    Moved,
}

/// Statistics about decisions made during the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionStatistics {
    pub total_files: usize,
    pub kept: usize,
    pub deleted: usize,
    pub moved: usize,
}

impl DecisionStatistics {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    pub fn record(&mut self, status: ReviewStatus) {
        match status {
            ReviewStatus::Kept => self.kept += 1,
            ReviewStatus::Deleted => self.deleted += 1,
            ReviewStatus::Moved => self.moved += 1,
            ReviewStatus::Pending => {}
        }
    }

    pub fn decided(&self) -> usize {
        self.kept + self.deleted + self.moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_category_tests {
        use super::*;

        #[test]
        fn test_category_from_extension_image() {
            assert_eq!(FileCategory::from_extension("png"), FileCategory::Image);
            assert_eq!(FileCategory::from_extension("jpeg"), FileCategory::Image);
            assert_eq!(FileCategory::from_extension("ico"), FileCategory::Image);
            assert_eq!(FileCategory::from_extension("tif"), FileCategory::Image);
        }

        #[test]
        fn test_category_from_extension_pdf_and_video() {
            assert_eq!(FileCategory::from_extension("pdf"), FileCategory::Pdf);
            assert_eq!(FileCategory::from_extension("mp4"), FileCategory::Video);
            assert_eq!(FileCategory::from_extension("mkv"), FileCategory::Video);
            assert_eq!(FileCategory::from_extension("m4v"), FileCategory::Video);
        }

        #[test]
        fn test_category_from_extension_executable() {
            assert_eq!(FileCategory::from_extension("exe"), FileCategory::Executable);
            assert_eq!(FileCategory::from_extension("msi"), FileCategory::Executable);
            assert_eq!(FileCategory::from_extension("dmg"), FileCategory::Executable);
        }

        #[test]
        fn test_category_other() {
            assert_eq!(FileCategory::from_extension("zip"), FileCategory::Other);
            assert_eq!(FileCategory::from_extension("svg"), FileCategory::Other);
            assert_eq!(FileCategory::from_extension(""), FileCategory::Other);
        }

        #[test]
        fn test_category_case_insensitive() {
            assert_eq!(FileCategory::from_extension("PNG"), FileCategory::Image);
            assert_eq!(FileCategory::from_extension("Pdf"), FileCategory::Pdf);
            assert_eq!(FileCategory::from_extension("EXE"), FileCategory::Executable);
        }

        #[test]
        fn test_category_from_path() {
            assert_eq!(
                FileCategory::from_path(Path::new("/tmp/Holiday.JPG")),
                FileCategory::Image
            );
            assert_eq!(
                FileCategory::from_path(Path::new("/tmp/README")),
                FileCategory::Other
            );
        }
    }

    mod file_record_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_file_record_from_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("invoice.pdf");
            fs::write(&path, b"%PDF-1.4 fake").unwrap();

            let record = FileRecord::from_path(&path, TimeBasis::Created).unwrap();

            assert_eq!(record.path, path);
            assert_eq!(record.name, "invoice.pdf");
            assert_eq!(record.size, 13);
            assert_eq!(record.category, FileCategory::Pdf);
            assert!(record.created_at <= Utc::now());
        }

        #[test]
        fn test_file_record_modified_basis() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("clip.mp4");
            fs::write(&path, b"not really a video").unwrap();

            let mtime: DateTime<Utc> = fs::metadata(&path).unwrap().modified().unwrap().into();
            let record = FileRecord::from_path(&path, TimeBasis::Modified).unwrap();

            assert_eq!(record.created_at, mtime);
            assert_eq!(record.category, FileCategory::Video);
        }

        #[test]
        fn test_file_record_nonexistent_file() {
            let result = FileRecord::from_path(Path::new("/nonexistent/file.txt"), TimeBasis::Created);
            assert!(result.is_err());
        }
    }

    mod statistics_tests {
        use super::*;

        #[test]
        fn test_statistics_record() {
            let mut stats = DecisionStatistics::new(5);
            stats.record(ReviewStatus::Kept);
            stats.record(ReviewStatus::Deleted);
            stats.record(ReviewStatus::Moved);
            stats.record(ReviewStatus::Kept);
            stats.record(ReviewStatus::Pending);

            assert_eq!(stats.total_files, 5);
            assert_eq!(stats.kept, 2);
            assert_eq!(stats.deleted, 1);
            assert_eq!(stats.moved, 1);
            assert_eq!(stats.decided(), 4);
        }
    }
}
