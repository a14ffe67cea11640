use super::{FileRecord, TimeBasis};
use crate::error::{Result, ReviewError};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::Path;

pub const DEFAULT_HOURS_THRESHOLD: u32 = 24;

/// Options for the recent-file scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How far back a file's timestamp may lie
    pub threshold: Duration,
    pub time_basis: TimeBasis,
    /// Skip dot-files
    pub skip_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::with_hours(DEFAULT_HOURS_THRESHOLD)
    }
}

impl ScanOptions {
    pub fn with_hours(hours: u32) -> Self {
        Self {
            threshold: Duration::hours(i64::from(hours)),
            time_basis: TimeBasis::default(),
            skip_hidden: false,
        }
    }
}

/// Lists files in `dir` created within the last `hours`, newest first.
pub fn scan_recent(dir: &Path, hours: u32) -> Result<Vec<FileRecord>> {
    scan(dir, &ScanOptions::with_hours(hours))
}

/// Scans `dir` (non-recursively) for files whose timestamp falls within
/// `[now - threshold, now]`.
///
/// # Returns
/// * `Ok(Vec<FileRecord>)` - records sorted by timestamp, newest first
/// * `Err(ReviewError::Access)` - if the directory itself cannot be read
///
/// # Behavior
/// - Directories are ignored and never descended into
/// - Entries that fail to stat are logged and skipped
pub fn scan(dir: &Path, options: &ScanOptions) -> Result<Vec<FileRecord>> {
    scan_at(dir, options, Utc::now())
}

pub(crate) fn scan_at(
    dir: &Path,
    options: &ScanOptions,
    now: DateTime<Utc>,
) -> Result<Vec<FileRecord>> {
    let cutoff = now - options.threshold;
    let entries = fs::read_dir(dir).map_err(|e| ReviewError::access(dir, e))?;

    let mut records = Vec::new();

    for entry_result in entries {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();

        if options.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Error accessing {}: {}", path.display(), e);
                continue;
            }
        };

        if !metadata.is_file() {
            continue;
        }

        let record = match FileRecord::from_metadata(&path, &metadata, options.time_basis) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Cannot read timestamps of {}: {}", path.display(), e);
                continue;
            }
        };

        if record.created_at < cutoff || record.created_at > now {
            continue;
        }

        records.push(record);
    }

    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });

    log::info!(
        "Found {} file(s) from the last {} hour(s) in {}",
        records.len(),
        options.threshold.num_hours(),
        dir.display()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::time::{Duration as StdDuration, SystemTime};
    use tempfile::TempDir;

    fn write_aged(dir: &Path, name: &str, hours_old: u64) {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        let when = SystemTime::now() - StdDuration::from_secs(hours_old * 3600);
        filetime::set_file_mtime(&path, FileTime::from_system_time(when)).unwrap();
    }

    fn modified_basis(hours: u32) -> ScanOptions {
        ScanOptions {
            time_basis: TimeBasis::Modified,
            ..ScanOptions::with_hours(hours)
        }
    }

    #[test]
    fn test_scan_threshold_window_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        write_aged(temp_dir.path(), "one_hour.zip", 1);
        write_aged(temp_dir.path(), "ten_hours.png", 10);
        write_aged(temp_dir.path(), "thirty_hours.pdf", 30);

        let records = scan(temp_dir.path(), &modified_basis(24)).unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["one_hour.zip", "ten_hours.png"]);
    }

    #[test]
    fn test_scan_records_fall_inside_window() {
        let temp_dir = TempDir::new().unwrap();
        for (i, age) in [0u64, 2, 5, 23, 25, 48, 100].iter().enumerate() {
            write_aged(temp_dir.path(), &format!("file{}.bin", i), *age);
        }

        let now = Utc::now();
        let options = modified_basis(24);
        let records = scan_at(temp_dir.path(), &options, now).unwrap();

        assert_eq!(records.len(), 4);
        for record in &records {
            assert!(record.created_at >= now - options.threshold);
            assert!(record.created_at <= now);
        }
        for pair in records.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_scan_created_basis_ignores_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        write_aged(temp_dir.path(), "fresh_download.zip", 30);
        let path = temp_dir.path().join("fresh_download.zip");

        let by_created = scan_recent(temp_dir.path(), 24).unwrap();
        let by_modified = scan(temp_dir.path(), &modified_basis(24)).unwrap();

        assert!(by_modified.is_empty());
        if fs::metadata(&path).unwrap().created().is_ok() {
            // Born just now, whatever its mtime says
            assert_eq!(by_created.len(), 1);
            assert_eq!(by_created[0].name, "fresh_download.zip");
            assert!(by_created[0].created_at >= Utc::now() - Duration::hours(1));
        } else {
            // No birth time on this filesystem: mtime stands in
            assert!(by_created.is_empty());
        }
    }

    #[test]
    fn test_scan_created_basis_window_bounds() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("new.txt"), b"n").unwrap();

        let now = Utc::now() + Duration::seconds(5);
        let records = scan_at(temp_dir.path(), &ScanOptions::with_hours(1), now).unwrap();
        assert_eq!(records.len(), 1);

        // Everything created in the last hour is too old for a window ending two hours ahead
        let later = Utc::now() + Duration::hours(2);
        let records = scan_at(temp_dir.path(), &ScanOptions::with_hours(1), later).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_scan_ignores_directories_and_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("top.txt"), b"top").unwrap();
        let sub = temp_dir.path().join("subdir");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.txt"), b"nested").unwrap();

        let records = scan_recent(temp_dir.path(), 24).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "top.txt");
    }

    #[test]
    fn test_scan_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("visible.txt"), b"v").unwrap();
        fs::write(temp_dir.path().join(".hidden"), b"h").unwrap();

        let all = scan_recent(temp_dir.path(), 24).unwrap();
        assert_eq!(all.len(), 2);

        let options = ScanOptions {
            skip_hidden: true,
            ..ScanOptions::default()
        };
        let visible = scan(temp_dir.path(), &options).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "visible.txt");
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let records = scan_recent(temp_dir.path(), 24).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_scan_nonexistent_directory_is_access_error() {
        let result = scan_recent(Path::new("/nonexistent/downloads/dir"), 24);
        assert!(matches!(result, Err(ReviewError::Access { .. })));
    }

    #[test]
    fn test_scan_file_instead_of_directory_is_access_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let result = scan_recent(&file, 24);
        assert!(matches!(result, Err(ReviewError::Access { .. })));
    }

    #[test]
    fn test_scan_assigns_categories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("photo.jpg"), b"j").unwrap();
        fs::write(temp_dir.path().join("setup.exe"), b"e").unwrap();

        let records = scan_recent(temp_dir.path(), 24).unwrap();
        let photo = records.iter().find(|r| r.name == "photo.jpg").unwrap();
        let setup = records.iter().find(|r| r.name == "setup.exe").unwrap();

        assert_eq!(photo.category, crate::domain::FileCategory::Image);
        assert_eq!(setup.category, crate::domain::FileCategory::Executable);
    }

    #[test]
    fn test_default_options() {
        let options = ScanOptions::default();
        assert_eq!(options.threshold, Duration::hours(24));
        assert_eq!(options.time_basis, TimeBasis::Created);
        assert!(!options.skip_hidden);
    }
}
