use super::{FileRecord, ReviewQueue, ReviewStatus};
use crate::error::{describe_io_error, Result, ReviewError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A decision the user can make about the current file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Keep,
    Delete,
    Move(PathBuf),
}

/// What an action actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Kept { path: PathBuf },
    Deleted { path: PathBuf, size: u64 },
    Moved { from: PathBuf, to: PathBuf },
}

impl ActionOutcome {
    pub fn status(&self) -> ReviewStatus {
        match self {
            ActionOutcome::Kept { .. } => ReviewStatus::Kept,
            ActionOutcome::Deleted { .. } => ReviewStatus::Deleted,
            ActionOutcome::Moved { .. } => ReviewStatus::Moved,
        }
    }
}

/// Performs keep/delete/move on files.
///
/// In dry-run mode delete and move still validate their inputs but leave the
/// filesystem untouched.
#[derive(Debug, Clone, Default)]
pub struct ActionExecutor {
    dry_run: bool,
}

impl ActionExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Marks the current record kept and advances. Never touches the filesystem.
    pub fn keep(&self, queue: &mut ReviewQueue) -> Option<ActionOutcome> {
        let record = queue.mark_kept()?;
        log::debug!("Kept {}", record.path.display());
        Some(ActionOutcome::Kept {
            path: record.path.clone(),
        })
    }

    /// Sends the file to the system trash
    pub fn delete(&self, record: &FileRecord) -> Result<ActionOutcome> {
        let path = &record.path;

        let metadata = fs::symlink_metadata(path).map_err(|e| ReviewError::Delete {
            path: path.clone(),
            reason: describe_io_error(&e),
        })?;
        let size = metadata.len();

        if self.dry_run {
            log::info!("[dry run] Would move to trash: {}", path.display());
            return Ok(ActionOutcome::Deleted {
                path: path.clone(),
                size,
            });
        }

        trash::delete(path).map_err(|e| {
            log::error!("Trash operation failed for {}: {}", path.display(), e);
            ReviewError::Delete {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

        Ok(ActionOutcome::Deleted {
            path: path.clone(),
            size,
        })
    }

    /// Moves the file into `destination`, creating the folder if needed.
    ///
    /// # Errors
    /// - `MoveConflict` if a file of the same name already exists there; the
    ///   existing file is never overwritten
    /// - `Move` for a missing source, a destination that is not a folder, or any
    ///   I/O failure while relocating
    pub fn move_to(&self, record: &FileRecord, destination: &Path) -> Result<ActionOutcome> {
        let source = &record.path;
        let move_error = |reason: String| ReviewError::Move {
            path: source.clone(),
            reason,
        };

        fs::symlink_metadata(source).map_err(|e| move_error(describe_io_error(&e)))?;

        let file_name = source
            .file_name()
            .ok_or_else(|| move_error("path has no file name".to_string()))?;

        if destination.exists() {
            if !destination.is_dir() {
                return Err(move_error(format!(
                    "{} is not a folder",
                    destination.display()
                )));
            }
        } else if !self.dry_run {
            fs::create_dir_all(destination).map_err(|e| {
                move_error(format!(
                    "cannot create {}: {}",
                    destination.display(),
                    describe_io_error(&e)
                ))
            })?;
        }

        // symlink_metadata so a dangling link still counts as taken
        let target = destination.join(file_name);
        if fs::symlink_metadata(&target).is_ok() {
            return Err(ReviewError::MoveConflict { path: target });
        }

        if self.dry_run {
            log::info!(
                "[dry run] Would move {} to {}",
                source.display(),
                target.display()
            );
        } else {
            relocate(source, &target).map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    ReviewError::MoveConflict {
                        path: target.clone(),
                    }
                } else {
                    move_error(describe_io_error(&e))
                }
            })?;
            log::info!("Moved {} to {}", source.display(), target.display());
        }

        Ok(ActionOutcome::Moved {
            from: source.clone(),
            to: target,
        })
    }

    /// Runs `action` against the current record.
    ///
    /// Delete and move remove the record from the queue only when they succeed;
    /// on error the queue and cursor are left exactly as they were. Returns
    /// `Ok(None)` when the queue is empty.
    pub fn apply(&self, queue: &mut ReviewQueue, action: &Action) -> Result<Option<ActionOutcome>> {
        let Some(record) = queue.current().cloned() else {
            return Ok(None);
        };

        let outcome = match action {
            Action::Keep => return Ok(self.keep(queue)),
            Action::Delete => self.delete(&record)?,
            Action::Move(destination) => self.move_to(&record, destination)?,
        };

        queue.remove_current();
        Ok(Some(outcome))
    }
}

/// Moves `source` to `target` without ever replacing an existing entry.
///
/// A hard link claims the target name atomically; when linking is not possible
/// (another device, or a filesystem without links) the bytes are copied into a
/// freshly created file. Fails with `AlreadyExists` if `target` appeared in
/// the meantime.
fn relocate(source: &Path, target: &Path) -> io::Result<()> {
    match fs::hard_link(source, target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(e),
        Err(link_err) => {
            log::debug!(
                "Link {} -> {} failed ({}), copying instead",
                source.display(),
                target.display(),
                link_err
            );
            copy_into_new(source, target)?;
        }
    }

    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}

/// Copies `source` into a file that must not exist yet. A partial copy is
/// removed again so a retry does not trip over it.
fn copy_into_new(source: &Path, target: &Path) -> io::Result<()> {
    let mut reader = fs::File::open(source)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.sync_all())
        .and_then(|_| fs::set_permissions(target, reader.metadata()?.permissions()));

    if let Err(e) = copied {
        drop(writer);
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}
