//! Opens a file in the desktop's default application.

use std::io;
use std::path::Path;

/// Hands `path` to the platform opener (`xdg-open`, `open`, `start`).
///
/// The opener runs detached, so the review screen stays up while the file is
/// viewed elsewhere.
pub fn open_file(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} no longer exists", path.display()),
        ));
    }

    log::info!("Opening {}", path.display());
    open::that_detached(path)
}
