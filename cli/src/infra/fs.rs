//! Filesystem infrastructure: implements the `LocalFs` port with `std::fs`.

use std::io;
use std::path::Path;

use crate::application::ports::LocalFs;

/// Production filesystem implementation of `LocalFs`.
pub struct StdFs;

impl LocalFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Refuses a symlink: removing it would leave the target's contents on disk.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        if std::fs::symlink_metadata(path)?.file_type().is_symlink() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to remove a symbolic link; point the data directory at the real path",
            ));
        }
        std::fs::remove_dir_all(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
