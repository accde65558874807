use std::{fs::DirBuilder, io, path::Path};

use log::{debug, trace};

/// Removes `path` and everything below it. Failures are logged and
/// otherwise ignored: a stale directory must not block a new checkout.
pub fn remove_dir(path: &Path) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            trace!("{} is already removed, nothing to do", path.display())
        }
        Err(err) => debug!("Ignoring failure to remove {}: {}", path.display(), err),
    }
}

/// Creates `path` and any missing parents. Existing directories are left
/// untouched.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}
