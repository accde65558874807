use std::{
    fs::File,
    path::Path,
    time::{Duration, Instant},
};

use fs4::fs_std::FileExt;
use log::{debug, info};
use thiserror::Error;

const LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// Exclusive advisory lock held for as long as the value lives.
pub struct FileLock {
    _file: File,
}

#[derive(Error, Debug)]
#[error("Could not lock {path}: {source}")]
pub struct Error {
    path: String,
    source: std::io::Error,
}

impl FileLock {
    /// Blocks until the lock on `path` is acquired, giving up after five
    /// minutes.
    pub fn new(path: &Path) -> Result<Self, Error> {
        let error = |source| Error {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(error)?;
        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(_) => {
                    info!("Acquired a lock on {}", path.display());
                    return Ok(Self { _file: file });
                }
                Err(err)
                    if err.raw_os_error() == fs4::lock_contended_error().raw_os_error()
                        && start.elapsed() < LOCK_TIMEOUT =>
                {
                    debug!("{} is locked by another fetch, retrying", path.display());
                    std::thread::sleep(Duration::from_secs(1));
                }
                Err(err) => return Err(error(err)),
            }
        }
    }
}
