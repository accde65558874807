use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::workspace::ensure_dir;

use super::FetchError;

pub fn servers_path(home: &Path) -> PathBuf {
    home.join(".subversion").join("servers")
}

/// Creates `<home>/.subversion/servers` with the content produced by
/// `content`.
///
/// The file is never overwritten: if anything is already present at the
/// path this fails with [`FetchError::ServersFileExists`] and `content` is
/// not called. An empty content produces an empty file.
pub fn write_servers_file<F>(home: &Path, content: F) -> Result<PathBuf, FetchError>
where
    F: FnOnce() -> Result<String, FetchError>,
{
    let path = servers_path(home);
    match std::fs::symlink_metadata(&path) {
        Ok(_) => return Err(FetchError::ServersFileExists { path }),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(source) => return Err(FetchError::Io { path, source }),
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent).map_err(|source| FetchError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = content()?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(FetchError::ServersFileExists { path })
        }
        Err(source) => return Err(FetchError::Io { path, source }),
    };
    file.write_all(content.as_bytes())
        .map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;

    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn create_empty_file() {
        let home = tempfile::tempdir().unwrap();
        let path = write_servers_file(home.path(), || Ok(String::new())).unwrap();
        assert_eq!(path, home.path().join(".subversion/servers"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn create_with_content() {
        let home = tempfile::tempdir().unwrap();
        let block = "[global]\nhttp-proxy-host = proxy\n";
        let path = write_servers_file(home.path(), || Ok(block.to_string())).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), block);
    }

    #[test]
    fn existing_subversion_dir_is_kept() {
        let home = tempfile::tempdir().unwrap();
        let config = home.path().join(".subversion/config");
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "[miscellany]\n").unwrap();

        write_servers_file(home.path(), || Ok(String::new())).unwrap();

        assert_eq!(std::fs::read_to_string(config).unwrap(), "[miscellany]\n");
    }

    #[test]
    fn existing_file_is_not_touched() {
        let home = tempfile::tempdir().unwrap();
        let path = servers_path(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "original").unwrap();

        let mut called = false;
        let result = write_servers_file(home.path(), || {
            called = true;
            Ok("replacement".to_string())
        });

        assert!(matches!(result, Err(FetchError::ServersFileExists { .. })));
        assert!(result.unwrap_err().is_policy());
        assert!(!called);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "original");
    }

    #[test]
    fn existing_empty_file_is_rejected() {
        let home = tempfile::tempdir().unwrap();
        let path = servers_path(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();

        let result = write_servers_file(home.path(), || Ok(String::new()));
        assert!(matches!(result, Err(FetchError::ServersFileExists { .. })));
    }

    #[test]
    fn content_failure_leaves_no_file() {
        let home = tempfile::tempdir().unwrap();
        let result = write_servers_file(home.path(), || {
            Err(FetchError::Store(anyhow::anyhow!("proxy store unavailable")))
        });
        assert!(matches!(result, Err(FetchError::Store(_))));
        assert!(!servers_path(home.path()).exists());
    }
}
