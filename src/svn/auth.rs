//! Seeding of the client's `svn.simple` credential cache.
//!
//! The client only asks for a password interactively, and only writes its
//! credential cache after a first successful authentication. To check out
//! non-interactively the injector authenticates once with an `info` probe,
//! then prepends a plaintext `simple` record to the cache file the probe
//! created. The client reads the file front to back and keeps the first
//! `passtype`, `username` and `password` it sees, so the injected record
//! wins over whatever the client stored itself.
//!
//! Records use the client's hash dump format: every entry is four lines,
//!
//! ```text
//! K <key length>
//! <key>
//! V <value length>
//! <value>
//! ```
//!
//! with lengths counted in bytes.

use std::{
    fs::OpenOptions,
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};
use url::Url;

use crate::model::descriptor::Identity;

use super::{
    command::{CommandRunner, Mode, SvnCommand},
    FetchError,
};

pub const PASSTYPE_SIMPLE: &str = "simple";

pub fn auth_cache_dir(home: &Path) -> PathBuf {
    home.join(".subversion").join("auth").join("svn.simple")
}

fn push_entry(out: &mut Vec<u8>, key: &str, value: &str) {
    out.extend_from_slice(format!("K {}\n{}\n", key.len(), key).as_bytes());
    out.extend_from_slice(format!("V {}\n{}\n", value.len(), value).as_bytes());
}

/// The `passtype`, `username` and `password` entries for a plaintext
/// credential.
pub fn encode_simple_credentials(user: &str, password: &str) -> Vec<u8> {
    let mut record = Vec::new();
    push_entry(&mut record, "passtype", PASSTYPE_SIMPLE);
    push_entry(&mut record, "username", user);
    push_entry(&mut record, "password", password);
    record
}

/// `existing` with the plaintext credential record in front of it. The
/// original bytes follow unchanged.
pub fn prepend_simple_credentials(existing: &[u8], user: &str, password: &str) -> Vec<u8> {
    let mut content = encode_simple_credentials(user, password);
    content.extend_from_slice(existing);
    content
}

/// The cache file of the realm the probe authenticated against. Only one
/// realm is involved in a fetch, so the first regular file in name order
/// is taken.
pub fn find_cache_file(dir: &Path) -> Result<PathBuf, FetchError> {
    let io_error = |source| FetchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if entry.file_type().map_err(io_error)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    files
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MissingAuthCache {
            dir: dir.to_path_buf(),
        })
}

/// Rewrites the cache file at `path` with the credential record prepended.
pub fn rewrite_cache_file(path: &Path, user: &str, password: &str) -> Result<(), FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(io_error)?;
    let mut existing = Vec::new();
    file.read_to_end(&mut existing).map_err(io_error)?;
    file.rewind().map_err(io_error)?;
    file.write_all(&prepend_simple_credentials(&existing, user, password))
        .map_err(io_error)?;
    debug!(
        "Prepended credentials to {} ({} bytes kept)",
        path.display(),
        existing.len()
    );
    Ok(())
}

pub struct CredentialInjector<'a> {
    pub client: &'a Path,
    pub home: &'a Path,
    pub runner: &'a dyn CommandRunner,
}

impl CredentialInjector<'_> {
    /// Seeds the cache with the identity's credentials. Returns `false`
    /// without running anything when the identity lacks a user or a
    /// password.
    pub fn inject(&self, url: &Url, identity: &Identity) -> Result<bool, FetchError> {
        if !identity.has_credentials() {
            debug!("Identity has no user/password pair, skipping credential injection");
            return Ok(false);
        }

        let probe = SvnCommand::info_probe(
            self.client,
            self.home,
            url,
            &identity.user,
            &identity.password,
        );
        self.runner.run(&probe, Mode::Silent)?;

        let path = find_cache_file(&auth_cache_dir(self.home))?;
        rewrite_cache_file(&path, &identity.user, &identity.password)?;
        info!("Injected credentials for {} into {}", identity.user, path.display());
        Ok(true)
    }
}
