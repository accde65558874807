use url::Url;

use crate::model::descriptor::RepositoryRef;

use super::FetchError;

pub const DEFAULT_BRANCH: &str = "trunk";

pub fn parse_repository_url(repository: &RepositoryRef) -> Result<Url, FetchError> {
    Url::parse(&repository.url).map_err(|source| FetchError::InvalidUrl {
        url: repository.url.clone(),
        source,
    })
}

/// Repository URL with the branch, or `trunk`, appended to its path.
///
/// Recomputed on every call; two calls for the same repository compare
/// equal but are distinct values.
pub fn effective_url(repository: &RepositoryRef) -> Result<Url, FetchError> {
    let mut url = parse_repository_url(repository)?;
    let branch = repository
        .branch
        .as_deref()
        .filter(|branch| !branch.is_empty())
        .unwrap_or(DEFAULT_BRANCH);
    let path = format!("{}/{}", url.path().trim_end_matches('/'), branch);
    url.set_path(&path);
    Ok(url)
}
